//! Native implementations of the execution manager operations.
//!
//! Every operation receives the raw call input, selector included, and reads its payload at fixed
//! offsets behind the selector.

mod call;
mod create;
mod storage;

pub use call::*;
pub use create::*;
pub use storage::*;

use alloy_primitives::B256;

use crate::{
    constants::{SELECTOR_LEN, WORD_SIZE},
    OvmError,
};

/// The call input ends before a payload field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ShortInput {
    expected: usize,
    actual: usize,
}

impl<E> From<ShortInput> for OvmError<E> {
    fn from(ShortInput { expected, actual }: ShortInput) -> Self {
        Self::InsufficientInput { expected, actual }
    }
}

/// Returns the payload bytes `offset..offset + len` behind the selector.
fn payload_slice(input: &[u8], offset: usize, len: usize) -> Result<&[u8], ShortInput> {
    let start = SELECTOR_LEN + offset;
    let end = start + len;
    input.get(start..end).ok_or(ShortInput { expected: end, actual: input.len() })
}

/// Returns the 32-byte word at `offset` behind the selector.
fn payload_word(input: &[u8], offset: usize) -> Result<B256, ShortInput> {
    payload_slice(input, offset, WORD_SIZE).map(B256::from_slice)
}

/// Returns everything behind the selector.
fn payload_tail(input: &[u8]) -> Result<&[u8], ShortInput> {
    input.get(SELECTOR_LEN..).ok_or(ShortInput { expected: SELECTOR_LEN, actual: input.len() })
}
