use alloy_primitives::{Address, Bytes};

use super::payload_word;
use crate::{constants::WORD_SIZE, OvmError, OvmHost};

/// `ovmSLOAD()`: reads the word stored under `key` in the storage of `caller`.
///
/// Payload: `[32-byte key]`. Returns the 32-byte value, zero if the slot was never written.
pub fn sload<H: OvmHost + ?Sized>(
    host: &mut H,
    caller: Address,
    input: &[u8],
) -> Result<Bytes, OvmError<H::Error>> {
    let key = payload_word(input, 0)?;
    let value = host.storage(caller, key).map_err(OvmError::Host)?;
    Ok(Bytes::copy_from_slice(value.as_slice()))
}

/// `ovmSSTORE()`: writes `value` under `key` in the storage of `caller`.
///
/// Payload: `[32-byte key][32-byte value]`. Returns empty output.
pub fn sstore<H: OvmHost + ?Sized>(
    host: &mut H,
    caller: Address,
    input: &[u8],
) -> Result<Bytes, OvmError<H::Error>> {
    let key = payload_word(input, 0)?;
    let value = payload_word(input, WORD_SIZE)?;
    host.set_storage(caller, key, value).map_err(OvmError::Host)?;
    Ok(Bytes::new())
}
