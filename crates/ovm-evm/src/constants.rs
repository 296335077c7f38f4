//! Constants for the OVM execution manager.

use alloy_primitives::{b256, B256};

/// Prefix prepended to an operation name before hashing it into a selector, e.g. `ovmSLOAD()`.
pub const METHOD_PREFIX: &str = "ovm";

/// Suffix appended to an operation name before hashing it into a selector.
pub const METHOD_SUFFIX: &str = "()";

/// Length of a method selector in bytes.
pub const SELECTOR_LEN: usize = 4;

/// Length of a storage key or value in bytes.
pub const WORD_SIZE: usize = 32;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// The manager storage slot holding the address of the currently active contract. `ovmCREATE`
/// creates contracts on behalf of this address.
pub const ACTIVE_CONTRACT_SLOT: B256 = B256::with_last_byte(9);

/// Salt used by `ovmCREATE2`. The call payload carries only the init code.
pub const DEFAULT_CREATE2_SALT: B256 = B256::ZERO;

/// Code hash reported in `CreatedContract` events until code hashes are tracked.
pub const CODE_HASH_PLACEHOLDER: B256 =
    b256!("0100000000000000000000000000000000000000000000000000000000000000");

/// Divisor of the EIP-150 rule: a sub-execution receives all but one 64th of the remaining gas.
pub const CALL_GAS_RESERVE_DIVISOR: u64 = 64;
