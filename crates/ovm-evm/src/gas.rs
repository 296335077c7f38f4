use revm::{interpreter::Gas, primitives::hardfork::SpecId};

use crate::constants::CALL_GAS_RESERVE_DIVISOR;

/// The gas limit handed to a nested call or creation out of `remaining` gas.
///
/// From `TANGERINE` (EIP-150) on, one 64th of the remaining gas stays with the caller.
#[inline]
pub fn sub_execution_gas_limit(spec: SpecId, remaining: u64) -> u64 {
    if spec.is_enabled_in(SpecId::TANGERINE) {
        remaining - remaining / CALL_GAS_RESERVE_DIVISOR
    } else {
        remaining
    }
}

/// Charges `gas` for a sub-execution and returns the gas limit to hand over.
///
/// The unused gas is credited back with [`refund_sub_execution`] once the sub-execution
/// returns.
#[inline]
pub fn reserve_sub_execution_gas(spec: SpecId, gas: &mut Gas) -> u64 {
    let gas_limit = sub_execution_gas_limit(spec, gas.remaining());
    // never exceeds the remaining gas, so recording cannot fail
    let _ = gas.record_cost(gas_limit);
    gas_limit
}

/// Credits the gas a sub-execution left unused back to `gas`.
#[inline]
pub fn refund_sub_execution(gas: &mut Gas, gas_remaining: u64) {
    gas.erase_cost(gas_remaining);
}
