use alloy_primitives::{Address, Bytes, U256};
use tracing::debug;

use super::payload_tail;
use crate::{
    constants::{ACTIVE_CONTRACT_SLOT, CODE_HASH_PLACEHOLDER, DEFAULT_CREATE2_SALT},
    emit_active_contract, emit_created_contract, refund_sub_execution, reserve_sub_execution_gas,
    OvmCreateInputs, OvmCreateScheme, OvmError, OvmFrame, OvmHost, PurityChecker,
};

/// `ovmCREATE2()`: creates a contract from the init code behind the selector, addressed by
/// `caller`, [`DEFAULT_CREATE2_SALT`] and the init code hash.
///
/// Returns the 20 address bytes of the new contract.
pub fn create2<H: OvmHost + ?Sized, P: PurityChecker + ?Sized>(
    host: &mut H,
    purity_checker: &P,
    caller: Address,
    frame: &mut OvmFrame,
    input: &[u8],
) -> Result<Bytes, OvmError<H::Error>> {
    let init_code = payload_tail(input)?;
    let scheme = OvmCreateScheme::Create2 { salt: DEFAULT_CREATE2_SALT };
    originate(host, purity_checker, caller, caller, scheme, frame, init_code)
}

/// `ovmCREATE()`: creates a contract from the init code behind the selector on behalf of the
/// active contract, addressed by the active contract's nonce.
///
/// The active contract is read from [`ACTIVE_CONTRACT_SLOT`] of the manager's storage. Returns
/// the 20 address bytes of the new contract.
pub fn create<H: OvmHost + ?Sized, P: PurityChecker + ?Sized>(
    host: &mut H,
    purity_checker: &P,
    caller: Address,
    frame: &mut OvmFrame,
    input: &[u8],
) -> Result<Bytes, OvmError<H::Error>> {
    let init_code = payload_tail(input)?;
    let active_contract = active_contract(host, frame.address)?;
    let scheme = OvmCreateScheme::Create;
    originate(host, purity_checker, caller, active_contract, scheme, frame, init_code)
}

/// Reads the active contract recorded in the storage of `manager`.
pub fn active_contract<H: OvmHost + ?Sized>(
    host: &mut H,
    manager: Address,
) -> Result<Address, OvmError<H::Error>> {
    let word = host.storage(manager, ACTIVE_CONTRACT_SLOT).map_err(OvmError::Host)?;
    Ok(Address::from_word(word))
}

fn originate<H: OvmHost + ?Sized, P: PurityChecker + ?Sized>(
    host: &mut H,
    purity_checker: &P,
    caller: Address,
    creator: Address,
    scheme: OvmCreateScheme,
    frame: &mut OvmFrame,
    init_code: &[u8],
) -> Result<Bytes, OvmError<H::Error>> {
    if !purity_checker.is_pure(host, caller, &mut frame.gas, init_code)? {
        return Err(OvmError::ImpureInitCode);
    }

    let gas_limit = reserve_sub_execution_gas(host.spec_id(), &mut frame.gas);
    let outcome = host
        .create(OvmCreateInputs {
            caller: creator,
            scheme,
            init_code: Bytes::copy_from_slice(init_code),
            gas_limit,
            value: U256::ZERO,
        })
        .map_err(OvmError::Host)?;
    refund_sub_execution(&mut frame.gas, outcome.gas_remaining);

    if !outcome.is_ok() {
        debug!(
            target: "ovm::create",
            %creator,
            ?scheme,
            result = ?outcome.result,
            "contract origination failed"
        );
        return Err(OvmError::SubExecution { result: outcome.result, output: outcome.output });
    }
    let Some(address) = outcome.address else {
        return Err(OvmError::NoContractCreated);
    };
    debug!(target: "ovm::create", %creator, %address, ?scheme, "originated contract");

    emit_active_contract(host, frame.address, caller);
    emit_created_contract(host, frame.address, caller, address, CODE_HASH_PLACEHOLDER);

    Ok(Bytes::copy_from_slice(address.as_slice()))
}
