use alloy_primitives::{Address, Bytes, U256};
use tracing::debug;

use super::{payload_slice, payload_tail};
use crate::{
    constants::ADDRESS_LEN, refund_sub_execution, reserve_sub_execution_gas, OvmCallInputs,
    OvmError, OvmFrame, OvmHost,
};

/// `ovmCALL()`: forwards a call from the manager address.
///
/// Payload: `[20-byte target][arguments]`. The target is called with the arguments as call data,
/// the frame's gas minus the EIP-150 reserve and no value. Returns the callee's output.
pub fn call<H: OvmHost + ?Sized>(
    host: &mut H,
    frame: &mut OvmFrame,
    input: &[u8],
) -> Result<Bytes, OvmError<H::Error>> {
    let target = Address::from_slice(payload_slice(input, 0, ADDRESS_LEN)?);
    let arguments = &payload_tail(input)?[ADDRESS_LEN..];

    let gas_limit = reserve_sub_execution_gas(host.spec_id(), &mut frame.gas);
    let outcome = host
        .call(OvmCallInputs {
            caller: frame.address,
            target,
            input: Bytes::copy_from_slice(arguments),
            gas_limit,
            value: U256::ZERO,
        })
        .map_err(OvmError::Host)?;
    refund_sub_execution(&mut frame.gas, outcome.gas_remaining);

    if !outcome.is_ok() {
        debug!(target: "ovm::call", %target, result = ?outcome.result, "forwarded call failed");
        return Err(OvmError::SubExecution { result: outcome.result, output: outcome.output });
    }
    Ok(outcome.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::MemoryHost, OvmCallOutcome, OvmConfig, OvmOperation};
    use alloy_primitives::{address, bytes};
    use revm::interpreter::InstructionResult;

    const MANAGER: Address = address!("0000000000000000000000000000000000004200");
    const TARGET: Address = address!("0000000000000000000000000000000000200000");

    fn host() -> MemoryHost {
        MemoryHost::new(OvmConfig::new(MANAGER, bytes!("00"))).unwrap()
    }

    fn input(target: Address, arguments: &[u8]) -> Vec<u8> {
        let mut input = OvmOperation::Call.selector().to_vec();
        input.extend_from_slice(target.as_slice());
        input.extend_from_slice(arguments);
        input
    }

    #[test]
    fn test_call_forwards_arguments_from_manager() {
        let mut host = host();
        host.set_call_outcome(
            TARGET,
            OvmCallOutcome {
                result: InstructionResult::Return,
                output: bytes!("cafe"),
                gas_remaining: 500,
            },
        );

        let mut frame = OvmFrame::new(MANAGER, 64_000);
        let output = call(&mut host, &mut frame, &input(TARGET, &[1, 2, 3])).unwrap();
        assert_eq!(output, bytes!("cafe"));

        let forwarded = &host.calls()[0];
        assert_eq!(forwarded.caller, MANAGER);
        assert_eq!(forwarded.target, TARGET);
        assert_eq!(forwarded.input, bytes!("010203"));
        assert_eq!(forwarded.gas_limit, 63_000);
        assert_eq!(forwarded.value, U256::ZERO);
        assert_eq!(frame.gas.remaining(), 1_500);
    }

    #[test]
    fn test_call_without_arguments() {
        let mut host = host();
        let mut frame = OvmFrame::new(MANAGER, 64_000);
        call(&mut host, &mut frame, &input(TARGET, &[])).unwrap();
        assert!(host.calls()[0].input.is_empty());
    }

    #[test]
    fn test_call_revert_is_propagated() {
        let mut host = host();
        host.set_call_outcome(
            TARGET,
            OvmCallOutcome {
                result: InstructionResult::Revert,
                output: bytes!("08c379a0"),
                gas_remaining: 0,
            },
        );

        let mut frame = OvmFrame::new(MANAGER, 64_000);
        let err = call(&mut host, &mut frame, &input(TARGET, &[])).unwrap_err();
        match err {
            OvmError::SubExecution { result, output } => {
                assert_eq!(result, InstructionResult::Revert);
                assert_eq!(output, bytes!("08c379a0"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_call_requires_target_address() {
        let mut host = host();
        let mut frame = OvmFrame::new(MANAGER, 64_000);
        let input = &input(TARGET, &[])[..23];
        let err = call(&mut host, &mut frame, input).unwrap_err();
        assert!(matches!(err, OvmError::InsufficientInput { expected: 24, actual: 23 }));
        assert!(host.calls().is_empty());
    }
}
