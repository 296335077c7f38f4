//! End-to-end tests for interception, marker cleanup, call forwarding and origination.

use alloy_primitives::{address, b256, Address, Bytes, B256};
use alloy_sol_types::SolEvent;
use ovm_evm::{
    constants::{CODE_HASH_PLACEHOLDER, DEFAULT_CREATE2_SALT},
    test_utils::MemoryHost,
    ActiveContract, CreatedContract, OvmCallOutcome, OvmConfig, OvmHost, OvmOperation,
};
use proptest::prelude::*;
use revm::interpreter::InstructionResult;
use tracing_subscriber::EnvFilter;

const MANAGER: Address = address!("0000000000000000000000000000000000004200");
const CONTRACT: Address = address!("1000000000000000000000000000000000000001");
const TARGET: Address = address!("1000000000000000000000000000000000000003");

const KEY: B256 = b256!("0102030000000000000000000000000000000000000000000000000000000000");
const VALUE: B256 = b256!("0405060000000000000000000000000000000000000000000000000000000000");

/// Installs a test subscriber filtered by `RUST_LOG`, e.g. `RUST_LOG=ovm=trace`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn marker() -> Bytes {
    Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52])
}

fn host() -> MemoryHost {
    init_tracing();
    MemoryHost::new(OvmConfig::new(MANAGER, marker())).unwrap()
}

fn operation_input(operation: OvmOperation, payload: &[u8]) -> Bytes {
    let mut input = operation.selector().to_vec();
    input.extend_from_slice(payload);
    input.into()
}

fn store_payload(key: B256, value: B256) -> Vec<u8> {
    [key.as_slice(), value.as_slice()].concat()
}

fn forward_payload(target: Address, arguments: &[u8]) -> Vec<u8> {
    [target.as_slice(), arguments].concat()
}

#[test]
fn test_forwarded_call_returns_callee_output() {
    let mut host = host();
    host.set_call_outcome(
        TARGET,
        OvmCallOutcome {
            result: InstructionResult::Return,
            output: Bytes::from_static(b"pong"),
            gas_remaining: 0,
        },
    );

    let input = operation_input(OvmOperation::Call, &forward_payload(TARGET, b"ping"));
    let outcome = host.transact(CONTRACT, MANAGER, input);
    assert_eq!(outcome.result, InstructionResult::Return);
    assert_eq!(&outcome.output[..], b"pong");

    let forwarded = &host.calls()[1];
    assert_eq!(forwarded.caller, MANAGER);
    assert_eq!(&forwarded.input[..], b"ping");
    assert!(host.account_code(MANAGER).is_empty());
}

#[test]
fn test_nested_dispatch_through_forwarded_call() {
    let mut host = host();

    // CALL(manager, SSTORE(key, value)) re-enters the manager with the manager as caller
    let store = operation_input(OvmOperation::SStore, &store_payload(KEY, VALUE));
    let input = operation_input(OvmOperation::Call, &forward_payload(MANAGER, &store));
    let outcome = host.transact(CONTRACT, MANAGER, input);

    assert_eq!(outcome.result, InstructionResult::Return);
    assert_eq!(host.calls().len(), 2);
    assert_eq!(host.storage(MANAGER, KEY).unwrap(), VALUE);
    assert_eq!(host.storage(CONTRACT, KEY).unwrap(), B256::ZERO);
    assert!(host.account_code(MANAGER).is_empty());
}

#[test]
fn test_failed_forwarded_call_reverts_with_callee_output() {
    let mut host = host();
    host.set_call_outcome(
        TARGET,
        OvmCallOutcome {
            result: InstructionResult::Revert,
            output: Bytes::from_static(b"nope"),
            gas_remaining: 0,
        },
    );

    let input = operation_input(OvmOperation::Call, &forward_payload(TARGET, &[]));
    let outcome = host.transact(CONTRACT, MANAGER, input);
    assert_eq!(outcome.result, InstructionResult::Revert);
    assert_eq!(&outcome.output[..], b"nope");
    assert!(host.account_code(MANAGER).is_empty());
}

#[test]
fn test_create2_end_to_end() {
    let init_code = [0x60, 0x01, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3];
    let expected = CONTRACT.create2_from_code(DEFAULT_CREATE2_SALT, init_code);

    let mut addresses = Vec::new();
    for _ in 0..2 {
        let mut host = host();
        let outcome =
            host.transact(CONTRACT, MANAGER, operation_input(OvmOperation::Create2, &init_code));
        assert_eq!(outcome.result, InstructionResult::Return);
        addresses.push(Address::from_slice(&outcome.output));

        assert_eq!(&host.account_code(expected)[..], &init_code);
        assert!(host.account_code(MANAGER).is_empty());

        let logs = host.logs();
        assert_eq!(logs.len(), 2);
        let active = ActiveContract::decode_log_data(&logs[0].data, true).unwrap();
        assert_eq!(active.activeContract, CONTRACT);
        let created = CreatedContract::decode_log_data(&logs[1].data, true).unwrap();
        assert_eq!(created.codeContractAddress, expected);
        assert_eq!(created.codeContractHash, CODE_HASH_PLACEHOLDER);
    }
    assert_eq!(addresses, [expected, expected]);
}

#[test]
fn test_failed_create2_clears_code() {
    let mut host = host();
    let outcome = host.transact(CONTRACT, MANAGER, operation_input(OvmOperation::Create2, &[0xfe]));

    assert_eq!(outcome.result, InstructionResult::Revert);
    assert!(host.logs().is_empty());
    assert!(host.account_code(MANAGER).is_empty());
}

#[test]
fn test_preexisting_manager_code_is_cleared() {
    let mut host = host();
    host.set_account_code(MANAGER, Bytes::from_static(&[0x00]));

    let input = operation_input(OvmOperation::SLoad, KEY.as_slice());
    assert_eq!(host.transact(CONTRACT, MANAGER, input).result, InstructionResult::Return);
    assert!(host.account_code(MANAGER).is_empty());
}

#[test]
fn test_stale_marker_is_cleared() {
    let mut host = host();
    host.set_account_code(MANAGER, marker());

    let input = operation_input(OvmOperation::SStore, &store_payload(KEY, VALUE));
    assert_eq!(host.transact(CONTRACT, MANAGER, input).result, InstructionResult::Return);
    assert!(host.account_code(MANAGER).is_empty());
    assert_eq!(host.ovm().dispatch_depth(), 0);

    // same through a nested dispatch
    host.set_account_code(MANAGER, marker());
    let store = operation_input(OvmOperation::SStore, &store_payload(KEY, VALUE));
    let input = operation_input(OvmOperation::Call, &forward_payload(MANAGER, &store));
    assert_eq!(host.transact(CONTRACT, MANAGER, input).result, InstructionResult::Return);
    assert!(host.account_code(MANAGER).is_empty());
    assert_eq!(host.ovm().dispatch_depth(), 0);
}

proptest! {
    #[test]
    fn proptest_calls_to_other_targets_run_normally(
        target in any::<[u8; 20]>().prop_map(Address::from),
        operation in prop::sample::select(OvmOperation::ALL.to_vec()),
        payload in prop::collection::vec(any::<u8>(), 0..96),
    ) {
        prop_assume!(target != MANAGER);
        let mut host = host();

        let outcome = host.transact(CONTRACT, target, operation_input(operation, &payload));
        prop_assert_eq!(outcome.result, InstructionResult::Stop);
        prop_assert!(host.logs().is_empty());
        prop_assert!(host.creates().is_empty());
        prop_assert!(host.account_code(MANAGER).is_empty());
        prop_assert_eq!(host.storage(CONTRACT, KEY).unwrap(), B256::ZERO);
    }
}
