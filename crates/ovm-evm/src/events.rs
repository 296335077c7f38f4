use alloy_primitives::{Address, Log, B256};
use alloy_sol_types::SolEvent;

use crate::{ActiveContract, CreatedContract, OvmHost};

/// Emits an `ActiveContract(address)` log from `emitter`.
pub fn emit_active_contract<H: OvmHost + ?Sized>(
    host: &mut H,
    emitter: Address,
    active_contract: Address,
) {
    emit_event(host, emitter, &ActiveContract { activeContract: active_contract });
}

/// Emits a `CreatedContract(address,address,bytes32)` log from `emitter`.
pub fn emit_created_contract<H: OvmHost + ?Sized>(
    host: &mut H,
    emitter: Address,
    ovm_contract_address: Address,
    code_contract_address: Address,
    code_contract_hash: B256,
) {
    emit_event(
        host,
        emitter,
        &CreatedContract {
            ovmContractAddress: ovm_contract_address,
            codeContractAddress: code_contract_address,
            codeContractHash: code_contract_hash,
        },
    );
}

/// Emits `event` with its signature hash as the only topic and its ABI-encoded fields as data.
pub fn emit_event<H: OvmHost + ?Sized, E: SolEvent>(host: &mut H, emitter: Address, event: &E) {
    host.log(Log { address: emitter, data: event.encode_log_data() });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::CODE_HASH_PLACEHOLDER, test_utils::MemoryHost, OvmConfig};
    use alloy_primitives::{address, keccak256, Bytes};

    const MANAGER: Address = address!("0000000000000000000000000000000000004200");
    const CALLER: Address = address!("0000000000000000000000000000000000100000");
    const CREATED: Address = address!("0000000000000000000000000000000000100001");

    fn host() -> MemoryHost {
        MemoryHost::new(OvmConfig::new(MANAGER, Bytes::from_static(&[0x00]))).unwrap()
    }

    #[test]
    fn test_active_contract_log_layout() {
        let mut host = host();
        emit_active_contract(&mut host, MANAGER, CALLER);

        let log = &host.logs()[0];
        assert_eq!(log.address, MANAGER);
        assert_eq!(log.topics(), &[keccak256("ActiveContract(address)")]);
        assert_eq!(log.data.data.len(), 32);
        assert_eq!(&log.data.data[12..], CALLER.as_slice());
    }

    #[test]
    fn test_created_contract_log_layout() {
        let mut host = host();
        emit_created_contract(&mut host, MANAGER, CALLER, CREATED, CODE_HASH_PLACEHOLDER);

        let log = &host.logs()[0];
        assert_eq!(log.topics(), &[keccak256("CreatedContract(address,address,bytes32)")]);
        assert_eq!(log.data.data.len(), 96);
        assert_eq!(&log.data.data[12..32], CALLER.as_slice());
        assert_eq!(&log.data.data[44..64], CREATED.as_slice());
        assert_eq!(&log.data.data[64..96], CODE_HASH_PLACEHOLDER.as_slice());

        let decoded = CreatedContract::decode_log_data(&log.data, true).unwrap();
        assert_eq!(decoded.ovmContractAddress, CALLER);
        assert_eq!(decoded.codeContractAddress, CREATED);
        assert_eq!(decoded.codeContractHash, CODE_HASH_PLACEHOLDER);
    }
}
