//! Solidity bindings of the execution manager interface and its events.

#![allow(missing_docs)]

use alloy_sol_types::sol;

sol! {
    /// Emitted when a contract becomes the active contract of the calling context.
    #[derive(Debug, PartialEq, Eq)]
    event ActiveContract(address activeContract);

    /// Emitted when the execution manager originates a contract.
    #[derive(Debug, PartialEq, Eq)]
    event CreatedContract(
        address ovmContractAddress,
        address codeContractAddress,
        bytes32 codeContractHash
    );

    /// The execution manager methods served natively. The payloads are raw bytes appended to
    /// the selector rather than ABI-encoded arguments.
    #[sol(all_derives)]
    interface IExecutionManager {
        function ovmSLOAD() external view returns (bytes32);
        function ovmSSTORE() external;
        function ovmCREATE() external returns (address);
        function ovmCREATE2() external returns (address);
        function ovmCALL() external returns (bytes memory);
    }
}
