use alloy_primitives::{Address, Bytes, Selector};
use revm::interpreter::InstructionResult;

use crate::OvmOperation;

/// Error returned by a dispatched OVM operation.
///
/// `E` is the error type of the host's state and call interface.
#[derive(Debug, thiserror::Error)]
pub enum OvmError<E> {
    /// The call input is shorter than the operation's payload.
    #[error("insufficient input length: expected at least {expected} bytes, got {actual}")]
    InsufficientInput {
        /// The minimum input length, selector included.
        expected: usize,
        /// The actual input length.
        actual: usize,
    },
    /// The dispatched frame does not run at the manager address.
    #[error("dispatched frame targets {actual}, expected the manager at {expected}")]
    UnexpectedTarget {
        /// The manager address.
        expected: Address,
        /// The frame's address.
        actual: Address,
    },
    /// The selector passed interception but is not registered. This is an internal invariant
    /// violation: the interceptor and dispatcher must share one registry.
    #[error("no ovm operation registered for selector {0}")]
    UnknownSelector(Selector),
    /// A nested call or contract creation did not succeed.
    #[error("sub-execution failed with {result:?}")]
    SubExecution {
        /// The instruction result reported by the host.
        result: InstructionResult,
        /// The output of the failed execution, e.g. revert data.
        output: Bytes,
    },
    /// The purity checker rejected the init code.
    #[error("initCode is impure")]
    ImpureInitCode,
    /// The host reported a successful creation without a contract address.
    #[error("contract creation succeeded without a contract address")]
    NoContractCreated,
    /// The host's state or call interface failed.
    #[error("host error: {0}")]
    Host(#[source] E),
}

impl<E> OvmError<E> {
    /// Returns `true` if the error is caused by malformed call input.
    pub const fn is_malformed_input(&self) -> bool {
        matches!(self, Self::InsufficientInput { .. })
    }
}

/// Error returned when building an [`OperationRegistry`](crate::OperationRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two distinct operations hash to the same selector.
    #[error("selector {selector} of {operation} collides with {existing}")]
    SelectorCollision {
        /// The colliding selector.
        selector: Selector,
        /// The operation registered first.
        existing: OvmOperation,
        /// The operation that failed to register.
        operation: OvmOperation,
    },
    /// The same operation was registered twice.
    #[error("operation {0} registered twice")]
    DuplicateOperation(OvmOperation),
}

/// Error returned by [`OvmConfig::validate`](crate::OvmConfig::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Dispatch requires a non-empty marker bytecode for the manager account.
    #[error("marker bytecode must not be empty")]
    EmptyMarkerBytecode,
    /// Calls to the purity checker would be intercepted as manager calls.
    #[error("purity checker address {0} must differ from the manager address")]
    PurityCheckerIsManager(Address),
}

/// Error returned when setting up an [`Ovm`](crate::Ovm).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The operation registry could not be built.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
