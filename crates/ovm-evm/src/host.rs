use alloy_primitives::{Address, Bytes, Log, B256, U256};
use auto_impl::auto_impl;
use revm::{
    interpreter::{Gas, InstructionResult},
    primitives::hardfork::SpecId,
};

/// The execution engine state and call interface consumed by OVM operations.
///
/// Implemented by the host engine. Every state change an operation makes goes through this
/// trait; operations keep no state of their own.
#[auto_impl(&mut, Box)]
pub trait OvmHost {
    /// The error type of the state and call interface.
    type Error: core::error::Error + 'static;

    /// The active rule set of the engine.
    fn spec_id(&self) -> SpecId;

    /// Reads the storage slot `key` of `address`. Unwritten slots read as zero.
    fn storage(&mut self, address: Address, key: B256) -> Result<B256, Self::Error>;

    /// Writes `value` to the storage slot `key` of `address`.
    fn set_storage(&mut self, address: Address, key: B256, value: B256) -> Result<(), Self::Error>;

    /// Returns the code of `address`, empty if it has none.
    fn code(&mut self, address: Address) -> Result<Bytes, Self::Error>;

    /// Replaces the code of `address`.
    fn set_code(&mut self, address: Address, code: Bytes) -> Result<(), Self::Error>;

    /// Appends a log to the current transaction.
    fn log(&mut self, log: Log);

    /// Executes a message call through the engine's regular call path.
    fn call(&mut self, inputs: OvmCallInputs) -> Result<OvmCallOutcome, Self::Error>;

    /// Executes a contract creation through the engine's regular creation path.
    fn create(&mut self, inputs: OvmCreateInputs) -> Result<OvmCreateOutcome, Self::Error>;
}

/// The account whose call is being dispatched, with the gas available to the operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OvmFrame {
    /// The address the call targets, i.e. the manager address.
    pub address: Address,
    /// Gas accounting of the call.
    pub gas: Gas,
}

impl OvmFrame {
    /// Creates a frame for `address` with `gas_limit` gas.
    pub fn new(address: Address, gas_limit: u64) -> Self {
        Self { address, gas: Gas::new(gas_limit) }
    }
}

/// Inputs of a message call issued by an OVM operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OvmCallInputs {
    /// The account issuing the call.
    pub caller: Address,
    /// The account being called.
    pub target: Address,
    /// The call data.
    pub input: Bytes,
    /// The gas handed to the callee.
    pub gas_limit: u64,
    /// The value transferred.
    pub value: U256,
}

/// Result of a message call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OvmCallOutcome {
    /// How the execution ended.
    pub result: InstructionResult,
    /// Return or revert data.
    pub output: Bytes,
    /// Gas left unused by the callee.
    pub gas_remaining: u64,
}

impl OvmCallOutcome {
    /// Returns `true` if the call succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// How the address of a new contract is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OvmCreateScheme {
    /// From the creator's address and nonce.
    Create,
    /// From the creator's address, a salt and the init code hash.
    Create2 {
        /// The salt.
        salt: B256,
    },
}

/// Inputs of a contract creation issued by an OVM operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OvmCreateInputs {
    /// The account creating the contract.
    pub caller: Address,
    /// The address derivation scheme.
    pub scheme: OvmCreateScheme,
    /// The init code.
    pub init_code: Bytes,
    /// The gas handed to the init code.
    pub gas_limit: u64,
    /// The endowment of the new contract.
    pub value: U256,
}

impl OvmCreateInputs {
    /// The address the contract is created at, given the creator's current nonce.
    pub fn created_address(&self, nonce: u64) -> Address {
        match self.scheme {
            OvmCreateScheme::Create => self.caller.create(nonce),
            OvmCreateScheme::Create2 { salt } => {
                self.caller.create2_from_code(salt, &self.init_code)
            }
        }
    }
}

/// Result of a contract creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OvmCreateOutcome {
    /// How the init code execution ended.
    pub result: InstructionResult,
    /// Revert data on failure.
    pub output: Bytes,
    /// The created contract, if any.
    pub address: Option<Address>,
    /// Gas left unused by the init code.
    pub gas_remaining: u64,
}

impl OvmCreateOutcome {
    /// Returns `true` if the creation succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
