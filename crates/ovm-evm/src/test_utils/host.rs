use core::convert::Infallible;
use std::rc::Rc;

use alloy_primitives::{map::HashMap, Address, Bytes, Log, B256, U256};
use revm::{
    bytecode::opcode::INVALID,
    database::{AccountState, CacheDB, DbAccount, EmptyDB},
    interpreter::InstructionResult,
    primitives::hardfork::SpecId,
    state::Bytecode,
};
use tracing::debug;

use crate::{
    Ovm, OvmCallInputs, OvmCallOutcome, OvmConfig, OvmCreateInputs, OvmCreateOutcome, OvmError,
    OvmFrame, OvmHost, SetupError,
};

/// Gas charged by [`MemoryHost`] for every successful contract creation.
pub const MEMORY_HOST_CREATE_COST: u64 = 32_000;

/// Gas limit of calls made with [`MemoryHost::transact`].
pub const MEMORY_HOST_GAS_LIMIT: u64 = 30_000_000;

/// An in-memory [`OvmHost`] for testing purposes.
///
/// State lives in a `CacheDB`. Calls are routed through the execution manager: intercepted
/// calls are dispatched natively, calls to other accounts return the outcome registered with
/// [`set_call_outcome`](Self::set_call_outcome), or stop successfully without output.
/// Creations do not run the init code: code starting with `INVALID` fails, any other code is
/// installed as is.
#[derive(Debug, derive_more::Deref, derive_more::DerefMut)]
pub struct MemoryHost {
    #[deref]
    #[deref_mut]
    db: CacheDB<EmptyDB>,
    ovm: Rc<Ovm>,
    spec: SpecId,
    logs: Vec<Log>,
    calls: Vec<OvmCallInputs>,
    creates: Vec<OvmCreateInputs>,
    call_outcomes: HashMap<Address, OvmCallOutcome>,
}

impl MemoryHost {
    /// Creates an empty host running the execution manager configured by `config`.
    pub fn new(config: OvmConfig) -> Result<Self, SetupError> {
        Ok(Self::with_ovm(Ovm::new(config)?))
    }

    /// Creates an empty host running `ovm`.
    pub fn with_ovm(ovm: Ovm) -> Self {
        Self {
            db: CacheDB::default(),
            ovm: Rc::new(ovm),
            spec: SpecId::CANCUN,
            logs: Vec::new(),
            calls: Vec::new(),
            creates: Vec::new(),
            call_outcomes: HashMap::default(),
        }
    }

    /// The execution manager.
    pub fn ovm(&self) -> &Ovm {
        &self.ovm
    }

    /// Sets the active rule set.
    pub fn set_spec_id(&mut self, spec: SpecId) {
        self.spec = spec;
    }

    /// Returns the code of an account, empty if it has none.
    pub fn account_code(&mut self, address: Address) -> Bytes {
        self.account(address).info.code.as_ref().map(Bytecode::original_bytes).unwrap_or_default()
    }

    /// Sets the code of an account.
    pub fn set_account_code(&mut self, address: Address, code: Bytes) {
        let bytecode = Bytecode::new_legacy(code);
        let code_hash = bytecode.hash_slow();
        let account = self.account(address);
        account.info.code = Some(bytecode);
        account.info.code_hash = code_hash;
        account.account_state = AccountState::None;
    }

    /// Returns the nonce of an account.
    pub fn account_nonce(&mut self, address: Address) -> u64 {
        self.account(address).info.nonce
    }

    /// Registers the outcome of calls to `target`.
    pub fn set_call_outcome(&mut self, target: Address, outcome: OvmCallOutcome) {
        self.call_outcomes.insert(target, outcome);
    }

    /// The logs emitted so far.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// The calls issued so far, intercepted or not.
    pub fn calls(&self) -> &[OvmCallInputs] {
        &self.calls
    }

    /// The creations issued so far.
    pub fn creates(&self) -> &[OvmCreateInputs] {
        &self.creates
    }

    /// Calls `target` from `caller` with [`MEMORY_HOST_GAS_LIMIT`] gas and no value.
    pub fn transact(&mut self, caller: Address, target: Address, input: Bytes) -> OvmCallOutcome {
        let inputs = OvmCallInputs {
            caller,
            target,
            input,
            gas_limit: MEMORY_HOST_GAS_LIMIT,
            value: U256::ZERO,
        };
        match self.call(inputs) {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    fn account(&mut self, address: Address) -> &mut DbAccount {
        match self.db.load_account(address) {
            Ok(account) => account,
            Err(never) => match never {},
        }
    }

    fn create_failure(result: InstructionResult) -> OvmCreateOutcome {
        OvmCreateOutcome { result, output: Bytes::new(), address: None, gas_remaining: 0 }
    }
}

impl OvmHost for MemoryHost {
    type Error = Infallible;

    fn spec_id(&self) -> SpecId {
        self.spec
    }

    fn storage(&mut self, address: Address, key: B256) -> Result<B256, Self::Error> {
        let key = U256::from_be_bytes(key.0);
        let value = self.account(address).storage.get(&key).copied().unwrap_or_default();
        Ok(B256::from(value.to_be_bytes::<32>()))
    }

    fn set_storage(&mut self, address: Address, key: B256, value: B256) -> Result<(), Self::Error> {
        let account = self.account(address);
        account.storage.insert(U256::from_be_bytes(key.0), U256::from_be_bytes(value.0));
        account.account_state = AccountState::None;
        Ok(())
    }

    fn code(&mut self, address: Address) -> Result<Bytes, Self::Error> {
        Ok(self.account_code(address))
    }

    fn set_code(&mut self, address: Address, code: Bytes) -> Result<(), Self::Error> {
        self.set_account_code(address, code);
        Ok(())
    }

    fn log(&mut self, log: Log) {
        self.logs.push(log);
    }

    fn call(&mut self, inputs: OvmCallInputs) -> Result<OvmCallOutcome, Self::Error> {
        self.calls.push(inputs.clone());

        let ovm = Rc::clone(&self.ovm);
        let mut frame = OvmFrame::new(inputs.target, inputs.gas_limit);
        let Some(result) = ovm.try_dispatch(self, inputs.caller, &mut frame, &inputs.input) else {
            let outcome = self.call_outcomes.get(&inputs.target).cloned().unwrap_or_else(|| {
                OvmCallOutcome {
                    result: InstructionResult::Stop,
                    output: Bytes::new(),
                    gas_remaining: inputs.gas_limit,
                }
            });
            return Ok(outcome);
        };

        let gas_remaining = frame.gas.remaining();
        Ok(match result {
            Ok(output) => {
                OvmCallOutcome { result: InstructionResult::Return, output, gas_remaining }
            }
            Err(OvmError::SubExecution { output, .. }) => {
                OvmCallOutcome { result: InstructionResult::Revert, output, gas_remaining }
            }
            Err(err) => {
                debug!(target: "ovm::test_utils", %err, "manager call reverted");
                OvmCallOutcome {
                    result: InstructionResult::Revert,
                    output: Bytes::new(),
                    gas_remaining,
                }
            }
        })
    }

    fn create(&mut self, inputs: OvmCreateInputs) -> Result<OvmCreateOutcome, Self::Error> {
        self.creates.push(inputs.clone());

        let creator = self.account(inputs.caller);
        let nonce = creator.info.nonce;
        creator.info.nonce += 1;

        if inputs.init_code.first() == Some(&INVALID) {
            return Ok(Self::create_failure(InstructionResult::InvalidFEOpcode));
        }

        let address = inputs.created_address(nonce);
        let created = self.account(address);
        let has_code =
            created.info.code.as_ref().is_some_and(|code| !code.original_bytes().is_empty());
        if created.info.nonce != 0 || has_code {
            return Ok(Self::create_failure(InstructionResult::CreateCollision));
        }
        created.info.nonce = 1;
        self.set_account_code(address, inputs.init_code);

        Ok(OvmCreateOutcome {
            result: InstructionResult::Return,
            output: Bytes::new(),
            address: Some(address),
            gas_remaining: inputs.gas_limit.saturating_sub(MEMORY_HOST_CREATE_COST),
        })
    }
}
