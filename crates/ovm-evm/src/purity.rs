use alloy_primitives::{Address, Bytes, U256};
use revm::interpreter::Gas;
use tracing::debug;

use crate::{refund_sub_execution, reserve_sub_execution_gas, OvmCallInputs, OvmError, OvmHost};

/// Decides whether init code may be used to originate a contract.
///
/// Pure init code is free of operations that read non-deterministic environment data. The
/// dispatcher consults the checker before every origination; a rejection fails the operation
/// with [`OvmError::ImpureInitCode`].
pub trait PurityChecker {
    /// Returns `true` if `code`, submitted by `caller`, is pure.
    ///
    /// Any gas the check consumes is charged to `gas`, the frame of the originating operation.
    fn is_pure<H: OvmHost + ?Sized>(
        &self,
        host: &mut H,
        caller: Address,
        gas: &mut Gas,
        code: &[u8],
    ) -> Result<bool, OvmError<H::Error>>;
}

/// Accepts all init code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AcceptAll;

impl PurityChecker for AcceptAll {
    #[inline]
    fn is_pure<H: OvmHost + ?Sized>(
        &self,
        _host: &mut H,
        _caller: Address,
        _gas: &mut Gas,
        _code: &[u8],
    ) -> Result<bool, OvmError<H::Error>> {
        Ok(true)
    }
}

/// An optional checker; `None` accepts all init code.
impl<P: PurityChecker> PurityChecker for Option<P> {
    fn is_pure<H: OvmHost + ?Sized>(
        &self,
        host: &mut H,
        caller: Address,
        gas: &mut Gas,
        code: &[u8],
    ) -> Result<bool, OvmError<H::Error>> {
        match self {
            Some(checker) => checker.is_pure(host, caller, gas, code),
            None => Ok(true),
        }
    }
}

/// Delegates the decision to a purity checker contract.
///
/// The contract is called with the raw init code as call data; the code is pure if the call
/// succeeds and the first returned byte is non-zero. The call gets the same share of the frame's
/// gas as any other sub-execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurityCheckerContract {
    address: Address,
}

impl PurityCheckerContract {
    /// Creates a checker backed by the contract at `address`.
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    /// The address of the checker contract.
    pub const fn address(&self) -> Address {
        self.address
    }
}

impl PurityChecker for PurityCheckerContract {
    fn is_pure<H: OvmHost + ?Sized>(
        &self,
        host: &mut H,
        caller: Address,
        gas: &mut Gas,
        code: &[u8],
    ) -> Result<bool, OvmError<H::Error>> {
        let gas_limit = reserve_sub_execution_gas(host.spec_id(), gas);
        let outcome = host
            .call(OvmCallInputs {
                caller,
                target: self.address,
                input: Bytes::copy_from_slice(code),
                gas_limit,
                value: U256::ZERO,
            })
            .map_err(OvmError::Host)?;
        refund_sub_execution(gas, outcome.gas_remaining);
        let pure = outcome.is_ok() && outcome.output.first().is_some_and(|byte| *byte != 0);
        debug!(
            target: "ovm::purity",
            checker = %self.address,
            %caller,
            pure,
            result = ?outcome.result,
            "checked init code purity"
        );
        Ok(pure)
    }
}
