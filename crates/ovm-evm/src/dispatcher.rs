use alloy_primitives::{Address, Bytes, Selector};
use tracing::debug;

use crate::{
    call, constants::SELECTOR_LEN, create, create2, sload, sstore, MarkerCodeGuard, MarkerDepth,
    OperationRegistry, OvmConfig, OvmError, OvmFrame, OvmHost, OvmOperation, PurityChecker,
};

/// Runs diverted manager calls natively.
///
/// Only calls accepted by an [`OvmInterceptor`](crate::OvmInterceptor) built from the same
/// configuration and registry may be dispatched. Dispatchers that may nest must share one
/// [`MarkerDepth`].
#[derive(Debug)]
pub struct OvmDispatcher<'a, P> {
    config: &'a OvmConfig,
    registry: &'a OperationRegistry,
    purity_checker: &'a P,
    depth: &'a MarkerDepth,
}

impl<P> Clone for OvmDispatcher<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for OvmDispatcher<'_, P> {}

impl<'a, P: PurityChecker> OvmDispatcher<'a, P> {
    /// Creates a dispatcher.
    pub const fn new(
        config: &'a OvmConfig,
        registry: &'a OperationRegistry,
        purity_checker: &'a P,
        depth: &'a MarkerDepth,
    ) -> Self {
        Self { config, registry, purity_checker, depth }
    }

    /// Dispatches a manager call made by `caller`.
    ///
    /// The marker bytecode is the manager's code while the operation runs. Afterwards the code
    /// is cleared, whether the operation succeeded or not; a nested dispatch leaves the marker
    /// of the enclosing one in place instead. Frames that do not run at the manager address are
    /// rejected before the marker is installed.
    pub fn dispatch<H: OvmHost>(
        &self,
        host: &mut H,
        caller: Address,
        frame: &mut OvmFrame,
        input: &[u8],
    ) -> Result<Bytes, OvmError<H::Error>> {
        let Some(selector) = input.first_chunk::<SELECTOR_LEN>().copied().map(Selector::from) else {
            return Err(OvmError::InsufficientInput { expected: SELECTOR_LEN, actual: input.len() });
        };

        let OvmConfig { manager_address, marker_bytecode, .. } = self.config;
        if frame.address != *manager_address {
            return Err(OvmError::UnexpectedTarget {
                expected: *manager_address,
                actual: frame.address,
            });
        }

        let mut guard =
            MarkerCodeGuard::install(host, self.depth, *manager_address, marker_bytecode)
                .map_err(OvmError::Host)?;
        let result = self.run(&mut guard, selector, caller, frame, input);
        let released = guard.release();

        let output = result?;
        released.map_err(OvmError::Host)?;
        Ok(output)
    }

    fn run<H: OvmHost>(
        &self,
        host: &mut MarkerCodeGuard<'_, H>,
        selector: Selector,
        caller: Address,
        frame: &mut OvmFrame,
        input: &[u8],
    ) -> Result<Bytes, OvmError<H::Error>> {
        let Some(operation) = self.registry.get(&selector) else {
            return Err(OvmError::UnknownSelector(selector));
        };
        debug!(target: "ovm::dispatch", %operation, %caller, input = input.len(), "dispatching");

        let result = match operation {
            OvmOperation::SLoad => sload(host, caller, input),
            OvmOperation::SStore => sstore(host, caller, input),
            OvmOperation::Create => create(host, self.purity_checker, caller, frame, input),
            OvmOperation::Create2 => create2(host, self.purity_checker, caller, frame, input),
            OvmOperation::Call => call(host, frame, input),
        };

        match &result {
            Ok(output) => {
                debug!(target: "ovm::dispatch", %operation, output_len = output.len(), "done")
            }
            Err(err) => debug!(target: "ovm::dispatch", %operation, %err, "failed"),
        }
        result
    }
}
