use alloy_primitives::{Address, Selector};
use tracing::trace;

use crate::{constants::SELECTOR_LEN, OperationRegistry, OvmConfig, OvmOperation};

/// Decides which calls are diverted to native dispatch.
///
/// A call is diverted iff it targets the manager address and its input starts with a registered
/// selector. The check has no side effects and does not allocate.
#[derive(Clone, Copy, Debug)]
pub struct OvmInterceptor<'a> {
    config: &'a OvmConfig,
    registry: &'a OperationRegistry,
}

impl<'a> OvmInterceptor<'a> {
    /// Creates an interceptor for the manager address of `config`.
    pub const fn new(config: &'a OvmConfig, registry: &'a OperationRegistry) -> Self {
        Self { config, registry }
    }

    /// Returns `true` if a call to `target` with `input` must be dispatched natively.
    #[inline]
    pub fn should_intercept(&self, target: Address, input: &[u8]) -> bool {
        self.operation(target, input).is_some()
    }

    /// Returns the operation a call to `target` with `input` is diverted to, if any.
    pub fn operation(&self, target: Address, input: &[u8]) -> Option<OvmOperation> {
        if target != self.config.manager_address {
            return None;
        }
        let selector = Selector::from(*input.first_chunk::<SELECTOR_LEN>()?);
        let operation = self.registry.get(&selector);
        trace!(target: "ovm::intercept", %selector, ?operation, "manager call");
        operation
    }
}
