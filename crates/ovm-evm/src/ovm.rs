use alloy_primitives::{Address, Bytes};

use crate::{
    MarkerDepth, OperationRegistry, OvmConfig, OvmDispatcher, OvmError, OvmFrame, OvmHost,
    OvmInterceptor, PurityChecker, PurityCheckerContract, SetupError,
};

/// The execution manager: configuration, operation registry and purity checker, set up once
/// when the host starts.
///
/// Dereferences to its [`OvmConfig`].
#[derive(Clone, Debug, derive_more::Deref)]
pub struct Ovm<P = Option<PurityCheckerContract>> {
    #[deref]
    config: OvmConfig,
    registry: OperationRegistry,
    purity_checker: P,
    depth: MarkerDepth,
}

impl Ovm {
    /// Validates `config` and registers all operations.
    ///
    /// Init code is checked by the purity checker contract if the configuration names one, and
    /// accepted as is otherwise.
    pub fn new(config: OvmConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let purity_checker = config.purity_checker_address.map(PurityCheckerContract::new);
        Ok(Self {
            config,
            registry: OperationRegistry::default(),
            purity_checker,
            depth: MarkerDepth::default(),
        })
    }
}

impl<P: PurityChecker> Ovm<P> {
    /// Replaces the operation registry.
    pub fn with_registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the purity checker.
    pub fn with_purity_checker<Q: PurityChecker>(self, purity_checker: Q) -> Ovm<Q> {
        Ovm { config: self.config, registry: self.registry, purity_checker, depth: self.depth }
    }

    /// The configuration.
    pub const fn config(&self) -> &OvmConfig {
        &self.config
    }

    /// The operation registry.
    pub const fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// The purity checker.
    pub const fn purity_checker(&self) -> &P {
        &self.purity_checker
    }

    /// Number of dispatches currently running, nested ones included.
    pub fn dispatch_depth(&self) -> usize {
        self.depth.get()
    }

    /// Returns an interceptor sharing this manager's configuration and registry.
    pub const fn interceptor(&self) -> OvmInterceptor<'_> {
        OvmInterceptor::new(&self.config, &self.registry)
    }

    /// Returns a dispatcher sharing this manager's state.
    pub const fn dispatcher(&self) -> OvmDispatcher<'_, P> {
        OvmDispatcher::new(&self.config, &self.registry, &self.purity_checker, &self.depth)
    }

    /// Dispatches a call from `caller` to `frame.address` if it is intercepted.
    ///
    /// Returns `None` if the call is not a manager call and must run as regular bytecode.
    pub fn try_dispatch<H: OvmHost>(
        &self,
        host: &mut H,
        caller: Address,
        frame: &mut OvmFrame,
        input: &[u8],
    ) -> Option<Result<Bytes, OvmError<H::Error>>> {
        if !self.interceptor().should_intercept(frame.address, input) {
            return None;
        }
        Some(self.dispatcher().dispatch(host, caller, frame, input))
    }
}
