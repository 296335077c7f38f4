use core::cell::Cell;

use alloy_primitives::{Address, Bytes, Log, B256};
use delegate::delegate;
use revm::primitives::hardfork::SpecId;
use tracing::warn;

use crate::{OvmCallInputs, OvmCallOutcome, OvmCreateInputs, OvmCreateOutcome, OvmHost};

/// Number of [`MarkerCodeGuard`]s currently holding the marker on the manager account.
///
/// All dispatches of one execution manager share a counter. A clone starts from zero.
#[derive(Debug, Default)]
pub struct MarkerDepth(Cell<usize>);

impl MarkerDepth {
    /// The number of live guards.
    pub fn get(&self) -> usize {
        self.0.get()
    }

    fn enter(&self) -> bool {
        let outer = self.0.get();
        self.0.set(outer + 1);
        outer > 0
    }

    fn exit(&self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

impl Clone for MarkerDepth {
    fn clone(&self) -> Self {
        Self::default()
    }
}

/// Keeps the marker bytecode installed on an account while a native operation runs.
///
/// The guard takes the host by mutable reference and exposes it through its own [`OvmHost`]
/// implementation, so operations run against the guard. The account's code is restored when
/// the guard is [released](Self::release) or dropped, which includes error returns and
/// unwinding.
///
/// Restoring clears the code, unless another guard sharing the same [`MarkerDepth`] was live
/// when this one was installed: the enclosing dispatch is still running and the marker is left
/// in place for it. Code found on the account beforehand is never kept.
#[derive(Debug)]
pub struct MarkerCodeGuard<'a, H: OvmHost> {
    host: &'a mut H,
    depth: &'a MarkerDepth,
    address: Address,
    restore: Option<Bytes>,
}

impl<'a, H: OvmHost> MarkerCodeGuard<'a, H> {
    /// Installs `marker` as the code of `address`.
    ///
    /// The depth is only entered once the marker is installed.
    pub fn install(
        host: &'a mut H,
        depth: &'a MarkerDepth,
        address: Address,
        marker: &Bytes,
    ) -> Result<Self, H::Error> {
        host.set_code(address, marker.clone())?;
        let restore = if depth.enter() { marker.clone() } else { Bytes::new() };
        Ok(Self { host, depth, address, restore: Some(restore) })
    }

    /// The account carrying the marker.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Restores the account's code and reports whether that succeeded.
    pub fn release(mut self) -> Result<(), H::Error> {
        match self.restore.take() {
            Some(code) => {
                self.depth.exit();
                self.host.set_code(self.address, code)
            }
            None => Ok(()),
        }
    }
}

impl<H: OvmHost> Drop for MarkerCodeGuard<'_, H> {
    fn drop(&mut self) {
        if let Some(code) = self.restore.take() {
            self.depth.exit();
            if let Err(err) = self.host.set_code(self.address, code) {
                warn!(
                    target: "ovm::dispatch",
                    address = %self.address,
                    %err,
                    "failed to restore manager code"
                );
            }
        }
    }
}

impl<H: OvmHost> OvmHost for MarkerCodeGuard<'_, H> {
    type Error = H::Error;

    delegate! {
        to self.host {
            fn spec_id(&self) -> SpecId;
            fn storage(&mut self, address: Address, key: B256) -> Result<B256, Self::Error>;
            fn set_storage(
                &mut self,
                address: Address,
                key: B256,
                value: B256,
            ) -> Result<(), Self::Error>;
            fn code(&mut self, address: Address) -> Result<Bytes, Self::Error>;
            fn set_code(&mut self, address: Address, code: Bytes) -> Result<(), Self::Error>;
            fn log(&mut self, log: Log);
            fn call(&mut self, inputs: OvmCallInputs) -> Result<OvmCallOutcome, Self::Error>;
            fn create(
                &mut self,
                inputs: OvmCreateInputs,
            ) -> Result<OvmCreateOutcome, Self::Error>;
        }
    }
}
