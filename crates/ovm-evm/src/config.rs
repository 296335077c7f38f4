use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Configuration of the execution manager, fixed once the host starts.
///
/// Loading the values (from the environment, a contract artifact, ...) is up to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvmConfig {
    /// Calls to this address carrying a registered selector are dispatched natively.
    pub manager_address: Address,
    /// The purity checker contract, if one is deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purity_checker_address: Option<Address>,
    /// Code installed on the manager account while an operation runs.
    pub marker_bytecode: Bytes,
}

impl OvmConfig {
    /// Creates a configuration without a purity checker.
    pub const fn new(manager_address: Address, marker_bytecode: Bytes) -> Self {
        Self { manager_address, purity_checker_address: None, marker_bytecode }
    }

    /// Sets the purity checker contract address.
    pub fn with_purity_checker_address(mut self, address: Address) -> Self {
        self.purity_checker_address = Some(address);
        self
    }

    /// Sets the marker bytecode.
    pub fn with_marker_bytecode(mut self, marker_bytecode: Bytes) -> Self {
        self.marker_bytecode = marker_bytecode;
        self
    }

    /// Checks the configuration for values dispatch cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker_bytecode.is_empty() {
            return Err(ConfigError::EmptyMarkerBytecode);
        }
        match self.purity_checker_address {
            Some(address) if address == self.manager_address => {
                Err(ConfigError::PurityCheckerIsManager(address))
            }
            _ => Ok(()),
        }
    }
}
