//! Native dispatch of execution manager calls for the OVM.
//!
//! Calls that target the configured execution manager address and carry a registered `ovm*()`
//! selector are not executed as bytecode. The [`OvmDispatcher`] runs a native handler instead,
//! with the manager's code temporarily replaced by a marker bytecode so that the host engine
//! still sees a callable account.
//!
//! The host engine is abstracted by [`OvmHost`]; it decides when to consult the
//! [`OvmInterceptor`] and feeds diverted calls to the dispatcher.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod abi;
pub use abi::*;

mod config;
pub use config::*;

pub mod constants;

mod dispatcher;
pub use dispatcher::*;

mod error;
pub use error::*;

mod events;
pub use events::*;

mod gas;
pub use gas::*;

mod guard;
pub use guard::*;

mod host;
pub use host::*;

mod interceptor;
pub use interceptor::*;

mod operations;
pub use operations::*;

mod ovm;
pub use ovm::*;

mod purity;
pub use purity::*;

mod registry;
pub use registry::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
