//! Test utilities for the OVM dispatch layer.

mod host;

pub use host::*;
