//! Common test utilities for report-dl integration tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod provider;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use provider::*;
