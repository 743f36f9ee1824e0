//! Common test utilities for ds-relay integration tests

#[allow(dead_code)]
pub mod config;
#[allow(dead_code)]
pub mod nas;

pub use config::*;
#[allow(unused_imports)]
pub use nas::*;
