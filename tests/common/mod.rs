//! Common test utilities for web-fetch end-to-end tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod site;

#[allow(unused_imports)]
pub use fixtures::*;
pub use site::*;
