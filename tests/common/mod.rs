//! Shared test utilities for chatpulse integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Timeout-sensitive helpers are designed to work with
//! `tokio::time::pause()`.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod fake_http_api;
pub mod fakes;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fakes::*;
pub use fixtures::*;
