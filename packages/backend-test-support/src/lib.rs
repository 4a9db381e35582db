//! Backend test support utilities
//!
//! Shared helpers for the backend test suites: unified logging
//! initialization and unique test data generation.

pub mod logging;
pub mod unique_helpers;
