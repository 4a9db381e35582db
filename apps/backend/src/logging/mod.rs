//! Logging helpers for the Codefray backend.

pub mod pii;
