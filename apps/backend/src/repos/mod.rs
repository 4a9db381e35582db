//! Repository functions for the domain layer.
//!
//! Repos expose domain models and free functions; all SeaORM specifics stay
//! in the adapters. Errors surface as `DomainError`.

pub mod matches;
pub mod participants;
pub mod parties;
pub mod users;
