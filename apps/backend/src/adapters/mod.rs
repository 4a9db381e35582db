//! SeaORM adapters: the only layer that touches entities directly.
//!
//! Adapter functions return `sea_orm::DbErr`; the repos layer maps to
//! `DomainError` via `From<DbErr>`.

pub mod matches_sea;
pub mod participants_sea;
pub mod parties_sea;
pub mod users_sea;
