//! Shared helpers for the backend integration suites.
#![allow(dead_code)] // not every suite uses every helper

pub mod factory;
pub mod invariants;

use backend::infra::state::build_state;
use backend::state::app_state::AppState;
use time::OffsetDateTime;

/// Fresh application state over an in-memory SQLite database with the full
/// schema applied.
pub async fn test_state() -> AppState {
    backend_test_support::logging::init();

    build_state()
        .with_sqlite_memory()
        .build()
        .await
        .expect("build test state with in-memory DB")
}

pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}
