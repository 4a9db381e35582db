use std::sync::Arc;

use crate::config::db::{DbOwner, DbProfile};
use crate::error::AppError;
use crate::infra::db::{bootstrap_db, bootstrap_sqlite_memory};
use crate::services::mail::Mailer;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

enum DbChoice {
    Postgres(DbProfile),
    SqliteMemory,
}

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    db: Option<DbChoice>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            db: None,
            mailer: None,
        }
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db = Some(DbChoice::Postgres(profile));
        self
    }

    /// In-memory SQLite; used by the test suites.
    pub fn with_sqlite_memory(mut self) -> Self {
        self.db = Some(DbChoice::SqliteMemory);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let state = match self.db {
            Some(DbChoice::Postgres(profile)) => {
                // single entrypoint: build + migrate
                let conn = bootstrap_db(profile, DbOwner::App).await?;
                AppState::new(conn, self.security_config)
            }
            Some(DbChoice::SqliteMemory) => {
                let conn = bootstrap_sqlite_memory().await?;
                AppState::new(conn, self.security_config)
            }
            None => AppState::new_without_db(self.security_config),
        };

        Ok(match self.mailer {
            Some(mailer) => state.with_mailer(mailer),
            None => state,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_succeeds_without_db_option() {
        let state = build_state().build().await.unwrap();
        assert!(state.db().is_none());
    }
}
