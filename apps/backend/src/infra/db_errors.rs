//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; the repos layer converts to
//! `crate::errors::domain::DomainError` through `From<DbErr>`, which lands
//! here. Higher layers then map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Match a unique-violation message against our named constraints.
///
/// Postgres quotes the index name (`uq_...`); SQLite reports
/// `UNIQUE constraint failed: table.column[, ...]`. Both shapes are probed.
fn map_unique_violation(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("uq_parties_invite_token") || error_msg.contains("parties.invite_token") {
        return Some((ConflictKind::InviteToken, "Invite token already exists"));
    }
    if error_msg.contains("uq_match_participants_match_user")
        || error_msg.contains("match_participants.match_id")
    {
        return Some((
            ConflictKind::AlreadyRegistered,
            "User already registered for this match",
        ));
    }
    // Two operations raced to create the same leader's party (e.g. a
    // double-submitted register). Retrying yields the deterministic outcome.
    if error_msg.contains("uq_parties_leader_match") || error_msg.contains("parties.leader_id") {
        return Some((
            ConflictKind::StorageConflict,
            "Party directory changed concurrently; retry",
        ));
    }
    if error_msg.contains("uq_users_username") || error_msg.contains("users.username") {
        return Some((ConflictKind::UniqueUsername, "Username already taken"));
    }
    if error_msg.contains("uq_users_email") || error_msg.contains("users.email") {
        return Some((ConflictKind::UniqueEmail, "Email already registered"));
    }
    None
}

/// Serialization failures and deadlock aborts; the whole transaction is
/// safe to retry from scratch.
fn is_storage_conflict(error_msg: &str) -> bool {
    mentions_sqlstate(error_msg, "40001")
        || mentions_sqlstate(error_msg, "40P01")
        || error_msg.contains("could not serialize access")
        || error_msg.contains("deadlock detected")
        || error_msg.contains("database is locked")
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if is_storage_conflict(&error_msg) {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Transaction aborted by isolation layer");
        return DomainError::conflict(
            ConflictKind::StorageConflict,
            "Transaction aborted by a concurrent operation; retry",
        );
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        if let Some((kind, detail)) = map_unique_violation(&error_msg) {
            return DomainError::conflict(kind, detail);
        }

        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::infra(
            InfraErrorKind::DataCorruption,
            "Foreign key constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23514") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Check constraint violation");
        return DomainError::validation(
            crate::errors::domain::ValidationKind::Other("Check".into()),
            "Check constraint violation",
        );
    }

    if error_msg.contains("timeout") || error_msg.contains("pool") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout or pool issue");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_invite_token_violation() {
        let err = sea_orm::DbErr::Custom(
            "UNIQUE constraint failed: parties.invite_token".to_string(),
        );
        let mapped = map_db_err(err);
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::InviteToken, _)
        ));
    }

    #[test]
    fn postgres_invite_token_violation() {
        let err = sea_orm::DbErr::Custom(
            "duplicate key value violates unique constraint \"uq_parties_invite_token\""
                .to_string(),
        );
        let mapped = map_db_err(err);
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::InviteToken, _)
        ));
    }

    #[test]
    fn duplicate_registration_violation() {
        let err = sea_orm::DbErr::Custom(
            "UNIQUE constraint failed: match_participants.match_id, match_participants.user_id"
                .to_string(),
        );
        let mapped = map_db_err(err);
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::AlreadyRegistered, _)
        ));
    }

    #[test]
    fn serialization_failure_is_storage_conflict() {
        for msg in [
            "SQLSTATE(40001): could not serialize access due to concurrent update",
            "deadlock detected",
            "database is locked",
        ] {
            let mapped = map_db_err(sea_orm::DbErr::Custom(msg.to_string()));
            assert!(
                matches!(mapped, DomainError::Conflict(ConflictKind::StorageConflict, _)),
                "message not mapped: {msg}"
            );
        }
    }

    #[test]
    fn unknown_error_is_infra() {
        let mapped = map_db_err(sea_orm::DbErr::Custom("mystery failure".to_string()));
        assert!(matches!(mapped, DomainError::Infra(_, _)));
    }
}
