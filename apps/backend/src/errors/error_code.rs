//! Error codes for the Codefray backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Codefray backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Access denied
    Forbidden,
    /// Authenticated user has no backing database row
    ForbiddenUserNotFound,

    // Membership rejections
    /// User already registered for this match
    AlreadyRegistered,
    /// User is not registered for this match
    NotRegistered,
    /// Match has already started; membership is frozen
    MatchClosed,
    /// Invite token does not resolve to a joinable party
    PartyNotFound,
    /// User already belongs to a party with other members
    AlreadyInParty,
    /// Destination party has no free slot
    PartyFull,
    /// Caller does not lead a party in this match
    NotLeader,
    /// Leaders with members cannot leave their own party
    IsPartyLeader,
    /// Leaders cannot kick themselves
    CannotKickSelf,
    /// Target user is not a member of the caller's party
    MemberNotFound,

    // Resource not found
    /// Match not found
    MatchNotFound,
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Request validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Retryable outcomes
    /// Invite token generator ran out of attempts
    TokenCollisionExhausted,
    /// Transaction aborted by the isolation layer; retry the operation
    StorageConflict,

    // Database constraint violations
    /// Unique constraint violation (SQLSTATE 23505; generic 409)
    UniqueViolation,
    /// Foreign key constraint violation (SQLSTATE 23503; generic 409)
    FkViolation,
    /// Check constraint violation (SQLSTATE 23514; generic 400)
    CheckViolation,
    /// Record not found (generic 404 for DB-driven not-found)
    RecordNotFound,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Data corruption detected
    DataCorruption,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Canonical string for this code, as it appears in HTTP responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            ErrorCode::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            ErrorCode::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            ErrorCode::AlreadyRegistered => "ALREADY_REGISTERED",
            ErrorCode::NotRegistered => "NOT_REGISTERED",
            ErrorCode::MatchClosed => "MATCH_CLOSED",
            ErrorCode::PartyNotFound => "PARTY_NOT_FOUND",
            ErrorCode::AlreadyInParty => "ALREADY_IN_PARTY",
            ErrorCode::PartyFull => "PARTY_FULL",
            ErrorCode::NotLeader => "NOT_LEADER",
            ErrorCode::IsPartyLeader => "IS_PARTY_LEADER",
            ErrorCode::CannotKickSelf => "CANNOT_KICK_SELF",
            ErrorCode::MemberNotFound => "MEMBER_NOT_FOUND",
            ErrorCode::MatchNotFound => "MATCH_NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::TokenCollisionExhausted => "TOKEN_COLLISION_EXHAUSTED",
            ErrorCode::StorageConflict => "STORAGE_CONFLICT",
            ErrorCode::UniqueViolation => "UNIQUE_VIOLATION",
            ErrorCode::FkViolation => "FK_VIOLATION",
            ErrorCode::CheckViolation => "CHECK_VIOLATION",
            ErrorCode::RecordNotFound => "RECORD_NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::DbError => "DB_ERROR",
            ErrorCode::DbUnavailable => "DB_UNAVAILABLE",
            ErrorCode::DbTimeout => "DB_TIMEOUT",
            ErrorCode::DataCorruption => "DATA_CORRUPTION",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }

    /// All defined codes; used by tests to assert uniqueness.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::Unauthorized,
        ErrorCode::UnauthorizedMissingBearer,
        ErrorCode::UnauthorizedInvalidJwt,
        ErrorCode::UnauthorizedExpiredJwt,
        ErrorCode::Forbidden,
        ErrorCode::ForbiddenUserNotFound,
        ErrorCode::AlreadyRegistered,
        ErrorCode::NotRegistered,
        ErrorCode::MatchClosed,
        ErrorCode::PartyNotFound,
        ErrorCode::AlreadyInParty,
        ErrorCode::PartyFull,
        ErrorCode::NotLeader,
        ErrorCode::IsPartyLeader,
        ErrorCode::CannotKickSelf,
        ErrorCode::MemberNotFound,
        ErrorCode::MatchNotFound,
        ErrorCode::UserNotFound,
        ErrorCode::NotFound,
        ErrorCode::ValidationError,
        ErrorCode::BadRequest,
        ErrorCode::TokenCollisionExhausted,
        ErrorCode::StorageConflict,
        ErrorCode::UniqueViolation,
        ErrorCode::FkViolation,
        ErrorCode::CheckViolation,
        ErrorCode::RecordNotFound,
        ErrorCode::Conflict,
        ErrorCode::DbError,
        ErrorCode::DbUnavailable,
        ErrorCode::DbTimeout,
        ErrorCode::DataCorruption,
        ErrorCode::Internal,
        ErrorCode::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
