//! Match repository functions for domain layer.
//!
//! Matches are read-only input here: the coordinator reads timing and
//! capacity but never mutates this table.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::matches_sea as matches_adapter;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Match domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub min_members: i32,
    pub max_members: i32,
    pub is_visible: bool,
    pub is_deleted: bool,
}

impl Match {
    /// Membership mutations are rejected from the first instant of the match.
    pub fn has_started(&self, now: OffsetDateTime) -> bool {
        now >= self.start_date
    }

    /// Hidden or soft-deleted matches must behave as if they do not exist.
    pub fn is_joinable_target(&self) -> bool {
        self.is_visible && !self.is_deleted
    }
}

impl From<crate::entities::matches::Model> for Match {
    fn from(model: crate::entities::matches::Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            title: model.title,
            start_date: model.start_date,
            end_date: model.end_date,
            min_members: model.min_members,
            max_members: model.max_members,
            is_visible: model.is_visible,
            is_deleted: model.is_deleted,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Option<Match>, DomainError> {
    let m = matches_adapter::find_by_id(conn, match_id).await?;
    Ok(m.map(Match::from))
}

pub async fn find_visible_by_slug<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug: &str,
) -> Result<Option<Match>, DomainError> {
    let m = matches_adapter::find_visible_by_slug(conn, slug).await?;
    Ok(m.map(Match::from))
}

/// Resolve a visible match by slug or fail with `MatchNotFound`.
pub async fn require_visible_by_slug<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug: &str,
) -> Result<Match, DomainError> {
    find_visible_by_slug(conn, slug).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Match, format!("Match '{slug}' not found"))
    })
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn sample(start: OffsetDateTime) -> Match {
        Match {
            id: 1,
            slug: "spring-open".into(),
            title: "Spring Open".into(),
            start_date: start,
            end_date: start + time::Duration::hours(48),
            min_members: 1,
            max_members: 3,
            is_visible: true,
            is_deleted: false,
        }
    }

    #[test]
    fn has_started_is_inclusive() {
        let start = datetime!(2026-03-01 12:00 UTC);
        let m = sample(start);

        assert!(!m.has_started(start - time::Duration::seconds(1)));
        assert!(m.has_started(start));
        assert!(m.has_started(start + time::Duration::seconds(1)));
    }

    #[test]
    fn hidden_or_deleted_is_not_joinable() {
        let start = datetime!(2026-03-01 12:00 UTC);
        let mut m = sample(start);
        assert!(m.is_joinable_target());

        m.is_visible = false;
        assert!(!m.is_joinable_target());

        m.is_visible = true;
        m.is_deleted = true;
        assert!(!m.is_joinable_target());
    }
}
