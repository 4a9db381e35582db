//! Row factories for integration tests.
//!
//! Matches are seeded directly through the entities: match lifecycle is not
//! part of the coordinator, which only ever reads these rows.

use backend::entities::{match_participants, matches, parties, users};
use backend::repos::matches::Match;
use backend::repos::users::User;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use time::{Duration, OffsetDateTime};

use backend_test_support::unique_helpers::{unique_email, unique_str};

pub async fn create_user(db: &DatabaseConnection, prefix: &str) -> User {
    let now = OffsetDateTime::now_utc();
    let model = users::ActiveModel {
        username: Set(unique_str(prefix)),
        email: Set(unique_email(prefix)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user");

    User::from(model)
}

pub struct MatchSpec {
    pub starts_in: Duration,
    pub max_members: i32,
    pub is_visible: bool,
}

impl Default for MatchSpec {
    fn default() -> Self {
        Self {
            starts_in: Duration::hours(24),
            max_members: 3,
            is_visible: true,
        }
    }
}

pub async fn create_match(db: &DatabaseConnection, spec: MatchSpec) -> Match {
    let now = OffsetDateTime::now_utc();
    let start = now + spec.starts_in;
    let model = matches::ActiveModel {
        slug: Set(unique_str("match")),
        title: Set("Test Match".to_string()),
        start_date: Set(start),
        end_date: Set(start + Duration::hours(48)),
        min_members: Set(1),
        max_members: Set(spec.max_members),
        is_visible: Set(spec.is_visible),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert match");

    Match::from(model)
}

/// Seed a registered participant with their solo party, bypassing the
/// coordinator. Used to set up state for matches that have already started.
pub async fn seed_solo_registration(
    db: &DatabaseConnection,
    match_id: i64,
    user_id: i64,
    token: &str,
) {
    let now = OffsetDateTime::now_utc();
    parties::ActiveModel {
        leader_id: Set(user_id),
        match_id: Set(match_id),
        invite_token: Set(token.to_string()),
        is_public: Set(false),
        is_confirmed: Set(false),
        rank: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert party");

    match_participants::ActiveModel {
        match_id: Set(match_id),
        user_id: Set(user_id),
        party_leader_id: Set(user_id),
        is_confirmed: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert participant");
}
