//! SeaORM adapter for the parties table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, EntityTrait,
    NotSet, QueryFilter, QuerySelect, Set,
};

use crate::entities::parties;

pub struct PartyCreate {
    pub leader_id: i64,
    pub match_id: i64,
    pub invite_token: String,
    pub is_public: bool,
}

pub async fn find_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<Option<parties::Model>, sea_orm::DbErr> {
    parties::Entity::find()
        .filter(parties::Column::InviteToken.eq(token))
        .one(conn)
        .await
}

/// Like `find_by_token`, but takes a row lock so capacity checks stay valid
/// until commit. SQLite has no FOR UPDATE; its single-writer transactions
/// serialize the same way.
pub async fn find_by_token_for_update(
    txn: &DatabaseTransaction,
    token: &str,
) -> Result<Option<parties::Model>, sea_orm::DbErr> {
    let mut query = parties::Entity::find().filter(parties::Column::InviteToken.eq(token));
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(txn).await
}

pub async fn find_by_leader_and_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    leader_id: i64,
    match_id: i64,
) -> Result<Option<parties::Model>, sea_orm::DbErr> {
    parties::Entity::find()
        .filter(parties::Column::LeaderId.eq(leader_id))
        .filter(parties::Column::MatchId.eq(match_id))
        .one(conn)
        .await
}

pub async fn find_by_leader_and_match_for_update(
    txn: &DatabaseTransaction,
    leader_id: i64,
    match_id: i64,
) -> Result<Option<parties::Model>, sea_orm::DbErr> {
    let mut query = parties::Entity::find()
        .filter(parties::Column::LeaderId.eq(leader_id))
        .filter(parties::Column::MatchId.eq(match_id));
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(txn).await
}

pub async fn find_all_by_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<parties::Model>, sea_orm::DbErr> {
    parties::Entity::find()
        .filter(parties::Column::MatchId.eq(match_id))
        .all(conn)
        .await
}

pub async fn create_party(
    txn: &DatabaseTransaction,
    dto: PartyCreate,
) -> Result<parties::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let party = parties::ActiveModel {
        id: NotSet,
        leader_id: Set(dto.leader_id),
        match_id: Set(dto.match_id),
        invite_token: Set(dto.invite_token),
        is_public: Set(dto.is_public),
        is_confirmed: Set(false),
        rank: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    party.insert(txn).await
}

/// Replace the invite token and force the party private. Used when a party
/// is reset (disband, solo-leader leave).
pub async fn rotate_invite_token(
    txn: &DatabaseTransaction,
    party_id: i64,
    invite_token: String,
) -> Result<parties::Model, sea_orm::DbErr> {
    let party = parties::ActiveModel {
        id: Set(party_id),
        leader_id: NotSet,
        match_id: NotSet,
        invite_token: Set(invite_token),
        is_public: Set(false),
        is_confirmed: NotSet,
        rank: NotSet,
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    party.update(txn).await
}

pub async fn set_is_public(
    txn: &DatabaseTransaction,
    party_id: i64,
    is_public: bool,
) -> Result<parties::Model, sea_orm::DbErr> {
    let party = parties::ActiveModel {
        id: Set(party_id),
        leader_id: NotSet,
        match_id: NotSet,
        invite_token: NotSet,
        is_public: Set(is_public),
        is_confirmed: NotSet,
        rank: NotSet,
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    party.update(txn).await
}

pub async fn delete_party(txn: &DatabaseTransaction, party_id: i64) -> Result<(), sea_orm::DbErr> {
    parties::Entity::delete_many()
        .filter(parties::Column::Id.eq(party_id))
        .exec(txn)
        .await?;
    Ok(())
}
