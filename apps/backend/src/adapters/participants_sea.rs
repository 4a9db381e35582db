//! SeaORM adapter for the match_participants table (the participation ledger).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{match_participants, users};

pub struct ParticipantCreate {
    pub match_id: i64,
    pub user_id: i64,
    pub party_leader_id: i64,
}

pub async fn find_by_match_and_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    user_id: i64,
) -> Result<Option<match_participants::Model>, sea_orm::DbErr> {
    match_participants::Entity::find()
        .filter(match_participants::Column::MatchId.eq(match_id))
        .filter(match_participants::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub async fn find_by_match_and_user_for_update(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
) -> Result<Option<match_participants::Model>, sea_orm::DbErr> {
    let mut query = match_participants::Entity::find()
        .filter(match_participants::Column::MatchId.eq(match_id))
        .filter(match_participants::Column::UserId.eq(user_id));
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(txn).await
}

pub async fn find_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    party_leader_id: i64,
) -> Result<Vec<match_participants::Model>, sea_orm::DbErr> {
    match_participants::Entity::find()
        .filter(match_participants::Column::MatchId.eq(match_id))
        .filter(match_participants::Column::PartyLeaderId.eq(party_leader_id))
        .order_by_asc(match_participants::Column::Id)
        .all(conn)
        .await
}

pub async fn find_members_for_update(
    txn: &DatabaseTransaction,
    match_id: i64,
    party_leader_id: i64,
) -> Result<Vec<match_participants::Model>, sea_orm::DbErr> {
    let mut query = match_participants::Entity::find()
        .filter(match_participants::Column::MatchId.eq(match_id))
        .filter(match_participants::Column::PartyLeaderId.eq(party_leader_id))
        .order_by_asc(match_participants::Column::Id);
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.all(txn).await
}

pub async fn count_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    party_leader_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    match_participants::Entity::find()
        .filter(match_participants::Column::MatchId.eq(match_id))
        .filter(match_participants::Column::PartyLeaderId.eq(party_leader_id))
        .count(conn)
        .await
}

/// Usernames of a party's members, joined through users, in join order.
pub async fn find_member_usernames<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    party_leader_id: i64,
) -> Result<Vec<String>, sea_orm::DbErr> {
    let rows: Vec<(match_participants::Model, Option<users::Model>)> =
        match_participants::Entity::find()
            .find_also_related(users::Entity)
            .filter(match_participants::Column::MatchId.eq(match_id))
            .filter(match_participants::Column::PartyLeaderId.eq(party_leader_id))
            .order_by_asc(match_participants::Column::Id)
            .all(conn)
            .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(_, user)| user.map(|u| u.username))
        .collect())
}

pub async fn create_participant(
    txn: &DatabaseTransaction,
    dto: ParticipantCreate,
) -> Result<match_participants::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let participant = match_participants::ActiveModel {
        id: NotSet,
        match_id: Set(dto.match_id),
        user_id: Set(dto.user_id),
        party_leader_id: Set(dto.party_leader_id),
        is_confirmed: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };

    participant.insert(txn).await
}

/// Repoint a participant at a different party.
pub async fn set_party_leader(
    txn: &DatabaseTransaction,
    participant_id: i64,
    party_leader_id: i64,
) -> Result<match_participants::Model, sea_orm::DbErr> {
    let participant = match_participants::ActiveModel {
        id: Set(participant_id),
        match_id: NotSet,
        user_id: NotSet,
        party_leader_id: Set(party_leader_id),
        is_confirmed: NotSet,
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    participant.update(txn).await
}

pub async fn delete_participant(
    txn: &DatabaseTransaction,
    participant_id: i64,
) -> Result<(), sea_orm::DbErr> {
    match_participants::Entity::delete_many()
        .filter(match_participants::Column::Id.eq(participant_id))
        .exec(txn)
        .await?;
    Ok(())
}
