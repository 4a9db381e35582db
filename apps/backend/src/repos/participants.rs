//! Participation ledger repository functions for domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::participants_sea as participants_adapter;
use crate::errors::domain::DomainError;

/// One row per (user, match): which party the user currently belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: i64,
    pub match_id: i64,
    pub user_id: i64,
    pub party_leader_id: i64,
    pub is_confirmed: bool,
}

impl Participant {
    /// A participant leads their own party when the ledger points at themself.
    pub fn is_leader(&self) -> bool {
        self.party_leader_id == self.user_id
    }
}

impl From<crate::entities::match_participants::Model> for Participant {
    fn from(model: crate::entities::match_participants::Model) -> Self {
        Self {
            id: model.id,
            match_id: model.match_id,
            user_id: model.user_id,
            party_leader_id: model.party_leader_id,
            is_confirmed: model.is_confirmed,
        }
    }
}

pub async fn find_by_match_and_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    user_id: i64,
) -> Result<Option<Participant>, DomainError> {
    let participant =
        participants_adapter::find_by_match_and_user(conn, match_id, user_id).await?;
    Ok(participant.map(Participant::from))
}

/// Locked variant used inside coordinator transactions.
pub async fn find_by_match_and_user_for_update(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
) -> Result<Option<Participant>, DomainError> {
    let participant =
        participants_adapter::find_by_match_and_user_for_update(txn, match_id, user_id).await?;
    Ok(participant.map(Participant::from))
}

pub async fn find_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    party_leader_id: i64,
) -> Result<Vec<Participant>, DomainError> {
    let members = participants_adapter::find_members(conn, match_id, party_leader_id).await?;
    Ok(members.into_iter().map(Participant::from).collect())
}

pub async fn find_members_for_update(
    txn: &DatabaseTransaction,
    match_id: i64,
    party_leader_id: i64,
) -> Result<Vec<Participant>, DomainError> {
    let members =
        participants_adapter::find_members_for_update(txn, match_id, party_leader_id).await?;
    Ok(members.into_iter().map(Participant::from).collect())
}

pub async fn count_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    party_leader_id: i64,
) -> Result<u64, DomainError> {
    let count = participants_adapter::count_members(conn, match_id, party_leader_id).await?;
    Ok(count)
}

pub async fn find_member_usernames<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    party_leader_id: i64,
) -> Result<Vec<String>, DomainError> {
    let names =
        participants_adapter::find_member_usernames(conn, match_id, party_leader_id).await?;
    Ok(names)
}

pub async fn create_participant(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
    party_leader_id: i64,
) -> Result<Participant, DomainError> {
    let dto = participants_adapter::ParticipantCreate {
        match_id,
        user_id,
        party_leader_id,
    };
    let participant = participants_adapter::create_participant(txn, dto).await?;
    Ok(Participant::from(participant))
}

pub async fn set_party_leader(
    txn: &DatabaseTransaction,
    participant_id: i64,
    party_leader_id: i64,
) -> Result<Participant, DomainError> {
    let participant =
        participants_adapter::set_party_leader(txn, participant_id, party_leader_id).await?;
    Ok(Participant::from(participant))
}

pub async fn delete_participant(
    txn: &DatabaseTransaction,
    participant_id: i64,
) -> Result<(), DomainError> {
    participants_adapter::delete_participant(txn, participant_id).await?;
    Ok(())
}
