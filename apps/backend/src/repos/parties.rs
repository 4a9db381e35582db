//! Party directory repository functions for domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::parties_sea as parties_adapter;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Party domain model. Identity is the leader's user id within a match;
/// the surrogate `id` only exists for row addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub id: i64,
    pub leader_id: i64,
    pub match_id: i64,
    pub invite_token: String,
    pub is_public: bool,
    pub is_confirmed: bool,
    pub rank: Option<i32>,
}

impl From<crate::entities::parties::Model> for Party {
    fn from(model: crate::entities::parties::Model) -> Self {
        Self {
            id: model.id,
            leader_id: model.leader_id,
            match_id: model.match_id,
            invite_token: model.invite_token,
            is_public: model.is_public,
            is_confirmed: model.is_confirmed,
            rank: model.rank,
        }
    }
}

pub async fn find_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<Option<Party>, DomainError> {
    let party = parties_adapter::find_by_token(conn, token).await?;
    Ok(party.map(Party::from))
}

pub async fn find_by_token_for_update(
    txn: &DatabaseTransaction,
    token: &str,
) -> Result<Option<Party>, DomainError> {
    let party = parties_adapter::find_by_token_for_update(txn, token).await?;
    Ok(party.map(Party::from))
}

pub async fn find_by_leader_and_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    leader_id: i64,
    match_id: i64,
) -> Result<Option<Party>, DomainError> {
    let party = parties_adapter::find_by_leader_and_match(conn, leader_id, match_id).await?;
    Ok(party.map(Party::from))
}

pub async fn find_by_leader_and_match_for_update(
    txn: &DatabaseTransaction,
    leader_id: i64,
    match_id: i64,
) -> Result<Option<Party>, DomainError> {
    let party =
        parties_adapter::find_by_leader_and_match_for_update(txn, leader_id, match_id).await?;
    Ok(party.map(Party::from))
}

/// Locked lookup of a party that must exist for any registered leader. A
/// miss here means the ledger and the directory disagree.
pub async fn require_by_leader_and_match_for_update(
    txn: &DatabaseTransaction,
    leader_id: i64,
    match_id: i64,
) -> Result<Party, DomainError> {
    find_by_leader_and_match_for_update(txn, leader_id, match_id)
        .await?
        .ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("No party row for leader {leader_id} in match {match_id}"),
            )
        })
}

pub async fn find_all_by_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<Party>, DomainError> {
    let parties = parties_adapter::find_all_by_match(conn, match_id).await?;
    Ok(parties.into_iter().map(Party::from).collect())
}

pub async fn create_party(
    txn: &DatabaseTransaction,
    leader_id: i64,
    match_id: i64,
    invite_token: String,
) -> Result<Party, DomainError> {
    let dto = parties_adapter::PartyCreate {
        leader_id,
        match_id,
        invite_token,
        is_public: false,
    };
    let party = parties_adapter::create_party(txn, dto).await?;
    Ok(Party::from(party))
}

pub async fn rotate_invite_token(
    txn: &DatabaseTransaction,
    party_id: i64,
    invite_token: String,
) -> Result<Party, DomainError> {
    let party = parties_adapter::rotate_invite_token(txn, party_id, invite_token).await?;
    Ok(Party::from(party))
}

pub async fn set_is_public(
    txn: &DatabaseTransaction,
    party_id: i64,
    is_public: bool,
) -> Result<Party, DomainError> {
    let party = parties_adapter::set_is_public(txn, party_id, is_public).await?;
    Ok(Party::from(party))
}

pub async fn delete_party(txn: &DatabaseTransaction, party_id: i64) -> Result<(), DomainError> {
    parties_adapter::delete_party(txn, party_id).await?;
    Ok(())
}
