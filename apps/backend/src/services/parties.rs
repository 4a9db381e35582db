//! Party membership coordinator.
//!
//! Every operation here is one atomic transition over the participation
//! ledger (`match_participants`) and the party directory (`parties`). The
//! caller owns the surrounding transaction (`with_txn`); this service takes
//! the row locks it needs before evaluating capacity or ownership, so the
//! checks stay valid until commit.
//!
//! Invariants maintained across all operations:
//! - every participant points at exactly one live party in the same match
//! - a party's member count never exceeds `match.max_members`
//! - a leader owns at most one party per match and cannot abandon members
//! - invite tokens are unique among live parties
//! - nothing mutates once the match has started

use sea_orm::{DatabaseTransaction, TransactionTrait};
use time::OffsetDateTime;

use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::repos::matches::Match;
use crate::repos::parties::Party;
use crate::repos::{
    matches as matches_repo, participants as participants_repo, parties as parties_repo,
    users as users_repo,
};
use crate::services::mail::{kick_notice, OutboundMail};
use crate::utils::invite_token;

/// Attempts before a token insert gives up and reports exhaustion.
const MAX_TOKEN_ATTEMPTS: u32 = 8;

/// Result of joining a party by invite token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedParty {
    pub party: Party,
    /// Destination roster after the join, in join order.
    pub members: Vec<String>,
}

/// Result of kicking a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickOutcome {
    /// Remaining roster of the leader's party.
    pub members: Vec<String>,
    /// Notice for the kicked member; the handler forwards it to the mailer
    /// after commit.
    pub notice: OutboundMail,
}

/// Party membership domain service.
pub struct PartyService;

impl PartyService {
    pub fn new() -> Self {
        Self
    }

    /// Register a user for a match: a participant row pointing at a brand
    /// new solo party.
    pub async fn register(
        &self,
        txn: &DatabaseTransaction,
        match_: &Match,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<Party, DomainError> {
        self.ensure_open(match_, now)?;

        if participants_repo::find_by_match_and_user(txn, match_.id, user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyRegistered,
                format!("User {user_id} is already registered for match '{}'", match_.slug),
            ));
        }

        // Party first, then the participant row that references it. A
        // concurrent duplicate register resolves at the store's unique
        // constraints instead of the check above.
        let party = self.create_solo_party(txn, match_.id, user_id).await?;
        participants_repo::create_participant(txn, match_.id, user_id, user_id).await?;

        Ok(party)
    }

    /// Remove a user from a match entirely. Leaders must be alone in their
    /// party; their party row leaves with them.
    pub async fn withdraw(
        &self,
        txn: &DatabaseTransaction,
        match_: &Match,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        self.ensure_open(match_, now)?;

        let participant =
            participants_repo::find_by_match_and_user_for_update(txn, match_.id, user_id)
                .await?
                .ok_or_else(|| self.not_registered(match_, user_id))?;

        if participant.is_leader() {
            let members = participants_repo::count_members(txn, match_.id, user_id).await?;
            if members > 1 {
                return Err(DomainError::forbidden(
                    ForbiddenKind::IsPartyLeader,
                    "Cannot withdraw while leading a party with members; kick them or disband first",
                ));
            }
            let party =
                parties_repo::require_by_leader_and_match_for_update(txn, user_id, match_.id)
                    .await?;
            // Participant first: the party row cannot go while the ledger
            // still references it.
            participants_repo::delete_participant(txn, participant.id).await?;
            parties_repo::delete_party(txn, party.id).await?;
        } else {
            participants_repo::delete_participant(txn, participant.id).await?;
        }

        Ok(())
    }

    /// Join the party an invite token resolves to.
    pub async fn join_by_token(
        &self,
        txn: &DatabaseTransaction,
        token: &str,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<JoinedParty, DomainError> {
        // Lock the destination before anything else; the capacity check
        // below must hold until commit.
        let party = parties_repo::find_by_token_for_update(txn, token)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Party, "No party with that invite token")
            })?;

        let match_ = matches_repo::find_by_id(txn, party.match_id)
            .await?
            .filter(Match::is_joinable_target)
            .ok_or_else(|| {
                // A party of a hidden or deleted match is indistinguishable
                // from a missing one.
                DomainError::not_found(NotFoundKind::Party, "No party with that invite token")
            })?;

        self.ensure_open(&match_, now)?;

        let participant =
            participants_repo::find_by_match_and_user_for_update(txn, match_.id, user_id)
                .await?
                .ok_or_else(|| self.not_registered(&match_, user_id))?;

        if party.leader_id == user_id {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyInParty,
                "Cannot join a party you already lead",
            ));
        }

        if participant.party_leader_id != user_id {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyInParty,
                "Already a member of another party; leave it first",
            ));
        }

        // Caller leads their own solo party; with members they must
        // disband before moving on.
        let own_members = participants_repo::count_members(txn, match_.id, user_id).await?;
        if own_members > 1 {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyInParty,
                "Already leading a party with members",
            ));
        }

        let own_party =
            parties_repo::require_by_leader_and_match_for_update(txn, user_id, match_.id).await?;

        let dest_members =
            participants_repo::count_members(txn, match_.id, party.leader_id).await?;
        if dest_members >= u64::try_from(match_.max_members).unwrap_or(0) {
            return Err(DomainError::conflict(
                ConflictKind::PartyFull,
                format!("Party is full ({} members max)", match_.max_members),
            ));
        }

        // Repoint, then drop the now-empty solo party. Single transaction:
        // no observable state has a memberless party or a dangling pointer.
        participants_repo::set_party_leader(txn, participant.id, party.leader_id).await?;
        parties_repo::delete_party(txn, own_party.id).await?;

        let members =
            participants_repo::find_member_usernames(txn, match_.id, party.leader_id).await?;

        Ok(JoinedParty { party, members })
    }

    /// Leave the current party. Members get a fresh solo party; a leader
    /// without members keeps their party but the token is rotated.
    pub async fn leave(
        &self,
        txn: &DatabaseTransaction,
        match_: &Match,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<Party, DomainError> {
        self.ensure_open(match_, now)?;

        let participant =
            participants_repo::find_by_match_and_user_for_update(txn, match_.id, user_id)
                .await?
                .ok_or_else(|| self.not_registered(match_, user_id))?;

        if participant.is_leader() {
            let members = participants_repo::count_members(txn, match_.id, user_id).await?;
            if members > 1 {
                return Err(DomainError::forbidden(
                    ForbiddenKind::IsPartyLeader,
                    "Leaders must kick their members or disband before leaving",
                ));
            }
            let party =
                parties_repo::require_by_leader_and_match_for_update(txn, user_id, match_.id)
                    .await?;
            return self.rotate_party_token(txn, &party).await;
        }

        let party = self.create_solo_party(txn, match_.id, user_id).await?;
        participants_repo::set_party_leader(txn, participant.id, user_id).await?;
        Ok(party)
    }

    /// Kick a member out of the caller's party. The member gets a fresh solo
    /// party; the returned notice is delivered by the caller after commit.
    pub async fn kick(
        &self,
        txn: &DatabaseTransaction,
        match_: &Match,
        leader_id: i64,
        target_username: &str,
        now: OffsetDateTime,
    ) -> Result<KickOutcome, DomainError> {
        self.ensure_open(match_, now)?;

        let caller = participants_repo::find_by_match_and_user_for_update(txn, match_.id, leader_id)
            .await?
            .ok_or_else(|| self.not_registered(match_, leader_id))?;

        if !caller.is_leader() {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotLeader,
                "Only the party leader can kick members",
            ));
        }

        let target = users_repo::find_by_username(txn, target_username)
            .await?
            .ok_or_else(|| self.member_not_found(target_username))?;

        if target.id == leader_id {
            return Err(DomainError::forbidden(
                ForbiddenKind::CannotKickSelf,
                "Leave or disband instead of kicking yourself",
            ));
        }

        let target_participant =
            participants_repo::find_by_match_and_user_for_update(txn, match_.id, target.id)
                .await?
                .filter(|p| p.party_leader_id == leader_id)
                .ok_or_else(|| self.member_not_found(target_username))?;

        self.create_solo_party(txn, match_.id, target.id).await?;
        participants_repo::set_party_leader(txn, target_participant.id, target.id).await?;

        let members = participants_repo::find_member_usernames(txn, match_.id, leader_id).await?;
        let notice = kick_notice(&target.username, &target.email, &match_.title);

        Ok(KickOutcome { members, notice })
    }

    /// Dissolve the caller's party: every other member gets a fresh solo
    /// party, the leader keeps theirs with a rotated token and LFG off.
    /// All-or-nothing under the surrounding transaction.
    pub async fn disband(
        &self,
        txn: &DatabaseTransaction,
        match_: &Match,
        leader_id: i64,
        now: OffsetDateTime,
    ) -> Result<Party, DomainError> {
        self.ensure_open(match_, now)?;

        let party = parties_repo::find_by_leader_and_match_for_update(txn, leader_id, match_.id)
            .await?
            .ok_or_else(|| {
                DomainError::forbidden(
                    ForbiddenKind::NotLeader,
                    "Only a party leader can disband",
                )
            })?;

        let members = participants_repo::find_members_for_update(txn, match_.id, leader_id).await?;
        for member in members.iter().filter(|m| m.user_id != leader_id) {
            self.create_solo_party(txn, match_.id, member.user_id).await?;
            participants_repo::set_party_leader(txn, member.id, member.user_id).await?;
        }

        self.rotate_party_token(txn, &party).await
    }

    /// Toggle the party's looking-for-group visibility.
    pub async fn set_looking_for_group(
        &self,
        txn: &DatabaseTransaction,
        match_: &Match,
        leader_id: i64,
        visible: bool,
        now: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        self.ensure_open(match_, now)?;

        let party = parties_repo::find_by_leader_and_match_for_update(txn, leader_id, match_.id)
            .await?
            .ok_or_else(|| {
                DomainError::forbidden(
                    ForbiddenKind::NotLeader,
                    "Only a party leader can change visibility",
                )
            })?;

        let updated = parties_repo::set_is_public(txn, party.id, visible).await?;
        Ok(updated.is_public)
    }

    fn ensure_open(&self, match_: &Match, now: OffsetDateTime) -> Result<(), DomainError> {
        if match_.has_started(now) {
            return Err(DomainError::validation(
                ValidationKind::MatchClosed,
                format!("Match '{}' has already started", match_.slug),
            ));
        }
        Ok(())
    }

    fn not_registered(&self, match_: &Match, user_id: i64) -> DomainError {
        DomainError::validation(
            ValidationKind::NotRegistered,
            format!("User {user_id} is not registered for match '{}'", match_.slug),
        )
    }

    fn member_not_found(&self, username: &str) -> DomainError {
        DomainError::not_found(
            NotFoundKind::Member,
            format!("No member '{username}' in this party"),
        )
    }

    /// Insert a solo party with a freshly generated token. Claiming the
    /// token and inserting are one step: the insert runs in a savepoint and
    /// a unique-constraint hit rolls it back and tries a new token, so no
    /// check-then-insert window exists.
    async fn create_solo_party(
        &self,
        txn: &DatabaseTransaction,
        match_id: i64,
        leader_id: i64,
    ) -> Result<Party, DomainError> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = invite_token::generate();
            let sp = txn.begin().await.map_err(DomainError::from)?;
            match parties_repo::create_party(&sp, leader_id, match_id, token).await {
                Ok(party) => {
                    sp.commit().await.map_err(DomainError::from)?;
                    return Ok(party);
                }
                Err(DomainError::Conflict(ConflictKind::InviteToken, _)) => {
                    let _ = sp.rollback().await;
                }
                Err(e) => {
                    let _ = sp.rollback().await;
                    return Err(e);
                }
            }
        }

        Err(self.token_exhausted())
    }

    /// Same retry discipline as `create_solo_party`, for in-place token
    /// rotation (disband, solo-leader leave). Also forces the party private.
    async fn rotate_party_token(
        &self,
        txn: &DatabaseTransaction,
        party: &Party,
    ) -> Result<Party, DomainError> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = invite_token::generate();
            let sp = txn.begin().await.map_err(DomainError::from)?;
            match parties_repo::rotate_invite_token(&sp, party.id, token).await {
                Ok(updated) => {
                    sp.commit().await.map_err(DomainError::from)?;
                    return Ok(updated);
                }
                Err(DomainError::Conflict(ConflictKind::InviteToken, _)) => {
                    let _ = sp.rollback().await;
                }
                Err(e) => {
                    let _ = sp.rollback().await;
                    return Err(e);
                }
            }
        }

        Err(self.token_exhausted())
    }

    fn token_exhausted(&self) -> DomainError {
        DomainError::infra(
            InfraErrorKind::TokenExhausted,
            format!("No free invite token after {MAX_TOKEN_ATTEMPTS} attempts"),
        )
    }
}

impl Default for PartyService {
    fn default() -> Self {
        Self::new()
    }
}
