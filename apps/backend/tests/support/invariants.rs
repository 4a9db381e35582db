//! Structural invariant checks over the ledger and the party directory.

use std::collections::{HashMap, HashSet};

use backend::entities::{match_participants, parties};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Assert the membership invariants for one match:
/// - every participant points at exactly one live party of that match
/// - every party has at least one member and at most `max_members`
/// - a leader owns at most one party
/// - invite tokens are unique
pub async fn assert_membership_invariants(
    db: &DatabaseConnection,
    match_id: i64,
    max_members: i64,
) {
    let participants = match_participants::Entity::find()
        .filter(match_participants::Column::MatchId.eq(match_id))
        .all(db)
        .await
        .expect("load participants");
    let party_rows = parties::Entity::find()
        .filter(parties::Column::MatchId.eq(match_id))
        .all(db)
        .await
        .expect("load parties");

    // One party per leader
    let leaders: HashSet<i64> = party_rows.iter().map(|p| p.leader_id).collect();
    assert_eq!(
        leaders.len(),
        party_rows.len(),
        "a leader owns more than one party in match {match_id}"
    );

    // Every participant resolves to a live party
    for p in &participants {
        assert!(
            leaders.contains(&p.party_leader_id),
            "participant {} points at missing party {} in match {match_id}",
            p.user_id,
            p.party_leader_id
        );
    }

    // Membership counts: no empty parties, none over capacity
    let mut member_counts: HashMap<i64, i64> = HashMap::new();
    for p in &participants {
        *member_counts.entry(p.party_leader_id).or_default() += 1;
    }
    for party in &party_rows {
        let count = member_counts.get(&party.leader_id).copied().unwrap_or(0);
        assert!(
            count >= 1,
            "party of leader {} has no members in match {match_id}",
            party.leader_id
        );
        assert!(
            count <= max_members,
            "party of leader {} exceeds capacity ({count} > {max_members})",
            party.leader_id
        );
    }

    // Token uniqueness
    let tokens: HashSet<&str> = party_rows.iter().map(|p| p.invite_token.as_str()).collect();
    assert_eq!(
        tokens.len(),
        party_rows.len(),
        "duplicate invite token in match {match_id}"
    );
}
