//! Capacity enforcement under concurrent joins racing for the last slot.

mod support;

use backend::db::txn::with_txn;
use backend::error::AppError;
use backend::errors::domain::{ConflictKind, DomainError};
use backend::errors::ErrorCode;
use backend::repos::matches::Match;
use backend::repos::parties::Party;
use backend::services::parties::{JoinedParty, PartyService};
use backend::state::app_state::AppState;
use sea_orm::TransactionTrait;
use support::factory::{create_match, create_user, MatchSpec};
use support::invariants::assert_membership_invariants;
use support::{now, test_state};

async fn register(state: &AppState, match_: &Match, user_id: i64) -> Result<Party, AppError> {
    let match_ = match_.clone();
    with_txn(None, state, move |txn| {
        Box::pin(async move {
            Ok(PartyService::new()
                .register(txn, &match_, user_id, now())
                .await?)
        })
    })
    .await
}

async fn join(state: &AppState, token: &str, user_id: i64) -> Result<JoinedParty, AppError> {
    let token = token.to_string();
    with_txn(None, state, move |txn| {
        Box::pin(async move {
            Ok(PartyService::new()
                .join_by_token(txn, &token, user_id, now())
                .await?)
        })
    })
    .await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_slot_many_contenders() {
    let state = test_state().await;
    let db = state.db().unwrap();
    let match_ = create_match(
        db,
        MatchSpec {
            max_members: 2,
            ..MatchSpec::default()
        },
    )
    .await;

    let alice = create_user(db, "alice").await;
    let token = register(&state, &match_, alice.id)
        .await
        .unwrap()
        .invite_token;

    let mut contenders = Vec::new();
    for i in 0..6 {
        let user = create_user(db, &format!("contender{i}")).await;
        register(&state, &match_, user.id).await.unwrap();
        contenders.push(user.id);
    }

    // Race every contender for the single free slot. Each task runs its own
    // transaction, the way a request worker would.
    let mut handles = Vec::new();
    for user_id in contenders {
        let db = db.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            let txn = db.begin().await.expect("begin txn");
            let result = PartyService::new()
                .join_by_token(&txn, &token, user_id, now())
                .await;
            match &result {
                Ok(_) => txn.commit().await.expect("commit txn"),
                Err(_) => txn.rollback().await.expect("rollback txn"),
            }
            result
        }));
    }

    let mut successes = 0;
    let mut full_rejections = 0;
    for handle in handles {
        match handle.await.expect("join task panicked") {
            Ok(_) => successes += 1,
            Err(err) => {
                assert!(
                    matches!(err, DomainError::Conflict(ConflictKind::PartyFull, _)),
                    "unexpected error: {err}"
                );
                full_rejections += 1;
            }
        }
    }

    assert_eq!(successes, 1, "exactly one contender may win the last slot");
    assert_eq!(full_rejections, 5);

    assert_membership_invariants(db, match_.id, 2).await;
}

#[tokio::test]
async fn party_fills_to_capacity_exactly() {
    let state = test_state().await;
    let db = state.db().unwrap();
    let match_ = create_match(
        db,
        MatchSpec {
            max_members: 4,
            ..MatchSpec::default()
        },
    )
    .await;

    let leader = create_user(db, "leader").await;
    let token = register(&state, &match_, leader.id)
        .await
        .unwrap()
        .invite_token;

    for i in 0..3 {
        let user = create_user(db, &format!("member{i}")).await;
        register(&state, &match_, user.id).await.unwrap();
        let joined = join(&state, &token, user.id).await.unwrap();
        assert_eq!(joined.members.len(), i + 2);
    }

    let late = create_user(db, "late").await;
    register(&state, &match_, late.id).await.unwrap();

    let result = join(&state, &token, late.id).await;
    assert!(matches!(result, Err(ref e) if e.code() == ErrorCode::PartyFull));

    assert_membership_invariants(db, match_.id, 4).await;
}
