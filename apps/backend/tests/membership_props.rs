//! Randomly interleaved membership operations must keep the ledger and the
//! party directory consistent after every single step.

mod support;

use backend::db::txn::with_txn;
use backend::error::AppError;
use backend::errors::ErrorCode;
use backend::repos::matches::Match;
use backend::repos::parties as parties_repo;
use backend::repos::users::User;
use backend::services::parties::PartyService;
use backend::state::app_state::AppState;
use proptest::prelude::*;
use support::factory::{create_match, create_user, MatchSpec};
use support::invariants::assert_membership_invariants;
use support::{now, test_state};

const USERS: usize = 4;
const MAX_MEMBERS: i32 = 3;

#[derive(Debug, Clone)]
enum Op {
    Register(usize),
    JoinPartyOf { user: usize, target: usize },
    Leave(usize),
    Kick { leader: usize, target: usize },
    Disband(usize),
    Lfg { user: usize, visible: bool },
    Withdraw(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..USERS).prop_map(Op::Register),
        (0..USERS, 0..USERS).prop_map(|(user, target)| Op::JoinPartyOf { user, target }),
        (0..USERS).prop_map(Op::Leave),
        (0..USERS, 0..USERS).prop_map(|(leader, target)| Op::Kick { leader, target }),
        (0..USERS).prop_map(Op::Disband),
        (0..USERS, any::<bool>()).prop_map(|(user, visible)| Op::Lfg { user, visible }),
        (0..USERS).prop_map(Op::Withdraw),
    ]
}

/// Every failure must be a deterministic business rejection; anything else
/// means the coordinator leaked an inconsistency.
fn assert_expected_rejection(err: &AppError) {
    let allowed = [
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
    ];
    assert!(
        allowed.contains(&err.code()),
        "unexpected failure kind: {err}"
    );
}

async fn apply(state: &AppState, match_: &Match, users: &[User], op: &Op) -> Result<(), AppError> {
    let match_ = match_.clone();
    match op {
        Op::Register(u) => {
            let user_id = users[*u].id;
            with_txn(None, state, move |txn| {
                Box::pin(async move {
                    PartyService::new()
                        .register(txn, &match_, user_id, now())
                        .await?;
                    Ok(())
                })
            })
            .await
        }
        Op::JoinPartyOf { user, target } => {
            let user_id = users[*user].id;
            let target_id = users[*target].id;
            let db = state.db().expect("test db");
            let token = parties_repo::find_by_leader_and_match(db, target_id, match_.id)
                .await
                .map_err(AppError::from)?
                .map(|p| p.invite_token)
                .unwrap_or_else(|| "no-party-for-target".to_string());
            with_txn(None, state, move |txn| {
                Box::pin(async move {
                    PartyService::new()
                        .join_by_token(txn, &token, user_id, now())
                        .await?;
                    Ok(())
                })
            })
            .await
        }
        Op::Leave(u) => {
            let user_id = users[*u].id;
            with_txn(None, state, move |txn| {
                Box::pin(async move {
                    PartyService::new()
                        .leave(txn, &match_, user_id, now())
                        .await?;
                    Ok(())
                })
            })
            .await
        }
        Op::Kick { leader, target } => {
            let leader_id = users[*leader].id;
            let target_name = users[*target].username.clone();
            with_txn(None, state, move |txn| {
                Box::pin(async move {
                    PartyService::new()
                        .kick(txn, &match_, leader_id, &target_name, now())
                        .await?;
                    Ok(())
                })
            })
            .await
        }
        Op::Disband(u) => {
            let leader_id = users[*u].id;
            with_txn(None, state, move |txn| {
                Box::pin(async move {
                    PartyService::new()
                        .disband(txn, &match_, leader_id, now())
                        .await?;
                    Ok(())
                })
            })
            .await
        }
        Op::Lfg { user, visible } => {
            let leader_id = users[*user].id;
            let visible = *visible;
            with_txn(None, state, move |txn| {
                Box::pin(async move {
                    PartyService::new()
                        .set_looking_for_group(txn, &match_, leader_id, visible, now())
                        .await?;
                    Ok(())
                })
            })
            .await
        }
        Op::Withdraw(u) => {
            let user_id = users[*u].id;
            with_txn(None, state, move |txn| {
                Box::pin(async move {
                    PartyService::new()
                        .withdraw(txn, &match_, user_id, now())
                        .await?;
                    Ok(())
                })
            })
            .await
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 16,
        .. ProptestConfig::default()
    })]

    #[test]
    fn random_interleavings_preserve_invariants(
        ops in proptest::collection::vec(op_strategy(), 1..40)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build runtime");

        rt.block_on(async move {
            let state = test_state().await;
            let db = state.db().expect("test db");
            let match_ = create_match(
                db,
                MatchSpec {
                    max_members: MAX_MEMBERS,
                    ..MatchSpec::default()
                },
            )
            .await;

            let mut users = Vec::with_capacity(USERS);
            for i in 0..USERS {
                users.push(create_user(db, &format!("prop{i}")).await);
            }

            for op in &ops {
                if let Err(err) = apply(&state, &match_, &users, op).await {
                    assert_expected_rejection(&err);
                }
                assert_membership_invariants(db, match_.id, MAX_MEMBERS as i64).await;
            }
        });
    }
}
