//! Party membership routes.
//!
//! Handlers own no business logic: resolve the match, open the transaction,
//! call the coordinator, map the outcome. The kick notice is forwarded to
//! the mailer only after the transaction has committed.

use actix_web::{web, HttpRequest};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use crate::db::txn::retry_txn;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos::matches as matches_repo;
use crate::services::parties::{KickOutcome, PartyService};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct JoinPartyRequest {
    /// Invite token of the destination party
    pub party: String,
}

#[derive(Debug, Deserialize)]
pub struct LeavePartyRequest {
    #[serde(rename = "match")]
    pub match_slug: String,
}

#[derive(Debug, Deserialize)]
pub struct KickRequest {
    #[serde(rename = "match")]
    pub match_slug: String,
    /// Username of the member to kick
    pub user: String,
}

#[derive(Debug, Deserialize)]
pub struct DisbandRequest {
    #[serde(rename = "match")]
    pub match_slug: String,
}

#[derive(Debug, Deserialize)]
pub struct LfgRequest {
    #[serde(rename = "match")]
    pub match_slug: String,
    pub lfg: bool,
}

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub members: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PartyTokenResponse {
    pub party_token: String,
}

#[derive(Debug, Serialize)]
pub struct LfgResponse {
    pub lfg: bool,
}

/// POST /api/parties/join
async fn join_party(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<JoinPartyRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<MembersResponse>, AppError> {
    let token = body.into_inner().party;
    let user_id = user.id;

    let joined = retry_txn(Some(&http_req), &app_state, |txn| {
        let token = token.clone();
        Box::pin(async move {
            let joined = PartyService::new()
                .join_by_token(txn, &token, user_id, OffsetDateTime::now_utc())
                .await?;
            Ok(joined)
        })
    })
    .await?;

    Ok(web::Json(MembersResponse {
        members: joined.members,
    }))
}

/// POST /api/parties/leave
async fn leave_party(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<LeavePartyRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<PartyTokenResponse>, AppError> {
    let slug = body.into_inner().match_slug;
    let user_id = user.id;

    let party = retry_txn(Some(&http_req), &app_state, |txn| {
        let slug = slug.clone();
        Box::pin(async move {
            let match_ = matches_repo::require_visible_by_slug(txn, &slug).await?;
            let party = PartyService::new()
                .leave(txn, &match_, user_id, OffsetDateTime::now_utc())
                .await?;
            Ok(party)
        })
    })
    .await?;

    Ok(web::Json(PartyTokenResponse {
        party_token: party.invite_token,
    }))
}

/// POST /api/parties/kick
async fn kick_member(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<KickRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<MembersResponse>, AppError> {
    let request = body.into_inner();
    let leader_id = user.id;

    let outcome = retry_txn(Some(&http_req), &app_state, |txn| {
        let slug = request.match_slug.clone();
        let target = request.user.clone();
        Box::pin(async move {
            let match_ = matches_repo::require_visible_by_slug(txn, &slug).await?;
            let outcome = PartyService::new()
                .kick(txn, &match_, leader_id, &target, OffsetDateTime::now_utc())
                .await?;
            Ok(outcome)
        })
    })
    .await?;

    let KickOutcome { members, notice } = outcome;

    // Committed; the notice is best-effort from here.
    if let Err(e) = app_state.mailer.send(notice).await {
        warn!(error = %e, "failed to send kick notice");
    }

    Ok(web::Json(MembersResponse { members }))
}

/// POST /api/parties/disband
async fn disband_party(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<DisbandRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<PartyTokenResponse>, AppError> {
    let slug = body.into_inner().match_slug;
    let leader_id = user.id;

    let party = retry_txn(Some(&http_req), &app_state, |txn| {
        let slug = slug.clone();
        Box::pin(async move {
            let match_ = matches_repo::require_visible_by_slug(txn, &slug).await?;
            let party = PartyService::new()
                .disband(txn, &match_, leader_id, OffsetDateTime::now_utc())
                .await?;
            Ok(party)
        })
    })
    .await?;

    Ok(web::Json(PartyTokenResponse {
        party_token: party.invite_token,
    }))
}

/// POST /api/parties/lfg
async fn set_lfg(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<LfgRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<LfgResponse>, AppError> {
    let request = body.into_inner();
    let leader_id = user.id;

    let lfg = retry_txn(Some(&http_req), &app_state, |txn| {
        let slug = request.match_slug.clone();
        let visible = request.lfg;
        Box::pin(async move {
            let match_ = matches_repo::require_visible_by_slug(txn, &slug).await?;
            let lfg = PartyService::new()
                .set_looking_for_group(txn, &match_, leader_id, visible, OffsetDateTime::now_utc())
                .await?;
            Ok(lfg)
        })
    })
    .await?;

    Ok(web::Json(LfgResponse { lfg }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/join").route(web::post().to(join_party)));
    cfg.service(web::resource("/leave").route(web::post().to(leave_party)));
    cfg.service(web::resource("/kick").route(web::post().to(kick_member)));
    cfg.service(web::resource("/disband").route(web::post().to(disband_party)));
    cfg.service(web::resource("/lfg").route(web::post().to(set_lfg)));
}
