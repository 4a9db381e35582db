//! Match registration routes.
//!
//! Match CRUD itself lives elsewhere; these endpoints only move a user in
//! or out of a match's participation ledger.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::db::txn::retry_txn;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos::matches as matches_repo;
use crate::services::parties::PartyService;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct PartyTokenResponse {
    pub party_token: String,
}

/// POST /api/matches/{slug}/register
///
/// Registers the caller for the match. They start as the sole leader of a
/// fresh solo party; the response carries its invite token.
async fn register(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<PartyTokenResponse>, AppError> {
    let slug = path.into_inner();
    let user_id = user.id;

    let party = retry_txn(Some(&http_req), &app_state, |txn| {
        let slug = slug.clone();
        Box::pin(async move {
            let match_ = matches_repo::require_visible_by_slug(txn, &slug).await?;
            let party = PartyService::new()
                .register(txn, &match_, user_id, OffsetDateTime::now_utc())
                .await?;
            Ok(party)
        })
    })
    .await?;

    Ok(web::Json(PartyTokenResponse {
        party_token: party.invite_token,
    }))
}

/// POST /api/matches/{slug}/withdraw
///
/// Removes the caller from the match entirely. Rejected for leaders whose
/// party still has other members.
async fn withdraw(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let slug = path.into_inner();
    let user_id = user.id;

    retry_txn(Some(&http_req), &app_state, |txn| {
        let slug = slug.clone();
        Box::pin(async move {
            let match_ = matches_repo::require_visible_by_slug(txn, &slug).await?;
            PartyService::new()
                .withdraw(txn, &match_, user_id, OffsetDateTime::now_utc())
                .await?;
            Ok(())
        })
    })
    .await?;

    Ok(HttpResponse::Ok().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{slug}/register").route(web::post().to(register)));
    cfg.service(web::resource("/{slug}/withdraw").route(web::post().to(withdraw)));
}
