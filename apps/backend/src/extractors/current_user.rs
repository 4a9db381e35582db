use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::verify_access_token;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::repos::users;
use crate::state::app_state::AppState;

/// Authenticated user resolved from the Bearer token.
///
/// The identity provider signs the token; the database row supplies
/// username and email for the membership operations.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = AuthToken::from_req(&req)?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available".to_string()))?;

            let claims = verify_access_token(&token.0, &app_state.security)?;
            let user_id = claims.user_id()?;

            // Use the shared transaction when a test injected one; fall back
            // to the pooled connection.
            let user = if let Some(shared_txn) = SharedTxn::from_req(&req) {
                users::find_by_id(shared_txn.transaction(), user_id).await?
            } else {
                let db = require_db(app_state)?;
                users::find_by_id(db, user_id).await?
            };

            let user = user.ok_or_else(AppError::forbidden_user_not_found)?;

            Ok(CurrentUser {
                id: user.id,
                username: user.username,
                email: user.email,
            })
        })
    }
}
