use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;

/// Raw Bearer token pulled from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

impl AuthToken {
    pub fn from_req(req: &HttpRequest) -> Result<Self, AppError> {
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(AppError::unauthorized_missing_bearer)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(AppError::unauthorized_missing_bearer)?
            .trim();

        if token.is_empty() {
            return Err(AppError::unauthorized_missing_bearer());
        }

        Ok(AuthToken(token.to_string()))
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(AuthToken::from_req(req))
    }
}
