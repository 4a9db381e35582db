//! User repository functions for domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::users_sea as users_adapter;
use crate::errors::domain::DomainError;

/// User domain model (minimal mirror of the identity provider's record)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

pub async fn find_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_username(conn, username).await?;
    Ok(user.map(User::from))
}

pub async fn create_user(
    txn: &DatabaseTransaction,
    username: &str,
    email: &str,
) -> Result<User, DomainError> {
    let dto = users_adapter::UserCreate {
        username: username.to_string(),
        email: email.to_string(),
    };
    let user = users_adapter::create_user(txn, dto).await?;
    Ok(User::from(user))
}
