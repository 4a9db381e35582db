//! SeaORM adapter for the matches table (read-only for the coordinator).

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::matches;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Option<matches::Model>, sea_orm::DbErr> {
    matches::Entity::find_by_id(match_id).one(conn).await
}

/// Resolve a match by slug, hiding soft-deleted and unlisted rows.
pub async fn find_visible_by_slug<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug: &str,
) -> Result<Option<matches::Model>, sea_orm::DbErr> {
    matches::Entity::find()
        .filter(matches::Column::Slug.eq(slug))
        .filter(matches::Column::IsVisible.eq(true))
        .filter(matches::Column::IsDeleted.eq(false))
        .one(conn)
        .await
}
