use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub slug: String,
    pub title: String,
    #[sea_orm(column_name = "start_date")]
    pub start_date: OffsetDateTime,
    #[sea_orm(column_name = "end_date")]
    pub end_date: OffsetDateTime,
    #[sea_orm(column_name = "min_members")]
    pub min_members: i32,
    #[sea_orm(column_name = "max_members")]
    pub max_members: i32,
    #[sea_orm(column_name = "is_visible")]
    pub is_visible: bool,
    #[sea_orm(column_name = "is_deleted")]
    pub is_deleted: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::match_participants::Entity")]
    MatchParticipants,
    #[sea_orm(has_many = "super::parties::Entity")]
    Parties,
}

impl Related<super::match_participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchParticipants.def()
    }
}

impl Related<super::parties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
