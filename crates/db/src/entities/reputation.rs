//! Reputation ledger entity. Append-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::content_source::ContentSource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reputation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    /// Signed point change
    pub delta: i32,

    /// Action that produced the entry
    pub reason: String,

    pub source: ContentSource,

    /// Decision that triggered this entry
    #[sea_orm(nullable)]
    pub moderation_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::moderation::Entity",
        from = "Column::ModerationId",
        to = "super::moderation::Column::Id",
        on_delete = "SetNull"
    )]
    Moderation,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
