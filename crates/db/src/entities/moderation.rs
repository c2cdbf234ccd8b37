//! Moderation decision entity.
//!
//! One row per resolved report, never updated afterwards. Exactly one of
//! the three report foreign keys is set, selected by `source`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::content_source::ContentSource;

/// Disposition chosen by a moderator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ModerationAction {
    #[sea_orm(string_value = "Delete")]
    Delete,
    #[sea_orm(string_value = "Hide")]
    Hide,
    #[sea_orm(string_value = "Warning")]
    Warning,
    #[sea_orm(string_value = "Ignore")]
    Ignore,
}

impl ModerationAction {
    /// Label stored in reputation entries and shown in notifications.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "Delete",
            Self::Hide => "Hide",
            Self::Warning => "Warning",
            Self::Ignore => "Ignore",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "moderation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub moderator_id: String,

    pub action: ModerationAction,

    pub source: ContentSource,

    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,

    #[sea_orm(nullable)]
    pub discussion_report_id: Option<String>,

    #[sea_orm(nullable)]
    pub answer_report_id: Option<String>,

    #[sea_orm(nullable)]
    pub comment_report_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// The report this decision resolved, whichever table it lives in.
    #[must_use]
    pub fn report_id(&self) -> Option<&str> {
        match self.source {
            ContentSource::Discussion => self.discussion_report_id.as_deref(),
            ContentSource::Answer => self.answer_report_id.as_deref(),
            ContentSource::Comment => self.comment_report_id.as_deref(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ModeratorId",
        to = "super::user::Column::Id"
    )]
    Moderator,

    #[sea_orm(
        belongs_to = "super::discussion_report::Entity",
        from = "Column::DiscussionReportId",
        to = "super::discussion_report::Column::Id"
    )]
    DiscussionReport,

    #[sea_orm(
        belongs_to = "super::answer_report::Entity",
        from = "Column::AnswerReportId",
        to = "super::answer_report::Column::Id"
    )]
    AnswerReport,

    #[sea_orm(
        belongs_to = "super::comment_report::Entity",
        from = "Column::CommentReportId",
        to = "super::comment_report::Column::Id"
    )]
    CommentReport,
}

impl ActiveModelBehavior for ActiveModel {}
