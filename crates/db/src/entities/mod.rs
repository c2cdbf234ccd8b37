//! Database entities.

#![allow(missing_docs)]

pub mod answer;
pub mod answer_bookmark;
pub mod answer_report;
pub mod answer_vote;
pub mod comment;
pub mod comment_report;
pub mod comment_vote;
pub mod content_source;
pub mod discussion;
pub mod discussion_bookmark;
pub mod discussion_report;
pub mod discussion_vote;
pub mod moderation;
pub mod notification;
pub mod pakar_application;
pub mod report_status;
pub mod reputation;
pub mod user;

pub use answer::Entity as Answer;
pub use answer_bookmark::Entity as AnswerBookmark;
pub use answer_report::Entity as AnswerReport;
pub use answer_vote::Entity as AnswerVote;
pub use comment::Entity as Comment;
pub use comment_report::Entity as CommentReport;
pub use comment_vote::Entity as CommentVote;
pub use content_source::ContentSource;
pub use discussion::Entity as Discussion;
pub use discussion_bookmark::Entity as DiscussionBookmark;
pub use discussion_report::Entity as DiscussionReport;
pub use discussion_vote::Entity as DiscussionVote;
pub use moderation::{Entity as Moderation, ModerationAction};
pub use notification::{Entity as Notification, NotificationChannel};
pub use pakar_application::{ApplicationStatus, Entity as PakarApplication};
pub use report_status::ReportStatus;
pub use reputation::Entity as Reputation;
pub use user::{Entity as User, UserRole};
