//! Repository layer.
//!
//! Each repository wraps a shared [`sea_orm::DatabaseConnection`] and maps
//! database errors into [`olion_common::AppError`].

mod association;
mod content;
mod moderation;
mod notification;
mod pakar_application;
mod report;
mod reputation;
mod user;

pub use association::{Association, AssociationRepository, VoteAssociation, VoteChange};
pub use content::{ContentRepository, ContentTarget};
pub use moderation::ModerationRepository;
pub use notification::NotificationRepository;
pub use pakar_application::PakarApplicationRepository;
pub use report::{NewReport, Report, ReportRepository};
pub use reputation::ReputationRepository;
pub use user::UserRepository;
