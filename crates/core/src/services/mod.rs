//! Business logic services.

#![allow(missing_docs)]

pub mod association;
pub mod content;
pub mod moderation;
pub mod notification;
pub mod pakar;
pub mod report;
pub mod reputation;
pub mod token;
pub mod user;

pub use association::{AssociationService, VoteInput, VoteResult};
pub use content::{ContentService, CreateDiscussionInput, CreatePostInput};
pub use moderation::{ModerateInput, ModerationService, reputation_delta};
pub use notification::NotificationService;
pub use pakar::{ApplyInput, PakarService, ReviewInput};
pub use report::{CreateReportInput, ReportService};
pub use reputation::{ReputationService, ReputationSummary};
pub use token::{Claims, TokenService};
pub use user::{SigninInput, SignupInput, UserService};
