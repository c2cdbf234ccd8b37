//! Moderation service.
//!
//! Resolves a pending report with a moderator's decision and applies its
//! consequences: the content effect, the decision record, the owner's
//! reputation entry and a notification to the owner.
//!
//! The report is claimed with a conditional update before anything else is
//! written, so concurrent calls on the same report can't both proceed.
//! Writes after the claim are not transactional; a failure there leaves the
//! report resolved and is logged for manual reconciliation.

use olion_common::{AppError, AppResult, IdGenerator};
use olion_db::{
    entities::{ContentSource, ModerationAction, NotificationChannel, ReportStatus, moderation},
    repositories::{ContentRepository, ModerationRepository, ReportRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::{error, info, warn};
use validator::Validate;

use crate::services::{notification::NotificationService, reputation::ReputationService};

/// Reputation change applied to the content owner for each action.
#[must_use]
pub const fn reputation_delta(action: ModerationAction) -> i32 {
    match action {
        ModerationAction::Delete => -10,
        ModerationAction::Hide => -5,
        ModerationAction::Warning => -2,
        ModerationAction::Ignore => 0,
    }
}

/// Whether the action takes the content out of public view.
///
/// Hide and Delete have the same storage effect; only the recorded action
/// tells them apart.
#[must_use]
pub const fn removes_content(action: ModerationAction) -> bool {
    matches!(action, ModerationAction::Delete | ModerationAction::Hide)
}

/// Input for a moderation decision.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModerateInput {
    pub action: ModerationAction,

    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Moderation service for business logic.
#[derive(Clone)]
pub struct ModerationService {
    report_repo: ReportRepository,
    moderation_repo: ModerationRepository,
    content_repo: ContentRepository,
    reputation_service: ReputationService,
    notification_service: NotificationService,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        moderation_repo: ModerationRepository,
        content_repo: ContentRepository,
        reputation_service: ReputationService,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            report_repo,
            moderation_repo,
            content_repo,
            reputation_service,
            notification_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve a pending report.
    pub async fn moderate(
        &self,
        moderator_id: &str,
        source: ContentSource,
        report_id: &str,
        input: ModerateInput,
    ) -> AppResult<moderation::Model> {
        input.validate()?;

        let report = self.report_repo.get_by_id(source, report_id).await?;
        if report.status != ReportStatus::Pending {
            return Err(AppError::AlreadyProcessed(format!(
                "Report {report_id} is already resolved"
            )));
        }

        let target = self
            .content_repo
            .find_target(source, &report.target_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("{} {} not found", source.label(), report.target_id))
            })?;

        let owner_id = target.user_id.ok_or_else(|| {
            AppError::OwnerNotFound(format!("{} {} has no owner", source.label(), target.id))
        })?;

        if !self.report_repo.resolve_if_pending(source, report_id).await? {
            return Err(AppError::AlreadyProcessed(format!(
                "Report {report_id} is already resolved"
            )));
        }

        let decision = self
            .apply(moderator_id, source, report_id, &target.id, &owner_id, input)
            .await
            .inspect_err(|e| {
                error!(
                    report_id = %report_id,
                    source = %source,
                    target_id = %target.id,
                    error = %e,
                    "Report resolved but moderation was not fully applied"
                );
            })?;

        info!(
            moderation_id = %decision.id,
            moderator_id = %moderator_id,
            report_id = %report_id,
            action = decision.action.as_str(),
            "Report moderated"
        );

        Ok(decision)
    }

    /// Writes that follow a successful claim on the report.
    async fn apply(
        &self,
        moderator_id: &str,
        source: ContentSource,
        report_id: &str,
        target_id: &str,
        owner_id: &str,
        input: ModerateInput,
    ) -> AppResult<moderation::Model> {
        let action = input.action;

        if removes_content(action) {
            self.content_repo.mark_deleted(source, target_id).await?;
        }

        let report_ref = |s: ContentSource| (s == source).then(|| report_id.to_string());
        let model = moderation::ActiveModel {
            id: Set(self.id_gen.generate()),
            moderator_id: Set(moderator_id.to_string()),
            action: Set(action),
            source: Set(source),
            note: Set(input.note.clone()),
            discussion_report_id: Set(report_ref(ContentSource::Discussion)),
            answer_report_id: Set(report_ref(ContentSource::Answer)),
            comment_report_id: Set(report_ref(ContentSource::Comment)),
            created_at: Set(chrono::Utc::now().into()),
        };
        let decision = self.moderation_repo.create(model).await?;

        let delta = reputation_delta(action);
        self.reputation_service
            .add_entry(owner_id, delta, action.as_str(), source, Some(&decision.id))
            .await?;

        let (title, message) = notification_text(source, action, delta, input.note.as_deref());
        if let Err(e) = self
            .notification_service
            .notify(owner_id, &title, &message, NotificationChannel::InApp)
            .await
        {
            warn!(
                moderation_id = %decision.id,
                user_id = %owner_id,
                error = %e,
                "Failed to notify content owner"
            );
        }

        Ok(decision)
    }

    /// Get a decision by ID.
    pub async fn get_decision(&self, id: &str) -> AppResult<moderation::Model> {
        self.moderation_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Moderation {id} not found")))
    }

    /// Decisions taken by a moderator.
    pub async fn get_decisions_by_moderator(
        &self,
        moderator_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation::Model>> {
        self.moderation_repo
            .find_by_moderator(moderator_id, limit, offset)
            .await
    }
}

fn notification_text(
    source: ContentSource,
    action: ModerationAction,
    delta: i32,
    note: Option<&str>,
) -> (String, String) {
    let label = source.label();
    let title = match action {
        ModerationAction::Delete => format!("Your {label} was removed"),
        ModerationAction::Hide => format!("Your {label} was hidden"),
        ModerationAction::Warning => format!("Warning about your {label}"),
        ModerationAction::Ignore => format!("Report on your {label} reviewed"),
    };

    let mut message = format!(
        "A moderator reviewed a report on your {label}. Action: {}. Reputation change: {delta}.",
        action.as_str()
    );
    if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
        message.push_str(" Note: ");
        message.push_str(note.trim());
    }

    (title, message)
}
