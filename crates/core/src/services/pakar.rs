//! Pakar (domain expert) application service.
//!
//! Users with enough reputation may apply for the `PAKAR` role; admins
//! approve or reject applications.

use olion_common::{AppError, AppResult, Config, IdGenerator};
use olion_db::{
    entities::{ApplicationStatus, NotificationChannel, UserRole, pakar_application},
    repositories::{PakarApplicationRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use crate::services::{notification::NotificationService, reputation::ReputationService};

/// Input for applying as a Pakar.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplyInput {
    #[validate(length(min = 1, max = 128))]
    pub field: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,
}

/// Input for reviewing an application.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReviewInput {
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Pakar application service for business logic.
#[derive(Clone)]
pub struct PakarService {
    application_repo: PakarApplicationRepository,
    user_repo: UserRepository,
    reputation_service: ReputationService,
    notification_service: NotificationService,
    id_gen: IdGenerator,
    min_score: i64,
}

impl PakarService {
    /// Create a new pakar service.
    #[must_use]
    pub fn new(
        application_repo: PakarApplicationRepository,
        user_repo: UserRepository,
        reputation_service: ReputationService,
        notification_service: NotificationService,
        config: &Config,
    ) -> Self {
        Self {
            application_repo,
            user_repo,
            reputation_service,
            notification_service,
            id_gen: IdGenerator::new(),
            min_score: config.reputation.pakar_min_score,
        }
    }

    /// Submit an application.
    pub async fn apply(
        &self,
        user_id: &str,
        input: ApplyInput,
    ) -> AppResult<pakar_application::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        if user.role != UserRole::User {
            return Err(AppError::BadRequest(format!(
                "Users with role {} cannot apply",
                user.role.as_str()
            )));
        }

        let score = self.reputation_service.get_score(user_id).await?;
        if score < self.min_score {
            return Err(AppError::Forbidden(format!(
                "Reputation {score} is below the required {}",
                self.min_score
            )));
        }

        if self
            .application_repo
            .find_pending_by_user(user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You already have a pending application".to_string(),
            ));
        }

        let model = pakar_application::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            field: Set(input.field.trim().to_string()),
            description: Set(input.description),
            status: Set(ApplicationStatus::Pending),
            reviewed_by: Set(None),
            review_note: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            reviewed_at: Set(None),
        };

        self.application_repo.create(model).await
    }

    /// Approve an application and promote the applicant.
    pub async fn approve(
        &self,
        admin_id: &str,
        application_id: &str,
        input: ReviewInput,
    ) -> AppResult<pakar_application::Model> {
        let application = self
            .review(admin_id, application_id, ApplicationStatus::Approved, input)
            .await?;

        self.user_repo
            .update_role(&application.user_id, UserRole::Pakar)
            .await?;

        info!(
            user_id = %application.user_id,
            admin_id = %admin_id,
            "User promoted to Pakar"
        );

        self.notify_applicant(
            &application,
            "Pakar application approved",
            format!("You are now a Pakar in {}.", application.field),
        )
        .await;

        Ok(application)
    }

    /// Reject an application.
    pub async fn reject(
        &self,
        admin_id: &str,
        application_id: &str,
        input: ReviewInput,
    ) -> AppResult<pakar_application::Model> {
        let application = self
            .review(admin_id, application_id, ApplicationStatus::Rejected, input)
            .await?;

        let mut message = format!("Your application for {} was rejected.", application.field);
        if let Some(note) = &application.review_note {
            message.push_str(" Note: ");
            message.push_str(note);
        }
        self.notify_applicant(&application, "Pakar application rejected", message)
            .await;

        Ok(application)
    }

    async fn review(
        &self,
        admin_id: &str,
        application_id: &str,
        status: ApplicationStatus,
        input: ReviewInput,
    ) -> AppResult<pakar_application::Model> {
        input.validate()?;

        let admin = self.user_repo.get_by_id(admin_id).await?;
        if admin.role != UserRole::Admin {
            return Err(AppError::Forbidden(
                "Only admins can review applications".to_string(),
            ));
        }

        let application = self.application_repo.get_by_id(application_id).await?;
        if application.status != ApplicationStatus::Pending {
            return Err(AppError::AlreadyProcessed(format!(
                "Application {application_id} was already reviewed"
            )));
        }

        if !self
            .application_repo
            .review_if_pending(application_id, status, admin_id, input.note.clone())
            .await?
        {
            return Err(AppError::AlreadyProcessed(format!(
                "Application {application_id} was already reviewed"
            )));
        }

        Ok(pakar_application::Model {
            status,
            reviewed_by: Some(admin_id.to_string()),
            review_note: input.note,
            reviewed_at: Some(chrono::Utc::now().into()),
            ..application
        })
    }

    async fn notify_applicant(
        &self,
        application: &pakar_application::Model,
        title: &str,
        message: String,
    ) {
        if let Err(e) = self
            .notification_service
            .notify(
                &application.user_id,
                title,
                &message,
                NotificationChannel::InApp,
            )
            .await
        {
            warn!(
                application_id = %application.id,
                error = %e,
                "Failed to notify applicant"
            );
        }
    }

    /// Get an application by ID.
    pub async fn get(&self, id: &str) -> AppResult<pakar_application::Model> {
        self.application_repo.get_by_id(id).await
    }

    /// List applications for review.
    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<pakar_application::Model>> {
        self.application_repo.list(status, limit, offset).await
    }
}
