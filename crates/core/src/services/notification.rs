//! Notification service.
//!
//! Writes notifications to the inbox table. In-app notifications are
//! delivered by being stored, so they're recorded as sent; other channels
//! are left for an external worker.

use olion_common::{AppError, AppResult, IdGenerator};
use olion_db::{
    entities::{NotificationChannel, notification},
    repositories::NotificationRepository,
};
use sea_orm::Set;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Send a notification to a user.
    pub async fn notify(
        &self,
        user_id: &str,
        title: &str,
        message: &str,
        channel: NotificationChannel,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            channel: Set(channel),
            is_sent: Set(channel == NotificationChannel::InApp),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// Get notifications for a user.
    pub async fn get_notifications(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_user(user_id, limit, until_id, unread_only)
            .await
    }

    /// Mark one notification as read.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        if self
            .notification_repo
            .mark_as_read(user_id, notification_id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Notification {notification_id} not found"
            )))
        }
    }

    /// Mark all notifications as read.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count unread notifications.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_notification(channel: NotificationChannel, is_sent: bool) -> notification::Model {
        notification::Model {
            id: "n1".to_string(),
            user_id: "user1".to_string(),
            title: "Hello".to_string(),
            message: "World".to_string(),
            channel,
            is_sent,
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_notify_in_app() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_notification(
                    NotificationChannel::InApp,
                    true,
                )]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        let result = service
            .notify("user1", "Hello", "World", NotificationChannel::InApp)
            .await
            .unwrap();

        assert_eq!(result.user_id, "user1");
        assert!(result.is_sent);
    }

    #[tokio::test]
    async fn test_mark_as_read_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        let result = service.mark_as_read("user1", "missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
