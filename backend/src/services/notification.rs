//! Notification service for in-app notifications and transactional mail
//!
//! Side effects are explicit: the service is invoked by the command that
//! performs the mutation, never through save hooks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::mailer::{DeliveryEvent, DeliveryOutcome, MailerClient};

/// Notification service
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
    mailer: Option<MailerClient>,
}

/// Notification categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RegistryCreated,
    OrderLate,
    LotExpiring,
    LowStock,
    DocumentExpiring,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::RegistryCreated => "registry_created",
            NotificationKind::OrderLate => "order_late",
            NotificationKind::LotExpiring => "lot_expiring",
            NotificationKind::LowStock => "low_stock",
            NotificationKind::DocumentExpiring => "document_expiring",
            NotificationKind::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "registry_created" => Some(NotificationKind::RegistryCreated),
            "order_late" => Some(NotificationKind::OrderLate),
            "lot_expiring" => Some(NotificationKind::LotExpiring),
            "low_stock" => Some(NotificationKind::LowStock),
            "document_expiring" => Some(NotificationKind::DocumentExpiring),
            "system" => Some(NotificationKind::System),
            _ => None,
        }
    }
}

/// An in-app notification record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub mail_message_id: Option<String>,
    pub mail_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification
#[derive(Debug)]
pub struct NotifyInput {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Email address for the mail copy, when one should be sent
    pub email: Option<String>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool, mailer: Option<MailerClient>) -> Self {
        Self { db, mailer }
    }

    /// Record a notification and send the mail copy when requested.
    ///
    /// Mail failures are recorded and logged but never abort the calling
    /// command.
    pub async fn notify(&self, input: NotifyInput) -> AppResult<Notification> {
        let mut mail_message_id: Option<String> = None;
        let mut mail_status: Option<&str> = None;

        if let Some(email) = &input.email {
            match &self.mailer {
                Some(mailer) => {
                    match mailer.send(email, None, &input.title, &input.body).await {
                        Ok(message_id) => {
                            mail_message_id = Some(message_id);
                            mail_status = Some("queued");
                        }
                        Err(err) => {
                            tracing::warn!("Mail send failed for {}: {}", email, err);
                            mail_status = Some("failed");
                        }
                    }
                }
                None => {
                    tracing::debug!("Outbound mail disabled, skipping copy to {}", email);
                }
            }
        }

        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, kind, title, body, mail_message_id, mail_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, kind, title, body, is_read, is_dismissed,
                      mail_message_id, mail_status, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.kind.as_str())
        .bind(&input.title)
        .bind(&input.body)
        .bind(&mail_message_id)
        .bind(mail_status)
        .fetch_one(&self.db)
        .await?;

        Ok(notification)
    }

    /// List notifications for a user, newest first
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, title, body, is_read, is_dismissed,
                   mail_message_id, mail_status, created_at
            FROM notifications
            WHERE user_id = $1 AND is_dismissed = false
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(notifications)
    }

    /// Count unread notifications for a user
    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false AND is_dismissed = false",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// Mark one notification as read
    pub async fn mark_as_read(&self, user_id: Uuid, notification_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = true WHERE id = $1 AND user_id = $2")
                .bind(notification_id)
                .bind(user_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification".to_string()));
        }

        Ok(())
    }

    /// Mark all notifications as read
    pub async fn mark_all_as_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = true WHERE user_id = $1 AND is_read = false")
                .bind(user_id)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected())
    }

    /// Dismiss a notification
    pub async fn dismiss(&self, user_id: Uuid, notification_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_dismissed = true WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification".to_string()));
        }

        Ok(())
    }

    /// Record a delivery event posted by the mail provider webhook
    pub async fn record_delivery_event(&self, event: DeliveryEvent) -> AppResult<()> {
        let status = match event.event {
            DeliveryOutcome::Delivered => "delivered",
            DeliveryOutcome::Bounced => "bounced",
            DeliveryOutcome::Deferred => "deferred",
        };

        sqlx::query("UPDATE notifications SET mail_status = $1 WHERE mail_message_id = $2")
            .bind(status)
            .bind(&event.message_id)
            .execute(&self.db)
            .await?;

        if let Some(reason) = event.reason {
            tracing::info!(
                "Mail {} reported {} ({})",
                event.message_id,
                status,
                reason
            );
        }

        Ok(())
    }
}
