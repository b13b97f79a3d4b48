//! HTTP handlers for notification endpoints and the mail delivery webhook

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::mailer::{verify_webhook_signature, DeliveryEvent};
use crate::external::MailerClient;
use crate::middleware::CurrentUser;
use crate::services::notification::{Notification, NotificationService};
use crate::AppState;

fn notification_service(state: &AppState) -> NotificationService {
    let mailer = MailerClient::from_config(&state.config.mail);
    NotificationService::new(state.db.clone(), mailer)
}

/// List the current user's notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = notification_service(&state)
        .list(current_user.0.user_id)
        .await?;
    Ok(Json(notifications))
}

/// Unread notification count
pub async fn get_unread_count(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UnreadCount>> {
    let count = notification_service(&state)
        .unread_count(current_user.0.user_id)
        .await?;
    Ok(Json(UnreadCount { count }))
}

/// Mark one notification as read
pub async fn mark_as_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    notification_service(&state)
        .mark_as_read(current_user.0.user_id, notification_id)
        .await?;
    Ok(Json(()))
}

/// Mark all notifications as read
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<MarkedCount>> {
    let marked = notification_service(&state)
        .mark_all_as_read(current_user.0.user_id)
        .await?;
    Ok(Json(MarkedCount { marked }))
}

/// Dismiss a notification
pub async fn dismiss_notification(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    notification_service(&state)
        .dismiss(current_user.0.user_id, notification_id)
        .await?;
    Ok(Json(()))
}

/// Mail provider delivery webhook.
///
/// The request body is authenticated with the provider's HMAC signature
/// before any state changes.
pub async fn handle_mail_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<WebhookResponse>> {
    let signature = headers
        .get("x-mail-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Validation {
            field: "x-mail-signature".to_string(),
            message: "Missing webhook signature".to_string(),
            message_it: "Firma del webhook mancante".to_string(),
        })?;

    verify_webhook_signature(
        &state.config.mail.webhook_secret,
        body.as_bytes(),
        signature,
    )
    .map_err(|_| AppError::Validation {
        field: "x-mail-signature".to_string(),
        message: "Invalid webhook signature".to_string(),
        message_it: "Firma del webhook non valida".to_string(),
    })?;

    let event: DeliveryEvent =
        serde_json::from_str(&body).map_err(|e| AppError::Validation {
            field: "body".to_string(),
            message: format!("Malformed delivery event: {}", e),
            message_it: "Evento di consegna malformato".to_string(),
        })?;

    notification_service(&state)
        .record_delivery_event(event)
        .await?;

    Ok(Json(WebhookResponse { success: true }))
}

/// Unread count payload
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

/// Mark-all payload
#[derive(Debug, Serialize)]
pub struct MarkedCount {
    pub marked: u64,
}

/// Webhook acknowledgement payload
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
}
