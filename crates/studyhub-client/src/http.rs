//! `reqwest`-backed implementation of the notification backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use studyhub_core::config::api::ApiConfig;
use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::session::SessionContext;
use studyhub_core::types::id::NotificationId;
use studyhub_entity::Notification;

use crate::backend::NotificationBackend;

/// Header carrying the acting user's id to the collaborator.
const USER_HEADER: &str = "X-User-Id";

/// Talks to the REST collaborator's `/notifications` resource.
#[derive(Debug, Clone)]
pub struct HttpNotificationBackend {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Base URL of the collaborator, without a trailing slash.
    base_url: String,
}

impl HttpNotificationBackend {
    /// Creates a backend from the API configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn notifications_url(&self) -> String {
        format!("{}/notifications", self.base_url)
    }

    fn notification_url(&self, id: &NotificationId) -> String {
        format!("{}/notifications/{}", self.base_url, id)
    }

    /// Send a request and decode the JSON body, mapping failures into the
    /// application error taxonomy at this boundary.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Notification request failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::not_found("Notification not found"));
        }
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Notification request returned {status}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to decode notification response: {e}"),
                e,
            )
        })
    }
}

#[async_trait]
impl NotificationBackend for HttpNotificationBackend {
    async fn fetch_all(&self, ctx: &SessionContext) -> AppResult<Vec<Notification>> {
        debug!(user_id = %ctx.user_id, "Fetching notifications");
        self.send_json(
            self.http
                .get(self.notifications_url())
                .header(USER_HEADER, &ctx.user_id),
        )
        .await
    }

    async fn create(
        &self,
        ctx: &SessionContext,
        notification: &Notification,
    ) -> AppResult<Notification> {
        self.send_json(
            self.http
                .post(self.notifications_url())
                .header(USER_HEADER, &ctx.user_id)
                .json(notification),
        )
        .await
    }

    async fn update(
        &self,
        ctx: &SessionContext,
        id: &NotificationId,
        notification: &Notification,
    ) -> AppResult<Notification> {
        self.send_json(
            self.http
                .put(self.notification_url(id))
                .header(USER_HEADER, &ctx.user_id)
                .json(notification),
        )
        .await
    }

    async fn delete(&self, ctx: &SessionContext, id: &NotificationId) -> AppResult<bool> {
        self.send_json(
            self.http
                .delete(self.notification_url(id))
                .header(USER_HEADER, &ctx.user_id),
        )
        .await
    }

    async fn mark_all_read(&self, ctx: &SessionContext) -> AppResult<bool> {
        self.send_json(
            self.http
                .patch(format!("{}/notifications/mark-all-as-read", self.base_url))
                .header(USER_HEADER, &ctx.user_id)
                .json(&serde_json::json!({})),
        )
        .await
    }
}
