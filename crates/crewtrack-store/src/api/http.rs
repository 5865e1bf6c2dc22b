//! Live HTTP implementation of the API collaborator
//!
//! One `reqwest` client, a configured base URL and timeout, and the
//! bearer credential read from the shared slot on every request - the
//! credential is attached at send time, not baked into the client, so
//! login/logout take effect immediately for every in-flight view.

use async_trait::async_trait;
use crewtrack_domain::{NotificationId, Project, ProjectId, Task, TaskId, User, UserId};
use crewtrack_lifecycle::AcceptanceDecision;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::api::{
    AssignedTask, AuthUser, Credentials, NotificationFeed, ProjectApi, ProjectDraft,
    RegisterRequest, TaskDraft,
};
use crate::config::StoreConfig;
use crate::error::ApiError;
use crate::session::CredentialSlot;

/// Error payload the service sends with non-2xx responses
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the tracker service
#[derive(Debug, Clone)]
pub struct HttpProjectApi {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialSlot,
}

impl HttpProjectApi {
    /// Build a client from configuration with a fresh credential slot
    ///
    /// # Errors
    /// - `ApiError::Transport` for an invalid base URL or client build
    ///   failure
    pub fn new(config: &StoreConfig) -> Result<Self, ApiError> {
        Self::with_credentials(config, CredentialSlot::new())
    }

    /// Build a client sharing an existing credential slot with the store
    ///
    /// # Errors
    /// - `ApiError::Transport` for an invalid base URL or client build
    ///   failure
    pub fn with_credentials(
        config: &StoreConfig,
        credentials: CredentialSlot,
    ) -> Result<Self, ApiError> {
        let parsed: Url = config
            .base_url
            .parse()
            .map_err(|e: url::ParseError| ApiError::Transport(format!("invalid base URL: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// The credential slot this client reads from
    #[inline]
    #[must_use]
    pub fn credentials(&self) -> &CredentialSlot {
        &self.credentials
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = self.credentials.get() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = error_message(status, response.text().await.ok());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(method, path).json(body)).await?;
        decode(response).await
    }

    async fn send_expect_ok(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<(), ApiError> {
        self.send(self.request(method, path).json(body)).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Best-effort extraction of the server's `message` field
fn error_message(status: StatusCode, body: Option<String>) -> String {
    body.as_deref()
        .and_then(|raw| serde_json::from_str::<ErrorBody>(raw).ok())
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

#[async_trait]
impl ProjectApi for HttpProjectApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthUser, ApiError> {
        self.send_json(Method::POST, "/auth/login", credentials).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthUser, ApiError> {
        self.send_json(Method::POST, "/auth/register", request).await
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.get_json("/auth/me").await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/projects").await
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Project, ApiError> {
        self.get_json(&format!("/projects/{id}")).await
    }

    async fn assignable_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/projects/users").await
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.send_json(Method::POST, "/projects", draft).await
    }

    async fn update_project(
        &self,
        id: &ProjectId,
        draft: &ProjectDraft,
    ) -> Result<Project, ApiError> {
        self.send_json(Method::PUT, &format!("/projects/{id}"), draft)
            .await
    }

    async fn delete_project(&self, id: &ProjectId) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("/projects/{id}")))
            .await?;
        Ok(())
    }

    async fn add_member(&self, project: &ProjectId, user: &UserId) -> Result<Project, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/projects/{project}/members"),
            &json!({ "userId": user }),
        )
        .await
    }

    async fn remove_member(
        &self,
        project: &ProjectId,
        user: &UserId,
    ) -> Result<Project, ApiError> {
        let response = self
            .send(self.request(Method::DELETE, &format!("/projects/{project}/members/{user}")))
            .await?;
        decode(response).await
    }

    async fn create_task(&self, project: &ProjectId, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.send_json(Method::POST, &format!("/projects/{project}/tasks"), draft)
            .await
    }

    async fn update_task(
        &self,
        project: &ProjectId,
        task: &TaskId,
        draft: &TaskDraft,
    ) -> Result<Task, ApiError> {
        self.send_json(
            Method::PUT,
            &format!("/projects/{project}/tasks/{task}"),
            draft,
        )
        .await
    }

    async fn delete_task(&self, project: &ProjectId, task: &TaskId) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("/projects/{project}/tasks/{task}")))
            .await?;
        Ok(())
    }

    async fn set_task_acceptance(
        &self,
        project: &ProjectId,
        task: &TaskId,
        decision: AcceptanceDecision,
    ) -> Result<Task, ApiError> {
        self.send_json(
            Method::PUT,
            &format!("/projects/{project}/tasks/{task}/accept"),
            &json!({ "acceptanceStatus": decision }),
        )
        .await
    }

    async fn my_tasks(&self) -> Result<Vec<AssignedTask>, ApiError> {
        self.get_json("/tasks/mytasks").await
    }

    async fn notifications(&self) -> Result<NotificationFeed, ApiError> {
        self.get_json("/notifications").await
    }

    async fn mark_notification_read(&self, id: &NotificationId) -> Result<(), ApiError> {
        self.send_expect_ok(Method::PUT, &format!("/notifications/{id}/read"), &json!({}))
            .await
    }

    async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        self.send_expect_ok(Method::PUT, "/notifications/readall", &json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = StoreConfig::new().with_base_url("http://localhost:5001/api/");
        let api = HttpProjectApi::new(&config).unwrap();
        assert_eq!(api.base_url, "http://localhost:5001/api");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = StoreConfig::new().with_base_url("not a url");
        assert!(HttpProjectApi::new(&config).is_err());
    }

    #[test]
    fn error_message_prefers_server_body() {
        let message = error_message(
            StatusCode::FORBIDDEN,
            Some(r#"{"message":"Access Denied"}"#.to_string()),
        );
        assert_eq!(message, "Access Denied");
    }

    #[test]
    fn error_message_falls_back_to_canonical_reason() {
        let message = error_message(StatusCode::BAD_GATEWAY, Some("<html>".to_string()));
        assert_eq!(message, "Bad Gateway");
        let message = error_message(StatusCode::NOT_FOUND, None);
        assert_eq!(message, "Not Found");
    }
}
