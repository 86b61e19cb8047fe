use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::session::SessionStore;

pub mod error;
pub mod models;

pub use error::ApiError;
pub use models::*;

/// Header carrying the session token on every authenticated request.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// The backend surface the dashboard consumes, one method per endpoint.
///
/// The reconciler and scheduler talk to this trait rather than to the
/// concrete gateway so they can be exercised against a scripted in-memory
/// backend. None of the methods retry; retry policy belongs to the caller
/// (the scheduler retries implicitly on its next cycle).
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn register(&self, req: &RegisterRequest) -> Result<AckResponse, ApiError>;
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn validate_session(&self) -> Result<ValidateResponse, ApiError>;
    async fn fetch_summary(&self) -> Result<SummarySnapshot, ApiError>;
    async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, ApiError>;
    async fn fetch_metrics(&self) -> Result<Vec<MetricSample>, ApiError>;
    async fn fetch_thresholds(&self) -> Result<ThresholdConfig, ApiError>;
    async fn save_thresholds(
        &self,
        req: &UpdateThresholdsRequest,
    ) -> Result<UpdateThresholdsResponse, ApiError>;
}

/// Thin typed wrapper over the backend REST API.
///
/// Reads the session store when building each request, so a token set by
/// login is attached to every subsequent call without per-call wiring and
/// a cleared token stops being sent immediately.
pub struct ApiGateway {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiGateway {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, "GET");
        let mut request = self.http.get(&url);
        if let Some(token) = self.session.current() {
            request = request.header(SESSION_TOKEN_HEADER, token);
        }
        Self::decode(request.send().await?).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, "POST");
        let mut request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);
        if let Some(token) = self.session.current() {
            request = request.header(SESSION_TOKEN_HEADER, token);
        }
        Self::decode(request.send().await?).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ApiError::remote(status, &body));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DashboardApi for ApiGateway {
    async fn register(&self, req: &RegisterRequest) -> Result<AckResponse, ApiError> {
        if req.email.is_empty() || req.password.is_empty() {
            return Err(ApiError::Validation("email and password required".into()));
        }
        self.post_json("register", req).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        if req.email.is_empty() || req.password.is_empty() {
            return Err(ApiError::Validation("email and password required".into()));
        }
        self.post_json("login", req).await
    }

    async fn validate_session(&self) -> Result<ValidateResponse, ApiError> {
        self.get_json("validate").await
    }

    async fn fetch_summary(&self) -> Result<SummarySnapshot, ApiError> {
        self.get_json("summary").await
    }

    async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, ApiError> {
        self.get_json("alerts").await
    }

    async fn fetch_metrics(&self) -> Result<Vec<MetricSample>, ApiError> {
        self.get_json("metrics").await
    }

    async fn fetch_thresholds(&self) -> Result<ThresholdConfig, ApiError> {
        self.get_json("thresholds").await
    }

    async fn save_thresholds(
        &self,
        req: &UpdateThresholdsRequest,
    ) -> Result<UpdateThresholdsResponse, ApiError> {
        self.post_json("thresholds", req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_credentials_are_rejected_before_any_request() {
        // Gateway pointed at a dead address: a validation failure must
        // return before the transport layer is ever involved.
        let gateway = ApiGateway::new("http://127.0.0.1:1", SessionStore::new());

        let err = gateway
            .login(&LoginRequest {
                email: String::new(),
                password: "pw".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = gateway
            .register(&RegisterRequest {
                email: "a@b".into(),
                password: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let gateway = ApiGateway::new("http://localhost:5000/", SessionStore::new());
        assert_eq!(gateway.endpoint("summary"), "http://localhost:5000/api/summary");
    }
}
