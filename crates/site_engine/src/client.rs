use std::time::Duration;

use serde::Deserialize;
use site_logging::{site_debug, site_warn};

use crate::{AuthError, FailureKind, ResetConfirmBody, ResetRequestBody};

pub const REQUEST_PATH: &str = "/api/auth/password-reset/";
pub const CONFIRM_PATH: &str = "/api/auth/password-reset/confirm/";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The external auth service, consumed as a black box.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Starts recovery for an address. Any 2xx is success and the body is ignored.
    async fn request_password_reset(&self, body: &ResetRequestBody) -> Result<(), AuthError>;

    /// Sets a new password for a recovery token.
    async fn confirm_password_reset(&self, body: &ResetConfirmBody) -> Result<(), AuthError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAuthClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl ReqwestAuthClient {
    pub fn new(settings: ClientSettings) -> Result<Self, AuthError> {
        reqwest::Url::parse(&settings.base_url)
            .map_err(|err| AuthError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| AuthError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, AuthError> {
        reqwest::Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| AuthError::new(FailureKind::InvalidBaseUrl, err.to_string()))
    }

    async fn post<T: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, AuthError> {
        let url = self.endpoint(path)?;
        site_debug!("POST {}", url);
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl AuthApi for ReqwestAuthClient {
    async fn request_password_reset(&self, body: &ResetRequestBody) -> Result<(), AuthError> {
        let response = self.post(REQUEST_PATH, body).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        // Error bodies of this endpoint are never surfaced.
        site_warn!("password reset request answered {}", status);
        Err(AuthError::new(
            FailureKind::HttpStatus {
                status: status.as_u16(),
                detail: None,
            },
            status.to_string(),
        ))
    }

    async fn confirm_password_reset(&self, body: &ResetConfirmBody) -> Result<(), AuthError> {
        let response = self.post(CONFIRM_PATH, body).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = match response.text().await {
            Ok(text) => extract_detail(&text),
            Err(err) => {
                site_debug!("could not read error body: {}", err);
                None
            }
        };
        site_warn!(
            "password reset confirmation answered {} (detail: {})",
            status,
            detail.is_some()
        );
        Err(AuthError::new(
            FailureKind::HttpStatus {
                status: status.as_u16(),
                detail,
            },
            status.to_string(),
        ))
    }
}

/// Returns the `detail` field of a JSON error body when it is a string.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) => Some(detail),
        _ => None,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        return AuthError::new(FailureKind::Timeout, err.to_string());
    }
    AuthError::new(FailureKind::Network, err.to_string())
}
