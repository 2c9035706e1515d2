// ABOUTME: Client for the remote authentication API (login and register).
// ABOUTME: Exposes an AuthApi trait with a reqwest-backed implementation and typed errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;

/// Shown when a failure carries no message of its own.
pub const GENERIC_AUTH_ERROR: &str = "An error occurred";

/// Failures of the authentication API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_AUTH_ERROR))]
    Rejected { status: u16, message: Option<String> },
    #[error("Could not reach the server: {0}")]
    Network(String),
    #[error("Unexpected response from the server: {0}")]
    InvalidResponse(String),
    #[error("{0}")]
    Validation(String),
}

impl AuthError {
    /// The message to show the user inline.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_AUTH_ERROR.to_string()
        } else {
            message
        }
    }
}

/// Successful login/register payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// The remote authentication service.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError>;
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthError>;
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// AuthApi over HTTP: POSTs JSON to `{base_url}/auth/login` and `{base_url}/auth/register`.
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/{}", self.base_url, path)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthResponse, AuthError> {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        parse_auth_response(status, &text)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        self.post("login", &LoginBody { email, password }).await
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthError> {
        self.post(
            "register",
            &RegisterBody {
                name,
                email,
                password,
            },
        )
        .await
    }
}

/// Turn a status and body into a token or a typed error.
pub fn parse_auth_response(status: StatusCode, body: &str) -> Result<AuthResponse, AuthError> {
    if status.is_success() {
        let response: AuthResponse = serde_json::from_str(body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        if response.token.is_empty() {
            return Err(AuthError::InvalidResponse("empty token".to_string()));
        }
        return Ok(response);
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty());
    Err(AuthError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_yields_token() {
        let response = parse_auth_response(StatusCode::OK, r#"{"token":"abc","user":{}}"#);
        assert_eq!(
            response,
            Ok(AuthResponse {
                token: "abc".to_string()
            })
        );
    }

    #[test]
    fn success_without_token_is_invalid() {
        let response = parse_auth_response(StatusCode::OK, r#"{"ok":true}"#);
        assert!(matches!(response, Err(AuthError::InvalidResponse(_))));

        let response = parse_auth_response(StatusCode::CREATED, r#"{"token":""}"#);
        assert!(matches!(response, Err(AuthError::InvalidResponse(_))));
    }

    #[test]
    fn rejection_carries_server_message() {
        let err = parse_auth_response(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid credentials"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AuthError::Rejected {
                status: 401,
                message: Some("Invalid credentials".to_string())
            }
        );
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[test]
    fn rejection_accepts_error_field() {
        let err = parse_auth_response(StatusCode::CONFLICT, r#"{"error":"User already exists"}"#)
            .unwrap_err();
        assert_eq!(err.user_message(), "User already exists");
    }

    #[test]
    fn rejection_without_message_uses_generic_text() {
        let err = parse_auth_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>")
            .unwrap_err();
        assert_eq!(err.user_message(), GENERIC_AUTH_ERROR);

        let err = parse_auth_response(StatusCode::BAD_REQUEST, r#"{"message":"  "}"#).unwrap_err();
        assert_eq!(err.user_message(), GENERIC_AUTH_ERROR);
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let api = HttpAuthApi::new(&ApiConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            timeout_seconds: 5,
        })
        .unwrap();
        assert_eq!(api.endpoint("login"), "http://localhost:5000/api/auth/login");
    }
}
