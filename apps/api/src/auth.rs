//! Bearer-token verification against the external auth service.
//!
//! Authorization itself is delegated to that collaborator; this module only
//! resolves a token to a user id so queries can be scoped by owner.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller, as confirmed by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Verifies bearer tokens with a single outbound call per request.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl AuthClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            service_key,
        }
    }

    /// Resolves a bearer token to its user. Any non-success answer from the
    /// auth service is reported as an authentication failure, without detail.
    pub async fn verify(&self, token: &str) -> Result<AuthUser, AppError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .bearer_auth(token)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| AppError::Unauthorized(format!("auth service unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized("invalid or expired token".into()));
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| AppError::Unauthorized(format!("malformed auth response: {e}")))?;

        debug!(user_id = %user.id, email = %user.email, "User authenticated");
        Ok(user)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("No authorization header provided".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Expected a bearer token".into()))?;

        state.auth.verify(token).await
    }
}
