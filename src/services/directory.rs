//! Client for the loan-management platform's user-info API.
//!
//! Resolves a borrowing student's guardian name and email. Calls are
//! authenticated with a bearer token minted from service credentials; sweep
//! jobs hold one token for a whole daily window, request handlers mint one
//! per call.

use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::DirectoryConfig,
    error::{AppError, AppResult},
};

/// Bearer token scoped to its holder; never stored process-wide
#[derive(Clone)]
pub struct BearerToken(String);

/// Guardian contact information for a borrowing student
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub guardian_name: String,
    pub guardian_email: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    config: DirectoryConfig,
}

impl DirectoryClient {
    pub fn new(config: DirectoryConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Mint a bearer token from the configured service credentials
    pub async fn fetch_token(&self) -> AppResult<BearerToken> {
        let url = format!("{}/auth/login", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "username": self.config.username,
                "password": self.config.password,
            }))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Token request returned {}",
                response.status()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse token response: {}", e)))?;

        Ok(BearerToken(body.token))
    }

    /// Resolve a user ID to guardian name and email
    pub async fn user_info(&self, token: &BearerToken, user_id: &str) -> AppResult<UserInfo> {
        let url = format!("{}/users/{}", self.config.base_url, user_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token.0)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("User info request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "User info request for {} returned {}",
                user_id,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse user info: {}", e)))
    }
}
