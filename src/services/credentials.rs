use crate::constants::nango;
use crate::errors::ApiError;
use crate::services::logger::Logger;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;

/// Connection settings for the Nango credential broker, read from the
/// environment at fetch time so a misconfigured process fails on first use
/// rather than at startup.
#[derive(Debug, Clone)]
pub struct NangoConfig {
    pub connection_id: String,
    pub integration_id: String,
    pub base_url: String,
    pub secret_key: String,
}

impl NangoConfig {
    pub fn from_env() -> Result<Self, ApiError> {
        let mut missing = Vec::new();
        let connection_id = read_env(nango::ENV_CONNECTION_ID, &mut missing);
        let integration_id = read_env(nango::ENV_INTEGRATION_ID, &mut missing);
        let base_url = read_env(nango::ENV_BASE_URL, &mut missing);
        let secret_key = read_env(nango::ENV_SECRET_KEY, &mut missing);
        if !missing.is_empty() {
            return Err(ApiError::Config(format!(
                "set {}",
                missing.join(", ")
            )));
        }
        Ok(Self {
            connection_id,
            integration_id,
            base_url,
            secret_key,
        })
    }

    fn connection_url(&self) -> String {
        format!(
            "{}/connection/{}",
            self.base_url.trim_end_matches('/'),
            self.connection_id
        )
    }
}

fn read_env(key: &'static str, missing: &mut Vec<&'static str>) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            missing.push(key);
            String::new()
        }
    }
}

/// Single-slot bearer token session, populated lazily on first use and held
/// for the life of the process. A 401 from the Timely API does not clear the
/// slot; `invalidate` exists so a caller can force a refetch.
///
/// TODO: wire 401 responses from the request executor to `invalidate` so a
/// rotated token recovers without a process restart.
pub struct TokenSession {
    logger: Logger,
    http: Client,
    slot: Mutex<Option<String>>,
}

impl TokenSession {
    pub fn new(logger: Logger, http: Client) -> Self {
        Self {
            logger,
            http,
            slot: Mutex::new(None),
        }
    }

    /// Builds a session pre-seeded with a token, bypassing the broker.
    pub fn with_token(logger: Logger, http: Client, token: impl Into<String>) -> Self {
        Self {
            logger,
            http,
            slot: Mutex::new(Some(token.into())),
        }
    }

    /// Returns the cached token, fetching from the broker on the first call.
    /// Concurrent callers serialize on the slot, so a miss triggers exactly
    /// one broker request.
    pub async fn get_or_fetch(&self) -> Result<String, ApiError> {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let config = NangoConfig::from_env()?;
        let token = fetch_access_token(&self.http, &config).await?;
        self.logger.info(
            "Access token acquired from Nango",
            Some(&serde_json::json!({"connection_id": config.connection_id})),
        );
        *slot = Some(token.clone());
        Ok(token)
    }

    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        *slot = None;
    }
}

async fn fetch_access_token(http: &Client, config: &NangoConfig) -> Result<String, ApiError> {
    let response = http
        .get(config.connection_url())
        .query(&[
            ("provider_config_key", config.integration_id.as_str()),
            ("refresh_token", "true"),
        ])
        .bearer_auth(&config.secret_key)
        .timeout(Duration::from_millis(nango::TIMEOUT_CREDENTIALS_MS))
        .send()
        .await
        .map_err(|err| {
            ApiError::Transport(format!("Failed to get credentials from Nango: {}", err))
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Transport(format!(
            "Failed to get credentials from Nango: HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )));
    }

    let payload: Value = response.json().await.map_err(|_| {
        ApiError::MalformedResponse("Invalid JSON response from Nango".to_string())
    })?;

    payload
        .get("credentials")
        .and_then(|v| v.get("access_token"))
        .and_then(|v| v.as_str())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .ok_or_else(|| {
            ApiError::Auth("No access token found in Nango credentials".to_string())
        })
}
