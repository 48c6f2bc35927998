use crate::constants::api;
use crate::errors::ApiError;
use crate::services::credentials::TokenSession;
use crate::services::logger::Logger;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Request executor for the Timely REST API. Every adapter call funnels
/// through `execute`, which attaches the session token, applies the fixed
/// per-request timeout, and translates HTTP outcomes into `ApiError` kinds.
/// There are no retries: a transient failure surfaces immediately.
pub struct TimelyClient {
    logger: Logger,
    http: Client,
    session: Arc<TokenSession>,
    base_url: String,
}

impl TimelyClient {
    pub fn new(
        logger: Logger,
        http: Client,
        session: Arc<TokenSession>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            logger,
            http,
            session,
            base_url: base_url.into(),
        }
    }

    pub fn session(&self) -> &TokenSession {
        &self.session
    }

    fn endpoint_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&joined)
            .map_err(|_| ApiError::Internal(format!("Invalid request URL: {}", joined)))?;
        for (key, value) in query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    pub async fn execute(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let method = parse_method(method)?;
        let token = self
            .session
            .get_or_fetch()
            .await
            .map_err(|err| err.context("Authentication failed"))?;
        let url = self.endpoint_url(path, query)?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .bearer_auth(&token)
            .header("User-Agent", api::USER_AGENT)
            .timeout(Duration::from_millis(api::TIMEOUT_REQUEST_MS));
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        self.logger.debug(
            "Timely request",
            Some(&serde_json::json!({
                "method": method.as_str(),
                "path": path,
                "status": status.as_u16(),
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Auth("Invalid access token".to_string())),
            StatusCode::FORBIDDEN => {
                Err(ApiError::Forbidden("Insufficient permissions".to_string()))
            }
            StatusCode::NOT_FOUND => {
                Err(ApiError::NotFound("Resource does not exist".to_string()))
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let errors = response
                    .bytes()
                    .await
                    .ok()
                    .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
                    .and_then(|parsed| parsed.get("errors").cloned())
                    .unwrap_or_else(|| Value::Object(Default::default()));
                Err(ApiError::Validation { errors })
            }
            status if status.as_u16() >= 400 => Err(ApiError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            }),
            _ => {
                let bytes = response.bytes().await.map_err(map_reqwest_error)?;
                if bytes.is_empty() {
                    return Ok(Value::Object(Default::default()));
                }
                serde_json::from_slice(&bytes).map_err(|_| {
                    ApiError::MalformedResponse("Invalid JSON response from API".to_string())
                })
            }
        }
    }
}

fn parse_method(method: &str) -> Result<Method, ApiError> {
    match method.to_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        other => Err(ApiError::UnsupportedMethod(other.to_string())),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Transport("Request timed out".to_string());
    }
    ApiError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_method_is_case_insensitive() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method("Put").unwrap(), Method::PUT);
    }

    #[test]
    fn parse_method_rejects_patch() {
        let err = parse_method("PATCH").unwrap_err();
        assert_eq!(err.kind(), "unsupported_method");
    }
}
