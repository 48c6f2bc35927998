use serde_json::Value;
use thiserror::Error;

/// Domain errors for the Timely adapter. Each variant keeps the condition
/// that produced it; `Operation` layers a resource/action context on top
/// without changing the wrapped kind.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing Nango configuration: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unauthorized: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Validation Error: {errors}")]
    Validation { errors: Value },

    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("{0}")]
    MalformedResponse(String),

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool not found: {0}")]
    UnknownTool(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{context}: {source}")]
    Operation {
        context: String,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Wraps the error with an operation-level context message. The
    /// underlying kind stays reachable through `root`.
    pub fn context(self, context: impl Into<String>) -> ApiError {
        ApiError::Operation {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, unwrapping any `Operation` layers.
    pub fn root(&self) -> &ApiError {
        match self {
            ApiError::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.root() {
            ApiError::Config(_) => "configuration",
            ApiError::Transport(_) => "transport",
            ApiError::Auth(_) => "authentication",
            ApiError::Forbidden(_) => "authorization",
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation { .. } => "validation",
            ApiError::Http { .. } => "http",
            ApiError::MalformedResponse(_) => "malformed_response",
            ApiError::UnsupportedMethod(_) => "unsupported_method",
            ApiError::InvalidArguments(_) => "invalid_arguments",
            ApiError::UnknownTool(_) => "unknown_tool",
            ApiError::Internal(_) => "internal",
            ApiError::Operation { .. } => unreachable!("root never returns Operation"),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_preserves_the_underlying_kind() {
        let err = ApiError::Auth("Invalid access token".to_string())
            .context("Failed to get client 7")
            .context("tool: get_client");
        assert_eq!(err.kind(), "authentication");
        assert!(matches!(err.root(), ApiError::Auth(_)));
    }

    #[test]
    fn context_prefixes_the_display_message() {
        let err = ApiError::NotFound("Resource does not exist".to_string())
            .context("Failed to get project 3");
        assert_eq!(
            err.to_string(),
            "Failed to get project 3: Not Found: Resource does not exist"
        );
    }

    #[test]
    fn validation_carries_field_errors() {
        let err = ApiError::Validation {
            errors: serde_json::json!({"name": ["can't be blank"]}),
        };
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("can't be blank"));
    }
}
