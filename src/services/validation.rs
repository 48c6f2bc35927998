use crate::errors::ApiError;
use serde_json::Value;

/// Argument extraction helpers for tool handlers. The JSON Schemas in the
/// tool catalog reject malformed calls before dispatch; these guards keep
/// the handlers honest when constructing paths and bodies.
#[derive(Clone)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_id(&self, value: Option<&Value>, label: &str) -> Result<i64, ApiError> {
        value
            .and_then(|v| v.as_i64())
            .ok_or_else(|| ApiError::InvalidArguments(format!("{} must be an integer", label)))
    }

    pub fn ensure_optional_id(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<i64>, ApiError> {
        match value {
            None => Ok(None),
            Some(val) if val.is_null() => Ok(None),
            Some(val) => val
                .as_i64()
                .map(Some)
                .ok_or_else(|| ApiError::InvalidArguments(format!("{} must be an integer", label))),
        }
    }

    pub fn ensure_string(&self, value: Option<&Value>, label: &str) -> Result<String, ApiError> {
        let text = value.and_then(|v| v.as_str()).ok_or_else(|| {
            ApiError::InvalidArguments(format!("{} must be a non-empty string", label))
        })?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidArguments(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(trimmed.to_string())
    }

    pub fn ensure_optional_string(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<String>, ApiError> {
        match value {
            None => Ok(None),
            Some(val) if val.is_null() => Ok(None),
            Some(val) => self.ensure_string(Some(val), label).map(Some),
        }
    }

    pub fn ensure_optional_bool(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<bool>, ApiError> {
        match value {
            None => Ok(None),
            Some(val) if val.is_null() => Ok(None),
            Some(val) => val
                .as_bool()
                .map(Some)
                .ok_or_else(|| ApiError::InvalidArguments(format!("{} must be a boolean", label))),
        }
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ensure_id_rejects_strings() {
        let validation = Validation::new();
        let err = validation
            .ensure_id(Some(&json!("7")), "account_id")
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_arguments");
    }

    #[test]
    fn ensure_optional_id_treats_null_as_absent() {
        let validation = Validation::new();
        assert_eq!(
            validation
                .ensure_optional_id(Some(&Value::Null), "limit")
                .unwrap(),
            None
        );
        assert_eq!(
            validation.ensure_optional_id(None, "limit").unwrap(),
            None
        );
        assert_eq!(
            validation
                .ensure_optional_id(Some(&json!(25)), "limit")
                .unwrap(),
            Some(25)
        );
    }

    #[test]
    fn ensure_string_trims_and_rejects_blank() {
        let validation = Validation::new();
        assert_eq!(
            validation.ensure_string(Some(&json!("  Acme ")), "name").unwrap(),
            "Acme"
        );
        assert!(validation.ensure_string(Some(&json!("   ")), "name").is_err());
        assert!(validation.ensure_string(None, "name").is_err());
    }
}
