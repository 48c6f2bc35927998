use crate::errors::ApiError;
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Report data is a raw pass-through: the remote shape varies with the
/// filters, so the response is wrapped under `reports` untyped.
pub struct ReportsManager {
    client: Arc<TimelyClient>,
    validation: Validation,
}

impl ReportsManager {
    pub const TOOLS: &'static [&'static str] = &["get_reports"];

    pub fn new(client: Arc<TimelyClient>, validation: Validation) -> Self {
        Self { client, validation }
    }

    async fn get(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let mut query = Vec::new();
        for key in ["start_date", "end_date", "user_ids", "project_ids"] {
            if let Some(value) = self
                .validation
                .ensure_optional_string(args.get(key), key)?
            {
                query.push((key.to_string(), value));
            }
        }
        let response = self
            .client
            .execute("GET", &format!("/{}/reports", account_id), None, &query)
            .await
            .map_err(|err| err.context("Failed to get reports"))?;
        Ok(serde_json::json!({ "reports": response }))
    }
}

#[async_trait]
impl ToolHandler for ReportsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "get_reports" => self.get(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
