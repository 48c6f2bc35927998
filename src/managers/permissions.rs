use crate::errors::ApiError;
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Permissions, roles, and capacities. These endpoints branch on whether a
/// `user_id` is supplied (user-scoped vs account-scoped) and return
/// untyped payloads wrapped under their own keys.
pub struct PermissionsManager {
    client: Arc<TimelyClient>,
    validation: Validation,
}

impl PermissionsManager {
    pub const TOOLS: &'static [&'static str] =
        &["get_permissions", "list_roles", "get_user_capacities"];

    pub fn new(client: Arc<TimelyClient>, validation: Validation) -> Self {
        Self { client, validation }
    }

    async fn get_permissions(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let user_id = self
            .validation
            .ensure_optional_id(args.get("user_id"), "user_id")?;
        let path = match user_id {
            Some(user_id) => format!("/{}/users/{}/permissions", account_id, user_id),
            None => format!("/{}/permissions", account_id),
        };
        let response = self
            .client
            .execute("GET", &path, None, &[])
            .await
            .map_err(|err| err.context("Failed to get permissions"))?;
        Ok(serde_json::json!({ "permissions": response }))
    }

    async fn list_roles(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let response = self
            .client
            .execute("GET", &format!("/{}/roles", account_id), None, &[])
            .await
            .map_err(|err| err.context("Failed to list roles"))?;
        Ok(serde_json::json!({ "roles": response }))
    }

    async fn get_capacities(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let user_id = self
            .validation
            .ensure_optional_id(args.get("user_id"), "user_id")?;
        let mut query = Vec::new();
        if let Some(since) = self
            .validation
            .ensure_optional_string(args.get("since"), "since")?
        {
            query.push(("since".to_string(), since));
        }
        if let Some(upto) = self
            .validation
            .ensure_optional_string(args.get("upto"), "upto")?
        {
            query.push(("upto".to_string(), upto));
        }
        let path = match user_id {
            Some(user_id) => format!("/{}/users/{}/capacities", account_id, user_id),
            None => format!("/{}/capacities", account_id),
        };
        let response = self
            .client
            .execute("GET", &path, None, &query)
            .await
            .map_err(|err| err.context("Failed to get user capacities"))?;
        Ok(serde_json::json!({ "capacities": response }))
    }
}

#[async_trait]
impl ToolHandler for PermissionsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "get_permissions" => self.get_permissions(&args).await,
            "list_roles" => self.list_roles(&args).await,
            "get_user_capacities" => self.get_capacities(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
