use crate::errors::ApiError;
use crate::managers::resource::wrap_collection;
use crate::models::{parse_strict, record_to_value, Account};
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Accounts are the one collection that is not account-scoped; they live at
/// the API root, so this manager talks to the client directly.
pub struct AccountsManager {
    client: Arc<TimelyClient>,
    validation: Validation,
}

impl AccountsManager {
    pub const TOOLS: &'static [&'static str] = &["list_accounts", "get_account"];

    pub fn new(client: Arc<TimelyClient>, validation: Validation) -> Self {
        Self { client, validation }
    }

    async fn list(&self) -> Result<Value, ApiError> {
        let response = self
            .client
            .execute("GET", "/accounts", None, &[])
            .await
            .map_err(|err| err.context("Failed to list accounts"))?;
        Ok(wrap_collection::<Account>(response, "accounts"))
    }

    async fn get(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let response = self
            .client
            .execute("GET", &format!("/accounts/{}", account_id), None, &[])
            .await
            .map_err(|err| err.context(format!("Failed to get account {}", account_id)))?;
        let account: Account = parse_strict(response, "account")?;
        record_to_value(account)
    }
}

#[async_trait]
impl ToolHandler for AccountsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "list_accounts" => self.list().await,
            "get_account" => self.get(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
