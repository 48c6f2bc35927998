use crate::errors::ApiError;
use crate::managers::resource::{ResourceAdapter, ResourceKind};
use crate::models::{parse_strict, record_to_value, User};
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

const KIND: ResourceKind = ResourceKind {
    title: "User",
    singular: "user",
    plural: "users",
};

pub struct UsersManager {
    adapter: ResourceAdapter,
    validation: Validation,
}

impl UsersManager {
    pub const TOOLS: &'static [&'static str] = &[
        "list_users",
        "get_user",
        "get_current_user",
        "create_user",
        "update_user",
        "delete_user",
    ];

    pub fn new(client: Arc<TimelyClient>, validation: Validation) -> Self {
        Self {
            adapter: ResourceAdapter::new(client, KIND),
            validation,
        }
    }

    async fn list(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        self.adapter.list::<User>(account_id, &[]).await
    }

    async fn get(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let user_id = self.validation.ensure_id(args.get("user_id"), "user_id")?;
        self.adapter.get::<User>(account_id, user_id).await
    }

    /// The authenticated user lives at a fixed member path, not an id.
    async fn get_current(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let response = self
            .adapter
            .client()
            .execute("GET", &format!("/{}/users/current", account_id), None, &[])
            .await
            .map_err(|err| err.context("Failed to get current user"))?;
        let user: User = parse_strict(response, "user")?;
        record_to_value(user)
    }

    async fn create(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let name = self.validation.ensure_string(args.get("name"), "name")?;
        let email = self.validation.ensure_string(args.get("email"), "email")?;
        let user_level = self
            .validation
            .ensure_optional_string(args.get("user_level"), "user_level")?
            .unwrap_or_else(|| "normal".to_string());

        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name));
        fields.insert("email".to_string(), Value::String(email));
        fields.insert("user_level".to_string(), Value::String(user_level));
        self.adapter.create::<User>(account_id, fields).await
    }

    async fn update(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let user_id = self.validation.ensure_id(args.get("user_id"), "user_id")?;

        let mut fields = Map::new();
        if let Some(name) = self
            .validation
            .ensure_optional_string(args.get("name"), "name")?
        {
            fields.insert("name".to_string(), Value::String(name));
        }
        if let Some(email) = self
            .validation
            .ensure_optional_string(args.get("email"), "email")?
        {
            fields.insert("email".to_string(), Value::String(email));
        }
        if let Some(user_level) = self
            .validation
            .ensure_optional_string(args.get("user_level"), "user_level")?
        {
            fields.insert("user_level".to_string(), Value::String(user_level));
        }
        self.adapter.update::<User>(account_id, user_id, fields).await
    }

    async fn delete(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let user_id = self.validation.ensure_id(args.get("user_id"), "user_id")?;
        self.adapter.delete(account_id, user_id).await
    }
}

#[async_trait]
impl ToolHandler for UsersManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "list_users" => self.list(&args).await,
            "get_user" => self.get(&args).await,
            "get_current_user" => self.get_current(&args).await,
            "create_user" => self.create(&args).await,
            "update_user" => self.update(&args).await,
            "delete_user" => self.delete(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
