use crate::errors::ApiError;
use crate::managers::resource::{ResourceAdapter, ResourceKind};
use crate::models::ClientRecord;
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

const KIND: ResourceKind = ResourceKind {
    title: "Client",
    singular: "client",
    plural: "clients",
};

pub struct ClientsManager {
    adapter: ResourceAdapter,
    validation: Validation,
}

impl ClientsManager {
    pub const TOOLS: &'static [&'static str] = &[
        "list_clients",
        "get_client",
        "create_client",
        "update_client",
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
        let mut query = Vec::new();
        if let Some(limit) = self
            .validation
            .ensure_optional_id(args.get("limit"), "limit")?
        {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self
            .validation
            .ensure_optional_id(args.get("offset"), "offset")?
        {
            query.push(("offset".to_string(), offset.to_string()));
        }
        self.adapter.list::<ClientRecord>(account_id, &query).await
    }

    async fn get(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let client_id = self
            .validation
            .ensure_id(args.get("client_id"), "client_id")?;
        self.adapter.get::<ClientRecord>(account_id, client_id).await
    }

    async fn create(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let name = self.validation.ensure_string(args.get("name"), "name")?;
        let active = self
            .validation
            .ensure_optional_bool(args.get("active"), "active")?
            .unwrap_or(true);

        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name));
        fields.insert("active".to_string(), Value::Bool(active));
        self.adapter.create::<ClientRecord>(account_id, fields).await
    }

    async fn update(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let client_id = self
            .validation
            .ensure_id(args.get("client_id"), "client_id")?;

        let mut fields = Map::new();
        if let Some(name) = self
            .validation
            .ensure_optional_string(args.get("name"), "name")?
        {
            fields.insert("name".to_string(), Value::String(name));
        }
        if let Some(active) = self
            .validation
            .ensure_optional_bool(args.get("active"), "active")?
        {
            fields.insert("active".to_string(), Value::Bool(active));
        }
        self.adapter
            .update::<ClientRecord>(account_id, client_id, fields)
            .await
    }

}

#[async_trait]
impl ToolHandler for ClientsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "list_clients" => self.list(&args).await,
            "get_client" => self.get(&args).await,
            "create_client" => self.create(&args).await,
            "update_client" => self.update(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
