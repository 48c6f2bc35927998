use crate::errors::ApiError;
use crate::managers::resource::{ResourceAdapter, ResourceKind};
use crate::models::Webhook;
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

const KIND: ResourceKind = ResourceKind {
    title: "Webhook",
    singular: "webhook",
    plural: "webhooks",
};

pub struct WebhooksManager {
    adapter: ResourceAdapter,
    validation: Validation,
}

impl WebhooksManager {
    pub const TOOLS: &'static [&'static str] = &[
        "list_webhooks",
        "get_webhook",
        "create_webhook",
        "update_webhook",
        "delete_webhook",
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
        self.adapter.list::<Webhook>(account_id, &[]).await
    }

    async fn get(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let webhook_id = self
            .validation
            .ensure_id(args.get("webhook_id"), "webhook_id")?;
        self.adapter.get::<Webhook>(account_id, webhook_id).await
    }

    async fn create(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let target_url = self
            .validation
            .ensure_string(args.get("target_url"), "target_url")?;
        let event = self.validation.ensure_string(args.get("event"), "event")?;

        let mut fields = Map::new();
        fields.insert("target_url".to_string(), Value::String(target_url));
        fields.insert("event".to_string(), Value::String(event));
        self.adapter.create::<Webhook>(account_id, fields).await
    }

    async fn update(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let webhook_id = self
            .validation
            .ensure_id(args.get("webhook_id"), "webhook_id")?;

        let mut fields = Map::new();
        if let Some(target_url) = self
            .validation
            .ensure_optional_string(args.get("target_url"), "target_url")?
        {
            fields.insert("target_url".to_string(), Value::String(target_url));
        }
        if let Some(event) = self
            .validation
            .ensure_optional_string(args.get("event"), "event")?
        {
            fields.insert("event".to_string(), Value::String(event));
        }
        self.adapter
            .update::<Webhook>(account_id, webhook_id, fields)
            .await
    }

    async fn delete(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let webhook_id = self
            .validation
            .ensure_id(args.get("webhook_id"), "webhook_id")?;
        self.adapter.delete(account_id, webhook_id).await
    }
}

#[async_trait]
impl ToolHandler for WebhooksManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "list_webhooks" => self.list(&args).await,
            "get_webhook" => self.get(&args).await,
            "create_webhook" => self.create(&args).await,
            "update_webhook" => self.update(&args).await,
            "delete_webhook" => self.delete(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
