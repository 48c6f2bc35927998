use crate::errors::ApiError;
use crate::managers::resource::{ResourceAdapter, ResourceKind};
use crate::models::Label;
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

const KIND: ResourceKind = ResourceKind {
    title: "Label",
    singular: "label",
    plural: "labels",
};

pub struct LabelsManager {
    adapter: ResourceAdapter,
    validation: Validation,
}

impl LabelsManager {
    pub const TOOLS: &'static [&'static str] = &[
        "list_labels",
        "get_label",
        "create_label",
        "update_label",
        "delete_label",
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
        self.adapter.list::<Label>(account_id, &[]).await
    }

    async fn get(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let label_id = self
            .validation
            .ensure_id(args.get("label_id"), "label_id")?;
        self.adapter.get::<Label>(account_id, label_id).await
    }

    async fn create(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let name = self.validation.ensure_string(args.get("name"), "name")?;

        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name));
        if let Some(color) = self
            .validation
            .ensure_optional_string(args.get("color"), "color")?
        {
            fields.insert("color".to_string(), Value::String(color));
        }
        self.adapter.create::<Label>(account_id, fields).await
    }

    async fn update(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let label_id = self
            .validation
            .ensure_id(args.get("label_id"), "label_id")?;

        let mut fields = Map::new();
        if let Some(name) = self
            .validation
            .ensure_optional_string(args.get("name"), "name")?
        {
            fields.insert("name".to_string(), Value::String(name));
        }
        if let Some(color) = self
            .validation
            .ensure_optional_string(args.get("color"), "color")?
        {
            fields.insert("color".to_string(), Value::String(color));
        }
        self.adapter.update::<Label>(account_id, label_id, fields).await
    }

    async fn delete(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let label_id = self
            .validation
            .ensure_id(args.get("label_id"), "label_id")?;
        self.adapter.delete(account_id, label_id).await
    }
}

#[async_trait]
impl ToolHandler for LabelsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "list_labels" => self.list(&args).await,
            "get_label" => self.get(&args).await,
            "create_label" => self.create(&args).await,
            "update_label" => self.update(&args).await,
            "delete_label" => self.delete(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
