use crate::errors::ApiError;
use crate::managers::resource::{ResourceAdapter, ResourceKind};
use crate::models::Forecast;
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

const KIND: ResourceKind = ResourceKind {
    title: "Forecast",
    singular: "forecast",
    plural: "forecasts",
};

/// Planned work entries. The remote API exposes no single-forecast fetch,
/// so there is no `get_forecast` tool.
pub struct ForecastsManager {
    adapter: ResourceAdapter,
    validation: Validation,
}

impl ForecastsManager {
    pub const TOOLS: &'static [&'static str] = &[
        "list_forecasts",
        "create_forecast",
        "update_forecast",
        "delete_forecast",
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
        self.adapter.list::<Forecast>(account_id, &query).await
    }

    async fn create(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let project_id = self
            .validation
            .ensure_id(args.get("project_id"), "project_id")?;
        let user_id = self.validation.ensure_id(args.get("user_id"), "user_id")?;
        let day = self.validation.ensure_string(args.get("day"), "day")?;
        let duration = self
            .validation
            .ensure_id(args.get("duration"), "duration")?;

        let mut fields = Map::new();
        fields.insert("project_id".to_string(), Value::from(project_id));
        fields.insert("user_id".to_string(), Value::from(user_id));
        fields.insert("day".to_string(), Value::String(day));
        fields.insert("duration".to_string(), Value::from(duration));
        if let Some(note) = self
            .validation
            .ensure_optional_string(args.get("note"), "note")?
        {
            fields.insert("note".to_string(), Value::String(note));
        }
        self.adapter.create::<Forecast>(account_id, fields).await
    }

    async fn update(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let forecast_id = self
            .validation
            .ensure_id(args.get("forecast_id"), "forecast_id")?;

        let mut fields = Map::new();
        if let Some(duration) = self
            .validation
            .ensure_optional_id(args.get("duration"), "duration")?
        {
            fields.insert("duration".to_string(), Value::from(duration));
        }
        if let Some(note) = self
            .validation
            .ensure_optional_string(args.get("note"), "note")?
        {
            fields.insert("note".to_string(), Value::String(note));
        }
        self.adapter
            .update::<Forecast>(account_id, forecast_id, fields)
            .await
    }

    async fn delete(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let forecast_id = self
            .validation
            .ensure_id(args.get("forecast_id"), "forecast_id")?;
        self.adapter.delete(account_id, forecast_id).await
    }
}

#[async_trait]
impl ToolHandler for ForecastsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "list_forecasts" => self.list(&args).await,
            "create_forecast" => self.create(&args).await,
            "update_forecast" => self.update(&args).await,
            "delete_forecast" => self.delete(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
