use crate::errors::ApiError;
use crate::managers::resource::{ResourceAdapter, ResourceKind};
use crate::models::Project;
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

const KIND: ResourceKind = ResourceKind {
    title: "Project",
    singular: "project",
    plural: "projects",
};

pub struct ProjectsManager {
    adapter: ResourceAdapter,
    validation: Validation,
}

impl ProjectsManager {
    pub const TOOLS: &'static [&'static str] = &[
        "list_projects",
        "get_project",
        "create_project",
        "update_project",
        "delete_project",
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
        if let Some(state) = self
            .validation
            .ensure_optional_string(args.get("state"), "state")?
        {
            query.push(("state".to_string(), state));
        }
        self.adapter.list::<Project>(account_id, &query).await
    }

    async fn get(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let project_id = self
            .validation
            .ensure_id(args.get("project_id"), "project_id")?;
        self.adapter.get::<Project>(account_id, project_id).await
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
        if let Some(description) = self
            .validation
            .ensure_optional_string(args.get("description"), "description")?
        {
            fields.insert("description".to_string(), Value::String(description));
        }
        if let Some(client_id) = self
            .validation
            .ensure_optional_id(args.get("client_id"), "client_id")?
        {
            fields.insert("client_id".to_string(), Value::from(client_id));
        }
        self.adapter.create::<Project>(account_id, fields).await
    }

    async fn update(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let project_id = self
            .validation
            .ensure_id(args.get("project_id"), "project_id")?;

        let mut fields = Map::new();
        if let Some(name) = self
            .validation
            .ensure_optional_string(args.get("name"), "name")?
        {
            fields.insert("name".to_string(), Value::String(name));
        }
        if let Some(description) = self
            .validation
            .ensure_optional_string(args.get("description"), "description")?
        {
            fields.insert("description".to_string(), Value::String(description));
        }
        if let Some(active) = self
            .validation
            .ensure_optional_bool(args.get("active"), "active")?
        {
            fields.insert("active".to_string(), Value::Bool(active));
        }
        self.adapter
            .update::<Project>(account_id, project_id, fields)
            .await
    }

    async fn delete(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let project_id = self
            .validation
            .ensure_id(args.get("project_id"), "project_id")?;
        self.adapter.delete(account_id, project_id).await
    }
}

#[async_trait]
impl ToolHandler for ProjectsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "list_projects" => self.list(&args).await,
            "get_project" => self.get(&args).await,
            "create_project" => self.create(&args).await,
            "update_project" => self.update(&args).await,
            "delete_project" => self.delete(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
