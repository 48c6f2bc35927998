use crate::errors::ApiError;
use crate::managers::resource::{ResourceAdapter, ResourceKind};
use crate::models::Team;
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

const KIND: ResourceKind = ResourceKind {
    title: "Team",
    singular: "team",
    plural: "teams",
};

pub struct TeamsManager {
    adapter: ResourceAdapter,
    validation: Validation,
}

impl TeamsManager {
    pub const TOOLS: &'static [&'static str] = &[
        "list_teams",
        "get_team",
        "create_team",
        "update_team",
        "delete_team",
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
        self.adapter.list::<Team>(account_id, &[]).await
    }

    async fn get(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let team_id = self.validation.ensure_id(args.get("team_id"), "team_id")?;
        self.adapter.get::<Team>(account_id, team_id).await
    }

    async fn create(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let name = self.validation.ensure_string(args.get("name"), "name")?;

        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name));
        self.adapter.create::<Team>(account_id, fields).await
    }

    // Unlike the other resources, a team rename requires the new name.
    async fn update(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let team_id = self.validation.ensure_id(args.get("team_id"), "team_id")?;
        let name = self.validation.ensure_string(args.get("name"), "name")?;

        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name));
        self.adapter.update::<Team>(account_id, team_id, fields).await
    }

    async fn delete(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let team_id = self.validation.ensure_id(args.get("team_id"), "team_id")?;
        self.adapter.delete(account_id, team_id).await
    }
}

#[async_trait]
impl ToolHandler for TeamsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "list_teams" => self.list(&args).await,
            "get_team" => self.get(&args).await,
            "create_team" => self.create(&args).await,
            "update_team" => self.update(&args).await,
            "delete_team" => self.delete(&args).await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
