use crate::errors::ApiError;
use crate::managers::resource::{wrap_body, ResourceAdapter, ResourceKind};
use crate::models::{parse_strict, record_to_value, Event};
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

const KIND: ResourceKind = ResourceKind {
    title: "Event",
    singular: "event",
    plural: "events",
};

/// Time entries. Three overrides on top of the generic adapter: create can
/// post into a project's event collection, the `from_time`/`to_time` tool
/// arguments become `from`/`to` in request bodies, and timers are body-less
/// PUTs on the event.
pub struct EventsManager {
    adapter: ResourceAdapter,
    validation: Validation,
}

impl EventsManager {
    pub const TOOLS: &'static [&'static str] = &[
        "list_events",
        "get_event",
        "create_event",
        "update_event",
        "delete_event",
        "start_timer",
        "stop_timer",
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
        if let Some(user_id) = self
            .validation
            .ensure_optional_id(args.get("user_id"), "user_id")?
        {
            query.push(("user_id".to_string(), user_id.to_string()));
        }
        if let Some(project_id) = self
            .validation
            .ensure_optional_id(args.get("project_id"), "project_id")?
        {
            query.push(("project_id".to_string(), project_id.to_string()));
        }
        self.adapter.list::<Event>(account_id, &query).await
    }

    async fn get(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let event_id = self
            .validation
            .ensure_id(args.get("event_id"), "event_id")?;
        self.adapter.get::<Event>(account_id, event_id).await
    }

    async fn create(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let day = self.validation.ensure_string(args.get("day"), "day")?;
        let from_time = self
            .validation
            .ensure_string(args.get("from_time"), "from_time")?;
        let to_time = self
            .validation
            .ensure_string(args.get("to_time"), "to_time")?;
        let project_id = self
            .validation
            .ensure_optional_id(args.get("project_id"), "project_id")?;

        let mut fields = Map::new();
        fields.insert("day".to_string(), Value::String(day));
        fields.insert("from".to_string(), Value::String(from_time));
        fields.insert("to".to_string(), Value::String(to_time));
        if let Some(note) = self
            .validation
            .ensure_optional_string(args.get("note"), "note")?
        {
            fields.insert("note".to_string(), Value::String(note));
        }
        if let Some(project_id) = project_id {
            fields.insert("project_id".to_string(), Value::from(project_id));
        }
        if let Some(user_id) = self
            .validation
            .ensure_optional_id(args.get("user_id"), "user_id")?
        {
            fields.insert("user_id".to_string(), Value::from(user_id));
        }

        let path = match project_id {
            Some(project_id) => format!("/{}/projects/{}/events", account_id, project_id),
            None => format!("/{}/events", account_id),
        };
        let body = wrap_body("event", fields);
        let response = self
            .adapter
            .client()
            .execute("POST", &path, Some(&body), &[])
            .await
            .map_err(|err| err.context("Failed to create event"))?;
        let event: Event = parse_strict(response, "event")?;
        record_to_value(event)
    }

    async fn update(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let event_id = self
            .validation
            .ensure_id(args.get("event_id"), "event_id")?;

        let mut fields = Map::new();
        if let Some(day) = self
            .validation
            .ensure_optional_string(args.get("day"), "day")?
        {
            fields.insert("day".to_string(), Value::String(day));
        }
        if let Some(from_time) = self
            .validation
            .ensure_optional_string(args.get("from_time"), "from_time")?
        {
            fields.insert("from".to_string(), Value::String(from_time));
        }
        if let Some(to_time) = self
            .validation
            .ensure_optional_string(args.get("to_time"), "to_time")?
        {
            fields.insert("to".to_string(), Value::String(to_time));
        }
        if let Some(note) = self
            .validation
            .ensure_optional_string(args.get("note"), "note")?
        {
            fields.insert("note".to_string(), Value::String(note));
        }
        self.adapter.update::<Event>(account_id, event_id, fields).await
    }

    async fn delete(&self, args: &Value) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let event_id = self
            .validation
            .ensure_id(args.get("event_id"), "event_id")?;
        self.adapter.delete(account_id, event_id).await
    }

    async fn timer(&self, args: &Value, action: &str) -> Result<Value, ApiError> {
        let account_id = self
            .validation
            .ensure_id(args.get("account_id"), "account_id")?;
        let event_id = self
            .validation
            .ensure_id(args.get("event_id"), "event_id")?;
        let path = format!("/{}/events/{}/{}", account_id, event_id, action);
        let response = self
            .adapter
            .client()
            .execute("PUT", &path, None, &[])
            .await
            .map_err(|err| {
                err.context(format!("Failed to {} timer for event {}", action, event_id))
            })?;
        let event: Event = parse_strict(response, "event")?;
        record_to_value(event)
    }
}

#[async_trait]
impl ToolHandler for EventsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ApiError> {
        match tool {
            "list_events" => self.list(&args).await,
            "get_event" => self.get(&args).await,
            "create_event" => self.create(&args).await,
            "update_event" => self.update(&args).await,
            "delete_event" => self.delete(&args).await,
            "start_timer" => self.timer(&args, "start").await,
            "stop_timer" => self.timer(&args, "stop").await,
            other => Err(ApiError::UnknownTool(other.to_string())),
        }
    }
}
