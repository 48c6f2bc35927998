use crate::constants::api;
use crate::errors::ApiError;
use crate::managers::accounts::AccountsManager;
use crate::managers::clients::ClientsManager;
use crate::managers::events::EventsManager;
use crate::managers::forecasts::ForecastsManager;
use crate::managers::labels::LabelsManager;
use crate::managers::permissions::PermissionsManager;
use crate::managers::projects::ProjectsManager;
use crate::managers::reports::ReportsManager;
use crate::managers::teams::TeamsManager;
use crate::managers::users::UsersManager;
use crate::managers::webhooks::WebhooksManager;
use crate::mcp::catalog::tool_catalog;
use crate::services::credentials::TokenSession;
use crate::services::logger::Logger;
use crate::services::timely::TimelyClient;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    /// Builds the HTTP client, token session, request executor, and all
    /// resource managers, then verifies every catalog tool has a handler.
    pub fn initialize() -> Result<Self, ApiError> {
        let logger = Logger::new("timely");
        let validation = Validation::new();

        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::Internal(format!("Failed to build HTTP client: {}", err)))?;
        let session = Arc::new(TokenSession::new(logger.child("nango"), http.clone()));
        let base_url =
            std::env::var(api::ENV_BASE_URL).unwrap_or_else(|_| api::BASE_URL.to_string());
        let client = Arc::new(TimelyClient::new(
            logger.child("api"),
            http,
            session,
            base_url,
        ));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        register(
            &mut handlers,
            AccountsManager::TOOLS,
            Arc::new(AccountsManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            ClientsManager::TOOLS,
            Arc::new(ClientsManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            ProjectsManager::TOOLS,
            Arc::new(ProjectsManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            UsersManager::TOOLS,
            Arc::new(UsersManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            EventsManager::TOOLS,
            Arc::new(EventsManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            TeamsManager::TOOLS,
            Arc::new(TeamsManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            LabelsManager::TOOLS,
            Arc::new(LabelsManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            ForecastsManager::TOOLS,
            Arc::new(ForecastsManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            WebhooksManager::TOOLS,
            Arc::new(WebhooksManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            ReportsManager::TOOLS,
            Arc::new(ReportsManager::new(client.clone(), validation.clone())),
        );
        register(
            &mut handlers,
            PermissionsManager::TOOLS,
            Arc::new(PermissionsManager::new(client, validation)),
        );

        validate_tool_wiring(&handlers)?;

        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        logger.info(
            "Server initialized",
            Some(&serde_json::json!({"tools": tool_catalog().len()})),
        );
        Ok(Self {
            logger,
            tool_executor,
        })
    }
}

fn register(
    handlers: &mut HashMap<String, Arc<dyn ToolHandler>>,
    tools: &[&str],
    handler: Arc<dyn ToolHandler>,
) {
    for tool in tools {
        handlers.insert(tool.to_string(), handler.clone());
    }
}

fn validate_tool_wiring(handlers: &HashMap<String, Arc<dyn ToolHandler>>) -> Result<(), ApiError> {
    let missing: Vec<&str> = tool_catalog()
        .iter()
        .filter(|tool| !handlers.contains_key(&tool.name))
        .map(|tool| tool.name.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::Internal(format!(
            "Catalog tools without handlers: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_wires_every_catalog_tool() {
        let app = App::initialize().expect("initialization must succeed");
        for tool in tool_catalog() {
            assert!(
                app.tool_executor.has_handler(&tool.name),
                "no handler for {}",
                tool.name
            );
        }
    }
}
