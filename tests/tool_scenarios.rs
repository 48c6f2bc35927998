mod common;
use common::seeded_client;

use serde_json::json;
use timely_mcp::managers::clients::ClientsManager;
use timely_mcp::managers::events::EventsManager;
use timely_mcp::managers::permissions::PermissionsManager;
use timely_mcp::managers::projects::ProjectsManager;
use timely_mcp::managers::teams::TeamsManager;
use timely_mcp::managers::users::UsersManager;
use timely_mcp::services::tool_executor::ToolHandler;
use timely_mcp::services::validation::Validation;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn create_client_posts_the_wrapped_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/clients"))
        .and(body_json(json!({"client": {"name": "Acme", "active": true}})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 7, "name": "Acme", "active": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let manager = ClientsManager::new(seeded_client(&server.uri()), Validation::new());
    let result = manager
        .handle(
            "create_client",
            json!({"account_id": 1, "name": "Acme", "active": true}),
        )
        .await
        .expect("create must succeed");
    assert_eq!(result["id"], 7);
    assert_eq!(result["name"], "Acme");
}

#[tokio::test]
async fn update_client_omits_unsupplied_fields_from_the_body() {
    let server = MockServer::start().await;
    // Exact body match: an `active` key would fail the matcher.
    Mock::given(method("PUT"))
        .and(path("/1/clients/7"))
        .and(body_json(json!({"client": {"name": "Acme GmbH"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Acme GmbH"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let manager = ClientsManager::new(seeded_client(&server.uri()), Validation::new());
    let result = manager
        .handle(
            "update_client",
            json!({"account_id": 1, "client_id": 7, "name": "Acme GmbH"}),
        )
        .await
        .expect("update must succeed");
    assert_eq!(result["name"], "Acme GmbH");
}

#[tokio::test]
async fn list_projects_passes_filters_and_preserves_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/projects"))
        .and(query_param("state", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "name": "beta"},
            {"id": 1, "name": "alpha"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let manager = ProjectsManager::new(seeded_client(&server.uri()), Validation::new());
    let result = manager
        .handle("list_projects", json!({"account_id": 1, "state": "active"}))
        .await
        .expect("list must succeed");
    let projects = result["projects"].as_array().expect("wrapped list");
    assert_eq!(projects[0]["id"], 2);
    assert_eq!(projects[1]["id"], 1);
}

#[tokio::test]
async fn create_event_with_project_uses_the_project_scoped_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/projects/5/events"))
        .and(body_json(json!({"event": {
            "day": "2024-03-01",
            "from": "09:00",
            "to": "10:30",
            "project_id": 5
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 11, "project_id": 5, "user_id": 3, "day": "2024-03-01"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = EventsManager::new(seeded_client(&server.uri()), Validation::new());
    let result = manager
        .handle(
            "create_event",
            json!({
                "account_id": 1,
                "day": "2024-03-01",
                "from_time": "09:00",
                "to_time": "10:30",
                "project_id": 5
            }),
        )
        .await
        .expect("create must succeed");
    assert_eq!(result["id"], 11);
}

#[tokio::test]
async fn start_timer_puts_to_the_start_path_without_a_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/1/events/9/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "project_id": 5, "user_id": 3, "day": "2024-03-01"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = EventsManager::new(seeded_client(&server.uri()), Validation::new());
    let result = manager
        .handle("start_timer", json!({"account_id": 1, "event_id": 9}))
        .await
        .expect("timer must start");
    assert_eq!(result["id"], 9);
}

#[tokio::test]
async fn delete_project_returns_the_confirmation_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/1/projects/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let manager = ProjectsManager::new(seeded_client(&server.uri()), Validation::new());
    let result = manager
        .handle("delete_project", json!({"account_id": 1, "project_id": 4}))
        .await
        .expect("delete must succeed");
    assert_eq!(result, json!({"result": "Project 4 deleted successfully"}));
}

#[tokio::test]
async fn get_current_user_hits_the_fixed_member_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/users/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "Mel", "email": "mel@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = UsersManager::new(seeded_client(&server.uri()), Validation::new());
    let result = manager
        .handle("get_current_user", json!({"account_id": 1}))
        .await
        .expect("lookup must succeed");
    assert_eq!(result["email"], "mel@example.com");
}

#[tokio::test]
async fn get_permissions_branches_to_the_user_scoped_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/users/2/permissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "events"}])))
        .expect(1)
        .mount(&server)
        .await;

    let manager = PermissionsManager::new(seeded_client(&server.uri()), Validation::new());
    let result = manager
        .handle("get_permissions", json!({"account_id": 1, "user_id": 2}))
        .await
        .expect("lookup must succeed");
    assert_eq!(result["permissions"][0]["name"], "events");
}

#[tokio::test]
async fn a_malformed_list_item_degrades_to_a_minimal_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "core"},
            {"name": "no id on this one"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let manager = TeamsManager::new(seeded_client(&server.uri()), Validation::new());
    let result = manager
        .handle("list_teams", json!({"account_id": 1}))
        .await
        .expect("list must succeed");
    let teams = result["teams"].as_array().expect("wrapped list");
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0]["id"], 1);
    assert_eq!(teams[1]["id"], 0);
    assert_eq!(teams[1]["name"], "no id on this one");
}

#[tokio::test]
async fn a_malformed_single_record_is_a_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/teams/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "no id"})))
        .expect(1)
        .mount(&server)
        .await;

    let manager = TeamsManager::new(seeded_client(&server.uri()), Validation::new());
    let err = manager
        .handle("get_team", json!({"account_id": 1, "team_id": 5}))
        .await
        .expect_err("shape mismatch must fail");
    assert_eq!(err.kind(), "malformed_response");
}
