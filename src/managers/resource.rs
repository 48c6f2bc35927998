use crate::errors::ApiError;
use crate::models::{parse_lenient, parse_strict, record_to_value};
use crate::services::timely::TimelyClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Naming table for one Timely resource: display title for messages,
/// singular key for request bodies, plural segment for paths and list
/// wrappers.
#[derive(Debug, Clone, Copy)]
pub struct ResourceKind {
    pub title: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
}

/// Generic CRUD adapter over account-scoped collections
/// (`/{account_id}/{plural}[/{id}]`). Managers delegate the regular
/// operations here and keep only their resource-specific overrides.
pub struct ResourceAdapter {
    client: Arc<TimelyClient>,
    kind: ResourceKind,
}

impl ResourceAdapter {
    pub fn new(client: Arc<TimelyClient>, kind: ResourceKind) -> Self {
        Self { client, kind }
    }

    pub fn client(&self) -> &Arc<TimelyClient> {
        &self.client
    }

    pub fn collection_path(&self, account_id: i64) -> String {
        format!("/{}/{}", account_id, self.kind.plural)
    }

    pub fn member_path(&self, account_id: i64, id: i64) -> String {
        format!("/{}/{}/{}", account_id, self.kind.plural, id)
    }

    /// Lists the collection, decoding items leniently and wrapping them
    /// under the plural key.
    pub async fn list<T>(
        &self,
        account_id: i64,
        query: &[(String, String)],
    ) -> Result<Value, ApiError>
    where
        T: DeserializeOwned + Serialize,
    {
        let response = self
            .client
            .execute("GET", &self.collection_path(account_id), None, query)
            .await
            .map_err(|err| err.context(format!("Failed to list {}", self.kind.plural)))?;
        Ok(wrap_collection::<T>(response, self.kind.plural))
    }

    pub async fn get<T>(&self, account_id: i64, id: i64) -> Result<Value, ApiError>
    where
        T: DeserializeOwned + Serialize,
    {
        let response = self
            .client
            .execute("GET", &self.member_path(account_id, id), None, &[])
            .await
            .map_err(|err| {
                err.context(format!("Failed to get {} {}", self.kind.singular, id))
            })?;
        let record: T = parse_strict(response, self.kind.singular)?;
        record_to_value(record)
    }

    pub async fn create<T>(
        &self,
        account_id: i64,
        fields: Map<String, Value>,
    ) -> Result<Value, ApiError>
    where
        T: DeserializeOwned + Serialize,
    {
        let body = wrap_body(self.kind.singular, fields);
        let response = self
            .client
            .execute("POST", &self.collection_path(account_id), Some(&body), &[])
            .await
            .map_err(|err| {
                err.context(format!("Failed to create {}", self.kind.singular))
            })?;
        let record: T = parse_strict(response, self.kind.singular)?;
        record_to_value(record)
    }

    pub async fn update<T>(
        &self,
        account_id: i64,
        id: i64,
        fields: Map<String, Value>,
    ) -> Result<Value, ApiError>
    where
        T: DeserializeOwned + Serialize,
    {
        let body = wrap_body(self.kind.singular, fields);
        let response = self
            .client
            .execute("PUT", &self.member_path(account_id, id), Some(&body), &[])
            .await
            .map_err(|err| {
                err.context(format!("Failed to update {} {}", self.kind.singular, id))
            })?;
        let record: T = parse_strict(response, self.kind.singular)?;
        record_to_value(record)
    }

    pub async fn delete(&self, account_id: i64, id: i64) -> Result<Value, ApiError> {
        self.client
            .execute("DELETE", &self.member_path(account_id, id), None, &[])
            .await
            .map_err(|err| {
                err.context(format!("Failed to delete {} {}", self.kind.singular, id))
            })?;
        Ok(serde_json::json!({
            "result": format!("{} {} deleted successfully", self.kind.title, id)
        }))
    }
}

/// Wraps create/update fields under the resource's singular key:
/// `{"client": {...}}`. Only explicitly supplied fields appear.
pub fn wrap_body(singular: &str, fields: Map<String, Value>) -> Value {
    let mut body = Map::new();
    body.insert(singular.to_string(), Value::Object(fields));
    Value::Object(body)
}

/// Normalizes a collection response into its items. The remote API answers
/// list calls with a bare array, but some deployments wrap it in an object
/// keyed by the plural name, and member-ish responses carry a single record.
pub fn collection_items(response: Value, plural: &str) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove(plural) {
                return items;
            }
            if map.contains_key("id") {
                return vec![Value::Object(map)];
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

pub fn wrap_collection<T>(response: Value, plural: &str) -> Value
where
    T: DeserializeOwned + Serialize,
{
    let items: Vec<Value> = collection_items(response, plural)
        .iter()
        .map(|item| parse_lenient::<T>(item).into_value())
        .collect();
    let mut wrapped = Map::new();
    wrapped.insert(plural.to_string(), Value::Array(items));
    Value::Object(wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientRecord;
    use serde_json::json;

    #[test]
    fn collection_items_accepts_a_bare_array() {
        let items = collection_items(json!([{"id": 1}, {"id": 2}]), "clients");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn collection_items_unwraps_the_plural_key() {
        let items = collection_items(json!({"clients": [{"id": 1}]}), "clients");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], 1);
    }

    #[test]
    fn collection_items_treats_a_single_record_as_one_item() {
        let items = collection_items(json!({"id": 9, "name": "solo"}), "clients");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], 9);
    }

    #[test]
    fn collection_items_yields_nothing_for_unrecognized_shapes() {
        assert!(collection_items(json!({"unrelated": true}), "clients").is_empty());
        assert!(collection_items(json!("text"), "clients").is_empty());
    }

    #[test]
    fn wrap_body_nests_fields_under_the_singular_key() {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("Acme"));
        let body = wrap_body("client", fields);
        assert_eq!(body, json!({"client": {"name": "Acme"}}));
    }

    #[test]
    fn wrap_collection_degrades_bad_items_without_dropping_them() {
        let response = json!([
            {"id": 1, "name": "good"},
            {"name": "missing id"},
        ]);
        let wrapped = wrap_collection::<ClientRecord>(response, "clients");
        let items = wrapped["clients"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], 1);
        assert_eq!(items[1]["id"], 0);
        assert_eq!(items[1]["name"], "missing id");
    }
}
