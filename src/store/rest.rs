//! PostgREST-style HTTP row store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::config::StoreConfig;
use crate::error::{EngineError, EngineResult};

use super::{
    ChangeEvent, ChangeFilter, ChangeKind, Collection, DataStore, EVENT_CHANNEL_CAPACITY,
    Subscription, row_id,
};

/// A [`DataStore`] backed by a hosted PostgREST endpoint.
///
/// Change events are published for the writes this client performs; changes
/// made by other clients are not observed.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    events: broadcast::Sender<ChangeEvent>,
}

impl RestStore {
    /// Creates a client for `base_url` authenticating with `api_key`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> EngineResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::store("*", "connect", e.to_string()))?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            events,
        })
    }

    /// Creates a client from configuration, reading the key from the
    /// environment variable named there.
    pub fn from_config(config: &StoreConfig) -> EngineResult<Self> {
        let api_key =
            std::env::var(&config.api_key_env).map_err(|_| EngineError::ConfigNotFound {
                path: format!("${}", config.api_key_env),
            })?;
        Self::new(
            config.url.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table_name())
    }

    fn request(&self, method: Method, collection: Collection) -> RequestBuilder {
        self.client
            .request(method, self.table_url(collection))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(
        &self,
        collection: Collection,
        operation: &str,
        request: RequestBuilder,
    ) -> EngineResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| EngineError::store(collection.table_name(), operation, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            collection = %collection,
            operation,
            status = %status,
            "Store request rejected"
        );
        Err(EngineError::store(
            collection.table_name(),
            operation,
            format!("{}: {}", status, body),
        ))
    }

    async fn rows(
        &self,
        collection: Collection,
        operation: &str,
        response: Response,
    ) -> EngineResult<Vec<Value>> {
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| EngineError::store(collection.table_name(), operation, e.to_string()))
    }

    fn publish(&self, collection: Collection, kind: ChangeKind, id: Option<String>) {
        let _ = self.events.send(ChangeEvent {
            collection,
            kind,
            id,
        });
    }
}

fn id_filter(id: &str) -> [(&'static str, String); 1] {
    [("id", format!("eq.{}", id))]
}

fn not_found(collection: Collection, id: &str) -> EngineError {
    EngineError::RecordNotFound {
        collection: collection.table_name().to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn get_all(&self, collection: Collection) -> EngineResult<Vec<Value>> {
        let request = self
            .request(Method::GET, collection)
            .query(&[("select", "*")]);
        let response = self.send(collection, "select", request).await?;
        self.rows(collection, "select", response).await
    }

    async fn get_by_id(&self, collection: Collection, id: &str) -> EngineResult<Value> {
        let request = self
            .request(Method::GET, collection)
            .query(&[("select", "*")])
            .query(&id_filter(id));
        let response = self.send(collection, "select", request).await?;
        self.rows(collection, "select", response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(collection, id))
    }

    async fn create(&self, collection: Collection, row: Value) -> EngineResult<Value> {
        let request = self
            .request(Method::POST, collection)
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self.send(collection, "insert", request).await?;
        let stored = self
            .rows(collection, "insert", response)
            .await?
            .into_iter()
            .next()
            .unwrap_or(row);

        self.publish(collection, ChangeKind::Insert, row_id(&stored));
        Ok(stored)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        changes: Value,
    ) -> EngineResult<Value> {
        let request = self
            .request(Method::PATCH, collection)
            .query(&id_filter(id))
            .header("Prefer", "return=representation")
            .json(&changes);
        let response = self.send(collection, "update", request).await?;
        let stored = self
            .rows(collection, "update", response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(collection, id))?;

        self.publish(collection, ChangeKind::Update, Some(id.to_string()));
        Ok(stored)
    }

    async fn delete(&self, collection: Collection, id: &str) -> EngineResult<()> {
        let request = self
            .request(Method::DELETE, collection)
            .query(&id_filter(id))
            .header("Prefer", "return=representation");
        let response = self.send(collection, "delete", request).await?;
        if self.rows(collection, "delete", response).await?.is_empty() {
            return Err(not_found(collection, id));
        }

        self.publish(collection, ChangeKind::Delete, Some(id.to_string()));
        Ok(())
    }

    fn subscribe(&self, collections: &[Collection], filter: ChangeFilter) -> Subscription {
        Subscription::new(collections, filter, self.events.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RestStore {
        RestStore::new("https://db.example.org/", "key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_table_url_strips_trailing_slash() {
        assert_eq!(
            store().table_url(Collection::TeacherAttendance),
            "https://db.example.org/rest/v1/teacherAttendance"
        );
    }

    #[test]
    fn test_requests_carry_key_headers() {
        let request = store()
            .request(Method::GET, Collection::Salaries)
            .query(&id_filter("42"))
            .build()
            .unwrap();
        assert_eq!(request.headers()["apikey"], "key");
        assert_eq!(request.headers()["authorization"], "Bearer key");
        assert_eq!(request.url().query(), Some("id=eq.42"));
    }

    #[test]
    fn test_from_config_requires_key_variable() {
        let config = StoreConfig {
            url: "https://db.example.org".to_string(),
            api_key_env: "CENTER_PAYROLL_TEST_UNSET_KEY".to_string(),
            timeout_secs: 5,
        };
        assert!(matches!(
            RestStore::from_config(&config),
            Err(EngineError::ConfigNotFound { .. })
        ));
    }
}
