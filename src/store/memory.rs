//! In-process row store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::{
    ChangeEvent, ChangeFilter, ChangeKind, Collection, DataStore, EVENT_CHANNEL_CAPACITY,
    Subscription, row_id,
};

/// A [`DataStore`] kept in memory.
///
/// Rows keep their insertion order. Rows created without an `id` get a UUID.
/// Writes can be switched off with [`InMemoryStore::set_read_only`] to
/// exercise failure paths.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<Collection, Vec<Value>>>,
    events: broadcast::Sender<ChangeEvent>,
    read_only: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            tables: RwLock::new(HashMap::new()),
            events,
            read_only: AtomicBool::new(false),
        }
    }

    /// Creates a store pre-filled with rows. No change events are sent.
    ///
    /// # Example
    ///
    /// ```
    /// use center_payroll::store::{Collection, InMemoryStore};
    /// use serde_json::json;
    ///
    /// let store = InMemoryStore::seeded([
    ///     (Collection::Students, vec![json!({"id": "s-1", "full_name": "مريم"})]),
    ///     (Collection::Profiles, vec![json!({"full_name": "خالد"})]),
    /// ]);
    /// store.set_read_only(true);
    /// ```
    pub fn seeded(data: impl IntoIterator<Item = (Collection, Vec<Value>)>) -> Self {
        let tables = data
            .into_iter()
            .map(|(collection, rows)| (collection, rows.into_iter().map(with_id).collect()))
            .collect();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            tables: RwLock::new(tables),
            events,
            read_only: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent write fail with a store error (or succeed again).
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self, collection: Collection, operation: &str) -> EngineResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(EngineError::store(
                collection.table_name(),
                operation,
                "store is read-only",
            ));
        }
        Ok(())
    }

    fn publish(&self, collection: Collection, kind: ChangeKind, id: &str) {
        // No receivers is fine: nobody is listening yet.
        let _ = self.events.send(ChangeEvent {
            collection,
            kind,
            id: Some(id.to_string()),
        });
    }
}

fn with_id(mut row: Value) -> Value {
    if row_id(&row).is_none() {
        if let Value::Object(map) = &mut row {
            map.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
    }
    row
}

fn not_found(collection: Collection, id: &str) -> EngineError {
    EngineError::RecordNotFound {
        collection: collection.table_name().to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn get_all(&self, collection: Collection) -> EngineResult<Vec<Value>> {
        let tables = self.tables.read().await;
        Ok(tables.get(&collection).cloned().unwrap_or_default())
    }

    async fn get_by_id(&self, collection: Collection, id: &str) -> EngineResult<Value> {
        let tables = self.tables.read().await;
        tables
            .get(&collection)
            .and_then(|rows| rows.iter().find(|r| row_id(r).as_deref() == Some(id)))
            .cloned()
            .ok_or_else(|| not_found(collection, id))
    }

    async fn create(&self, collection: Collection, row: Value) -> EngineResult<Value> {
        self.check_writable(collection, "create")?;
        if !row.is_object() {
            return Err(EngineError::store(
                collection.table_name(),
                "create",
                "row must be a JSON object",
            ));
        }

        let row = with_id(row);
        let id = row_id(&row).unwrap_or_default();
        {
            let mut tables = self.tables.write().await;
            let rows = tables.entry(collection).or_default();
            if rows.iter().any(|r| row_id(r).as_deref() == Some(id.as_str())) {
                return Err(EngineError::store(
                    collection.table_name(),
                    "create",
                    format!("duplicate id '{}'", id),
                ));
            }
            rows.push(row.clone());
        }

        self.publish(collection, ChangeKind::Insert, &id);
        Ok(row)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        changes: Value,
    ) -> EngineResult<Value> {
        self.check_writable(collection, "update")?;
        let Value::Object(changes) = changes else {
            return Err(EngineError::store(
                collection.table_name(),
                "update",
                "changes must be a JSON object",
            ));
        };

        let updated = {
            let mut tables = self.tables.write().await;
            let row = tables
                .get_mut(&collection)
                .and_then(|rows| {
                    rows.iter_mut()
                        .find(|r| row_id(r).as_deref() == Some(id))
                })
                .ok_or_else(|| not_found(collection, id))?;
            if let Value::Object(fields) = &mut *row {
                for (key, value) in changes {
                    if key != "id" {
                        fields.insert(key, value);
                    }
                }
            }
            row.clone()
        };

        self.publish(collection, ChangeKind::Update, id);
        Ok(updated)
    }

    async fn delete(&self, collection: Collection, id: &str) -> EngineResult<()> {
        self.check_writable(collection, "delete")?;
        {
            let mut tables = self.tables.write().await;
            let rows = tables
                .get_mut(&collection)
                .ok_or_else(|| not_found(collection, id))?;
            let before = rows.len();
            rows.retain(|r| row_id(r).as_deref() != Some(id));
            if rows.len() == before {
                return Err(not_found(collection, id));
            }
        }

        self.publish(collection, ChangeKind::Delete, id);
        Ok(())
    }

    fn subscribe(&self, collections: &[Collection], filter: ChangeFilter) -> Subscription {
        Subscription::new(collections, filter, self.events.subscribe())
    }
}
