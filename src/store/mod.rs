//! Row store abstraction.
//!
//! The dashboard persists everything in a hosted table store. [`DataStore`]
//! is the seam between the engine and that store: rows are JSON objects
//! carrying an `id`, addressed by [`Collection`], and every write is announced
//! to subscribers as a [`ChangeEvent`].
//!
//! Two implementations are provided:
//! - [`InMemoryStore`] for tests and local runs;
//! - [`RestStore`] for a PostgREST-style HTTP endpoint.

mod memory;
mod rest;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::error::{EngineError, EngineResult};

pub use memory::InMemoryStore;
pub use rest::RestStore;

/// Capacity of the change-event channel shared by all subscribers.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A table in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    /// Enrolled students.
    Students,
    /// Staff profiles, teachers included.
    Profiles,
    /// Classes and their assigned teacher.
    Classes,
    /// Daily teacher attendance.
    TeacherAttendance,
    /// Salary payouts.
    Salaries,
    /// Payments received from students.
    StudentExpenses,
    /// Operating expenses.
    OtherExpenses,
    /// Student subscriptions.
    Subscriptions,
    /// Branches.
    Centers,
    /// Sales staff.
    SalesTeam,
    /// Lesson videos.
    Videos,
}

impl Collection {
    /// The collections the finance views are computed from.
    pub const FINANCE: [Collection; 3] = [
        Collection::StudentExpenses,
        Collection::Salaries,
        Collection::OtherExpenses,
    ];

    /// The table name used by the hosted store.
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Profiles => "profiles",
            Collection::Classes => "classes",
            Collection::TeacherAttendance => "teacherAttendance",
            Collection::Salaries => "salaries",
            Collection::StudentExpenses => "studentExpenses",
            Collection::OtherExpenses => "otherExpenses",
            Collection::Subscriptions => "subscriptions",
            Collection::Centers => "centers",
            Collection::SalesTeam => "salesTeam",
            Collection::Videos => "videos",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A row was created.
    Insert,
    /// A row was modified.
    Update,
    /// A row was removed.
    Delete,
}

/// Which change kinds a subscription wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeFilter {
    /// Every change kind.
    #[default]
    All,
    /// A single change kind.
    Only(ChangeKind),
}

impl ChangeFilter {
    /// Returns true if `kind` passes the filter.
    pub fn matches(&self, kind: ChangeKind) -> bool {
        match self {
            ChangeFilter::All => true,
            ChangeFilter::Only(wanted) => *wanted == kind,
        }
    }
}

/// A change to one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The table that changed.
    pub collection: Collection,
    /// The kind of change.
    pub kind: ChangeKind,
    /// Id of the changed row. `None` means "some rows changed", which is what
    /// a subscriber sees after falling behind the channel.
    pub id: Option<String>,
}

/// A filtered stream of change events.
///
/// Events for other collections or change kinds are skipped. A subscriber
/// that falls behind receives one event without an id instead of the events
/// it missed.
#[derive(Debug)]
pub struct Subscription {
    collections: Vec<Collection>,
    filter: ChangeFilter,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub(crate) fn new(
        collections: &[Collection],
        filter: ChangeFilter,
        receiver: broadcast::Receiver<ChangeEvent>,
    ) -> Self {
        Self {
            collections: collections.to_vec(),
            filter,
            receiver,
        }
    }

    fn wants(&self, event: &ChangeEvent) -> bool {
        self.collections.contains(&event.collection) && self.filter.matches(event.kind)
    }

    fn lagged_event(&self, skipped: u64) -> Option<ChangeEvent> {
        tracing::warn!(skipped, "Change subscriber lagged behind");
        self.collections.first().map(|collection| ChangeEvent {
            collection: *collection,
            kind: ChangeKind::Update,
            id: None,
        })
    }

    /// Waits for the next matching event. Returns `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => return self.lagged_event(skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next matching event that is already queued, if any.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(skipped)) => return self.lagged_event(skipped),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

/// Asynchronous access to the row store.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Every row of `collection`.
    async fn get_all(&self, collection: Collection) -> EngineResult<Vec<Value>>;

    /// The row with `id`, or [`EngineError::RecordNotFound`].
    async fn get_by_id(&self, collection: Collection, id: &str) -> EngineResult<Value>;

    /// Inserts a row and returns it as stored (with its id).
    async fn create(&self, collection: Collection, row: Value) -> EngineResult<Value>;

    /// Merges `changes` into the row with `id` and returns the stored row.
    async fn update(&self, collection: Collection, id: &str, changes: Value)
    -> EngineResult<Value>;

    /// Removes the row with `id`.
    async fn delete(&self, collection: Collection, id: &str) -> EngineResult<()>;

    /// Subscribes to changes of `collections` that pass `filter`.
    fn subscribe(&self, collections: &[Collection], filter: ChangeFilter) -> Subscription;
}

/// Fetches a collection and deserializes every row as `T`.
///
/// Rows that cannot be read as `T` are skipped with a warning; numeric fields
/// are already parsed leniently by the models.
pub async fn fetch_all<T: DeserializeOwned>(
    store: &dyn DataStore,
    collection: Collection,
) -> EngineResult<Vec<T>> {
    let rows = store.get_all(collection).await?;
    let total = rows.len();
    let parsed: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(collection = %collection, error = %err, "Skipping unreadable row");
                None
            }
        })
        .collect();
    tracing::debug!(
        collection = %collection,
        rows = total,
        parsed = parsed.len(),
        "Fetched collection"
    );
    Ok(parsed)
}

/// Fetches one row and deserializes it as `T`.
pub async fn fetch_one<T: DeserializeOwned>(
    store: &dyn DataStore,
    collection: Collection,
    id: &str,
) -> EngineResult<T> {
    let row = store.get_by_id(collection, id).await?;
    serde_json::from_value(row)
        .map_err(|e| EngineError::store(collection.table_name(), "decode", e.to_string()))
}

/// Serializes `value` into a row for `collection`.
pub fn to_row<T: Serialize>(collection: Collection, value: &T) -> EngineResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| EngineError::store(collection.table_name(), "encode", e.to_string()))
}

/// Reads the `id` field of a row as a string.
pub fn row_id(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_names_match_store() {
        assert_eq!(Collection::TeacherAttendance.table_name(), "teacherAttendance");
        assert_eq!(Collection::StudentExpenses.to_string(), "studentExpenses");
        assert_eq!(
            serde_json::to_value(Collection::OtherExpenses).unwrap(),
            json!("otherExpenses")
        );
    }

    #[test]
    fn test_change_filter() {
        assert!(ChangeFilter::All.matches(ChangeKind::Delete));
        assert!(ChangeFilter::Only(ChangeKind::Insert).matches(ChangeKind::Insert));
        assert!(!ChangeFilter::Only(ChangeKind::Insert).matches(ChangeKind::Update));
    }

    #[test]
    fn test_row_id_accepts_strings_and_numbers() {
        assert_eq!(row_id(&json!({"id": "a"})), Some("a".to_string()));
        assert_eq!(row_id(&json!({"id": 7})), Some("7".to_string()));
        assert_eq!(row_id(&json!({"id": ""})), None);
        assert_eq!(row_id(&json!({"name": "x"})), None);
    }

    #[tokio::test]
    async fn test_subscription_skips_other_collections_and_kinds() {
        let (sender, receiver) = broadcast::channel(8);
        let mut subscription = Subscription::new(
            &[Collection::Salaries],
            ChangeFilter::Only(ChangeKind::Update),
            receiver,
        );

        for event in [
            ChangeEvent {
                collection: Collection::Students,
                kind: ChangeKind::Update,
                id: Some("s".to_string()),
            },
            ChangeEvent {
                collection: Collection::Salaries,
                kind: ChangeKind::Insert,
                id: Some("x".to_string()),
            },
            ChangeEvent {
                collection: Collection::Salaries,
                kind: ChangeKind::Update,
                id: Some("y".to_string()),
            },
        ] {
            sender.send(event).unwrap();
        }

        let event = subscription.recv().await.unwrap();
        assert_eq!(event.id.as_deref(), Some("y"));
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber_gets_catch_all_event() {
        let (sender, receiver) = broadcast::channel(2);
        let mut subscription = Subscription::new(&[Collection::Salaries], ChangeFilter::All, receiver);
        for i in 0..5 {
            sender
                .send(ChangeEvent {
                    collection: Collection::Salaries,
                    kind: ChangeKind::Insert,
                    id: Some(i.to_string()),
                })
                .unwrap();
        }
        let event = subscription.recv().await.unwrap();
        assert_eq!(event.id, None);
        assert_eq!(event.collection, Collection::Salaries);
    }

    #[tokio::test]
    async fn test_closed_channel_ends_subscription() {
        let (sender, receiver) = broadcast::channel::<ChangeEvent>(2);
        let mut subscription = Subscription::new(&[Collection::Salaries], ChangeFilter::All, receiver);
        drop(sender);
        assert!(subscription.recv().await.is_none());
    }
}
