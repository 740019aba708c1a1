//! Optimistic salary list.
//!
//! The salaries table in the dashboard applies status toggles and deletes to
//! its local copy first and commits them afterwards. When a commit fails the
//! board announces a reconcile and replaces its copy with a fresh fetch.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::{RwLock, broadcast};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{SalaryRecord, SalaryStatus};
use crate::store::{Collection, DataStore, fetch_all};

/// A change to a salary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SalaryCommand {
    /// Flip pending/paid.
    ToggleStatus {
        /// Salary id.
        id: String,
    },
    /// Remove the salary.
    Delete {
        /// Salary id.
        id: String,
    },
}

impl SalaryCommand {
    fn id(&self) -> &str {
        match self {
            SalaryCommand::ToggleStatus { id } | SalaryCommand::Delete { id } => id,
        }
    }
}

/// What the board reports to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A command was applied locally and committed.
    Committed(SalaryCommand),
    /// A commit failed and the local copy was re-fetched.
    Reconciled {
        /// The command whose commit failed.
        command: SalaryCommand,
        /// The commit error.
        reason: String,
    },
}

/// Local salary list with optimistic updates.
pub struct SalaryBoard {
    store: Arc<dyn DataStore>,
    rows: RwLock<Vec<SalaryRecord>>,
    events: broadcast::Sender<BoardEvent>,
}

impl SalaryBoard {
    /// Fetches the salaries and builds the board.
    pub async fn load(store: Arc<dyn DataStore>) -> EngineResult<Self> {
        let rows = fetch_all::<SalaryRecord>(store.as_ref(), Collection::Salaries).await?;
        let (events, _) = broadcast::channel(32);
        Ok(Self {
            store,
            rows: RwLock::new(rows),
            events,
        })
    }

    /// Current local rows.
    pub async fn salaries(&self) -> Vec<SalaryRecord> {
        self.rows.read().await.clone()
    }

    /// Subscribes to commit and reconcile notifications.
    pub fn events(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Replaces the local rows with the store's.
    pub async fn reload(&self) -> EngineResult<()> {
        let fresh = fetch_all::<SalaryRecord>(self.store.as_ref(), Collection::Salaries).await?;
        *self.rows.write().await = fresh;
        Ok(())
    }

    /// Applies `command` locally, then commits it.
    ///
    /// On commit failure the board reconciles with the store and the commit
    /// error is returned.
    pub async fn execute(&self, command: SalaryCommand) -> EngineResult<()> {
        let id = command.id().to_string();
        let toggled = self.apply_locally(&command).await?;

        let commit = match (&command, toggled) {
            (SalaryCommand::ToggleStatus { .. }, Some(status)) => self
                .store
                .update(Collection::Salaries, &id, json!({ "status": status }))
                .await
                .map(|_| ()),
            _ => self.store.delete(Collection::Salaries, &id).await,
        };

        match commit {
            Ok(()) => {
                info!(id = %id, command = ?command, "Committed salary change");
                let _ = self.events.send(BoardEvent::Committed(command));
                Ok(())
            }
            Err(err) => {
                warn!(id = %id, error = %err, "Salary commit failed, reconciling");
                let _ = self.events.send(BoardEvent::Reconciled {
                    command,
                    reason: err.to_string(),
                });
                if let Err(reload_err) = self.reload().await {
                    warn!(error = %reload_err, "Reconcile fetch failed");
                }
                Err(err)
            }
        }
    }

    /// Applies the command to the local rows. Returns the new status for toggles.
    async fn apply_locally(
        &self,
        command: &SalaryCommand,
    ) -> EngineResult<Option<SalaryStatus>> {
        let mut rows = self.rows.write().await;
        let position = rows
            .iter()
            .position(|r| r.id.as_deref() == Some(command.id()))
            .ok_or_else(|| EngineError::RecordNotFound {
                collection: Collection::Salaries.table_name().to_string(),
                id: command.id().to_string(),
            })?;

        match command {
            SalaryCommand::ToggleStatus { .. } => {
                let row = &mut rows[position];
                row.status = row.status.toggled();
                Ok(Some(row.status))
            }
            SalaryCommand::Delete { .. } => {
                rows.remove(position);
                Ok(None)
            }
        }
    }
}
