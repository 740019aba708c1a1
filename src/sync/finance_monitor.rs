//! Keeps the finance summary current as the store changes.
//!
//! Every refresh takes a new generation number before fetching. A finished
//! refresh publishes only if no newer refresh has started meanwhile, so a slow
//! fetch can never overwrite a newer result. Change events that arrive in a
//! burst are drained and handled as one refresh.

use std::future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Interval;
use tracing::{debug, info, warn};

use crate::calculation::MonthlyRollup;
use crate::error::EngineResult;
use crate::models::PayMonth;
use crate::services::fetch_finance_inputs;
use crate::store::{ChangeFilter, Collection, DataStore, Subscription};

/// What caused a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// One or more store changes; `coalesced` counts the events handled.
    Change {
        /// Collection of the first event in the burst.
        collection: Collection,
        /// Number of events folded into this refresh.
        coalesced: usize,
    },
    /// An explicit request.
    Manual,
    /// The periodic timer.
    Timer,
    /// The month or branch being watched changed.
    ScopeChanged,
}

/// The published finance figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceSnapshot {
    /// Generation of the refresh that produced this snapshot.
    pub generation: u64,
    /// Month roll-up for the watched scope.
    pub rollup: MonthlyRollup,
    /// All-time vault balance.
    pub vault: Decimal,
}

#[derive(Debug, Clone)]
struct Scope {
    period: PayMonth,
    branch: Option<String>,
}

/// Recomputes the monthly roll-up and vault balance on demand or on change.
pub struct FinanceMonitor {
    store: Arc<dyn DataStore>,
    scope: RwLock<Scope>,
    generation: AtomicU64,
    snapshots: watch::Sender<Option<FinanceSnapshot>>,
}

/// Handle to a running monitor loop.
pub struct MonitorHandle {
    manual: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Asks the loop for a refresh. Returns false if the loop has stopped.
    pub async fn request_refresh(&self) -> bool {
        self.manual.send(()).await.is_ok()
    }

    /// Stops the loop. Refreshes already in flight still finish.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl FinanceMonitor {
    /// Creates a monitor for `period`, optionally scoped to one branch.
    pub fn new(store: Arc<dyn DataStore>, period: PayMonth, branch: Option<String>) -> Arc<Self> {
        let (snapshots, _) = watch::channel(None);
        Arc::new(Self {
            store,
            scope: RwLock::new(Scope { period, branch }),
            generation: AtomicU64::new(0),
            snapshots,
        })
    }

    /// Receiver of published snapshots; `None` until the first refresh lands.
    pub fn snapshots(&self) -> watch::Receiver<Option<FinanceSnapshot>> {
        self.snapshots.subscribe()
    }

    /// The latest published snapshot.
    pub fn latest(&self) -> Option<FinanceSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// The generation of the most recently started refresh.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Changes the watched month or branch and refreshes.
    pub async fn set_scope(&self, period: PayMonth, branch: Option<String>) -> EngineResult<bool> {
        {
            let mut scope = self.scope.write().await;
            scope.period = period;
            scope.branch = branch;
        }
        self.refresh(RefreshTrigger::ScopeChanged).await
    }

    /// Fetches the finance collections and publishes a new snapshot.
    ///
    /// Returns `Ok(false)` when the result was discarded because a newer
    /// refresh started while this one was fetching.
    pub async fn refresh(&self, trigger: RefreshTrigger) -> EngineResult<bool> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let scope = self.scope.read().await.clone();
        debug!(generation, trigger = ?trigger, period = %scope.period, "Refreshing finance summary");

        let inputs = fetch_finance_inputs(self.store.as_ref()).await?;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding stale finance refresh");
            return Ok(false);
        }

        let snapshot = FinanceSnapshot {
            generation,
            rollup: inputs.rollup(scope.period, scope.branch.as_deref()),
            vault: inputs.vault(),
        };

        let published = self.snapshots.send_if_modified(|current| {
            let newer_published = current.as_ref().is_some_and(|c| c.generation > generation);
            if newer_published || self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = Some(snapshot);
            true
        });

        if published {
            info!(generation, trigger = ?trigger, "Published finance summary");
        }
        Ok(published)
    }

    /// Runs the refresh loop in the background.
    ///
    /// The loop subscribes to the three finance collections and refreshes on
    /// changes, on [`MonitorHandle::request_refresh`], and every `interval`
    /// when one is given (the first tick fires immediately).
    pub fn spawn(self: &Arc<Self>, interval: Option<Duration>) -> MonitorHandle {
        let subscription = self
            .store
            .subscribe(&Collection::FINANCE, ChangeFilter::All);
        let (manual, requests) = mpsc::channel(8);
        let ticker = interval.map(tokio::time::interval);
        let task = tokio::spawn(Arc::clone(self).run(subscription, requests, ticker));
        MonitorHandle { manual, task }
    }

    async fn run(
        self: Arc<Self>,
        mut subscription: Subscription,
        mut requests: mpsc::Receiver<()>,
        mut ticker: Option<Interval>,
    ) {
        loop {
            let trigger = tokio::select! {
                event = subscription.recv() => match event {
                    Some(event) => {
                        let mut coalesced = 1;
                        while subscription.try_recv().is_some() {
                            coalesced += 1;
                        }
                        RefreshTrigger::Change { collection: event.collection, coalesced }
                    }
                    None => break,
                },
                request = requests.recv() => match request {
                    Some(()) => RefreshTrigger::Manual,
                    None => break,
                },
                _ = tick(&mut ticker) => RefreshTrigger::Timer,
            };

            let monitor = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(err) = monitor.refresh(trigger).await {
                    warn!(error = %err, "Finance refresh failed");
                }
            });
        }
        debug!("Finance monitor loop stopped");
    }
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending::<()>().await,
    }
}
