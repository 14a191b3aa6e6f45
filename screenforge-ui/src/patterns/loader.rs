//! Cancellable loads keyed by the current input identity.
//!
//! A view that loads a pattern (or selects a library component) may change
//! its inputs before the load resolves. Each new load supersedes the previous
//! one: the old task is cancelled and, should it still complete, its result
//! is discarded instead of being applied.

use super::definition::{PatternDefinition, PatternKey};
use super::registry::PatternRegistry;
use screenforge_core::Result;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Result of a load that may have been superseded.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Ready(T),
    Superseded,
}

impl<T> LoadOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// Handle for one started task.
#[derive(Debug, Clone)]
pub struct TaskTicket {
    generation: u64,
    token: CancellationToken,
}

impl TaskTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Keeps only the most recently started task alive.
#[derive(Debug, Default)]
pub struct LatestTaskGuard {
    generation: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
}

impl LatestTaskGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new task, cancelling whichever task was current.
    pub fn begin(&self) -> TaskTicket {
        let token = CancellationToken::new();
        let generation = {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(previous) = current.replace(token.clone()) {
                previous.cancel();
            }
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        TaskTicket { generation, token }
    }

    pub fn is_current(&self, ticket: &TaskTicket) -> bool {
        !ticket.token.is_cancelled() && self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Cancel the current task without starting another (the owner went away).
    pub fn cancel_all(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = current.take() {
            token.cancel();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Run `future` as the current task.
    pub async fn run<F, T>(&self, future: F) -> LoadOutcome<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin();
        self.run_with(&ticket, future).await
    }

    /// Run `future` under an already started ticket.
    pub async fn run_with<F, T>(&self, ticket: &TaskTicket, future: F) -> LoadOutcome<T>
    where
        F: Future<Output = T>,
    {
        let value = tokio::select! {
            _ = ticket.token.cancelled() => None,
            value = future => Some(value),
        };

        match value {
            Some(value) if self.is_current(ticket) => LoadOutcome::Ready(value),
            _ => {
                tracing::debug!(generation = ticket.generation, "discarding superseded load");
                LoadOutcome::Superseded
            }
        }
    }
}

/// Loads patterns for one view, discarding superseded results.
pub struct PatternLoader {
    registry: Arc<PatternRegistry>,
    guard: LatestTaskGuard,
}

impl PatternLoader {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry, guard: LatestTaskGuard::new() }
    }

    pub fn registry(&self) -> &Arc<PatternRegistry> {
        &self.registry
    }

    /// Load `key` with one retry after a cache clear.
    pub async fn load(&self, key: &PatternKey) -> LoadOutcome<Result<Arc<PatternDefinition>>> {
        self.guard.run(self.registry.load_with_retry(key)).await
    }

    /// Drop any in-flight load.
    pub fn cancel(&self) {
        self.guard.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn single_task_completes() {
        let guard = LatestTaskGuard::new();
        assert_eq!(guard.run(async { 7 }).await, LoadOutcome::Ready(7));
    }

    #[tokio::test]
    async fn newer_task_supersedes_older() {
        let guard = Arc::new(LatestTaskGuard::new());
        let (started_tx, started_rx) = tokio::sync::oneshot::channel();

        let slow = {
            let guard = guard.clone();
            tokio::spawn(async move {
                guard
                    .run(async move {
                        let _ = started_tx.send(());
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        "stale"
                    })
                    .await
            })
        };

        started_rx.await.unwrap();
        let fresh = guard.run(async { "fresh" }).await;

        assert_eq!(fresh, LoadOutcome::Ready("fresh"));
        assert!(slow.await.unwrap().is_superseded());
    }

    #[tokio::test]
    async fn result_finishing_after_supersede_is_discarded() {
        let guard = LatestTaskGuard::new();
        let ticket = guard.begin();
        let _newer = guard.begin();
        assert!(ticket.is_cancelled());
        assert!(guard.run_with(&ticket, async { 1 }).await.is_superseded());
    }

    #[tokio::test]
    async fn cancel_all_discards_in_flight_work() {
        let guard = LatestTaskGuard::new();
        let ticket = guard.begin();
        guard.cancel_all();
        assert!(!guard.is_current(&ticket));
    }

    #[tokio::test]
    async fn loader_returns_builtin_pattern() {
        let loader = PatternLoader::new(Arc::new(PatternRegistry::builtin()));
        let outcome = loader.load(&PatternKey::new("ONB_HERO_TOP", 2)).await;
        let definition = outcome.ready().unwrap().unwrap();
        assert_eq!(definition.variant, 2);
    }
}
