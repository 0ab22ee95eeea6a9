//! Debounced, cancellable multi-scope search aggregation.
//!
//! [`SearchAggregator`] turns a stream of keystrokes into grouped result
//! snapshots:
//!
//! 1. Every input supersedes the previous generation, dropping its in-flight
//!    fetches, and re-arms the debounce timer.
//! 2. When the timer fires, an empty term (or empty scope set) emits one
//!    empty snapshot. Otherwise the query fans out to one fetch per concrete
//!    scope.
//! 3. Completions are merged in arrival order, de-duplicated by item id,
//!    regrouped into canonical sections and emitted, one snapshot per
//!    completion. Failed scopes count as empty; cancelled ones are dropped.
//!
//! All state lives on one worker task, so the generation check and the
//! emit decision happen atomically.

pub mod generation;
pub mod merge;
mod worker;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::fetcher::Fetcher;
use crate::types::{Query, ResultSnapshot, Scope};

pub use generation::Generation;
pub use merge::MergedItems;

use generation::GenerationClock;
use worker::{Command, Worker};

/// Handle to a running search aggregator.
///
/// All methods return immediately; snapshots are delivered asynchronously to
/// the subscriber. Dropping the handle stops the worker and abandons any
/// pending work.
pub struct SearchAggregator {
    commands: mpsc::UnboundedSender<Command>,
    generation: Arc<AtomicU64>,
    /// Superseding commands sent so far; the generation each one will start.
    requested: AtomicU64,
    settled: watch::Receiver<u64>,
    shutdown: CancellationToken,
}

impl SearchAggregator {
    /// Start an aggregator over `fetcher` using the debounce delay from `config`.
    ///
    /// Must be called from within a tokio runtime; the worker is spawned on it.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid or no tokio
    /// runtime is available.
    pub fn new<F: Fetcher>(fetcher: F, config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Self::with_debounce(fetcher, config.debounce())
    }

    /// Start an aggregator with an explicit debounce delay.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if no tokio runtime is available.
    pub fn with_debounce<F: Fetcher>(fetcher: F, debounce: Duration) -> Result<Self, SearchError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            SearchError::Config("search aggregator requires a tokio runtime".into())
        })?;

        let (commands, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));
        let shutdown = CancellationToken::new();
        let clock = GenerationClock::new(Arc::clone(&generation));
        let (settled_tx, settled) = watch::channel(0);

        let worker = Worker::new(fetcher, debounce, rx, shutdown.clone(), clock, settled_tx);
        runtime.spawn(worker.run());

        Ok(Self {
            commands,
            generation,
            requested: AtomicU64::new(0),
            settled,
            shutdown,
        })
    }

    /// Record the latest desired query and restart the debounce timer.
    ///
    /// Cancels the pending timer and every fetch of the previous generation.
    pub fn on_input(&self, term: impl Into<String>, scopes: impl IntoIterator<Item = Scope>) {
        self.on_query(Query::new(term, scopes));
    }

    /// Same as [`Self::on_input`] with a prebuilt [`Query`].
    pub fn on_query(&self, query: Query) {
        self.requested.fetch_add(1, Ordering::AcqRel);
        self.send(Command::Input(query));
    }

    /// Register the single consumer of snapshots, replacing any previous one.
    ///
    /// The callback runs on the aggregator's worker task. It may call back
    /// into the aggregator but must not block. A panicking callback stops the
    /// worker: later commands are dropped and [`Self::is_running`] turns false.
    pub fn subscribe<C>(&self, callback: C)
    where
        C: FnMut(ResultSnapshot) + Send + 'static,
    {
        self.send(Command::Subscribe(Box::new(callback)));
    }

    /// Subscribe through an unbounded channel.
    ///
    /// Replaces any previous subscriber; a previously returned receiver sees
    /// the channel close.
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<ResultSnapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe(move |snapshot| {
            // A dropped receiver just means nobody is listening any more.
            let _ = tx.send(snapshot);
        });
        rx
    }

    /// Cancel the debounce timer and all in-flight fetches without starting
    /// new work.
    pub fn cancel_all(&self) {
        self.requested.fetch_add(1, Ordering::AcqRel);
        self.send(Command::CancelAll);
    }

    /// Wait until the most recent input or cancellation has nothing left
    /// pending: its debounce timer has fired or been cancelled and every
    /// fetch it started has completed.
    ///
    /// Snapshots for that request have been handed to the subscriber by the
    /// time this returns. Also returns if the worker has stopped.
    pub async fn settled(&self) {
        let target = self.requested.load(Ordering::Acquire);
        let mut settled = self.settled.clone();
        // An error means the worker is gone; nothing is pending then either.
        let _ = settled.wait_for(|generation| *generation >= target).await;
    }

    /// Whether the worker task is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// The generation most recently started by the worker.
    ///
    /// Lags behind calls that the worker has not processed yet.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("search worker is no longer running, command dropped");
        }
    }
}

impl Drop for SearchAggregator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemKind, SearchItem};

    struct EchoFetcher;

    impl Fetcher for EchoFetcher {
        async fn fetch(&self, term: &str, scope: Scope) -> Result<Vec<SearchItem>, SearchError> {
            let kind = match scope {
                Scope::Movies => ItemKind::FeatureMovie,
                Scope::Music => ItemKind::Song,
                Scope::Apps => ItemKind::Software,
                _ => ItemKind::Ebook,
            };
            Ok(vec![SearchItem::new(format!("{term}-{scope}"), kind, term)])
        }
    }

    #[test]
    fn new_outside_runtime_is_an_error() {
        let result = SearchAggregator::with_debounce(EchoFetcher, Duration::from_millis(10));
        let err = result.err().expect("no runtime should fail");
        assert!(err.to_string().contains("tokio runtime"));
    }

    #[tokio::test]
    async fn new_rejects_invalid_config() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(SearchAggregator::new(EchoFetcher, &config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn single_scope_emits_one_snapshot() {
        let aggregator = SearchAggregator::new(EchoFetcher, &SearchConfig::default())
            .expect("aggregator");
        let mut rx = aggregator.subscribe_channel();

        aggregator.on_input("abba", [Scope::Music]);
        let snapshot = rx.recv().await.expect("snapshot");

        assert_eq!(snapshot.labels(), vec!["Music"]);
        assert_eq!(snapshot.item_count(), 1);
        assert_eq!(aggregator.current_generation(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_subscriber_receives_snapshots() {
        let aggregator = SearchAggregator::with_debounce(EchoFetcher, Duration::from_millis(300))
            .expect("aggregator");
        let (tx, mut done) = mpsc::unbounded_channel();
        aggregator.subscribe(move |snapshot: ResultSnapshot| {
            let _ = tx.send(snapshot.labels());
        });

        aggregator.on_input("x", [Scope::Books]);
        assert_eq!(done.recv().await, Some(vec!["Books"]));
    }

    #[tokio::test(start_paused = true)]
    async fn settled_waits_for_last_request() {
        let aggregator = SearchAggregator::with_debounce(EchoFetcher, Duration::from_millis(300))
            .expect("aggregator");
        let mut rx = aggregator.subscribe_channel();
        aggregator.settled().await;

        aggregator.on_input("x", [Scope::Music, Scope::Apps]);
        aggregator.settled().await;
        assert_eq!(rx.try_recv().expect("first").item_count(), 1);
        assert_eq!(rx.try_recv().expect("second").item_count(), 2);

        aggregator.cancel_all();
        aggregator.settled().await;
        assert_eq!(aggregator.current_generation(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_delivery() {
        let aggregator = SearchAggregator::with_debounce(EchoFetcher, Duration::from_millis(300))
            .expect("aggregator");
        let mut rx = aggregator.subscribe_channel();
        aggregator.on_input("x", [Scope::Apps]);
        drop(aggregator);

        assert!(rx.recv().await.is_none());
    }
}
