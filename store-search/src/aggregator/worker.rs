//! The single serialized context behind a [`super::SearchAggregator`].
//!
//! The worker owns every piece of mutable state: the latest query, the
//! debounce timer, the generation clock, the merged items and the
//! subscriber. Handles talk to it through a command channel, and fetch
//! futures are polled here too, so generation checks, merges and
//! emissions never interleave.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::generation::{Generation, GenerationClock};
use super::merge::MergedItems;
use crate::error::SearchError;
use crate::fetcher::Fetcher;
use crate::types::{Query, ResultSnapshot, Scope, SearchItem};

/// Receiver of result snapshots.
pub(crate) type Subscriber = Box<dyn FnMut(ResultSnapshot) + Send + 'static>;

/// Requests from aggregator handles.
pub(crate) enum Command {
    Input(Query),
    Subscribe(Subscriber),
    CancelAll,
}

/// Outcome of one scope's fetch, tagged with the generation that issued it.
struct FetchCompletion {
    generation: Generation,
    scope: Scope,
    outcome: Result<Vec<SearchItem>, SearchError>,
}

pub(crate) struct Worker<F> {
    fetcher: Arc<F>,
    debounce: Duration,
    commands: mpsc::UnboundedReceiver<Command>,
    shutdown: CancellationToken,
    timer: Pin<Box<Sleep>>,
    armed: bool,
    clock: GenerationClock,
    settled: watch::Sender<u64>,
    query: Query,
    items: MergedItems,
    in_flight: FuturesUnordered<BoxFuture<'static, FetchCompletion>>,
    subscriber: Option<Subscriber>,
}

impl<F: Fetcher> Worker<F> {
    pub(crate) fn new(
        fetcher: F,
        debounce: Duration,
        commands: mpsc::UnboundedReceiver<Command>,
        shutdown: CancellationToken,
        clock: GenerationClock,
        settled: watch::Sender<u64>,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            debounce,
            commands,
            shutdown,
            timer: Box::pin(tokio::time::sleep(Duration::ZERO)),
            armed: false,
            clock,
            settled,
            query: Query::default(),
            items: MergedItems::new(),
            in_flight: FuturesUnordered::new(),
            subscriber: None,
        }
    }

    /// Run until shutdown is requested or every handle is gone.
    ///
    /// Commands win over completions when both are ready, so a newer input
    /// always supersedes results that arrived at the same instant.
    pub(crate) async fn run(mut self) {
        debug!(
            fetcher = self.fetcher.name(),
            debounce_ms = self.debounce.as_millis() as u64,
            "search worker started"
        );

        loop {
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => break,

                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },

                () = self.timer.as_mut(), if self.armed => {
                    self.armed = false;
                    self.dispatch();
                }

                Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.handle_completion(completion);
                }
            }
            self.publish_settled();
        }

        self.in_flight.clear();
        debug!("search worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Input(query) => {
                let generation = self.supersede();
                trace!(%generation, term = %query.term, "input received");
                debug!(%generation, scopes = ?query.scopes, "debounce armed");
                self.query = query;
                self.timer.as_mut().reset(Instant::now() + self.debounce);
                self.armed = true;
            }
            Command::Subscribe(subscriber) => {
                if self.subscriber.replace(subscriber).is_some() {
                    debug!("subscriber replaced");
                }
            }
            Command::CancelAll => {
                let generation = self.supersede();
                self.armed = false;
                debug!(%generation, "all pending search work cancelled");
            }
        }
    }

    /// Advance the generation and drop every in-flight fetch.
    fn supersede(&mut self) -> Generation {
        let dropped = self.in_flight.len();
        self.in_flight.clear();
        if dropped > 0 {
            debug!(dropped, "in-flight fetches cancelled");
        }
        self.clock.advance()
    }

    /// The debounce timer fired: start a fresh result set for the current query.
    fn dispatch(&mut self) {
        let generation = self.clock.current();
        self.items.clear();

        let scopes = self.query.expanded_scopes();
        if self.query.term.is_empty() || scopes.is_empty() {
            debug!(%generation, "nothing to fetch, emitting empty snapshot");
            self.emit(ResultSnapshot::empty());
            return;
        }

        debug!(%generation, fan_out = scopes.len(), "dispatching scope fetches");
        for scope in scopes {
            let fetcher = Arc::clone(&self.fetcher);
            let term = self.query.term.clone();
            self.in_flight.push(
                async move {
                    let outcome = fetcher.fetch(&term, scope).await;
                    FetchCompletion {
                        generation,
                        scope,
                        outcome,
                    }
                }
                .boxed(),
            );
        }
    }

    fn handle_completion(&mut self, completion: FetchCompletion) {
        let FetchCompletion {
            generation,
            scope,
            outcome,
        } = completion;

        if !self.clock.is_current(generation) {
            debug!(%generation, %scope, "discarding stale completion");
            return;
        }
        // Unreachable while every input advances the generation; kept as a guard.
        if !self.query.accepts(scope) {
            debug!(%generation, %scope, "scope no longer selected, discarding");
            return;
        }

        let items = match outcome {
            Ok(items) => items,
            Err(err) if err.is_cancelled() => {
                debug!(%generation, %scope, "fetch cancelled");
                return;
            }
            Err(err) => {
                warn!(
                    %scope,
                    fetcher = self.fetcher.name(),
                    error = %err,
                    "scope fetch failed, treating as empty"
                );
                Vec::new()
            }
        };

        let added = self.items.merge(items);
        debug!(%generation, %scope, added, total = self.items.len(), "merged scope results");
        let snapshot = self.items.snapshot();
        self.emit(snapshot);
    }

    /// Record the current generation as finished once nothing is pending.
    fn publish_settled(&self) {
        if self.armed || !self.in_flight.is_empty() {
            return;
        }
        let current = self.clock.current().value();
        self.settled.send_if_modified(|settled| {
            if *settled == current {
                return false;
            }
            *settled = current;
            true
        });
    }

    fn emit(&mut self, snapshot: ResultSnapshot) {
        match self.subscriber.as_mut() {
            Some(subscriber) => subscriber(snapshot),
            None => debug!("no subscriber, snapshot dropped"),
        }
    }
}
