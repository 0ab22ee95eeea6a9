//! Monotonic generation tokens for discarding superseded work.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one search request. Later requests carry larger values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner of the current generation.
///
/// Only the worker advances the clock. The value is mirrored into a shared
/// atomic so handles can observe it without a round trip.
#[derive(Debug)]
pub(crate) struct GenerationClock {
    current: Generation,
    published: Arc<AtomicU64>,
}

impl GenerationClock {
    pub(crate) fn new(published: Arc<AtomicU64>) -> Self {
        let current = Generation(published.load(Ordering::Acquire));
        Self { current, published }
    }

    pub(crate) fn current(&self) -> Generation {
        self.current
    }

    /// Supersede the current generation. Every older token becomes stale.
    pub(crate) fn advance(&mut self) -> Generation {
        self.current = self.current.next();
        self.published.store(self.current.0, Ordering::Release);
        self.current
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        generation == self.current
    }
}
