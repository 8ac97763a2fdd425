//! Synchronized State Cell
//!
//! A [`SyncCell`] is the stateful entry point of the engine. It owns the
//! previously seen state and runs a synchronizer against it on every
//! transition, so the host only ever hands over the candidate new state.
//!
//! # Behavior
//!
//! 1. A state identical to the previously seen one falls straight through:
//!    no synchronizer runs and the cache is untouched.
//!
//! 2. Otherwise the synchronizer runs against the cached previous state,
//!    and its result is both cached and returned. What the caller observes
//!    and what the next call compares against are always the same state.
//!
//! # Concurrency
//!
//! The previous-state slot is the only mutable state in the engine. It is
//! guarded by a mutex held for the duration of one `update` call, since the
//! read-compare-write sequence on the slot is not atomic. Hosts drive a cell
//! from one place; the lock makes a shared cell safe, not fast.

use parking_lot::Mutex;
use tracing::trace;

use super::state::SyncState;
use super::synchronizer::Synchronizer;

/// A stateful wrapper that remembers the previously seen state and feeds
/// every transition through a synchronizer.
///
/// # Example
///
/// ```rust,ignore
/// let cell = SyncCell::new(synchronizer, initial_state);
///
/// // On every state transition:
/// let synchronized = cell.update(candidate_state);
/// ```
pub struct SyncCell<S: SyncState> {
    synchronizer: Synchronizer<S>,

    /// Last state returned by `update`, the baseline for the next call's
    /// change detection.
    previous: Mutex<S>,
}

impl<S: SyncState> SyncCell<S> {
    /// Create a cell around `synchronizer`, with `initial` as the first
    /// baseline state.
    pub fn new(synchronizer: Synchronizer<S>, initial: S) -> Self {
        Self {
            synchronizer,
            previous: Mutex::new(initial),
        }
    }

    /// Feed one state transition through the synchronizer.
    ///
    /// Returns the incoming state untouched when it is the same state as
    /// the cached baseline. Otherwise returns the synchronizer's result,
    /// which also becomes the baseline for the next call.
    pub fn update(&self, state: S) -> S {
        let mut previous = self.previous.lock();

        if state.same_state(&previous) {
            trace!("state unchanged, skipping synchronizer");
            return state;
        }

        trace!("state changed, running synchronizer");
        let next = self.synchronizer.run(state, &previous);
        *previous = next.clone();

        next
    }

    /// Wrap a producer function so every state it returns is synchronized
    /// before the caller sees it.
    ///
    /// The cell is moved into the returned closure; the producer and the
    /// cell live and die together.
    pub fn wrap<A, F>(self, producer: F) -> impl Fn(A) -> S
    where
        F: Fn(A) -> S,
    {
        move |input| self.update(producer(input))
    }
}
