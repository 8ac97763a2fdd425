//! State Contract
//!
//! The [`SyncState`] trait is the seam between the generic engine and a
//! host's concrete state type. It answers exactly two questions: "did this
//! field change between these two states?" and "are these two states the
//! same state?".
//!
//! Both questions are about identity, not structural equality. The engine
//! never inspects field values; it only ever asks whether a name points at
//! something different than it did before. An `Arc`-backed aggregate such as
//! [`Record`](super::Record) answers with pointer identity. A plain
//! `Clone + PartialEq` struct may answer with value equality instead, which
//! only widens the set of transitions treated as no-ops.

use std::fmt::Display;
use std::hash::Hash;

/// A state aggregate that can report field-level and whole-state changes.
///
/// Implementations are expected to be cheap to clone (aggregates built from
/// shared fields, or small value structs) since the synchronized cell caches
/// one copy of the last state it produced.
pub trait SyncState: Clone + Send + Sync + 'static {
    /// The name of one top-level field of the aggregate.
    type Key: Clone + Eq + Hash + Display + Send + Sync + 'static;

    /// Whether `key` names a different value in `self` than in `previous`.
    ///
    /// A field absent from both states reads as unchanged; a field present
    /// on only one side reads as changed.
    fn field_differs(&self, previous: &Self, key: &Self::Key) -> bool;

    /// Whether `self` and `other` are the same state.
    ///
    /// This is the short-circuit signal for [`SyncCell`](super::SyncCell):
    /// when it holds, the state is passed through untouched.
    fn same_state(&self, other: &Self) -> bool;
}
