//! State Synchronization
//!
//! This module implements the synchronization engine that keeps derived
//! fields of a state aggregate consistent with the fields they are computed
//! from.
//!
//! # Concepts
//!
//! ## States
//!
//! A state is an opaque aggregate of named fields, immutable by convention:
//! nothing here mutates a state in place, and "this field changed" always
//! means "this field names a different value than it did in the previous
//! state". What counts as identity is defined per aggregate through the
//! [`SyncState`] trait.
//!
//! ## Synchronizers
//!
//! A [`Synchronizer`] is a state-transition function. The single-field form
//! guards one update function behind its declared dependency fields and only
//! runs it when at least one of them changed. The composed form chains many
//! single-field synchronizers in dependency order, so a field recomputed
//! early in a pass can trigger fields derived from it later in the same pass.
//!
//! ## Cells
//!
//! A [`SyncCell`] wraps a synchronizer together with the previously seen
//! state, so a host can feed every candidate state through one call site and
//! unchanged states fall straight through.
//!
//! # Implementation Notes
//!
//! Dependencies are declared, not discovered: each synchronizer names the
//! fields it reads up front, and the composition step resolves the induced
//! graph once, failing fast on cyclic declarations. This trades the
//! convenience of automatic tracking for a pipeline that is fixed at
//! composition time and costs nothing per transition beyond the field
//! comparisons themselves.

mod cell;
mod compose;
mod record;
mod state;
mod synchronizer;

pub use cell::SyncCell;
pub use compose::FieldSync;
pub use record::{Record, Value};
pub use state::SyncState;
pub use synchronizer::Synchronizer;
