//! Dependency Graph
//!
//! This module implements the dependency graph that orders derived-field
//! recomputation.
//!
//! # Overview
//!
//! The graph is a directed acyclic graph (DAG) over field names where an edge
//! from B to A means "A is derived from B": whenever B changes, A must be
//! recomputed, and only after B itself has settled.
//!
//! The graph is resolved exactly once, when a set of synchronizers is
//! composed. At that point the sorter produces a linear execution order and
//! rejects cyclic dependency declarations. Nothing graph-related happens per
//! state transition.
//!
//! # Design Decisions
//!
//! 1. Edges are stored in an insertion-ordered map (`IndexMap`) rather than a
//!    hash map. The relative order of unrelated fields is observable in the
//!    execution order, so it has to be deterministic and follow declaration
//!    order.
//!
//! 2. Cycles are reported with the full offending path (`a->b->a`), not just
//!    the fact that one exists. Dependency declarations are written by hand,
//!    and the path is what makes the mistake findable.

pub mod topo;

pub use topo::GraphError;
