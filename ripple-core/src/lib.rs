//! Ripple Core
//!
//! This crate provides the core engine for the Ripple derived-state
//! synchronization library. It implements:
//!
//! - Declarative synchronizers for derived fields
//! - Dependency-graph resolution with cycle detection
//! - Change detection over field identity
//! - Memoized state cells that short-circuit unchanged states
//!
//! The crate is designed to be used as a native Rust library and, with the
//! `python` feature enabled, as a Python extension module via PyO3.
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `sync`: synchronizers, composition, and the stateful update cell
//! - `graph`: dependency-graph ordering and cycle detection
//!
//! # Example
//!
//! ```rust,ignore
//! use ripple_core::sync::{FieldSync, SyncCell, Synchronizer};
//!
//! let descriptors = vec![
//!     FieldSync::new("maxPage", vec!["recordsCount", "pageSize"], recompute_max_page),
//!     FieldSync::new("currentPage", vec!["maxPage"], clamp_current_page),
//! ];
//!
//! let synchronizer = Synchronizer::compose(descriptors)?;
//! let cell = SyncCell::new(synchronizer, initial_state);
//!
//! // On every state transition:
//! let next = cell.update(candidate_state);
//! ```

pub mod graph;
pub mod sync;

#[cfg(feature = "python")]
mod py;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition.
///
/// This function is called by Python when importing the module.
/// It registers all Python-exposed types and functions.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<py::PyStateSync>()?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
