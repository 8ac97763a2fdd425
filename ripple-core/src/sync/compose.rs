//! Synchronizer Composition
//!
//! Composition turns a flat collection of [`FieldSync`] descriptors into one
//! [`Synchronizer`] that runs every registered update in dependency order.
//!
//! # Construction (once)
//!
//! 1. Every descriptor contributes one edge per dependency: dependency →
//!    target field.
//!
//! 2. Synchronizers are grouped by target field, keeping the order in which
//!    descriptors for the same field were supplied.
//!
//! 3. The edge map is topologically sorted. Fields that only appear as
//!    scaffolding (no synchronizer of their own) influence the order but are
//!    dropped from it afterwards.
//!
//! 4. The ordered groups are flattened into a single execution list. Cyclic
//!    dependency declarations fail here, before any state is processed.
//!
//! # Invocation (per transition)
//!
//! The state is threaded through the execution list, each synchronizer
//! receiving the previous one's output, while all of them compare against
//! the same original previous state. A field recomputed early in the pass is
//! therefore visible as "changed" to every synchronizer after it, which is
//! what lets changes cascade transitively through derived fields in one
//! pass.

use indexmap::IndexMap;
use tracing::debug;

use crate::graph::{topo, GraphError};

use super::state::SyncState;
use super::synchronizer::Synchronizer;

/// A declarative descriptor binding one target field to the synchronizer
/// that maintains it.
///
/// Descriptors are constructed once, typically at setup time, and consumed
/// by [`Synchronizer::compose`].
pub struct FieldSync<S: SyncState> {
    key: S::Key,
    dependencies: Vec<S::Key>,
    synchronizer: Synchronizer<S>,
}

impl<S: SyncState> FieldSync<S> {
    /// Describe how `key` is derived: whenever one of `dependencies`
    /// changes, `update` recomputes the field.
    pub fn new<F>(key: S::Key, dependencies: Vec<S::Key>, update: F) -> Self
    where
        F: Fn(S) -> S + Send + Sync + 'static,
    {
        let synchronizer = Synchronizer::new(dependencies.clone(), update);

        Self {
            key,
            dependencies,
            synchronizer,
        }
    }

    /// Bind an already-built synchronizer to `key`.
    ///
    /// The synchronizer is trusted to guard itself; `dependencies` only
    /// feeds the ordering graph.
    pub fn from_synchronizer(
        key: S::Key,
        dependencies: Vec<S::Key>,
        synchronizer: Synchronizer<S>,
    ) -> Self {
        Self {
            key,
            dependencies,
            synchronizer,
        }
    }

    /// The field this descriptor maintains.
    pub fn key(&self) -> &S::Key {
        &self.key
    }

    /// The fields this descriptor's update reads.
    pub fn dependencies(&self) -> &[S::Key] {
        &self.dependencies
    }
}

impl<S: SyncState> Synchronizer<S> {
    /// Compose descriptors into a single synchronizer that runs every
    /// registered update in dependency order.
    ///
    /// Fails with [`GraphError::CycleDetected`] when the declared
    /// dependencies loop back on themselves. This is a setup-time error; a
    /// composed synchronizer never fails at run time.
    pub fn compose(descriptors: Vec<FieldSync<S>>) -> Result<Self, GraphError> {
        let mut edges: IndexMap<S::Key, Vec<S::Key>> = IndexMap::new();
        let mut for_field: IndexMap<S::Key, Vec<Synchronizer<S>>> = IndexMap::new();

        for descriptor in descriptors {
            let FieldSync {
                key,
                dependencies,
                synchronizer,
            } = descriptor;

            for_field.entry(key.clone()).or_default().push(synchronizer);

            for dependency in dependencies {
                edges.entry(dependency).or_default().push(key.clone());
            }
        }

        let order = topo::sort(&edges)?;

        let mut pipeline = Vec::new();
        for key in &order {
            if let Some(synchronizers) = for_field.swap_remove(key) {
                pipeline.extend(synchronizers);
            }
        }

        debug!(
            fields = order.len(),
            synchronizers = pipeline.len(),
            "composed state synchronizer"
        );

        Ok(Synchronizer::from_fn(move |state, previous| {
            let mut current = state;

            for synchronizer in &pipeline {
                current = synchronizer.run(current, previous);
            }

            current
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Triple {
        a: i32,
        b: i32,
        c: i32,
    }

    impl SyncState for Triple {
        type Key = &'static str;

        fn field_differs(&self, previous: &Self, key: &Self::Key) -> bool {
            match *key {
                "a" => self.a != previous.a,
                "b" => self.b != previous.b,
                "c" => self.c != previous.c,
                _ => false,
            }
        }

        fn same_state(&self, other: &Self) -> bool {
            self == other
        }
    }

    /// Descriptor that appends its tag to `log` when its update runs.
    fn logged(
        key: &'static str,
        dependencies: Vec<&'static str>,
        log: Arc<Mutex<Vec<&'static str>>>,
        update: impl Fn(Triple) -> Triple + Send + Sync + 'static,
    ) -> FieldSync<Triple> {
        FieldSync::new(key, dependencies, move |state| {
            log.lock().unwrap().push(key);
            update(state)
        })
    }

    #[test]
    fn empty_composition_passes_state_through() {
        let synchronizer = Synchronizer::compose(Vec::<FieldSync<Triple>>::new()).unwrap();

        let previous = Triple { a: 0, b: 0, c: 0 };
        let next = Triple { a: 1, b: 2, c: 3 };

        assert_eq!(synchronizer.run(next, &previous), next);
    }

    #[test]
    fn runs_synchronizers_in_dependency_order() {
        let log = Arc::new(Mutex::new(Vec::new()));

        // Declared deliberately out of order: c derives from b, b from a.
        let descriptors = vec![
            logged("c", vec!["b"], log.clone(), |state| Triple {
                c: state.b * 10,
                ..state
            }),
            logged("b", vec!["a"], log.clone(), |state| Triple {
                b: state.a + 1,
                ..state
            }),
        ];

        let synchronizer = Synchronizer::compose(descriptors).unwrap();

        let previous = Triple { a: 0, b: 1, c: 10 };
        let next = Triple { a: 5, b: 1, c: 10 };

        let result = synchronizer.run(next, &previous);

        assert_eq!(*log.lock().unwrap(), ["b", "c"]);
        assert_eq!(result, Triple { a: 5, b: 6, c: 60 });
    }

    #[test]
    fn change_made_mid_pass_triggers_later_synchronizer() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let descriptors = vec![
            logged("b", vec!["a"], log.clone(), |state| Triple {
                b: state.a * 2,
                ..state
            }),
            logged("c", vec!["b"], log.clone(), |state| Triple {
                c: state.b + 1,
                ..state
            }),
        ];

        let synchronizer = Synchronizer::compose(descriptors).unwrap();

        // Only `a` differs from the previous state; `b` changes mid-pass.
        let previous = Triple { a: 1, b: 2, c: 3 };
        let next = Triple { a: 4, b: 2, c: 3 };

        let result = synchronizer.run(next, &previous);

        assert_eq!(*log.lock().unwrap(), ["b", "c"]);
        assert_eq!(result, Triple { a: 4, b: 8, c: 9 });
    }

    #[test]
    fn untouched_dependency_skips_downstream_synchronizer() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let descriptors = vec![
            logged("b", vec!["a"], log.clone(), |state| state),
            logged("c", vec!["b"], log.clone(), |state| Triple {
                c: state.b + 1,
                ..state
            }),
        ];

        let synchronizer = Synchronizer::compose(descriptors).unwrap();

        // `a` changed, but b's update leaves `b` alone, so c stays quiet.
        let previous = Triple { a: 1, b: 2, c: 3 };
        let next = Triple { a: 9, b: 2, c: 3 };

        let result = synchronizer.run(next, &previous);

        assert_eq!(*log.lock().unwrap(), ["b"]);
        assert_eq!(result, next);
    }

    #[test]
    fn same_key_synchronizers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = log.clone();
        let second = log.clone();

        let descriptors = vec![
            FieldSync::new("b", vec!["a"], move |state: Triple| {
                first.lock().unwrap().push("first");
                Triple {
                    b: state.a + 1,
                    ..state
                }
            }),
            FieldSync::new("b", vec!["a"], move |state: Triple| {
                second.lock().unwrap().push("second");
                Triple {
                    b: state.b * 2,
                    ..state
                }
            }),
        ];

        let synchronizer = Synchronizer::compose(descriptors).unwrap();

        let previous = Triple { a: 0, b: 0, c: 0 };
        let next = Triple { a: 3, b: 0, c: 0 };

        let result = synchronizer.run(next, &previous);

        assert_eq!(*log.lock().unwrap(), ["first", "second"]);
        assert_eq!(result.b, 8);
    }

    #[test]
    fn rejects_cyclic_dependencies_at_composition_time() {
        let descriptors = vec![
            FieldSync::new("a", vec!["b"], |state: Triple| state),
            FieldSync::new("b", vec!["a"], |state: Triple| state),
        ];

        let err = Synchronizer::compose(descriptors).unwrap_err();

        assert_eq!(err.to_string(), "Cycle detected: b->a->b");
    }

    #[test]
    fn scaffolding_only_keys_still_order_the_pipeline() {
        let log = Arc::new(Mutex::new(Vec::new()));

        // `a` owns no synchronizer but both b and c hang off it; c also
        // depends on b, which fixes the relative order.
        let descriptors = vec![
            logged("c", vec!["a", "b"], log.clone(), |state| state),
            logged("b", vec!["a"], log.clone(), |state| state),
        ];

        let synchronizer = Synchronizer::compose(descriptors).unwrap();

        let previous = Triple { a: 0, b: 0, c: 0 };
        let next = Triple { a: 1, b: 0, c: 0 };

        synchronizer.run(next, &previous);

        assert_eq!(*log.lock().unwrap(), ["b", "c"]);
    }

    #[test]
    fn descriptor_exposes_its_declaration() {
        let descriptor = FieldSync::new("b", vec!["a", "c"], |state: Triple| state);

        assert_eq!(*descriptor.key(), "b");
        assert_eq!(descriptor.dependencies(), ["a", "c"]);
    }
}
