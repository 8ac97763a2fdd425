//! Python Bindings
//!
//! A standalone rendition of the engine over Python dict states, exposed as
//! the `StateSync` class. Field identity is Python object identity (`is`),
//! which matches the engine's contract exactly: small ints and interned
//! strings behave like values, everything else like references.
//!
//! Updaters are Python callables from dict to dict. They are composed at
//! construction time (including the cycle check); each `update` call runs
//! the ordered pipeline against the previously seen dict.

use indexmap::IndexMap;
use parking_lot::Mutex;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::graph::topo;

/// One pipeline stage: a target field's updater and the fields it reads.
struct Stage {
    dependencies: Vec<String>,
    update: Py<PyAny>,
}

/// Synchronized state updater over Python dict states.
#[pyclass(name = "StateSync")]
pub struct PyStateSync {
    /// Stages flattened into dependency order at construction time.
    pipeline: Vec<Stage>,

    /// Last state returned by `update`.
    previous: Mutex<Py<PyAny>>,
}

#[pymethods]
impl PyStateSync {
    /// Build an updater from `(target_key, dependency_keys, update)`
    /// triples and the initial state dict.
    ///
    /// Raises `ValueError` when the declared dependencies contain a cycle.
    #[new]
    fn new(
        descriptors: Vec<(String, Vec<String>, Py<PyAny>)>,
        initial: Py<PyAny>,
    ) -> PyResult<Self> {
        let mut edges: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut for_field: IndexMap<String, Vec<Stage>> = IndexMap::new();

        for (key, dependencies, update) in descriptors {
            for dependency in &dependencies {
                edges
                    .entry(dependency.clone())
                    .or_default()
                    .push(key.clone());
            }

            for_field.entry(key).or_default().push(Stage {
                dependencies,
                update,
            });
        }

        let order = topo::sort(&edges).map_err(|err| PyValueError::new_err(err.to_string()))?;

        let mut pipeline = Vec::new();
        for key in &order {
            if let Some(stages) = for_field.swap_remove(key) {
                pipeline.extend(stages);
            }
        }

        Ok(Self {
            pipeline,
            previous: Mutex::new(initial),
        })
    }

    /// Feed one state transition through the synchronizers.
    ///
    /// A state identical (`is`) to the previously seen one falls straight
    /// through. Otherwise the pipeline runs and its result is cached and
    /// returned.
    fn update(&self, py: Python<'_>, state: Py<PyAny>) -> PyResult<Py<PyAny>> {
        let mut previous = self.previous.lock();

        if state.as_ptr() == previous.as_ptr() {
            return Ok(state);
        }

        let baseline = previous.bind(py).clone();
        let mut current = state.into_bound(py);

        for stage in &self.pipeline {
            let mut changed = false;
            for key in &stage.dependencies {
                if !same_field(&current, &baseline, key)? {
                    changed = true;
                    break;
                }
            }

            if changed {
                current = stage.update.bind(py).call1((current,))?;
            }
        }

        let result = current.unbind();
        *previous = result.clone_ref(py);

        Ok(result)
    }

    fn __repr__(&self) -> String {
        format!("StateSync(synchronizers={})", self.pipeline.len())
    }
}

/// Compare one field by object identity. A field missing from both dicts
/// reads as unchanged.
fn same_field(
    current: &Bound<'_, PyAny>,
    previous: &Bound<'_, PyAny>,
    key: &str,
) -> PyResult<bool> {
    let current = field(current, key)?;
    let previous = field(previous, key)?;

    Ok(match (current, previous) {
        (Some(now), Some(before)) => now.as_ptr() == before.as_ptr(),
        (None, None) => true,
        _ => false,
    })
}

fn field<'py>(state: &Bound<'py, PyAny>, key: &str) -> PyResult<Option<Bound<'py, PyAny>>> {
    let dict = state.downcast::<PyDict>()?;
    dict.get_item(key)
}
