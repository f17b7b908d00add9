//! Python bindings for carton.
//!
//! This crate wires the archive core's state hooks into Python's object
//! persistence protocol, allowing you to:
//! - Pickle and unpickle native classes with `pickle.dumps` / `pickle.loads`
//! - Copy them with `copy.deepcopy`
//! - Read and write their encoded state directly as text
//!
//! Every exposed class implements `__reduce__` by pairing its registered
//! type name with its encoded state; the module-level [`unpickle`]
//! function is the single global entry point the pickle protocol calls to
//! reconstruct an instance from that pairing. The module ships two
//! reference classes, [`Pair`] and [`Node`], demonstrating the wiring for
//! flat and owned-nested state.

use std::sync::OnceLock;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use carton_archive::ArchiveError;
use carton_bridge::{BridgeError, Registry, StateHooks};
use serde::{Deserialize, Serialize};

// ============================================================================
// Restore Registry
// ============================================================================

/// Process-wide restore registry, built once on first use.
///
/// Written exactly once and only read afterwards; every restore call is a
/// stateless request/response against it.
static REGISTRY: OnceLock<Registry<Py<PyAny>>> = OnceLock::new();

fn registry() -> PyResult<&'static Registry<Py<PyAny>>> {
    if let Some(registry) = REGISTRY.get() {
        return Ok(registry);
    }
    let registry = build_registry().map_err(bridge_to_py_err)?;
    Ok(REGISTRY.get_or_init(|| registry))
}

fn build_registry() -> Result<Registry<Py<PyAny>>, BridgeError> {
    let mut registry = Registry::new();
    registry.register::<Pair, _>(Pair::TYPE_NAME, |pair| {
        Python::with_gil(|py| {
            Py::new(py, pair)
                .map(Py::into_any)
                .map_err(|err| BridgeError::handle(err.to_string()))
        })
    })?;
    registry.register::<Node, _>(Node::TYPE_NAME, |node| {
        Python::with_gil(|py| {
            Py::new(py, node)
                .map(Py::into_any)
                .map_err(|err| BridgeError::handle(err.to_string()))
        })
    })?;
    Ok(registry)
}

// ============================================================================
// Error Translation
// ============================================================================

/// Map a bridge failure onto Python's standard error channel.
///
/// Malformed state surfaces as `ValueError`, emit and handle failures as
/// `RuntimeError`. Nothing is suppressed or retried.
fn bridge_to_py_err(err: BridgeError) -> PyErr {
    match &err {
        BridgeError::State(state) => match state {
            ArchiveError::Malformed(_) | ArchiveError::TrailingContent => {
                PyValueError::new_err(err.to_string())
            }
            ArchiveError::Emit(_) | ArchiveError::NonUtf8(_) => {
                PyRuntimeError::new_err(err.to_string())
            }
        },
        BridgeError::UnknownType { .. } | BridgeError::DuplicateType { .. } => {
            PyValueError::new_err(err.to_string())
        }
        BridgeError::Handle(_) => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Build the `(callable, arguments)` pairing `__reduce__` must return:
/// the module-level [`unpickle`] function plus this instance's registered
/// type name and encoded state.
fn reduce_for_pickle<'py, T: StateHooks>(
    py: Python<'py>,
    type_name: &'static str,
    value: &T,
) -> PyResult<(Bound<'py, PyAny>, (&'static str, String))> {
    let state = value.produce_state().map_err(bridge_to_py_err)?;
    let module = PyModule::import(py, c"carton_python")?;
    let unpickle = module.getattr("unpickle")?;
    Ok((unpickle, (type_name, state)))
}

// ============================================================================
// Reference Classes
// ============================================================================

/// Picklable class with two integer fields.
#[pyclass(module = "carton_python")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    /// First component
    #[pyo3(get, set)]
    pub a: i64,
    /// Second component
    #[pyo3(get, set)]
    pub b: i64,
}

impl Pair {
    const TYPE_NAME: &'static str = "Pair";
}

#[pymethods]
impl Pair {
    #[new]
    fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// Encode this instance's full state as portable text.
    fn state(&self) -> PyResult<String> {
        self.produce_state().map_err(bridge_to_py_err)
    }

    /// Reconstruct an instance from encoded state.
    ///
    /// Raises `ValueError` if the state's field shape does not match.
    #[staticmethod]
    fn from_state(state: &str) -> PyResult<Self> {
        Self::restore_state(state).map_err(bridge_to_py_err)
    }

    fn __reduce__<'py>(
        &self,
        py: Python<'py>,
    ) -> PyResult<(Bound<'py, PyAny>, (&'static str, String))> {
        reduce_for_pickle(py, Self::TYPE_NAME, self)
    }

    fn __eq__(&self, other: &Self) -> bool {
        self == other
    }

    fn __repr__(&self) -> String {
        format!("Pair(a={}, b={})", self.a, self.b)
    }
}

/// Picklable class holding an owned nested child.
///
/// Demonstrates that nested owned state is reconstructed in full, not
/// left empty.
#[pyclass(module = "carton_python")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Label of this node
    #[pyo3(get, set)]
    pub label: String,
    child: Option<Box<Node>>,
}

impl Node {
    const TYPE_NAME: &'static str = "Node";
}

#[pymethods]
impl Node {
    #[new]
    #[pyo3(signature = (label, child=None))]
    fn new(label: String, child: Option<Node>) -> Self {
        Self {
            label,
            child: child.map(Box::new),
        }
    }

    /// The owned child node, if any.
    #[getter]
    fn child(&self) -> Option<Node> {
        self.child.as_deref().cloned()
    }

    #[setter]
    fn set_child(&mut self, child: Option<Node>) {
        self.child = child.map(Box::new);
    }

    /// Number of nodes in the chain, this one included.
    fn depth(&self) -> usize {
        let mut depth = 1;
        let mut cursor = self.child.as_deref();
        while let Some(node) = cursor {
            depth += 1;
            cursor = node.child.as_deref();
        }
        depth
    }

    /// Encode this instance's full state as portable text.
    fn state(&self) -> PyResult<String> {
        self.produce_state().map_err(bridge_to_py_err)
    }

    /// Reconstruct an instance from encoded state.
    ///
    /// Raises `ValueError` if the state's field shape does not match.
    #[staticmethod]
    fn from_state(state: &str) -> PyResult<Self> {
        Self::restore_state(state).map_err(bridge_to_py_err)
    }

    fn __reduce__<'py>(
        &self,
        py: Python<'py>,
    ) -> PyResult<(Bound<'py, PyAny>, (&'static str, String))> {
        reduce_for_pickle(py, Self::TYPE_NAME, self)
    }

    fn __eq__(&self, other: &Self) -> bool {
        self == other
    }

    fn __repr__(&self) -> String {
        format!("Node(label={:?}, depth={})", self.label, self.depth())
    }
}

// ============================================================================
// Module Entry Points
// ============================================================================

/// Restore a live instance from a (type name, encoded state) pairing.
///
/// This is the global entry point the pickle protocol calls during
/// reconstruction; every exposed class's `__reduce__` points here.
///
/// # Raises
/// * `ValueError` - If the type name is unregistered or the state is
///   malformed
#[pyfunction]
fn unpickle(type_name: &str, state: &str) -> PyResult<Py<PyAny>> {
    registry()?.restore(type_name, state).map_err(bridge_to_py_err)
}

/// Registered type names, in registration order.
#[pyfunction]
fn registered_types() -> PyResult<Vec<String>> {
    Ok(registry()?
        .type_names()
        .map(|name| name.to_string())
        .collect())
}

/// Python module definition.
#[pymodule]
pub fn carton_python(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Pair>()?;
    m.add_class::<Node>()?;
    m.add_function(wrap_pyfunction!(unpickle, m)?)?;
    m.add_function(wrap_pyfunction!(registered_types, m)?)?;

    // Module metadata
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Fail the import early if the registry cannot be built.
    registry()?;

    Ok(())
}
