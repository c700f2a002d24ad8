//! Python bindings
//!
//! Conditions and documents cross the boundary in their JSON form, through
//! Python's own `json` module.

use crate::condition::{self, Condition};
use crate::error::FilterError;
use crate::simplify;
use pyo3::prelude::*;
use serde_json::Value;

// ============================================================================
// Helper Functions
// ============================================================================

fn dumps(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    let json = PyModule::import(obj.py(), "json")?;
    let text: String = json.call_method1("dumps", (obj,))?.extract()?;
    Ok(text)
}

fn loads<'py>(py: Python<'py>, text: &str) -> PyResult<Bound<'py, PyAny>> {
    let json = PyModule::import(py, "json")?;
    json.call_method1("loads", (text,))
}

/// Decode and validate a condition given as plain Python data
fn to_condition(obj: &Bound<'_, PyAny>) -> PyResult<Condition> {
    Ok(Condition::from_json(&dumps(obj)?)?)
}

fn from_condition<'py>(py: Python<'py>, condition: &Condition) -> PyResult<Bound<'py, PyAny>> {
    loads(py, &condition.to_json()?)
}

fn to_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    let value = serde_json::from_str(&dumps(obj)?).map_err(FilterError::from)?;
    Ok(value)
}

// ============================================================================
// Python Functions
// ============================================================================

/// Simplify the top node of a condition
///
/// # Raises
/// ValueError if `condition` is not a valid condition
#[pyfunction]
#[pyo3(name = "simplify")]
fn py_simplify<'py>(condition: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    let simplified = simplify::simplify(&to_condition(condition)?);
    from_condition(condition.py(), &simplified)
}

/// Simplify every node of a condition, children first
#[pyfunction]
#[pyo3(name = "simplify_deep")]
fn py_simplify_deep<'py>(condition: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    let simplified = simplify::simplify_deep(&to_condition(condition)?);
    from_condition(condition.py(), &simplified)
}

/// Test a JSON-compatible value against a condition
///
/// # Example (Python)
/// ```python
/// check({"kind": "gte", "path": ["age"], "value": 18}, {"age": 30})  # True
/// ```
#[pyfunction]
#[pyo3(name = "check")]
fn py_check(condition: &Bound<'_, PyAny>, value: &Bound<'_, PyAny>) -> PyResult<bool> {
    Ok(condition::check(&to_condition(condition)?, &to_value(value)?))
}

/// Raise ValueError unless `condition` is a valid condition
#[pyfunction]
#[pyo3(name = "validate")]
fn py_validate(condition: &Bound<'_, PyAny>) -> PyResult<()> {
    to_condition(condition).map(|_| ())
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn filter_conditions(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_simplify, m)?)?;
    m.add_function(wrap_pyfunction!(py_simplify_deep, m)?)?;
    m.add_function(wrap_pyfunction!(py_check, m)?)?;
    m.add_function(wrap_pyfunction!(py_validate, m)?)?;
    Ok(())
}
