//! Rust implementation of the drill timing optimizer.
//!
//! Assigns a speed and pre-action wait to every action of a multi-agent drill so
//! that passes and their receivers arrive together and nobody idles at the end
//! of an action.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

mod config;
pub mod interner;
pub mod logging;
mod models;
pub mod timing;

pub use config::{OptimizerConfig, PropagationMode, SyncMatching};
pub use models::{Action, ActionKind, ActionPath, Agent, Drill, Pace, Point};
pub use timing::{optimize, DrillOptimizer, OptimizeError, ScheduleReport};

fn to_py_err(e: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

fn run_optimizer(
    drill_json: &str,
    config: Option<OptimizerConfig>,
) -> PyResult<(Drill, ScheduleReport)> {
    let config = config.unwrap_or_default();
    let mut drill = Drill::from_json(drill_json).map_err(to_py_err)?;
    let optimizer = DrillOptimizer::new(&config).map_err(to_py_err)?;
    let report = optimizer.run(&mut drill).map_err(to_py_err)?;
    Ok((drill, report))
}

/// Annotate a drill with per-action speed and wait.
///
/// # Arguments
/// * `drill_json` - Drill description as JSON (`{"agents": [...]}`)
/// * `config` - Optimizer configuration (defaults if omitted)
///
/// # Returns
/// * The same drill as JSON with `speed` and `waitBefore` filled in
///
/// # Raises
/// * ValueError on malformed JSON, invalid configuration, duplicate agents or
///   circular pass dependencies
#[pyfunction]
#[pyo3(signature = (drill_json, config=None))]
fn optimize_drill(drill_json: &str, config: Option<OptimizerConfig>) -> PyResult<String> {
    let (drill, _) = run_optimizer(drill_json, config)?;
    drill.to_json().map_err(to_py_err)
}

/// Compute the timing report for a drill without returning the annotated drill.
///
/// # Returns
/// * JSON with per-action timings, synchronization links and makespan
#[pyfunction]
#[pyo3(signature = (drill_json, config=None))]
fn analyze_drill(drill_json: &str, config: Option<OptimizerConfig>) -> PyResult<String> {
    let (_, report) = run_optimizer(drill_json, config)?;
    report.to_json().map_err(to_py_err)
}

/// The drillsync.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<OptimizerConfig>()?;

    m.add_function(wrap_pyfunction!(optimize_drill, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_drill, m)?)?;

    Ok(())
}
