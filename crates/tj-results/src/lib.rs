//! tj-results: trajectories, ensembles and their statistics.
//!
//! A [`Trajectory`] is one simulation run; [`Results`] is an ordered ensemble
//! of runs that can be validated, concatenated, averaged and exported.

pub mod aggregate;
pub mod results;
pub mod status;
pub mod tabular;
pub mod trajectory;
pub mod validate;
pub mod warning;

use std::path::PathBuf;

use tj_core::CoreError;

pub use aggregate::EnsembleSummary;
pub use results::{Results, RunField, RunFieldValue};
pub use status::Status;
pub use tabular::ExportOptions;
pub use trajectory::{DEFAULT_SOLVER_NAME, Series, TIME, Trajectory, TrajectoryBuilder};
pub use warning::{EnsembleWarning, Warned};

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to create export directory: {path}")]
    ExportDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Results hold no runs")]
    EmptyEnsemble,

    #[error("Model mismatch: results contain runs of model '{found}', expected '{expected}'")]
    ModelMismatch { expected: String, found: String },

    #[error("Series not found: {name}")]
    SeriesNotFound { name: String },

    #[error("Trajectory has no \"time\" series")]
    MissingTime,

    #[error("Time series decreases at index {index}")]
    TimeNotMonotonic { index: usize },

    #[error("Series '{name}' has {actual} values, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate series name: {name}")]
    DuplicateSeries { name: String },

    #[error("Run {run} does not match the shape of run 0: {reason}")]
    ShapeMismatch { run: usize, reason: String },

    #[error("ddof ({ddof}) exceeds the number of runs ({runs})")]
    InvalidDdof { ddof: usize, runs: usize },

    #[error("Index out of bounds: {index} (len={len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("No status is mapped to return code {code}")]
    UnmappedReturnCode { code: i32 },

    #[error("Parse error in {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}
