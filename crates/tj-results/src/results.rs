//! Ordered collection of runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tj_core::{ModelRef, Real};

use crate::aggregate;
use crate::status::Status;
use crate::tabular::{self, ExportOptions};
use crate::trajectory::Trajectory;
use crate::validate;
use crate::warning::{EnsembleWarning, Warned};
use crate::{ResultsError, ResultsResult};

/// An ensemble of runs in run order.
///
/// Homogeneity is not enforced on construction; it is checked on demand and
/// before any operation that combines ensembles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Results {
    runs: Vec<Trajectory>,
}

/// Run metadata reachable through [`Results::first_run_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunField {
    Model,
    SolverName,
    ReturnCode,
    Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunFieldValue<'a> {
    Model(&'a ModelRef),
    SolverName(&'a str),
    ReturnCode(i32),
    Status(Status),
}

impl Results {
    pub fn new(runs: Vec<Trajectory>) -> Self {
        Self { runs }
    }

    pub fn from_run(run: Trajectory) -> Self {
        Self { runs: vec![run] }
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn runs(&self) -> &[Trajectory] {
        &self.runs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trajectory> {
        self.runs.iter()
    }

    pub fn into_runs(self) -> Vec<Trajectory> {
        self.runs
    }

    pub fn validate_model(&self) -> ResultsResult<bool> {
        validate::validate_model(&self.runs, None)
    }

    pub fn validate_solver(&self) -> ResultsResult<bool> {
        validate::validate_solver(&self.runs, None)
    }

    pub fn validate_title(&self) -> ResultsResult<String> {
        validate::validate_title(&self.runs)
    }

    /// Runs of `self` followed by runs of `other`.
    ///
    /// The combined ensemble is validated before it is built: runs of another
    /// model are an error and nothing is returned, runs of another solver only
    /// produce a warning.
    pub fn concatenate(&self, other: &Results) -> ResultsResult<Warned<Results>> {
        let combined = self.runs.iter().chain(other.runs.iter());
        if combined.clone().next().is_none() {
            return Ok(Warned::clean(Results::default()));
        }

        if let Some((expected, found)) = validate::first_model_mismatch(combined.clone(), None)? {
            return Err(ResultsError::ModelMismatch {
                expected: expected.name().to_string(),
                found: found.name().to_string(),
            });
        }
        let consistent_solver = validate::validate_solver(combined.clone(), None)?;

        let results = Results::new(combined.cloned().collect());
        if consistent_solver {
            Ok(Warned::clean(results))
        } else {
            Ok(Warned::with_warning(results, EnsembleWarning::MultipleSolvers))
        }
    }

    /// Run at `index`.
    pub fn at_index(&self, index: usize) -> ResultsResult<&Trajectory> {
        self.runs.get(index).ok_or(ResultsError::IndexOutOfBounds {
            index,
            len: self.runs.len(),
        })
    }

    /// Series `name` of run 0.
    ///
    /// Convenience for single-run results; on a larger ensemble the lookup
    /// still reads run 0 and carries an ambiguity warning.
    pub fn get_series(&self, name: &str) -> ResultsResult<Warned<&[Real]>> {
        let values = self.first()?.get(name)?;
        Ok(self.warn_if_ambiguous(values))
    }

    /// Metadata field of run 0, with the same ambiguity rule as
    /// [`Results::get_series`].
    pub fn first_run_field(&self, field: RunField) -> ResultsResult<Warned<RunFieldValue<'_>>> {
        let run = self.first()?;
        let value = match field {
            RunField::Model => RunFieldValue::Model(run.model()),
            RunField::SolverName => RunFieldValue::SolverName(run.solver_name()),
            RunField::ReturnCode => RunFieldValue::ReturnCode(run.return_code()),
            RunField::Status => RunFieldValue::Status(run.status()),
        };
        Ok(self.warn_if_ambiguous(value))
    }

    fn first(&self) -> ResultsResult<&Trajectory> {
        self.runs.first().ok_or(ResultsError::EmptyEnsemble)
    }

    fn warn_if_ambiguous<T>(&self, value: T) -> Warned<T> {
        if self.runs.len() > 1 {
            Warned::with_warning(
                value,
                EnsembleWarning::AmbiguousEnsembleAccess {
                    runs: self.runs.len(),
                },
            )
        } else {
            Warned::clean(value)
        }
    }

    /// Single-run results holding the per-index mean of every series.
    pub fn average_ensemble(&self) -> ResultsResult<Results> {
        aggregate::average(&self.runs).map(Results::from_run)
    }

    /// Single-run results holding the per-index standard deviation.
    pub fn stddev_ensemble(&self, ddof: usize) -> ResultsResult<Warned<Results>> {
        Ok(aggregate::stddev(&self.runs, ddof)?.map(Results::from_run))
    }

    /// Write one CSV table per run into a fresh directory; returns that
    /// directory.
    pub fn export_tabular(&self, options: &ExportOptions) -> ResultsResult<PathBuf> {
        tabular::export(self, options)
    }

    /// Load every table of an export directory, in run-index order.
    pub fn import_tabular(
        directory: &Path,
        model: &ModelRef,
        solver_name: &str,
    ) -> ResultsResult<Results> {
        tabular::import(directory, model, solver_name)
    }
}

impl From<Vec<Trajectory>> for Results {
    fn from(runs: Vec<Trajectory>) -> Self {
        Self::new(runs)
    }
}

impl FromIterator<Trajectory> for Results {
    fn from_iter<I: IntoIterator<Item = Trajectory>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Results {
    type Item = &'a Trajectory;
    type IntoIter = std::slice::Iter<'a, Trajectory>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}

impl IntoIterator for Results {
    type Item = Trajectory;
    type IntoIter = std::vec::IntoIter<Trajectory>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.into_iter()
    }
}
