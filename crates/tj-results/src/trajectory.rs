//! Single-run container.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tj_core::{ModelRef, Real, ensure_finite, first_decrease};

use crate::status::Status;
use crate::warning::{EnsembleWarning, Warned};
use crate::{ResultsError, ResultsResult};

/// Name of the reserved index series every trajectory carries.
pub const TIME: &str = "time";

pub const DEFAULT_SOLVER_NAME: &str = "Undefined solver name";

/// One named, ordered sequence of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Real>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Real>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Time series produced by one simulation run.
///
/// Series keep their insertion order, which is also the column order of the
/// tabular export. The `"time"` series is mandatory and non-decreasing, and
/// every other series has the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrajectory")]
pub struct Trajectory {
    series: Vec<Series>,
    model: ModelRef,
    solver_name: String,
    return_code: i32,
}

#[derive(Deserialize)]
struct RawTrajectory {
    series: Vec<Series>,
    model: ModelRef,
    solver_name: String,
    return_code: i32,
}

impl TryFrom<RawTrajectory> for Trajectory {
    type Error = ResultsError;

    fn try_from(raw: RawTrajectory) -> ResultsResult<Self> {
        Trajectory::new(raw.model, raw.solver_name, raw.return_code, raw.series)
    }
}

impl Trajectory {
    pub fn new(
        model: ModelRef,
        solver_name: impl Into<String>,
        return_code: i32,
        series: Vec<Series>,
    ) -> ResultsResult<Self> {
        check_series(&series)?;
        Ok(Self {
            series,
            model,
            solver_name: solver_name.into(),
            return_code,
        })
    }

    pub fn builder(model: impl Into<ModelRef>) -> TrajectoryBuilder {
        TrajectoryBuilder::new(model.into())
    }

    /// Output of an aggregation; `series` is derived from an already
    /// validated run, so the shape checks are skipped.
    pub(crate) fn synthetic(template: &Trajectory, series: Vec<Series>) -> Self {
        Self {
            series,
            model: template.model.clone(),
            solver_name: template.solver_name.clone(),
            return_code: Status::SUCCESS_CODE,
        }
    }

    pub fn get(&self, name: &str) -> ResultsResult<&[Real]> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.values.as_slice())
            .ok_or_else(|| ResultsError::SeriesNotFound {
                name: name.to_string(),
            })
    }

    pub fn time(&self) -> &[Real] {
        self.get(TIME).unwrap_or(&[])
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.time().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Series names in insertion order, `"time"` included.
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Real])> {
        self.series
            .iter()
            .map(|s| (s.name.as_str(), s.values.as_slice()))
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    pub fn solver_name(&self) -> &str {
        &self.solver_name
    }

    pub fn return_code(&self) -> i32 {
        self.return_code
    }

    pub fn status(&self) -> Status {
        Status::from_return_code(self.return_code)
    }

    /// Status for mapped return codes only.
    pub fn checked_status(&self) -> ResultsResult<Status> {
        Status::lookup(self.return_code).ok_or(ResultsError::UnmappedReturnCode {
            code: self.return_code,
        })
    }

    /// Positional access left over from when runs were nested one level
    /// deeper. Hands back the trajectory itself, never a series.
    pub fn legacy_index(&self, index: usize) -> Warned<&Self> {
        Warned::with_warning(self, EnsembleWarning::TrajectoryIntegerIndex { index })
    }
}

fn check_series(series: &[Series]) -> ResultsResult<()> {
    let time = series
        .iter()
        .find(|s| s.name == TIME)
        .ok_or(ResultsError::MissingTime)?;

    for &t in &time.values {
        ensure_finite(t, "time")?;
    }
    if let Some(index) = first_decrease(&time.values) {
        return Err(ResultsError::TimeNotMonotonic { index });
    }

    let mut seen = HashSet::with_capacity(series.len());
    for s in series {
        if !seen.insert(s.name.as_str()) {
            return Err(ResultsError::DuplicateSeries {
                name: s.name.clone(),
            });
        }
        if s.values.len() != time.values.len() {
            return Err(ResultsError::LengthMismatch {
                name: s.name.clone(),
                expected: time.values.len(),
                actual: s.values.len(),
            });
        }
    }
    Ok(())
}

/// Incremental construction of a [`Trajectory`].
#[derive(Debug, Clone)]
pub struct TrajectoryBuilder {
    model: ModelRef,
    solver_name: String,
    return_code: i32,
    series: Vec<Series>,
}

impl TrajectoryBuilder {
    pub fn new(model: ModelRef) -> Self {
        Self {
            model,
            solver_name: DEFAULT_SOLVER_NAME.to_string(),
            return_code: Status::SUCCESS_CODE,
            series: Vec::new(),
        }
    }

    pub fn solver(mut self, solver_name: impl Into<String>) -> Self {
        self.solver_name = solver_name.into();
        self
    }

    pub fn return_code(mut self, return_code: i32) -> Self {
        self.return_code = return_code;
        self
    }

    pub fn time(self, values: Vec<Real>) -> Self {
        self.series(TIME, values)
    }

    pub fn series(mut self, name: impl Into<String>, values: Vec<Real>) -> Self {
        self.series.push(Series::new(name, values));
        self
    }

    pub fn build(self) -> ResultsResult<Trajectory> {
        Trajectory::new(self.model, self.solver_name, self.return_code, self.series)
    }
}
