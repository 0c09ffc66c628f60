//! Cross-run statistics.
//!
//! Every statistic is a fresh [`Trajectory`] whose `"time"` is copied from run
//! 0 and whose other series hold one reduced value per time index. Inputs are
//! only borrowed. Series are reduced in parallel; within a series the runs are
//! folded in run order, so repeated calls give bit-identical output.

use rayon::prelude::*;
use tj_core::Real;

use crate::trajectory::{Series, TIME, Trajectory};
use crate::warning::{EnsembleWarning, Warned};
use crate::{ResultsError, ResultsResult};

/// Mean and standard deviation of one ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleSummary {
    pub mean: Trajectory,
    pub stddev: Trajectory,
    /// Delta degrees of freedom actually used for `stddev`.
    pub ddof: usize,
}

/// Per-index arithmetic mean across runs.
pub fn average(runs: &[Trajectory]) -> ResultsResult<Trajectory> {
    let aligned = Aligned::new(runs)?;
    let means = aligned.means();
    Ok(aligned.assemble(means))
}

/// Per-index standard deviation across runs with divisor `N - ddof`.
///
/// `ddof == N` would divide by zero; it is replaced by 0 and reported as a
/// warning. `ddof > N` is an error.
pub fn stddev(runs: &[Trajectory], ddof: usize) -> ResultsResult<Warned<Trajectory>> {
    Ok(summary(runs, ddof)?.map(|summary| summary.stddev))
}

/// Mean and standard deviation in one pass over the ensemble.
pub fn summary(runs: &[Trajectory], ddof: usize) -> ResultsResult<Warned<EnsembleSummary>> {
    let aligned = Aligned::new(runs)?;
    let (ddof, warning) = effective_ddof(ddof, runs.len())?;

    let means = aligned.means();
    let stddevs = aligned.stddevs(&means, ddof);
    let summary = EnsembleSummary {
        mean: aligned.assemble(means),
        stddev: aligned.assemble(stddevs),
        ddof,
    };

    Ok(match warning {
        Some(warning) => Warned::with_warning(summary, warning),
        None => Warned::clean(summary),
    })
}

fn effective_ddof(
    ddof: usize,
    runs: usize,
) -> ResultsResult<(usize, Option<EnsembleWarning>)> {
    if ddof == runs {
        Ok((
            0,
            Some(EnsembleWarning::DdofCoerced {
                requested: ddof,
                runs,
            }),
        ))
    } else if ddof > runs {
        Err(ResultsError::InvalidDdof { ddof, runs })
    } else {
        Ok((ddof, None))
    }
}

/// Run 0's non-time series, each paired with the matching slice of every run.
struct Aligned<'a> {
    template: &'a Trajectory,
    runs: usize,
    columns: Vec<Column<'a>>,
}

struct Column<'a> {
    per_run: Vec<&'a [Real]>,
}

impl<'a> Aligned<'a> {
    fn new(runs: &'a [Trajectory]) -> ResultsResult<Self> {
        let template = runs.first().ok_or(ResultsError::EmptyEnsemble)?;
        let expected_len = template.len();

        let mut columns = Vec::new();
        for series in template.series().iter().filter(|s| s.name != TIME) {
            let mut per_run = Vec::with_capacity(runs.len());
            for (run_index, run) in runs.iter().enumerate() {
                let values = run.get(&series.name).map_err(|_| ResultsError::ShapeMismatch {
                    run: run_index,
                    reason: format!("missing series '{}'", series.name),
                })?;
                if values.len() != expected_len {
                    return Err(ResultsError::ShapeMismatch {
                        run: run_index,
                        reason: format!(
                            "series '{}' has {} values, expected {}",
                            series.name,
                            values.len(),
                            expected_len
                        ),
                    });
                }
                per_run.push(values);
            }
            columns.push(Column { per_run });
        }

        Ok(Self {
            template,
            runs: runs.len(),
            columns,
        })
    }

    fn means(&self) -> Vec<Vec<Real>> {
        let n = self.runs as Real;
        self.columns
            .par_iter()
            .map(|column| {
                let mut acc = vec![0.0; self.template.len()];
                for values in &column.per_run {
                    for (a, v) in acc.iter_mut().zip(values.iter()) {
                        *a += v;
                    }
                }
                acc.iter_mut().for_each(|a| *a /= n);
                acc
            })
            .collect()
    }

    fn stddevs(&self, means: &[Vec<Real>], ddof: usize) -> Vec<Vec<Real>> {
        let divisor = (self.runs - ddof) as Real;
        self.columns
            .par_iter()
            .zip(means.par_iter())
            .map(|(column, mean)| {
                let mut acc = vec![0.0; mean.len()];
                for values in &column.per_run {
                    for ((a, v), m) in acc.iter_mut().zip(values.iter()).zip(mean) {
                        let d = v - m;
                        *a += d * d;
                    }
                }
                acc.iter_mut().for_each(|a| *a = (*a / divisor).sqrt());
                acc
            })
            .collect()
    }

    /// Rebuild a trajectory in run 0's series order from reduced columns.
    fn assemble(&self, reduced: Vec<Vec<Real>>) -> Trajectory {
        let mut reduced = reduced.into_iter();
        let series = self
            .template
            .series()
            .iter()
            .map(|s| {
                if s.name == TIME {
                    s.clone()
                } else {
                    Series::new(s.name.clone(), reduced.next().unwrap_or_default())
                }
            })
            .collect();
        Trajectory::synthetic(self.template, series)
    }
}
