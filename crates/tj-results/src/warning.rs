//! Non-fatal diagnostics raised by ensemble operations.
//!
//! Every warning is logged through `tracing` the moment it is attached to a
//! value, and is also handed back to the caller inside [`Warned`].

use core::fmt;

/// A condition that did not stop an operation but should be surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsembleWarning {
    /// A trajectory was indexed by position; the trajectory itself is returned.
    TrajectoryIntegerIndex { index: usize },
    /// Single-key access on an ensemble with more than one run read run 0.
    AmbiguousEnsembleAccess { runs: usize },
    /// Concatenated results contain runs from more than one solver.
    MultipleSolvers,
    /// `ddof` equal to the run count was replaced by 0.
    DdofCoerced { requested: usize, runs: usize },
}

impl EnsembleWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            EnsembleWarning::TrajectoryIntegerIndex { .. } => "trajectory_integer_index",
            EnsembleWarning::AmbiguousEnsembleAccess { .. } => "ambiguous_ensemble_access",
            EnsembleWarning::MultipleSolvers => "multiple_solvers",
            EnsembleWarning::DdofCoerced { .. } => "ddof_coerced",
        }
    }
}

impl fmt::Display for EnsembleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnsembleWarning::TrajectoryIntegerIndex { index } => write!(
                f,
                "trajectory indexed by position {index}; a trajectory maps series names to values, \
                 use trajectory.get(\"species\") instead"
            ),
            EnsembleWarning::AmbiguousEnsembleAccess { runs } => write!(
                f,
                "results hold {runs} runs and single-key access reads run 0 only; \
                 select a run with at_index(i) first"
            ),
            EnsembleWarning::MultipleSolvers => {
                f.write_str("results contain trajectories from multiple solvers")
            }
            EnsembleWarning::DdofCoerced { requested, runs } => write!(
                f,
                "ddof ({requested}) must be less than the number of runs ({runs}); using ddof of 0"
            ),
        }
    }
}

/// A value together with the warnings produced while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Warned<T> {
    value: T,
    warnings: Vec<EnsembleWarning>,
}

impl<T> Warned<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(value: T, warning: EnsembleWarning) -> Self {
        let mut warned = Self::clean(value);
        warned.push(warning);
        warned
    }

    /// Attach a warning, logging it.
    pub fn push(&mut self, warning: EnsembleWarning) {
        tracing::warn!(kind = warning.kind(), "{warning}");
        self.warnings.push(warning);
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn warnings(&self) -> &[EnsembleWarning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Warned<U> {
        Warned {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
