//! Ensemble homogeneity checks.
//!
//! All checks take any sequence of borrowed runs, so a combined ensemble can
//! be validated before it is ever materialized.

use tj_core::ModelRef;

use crate::trajectory::Trajectory;
use crate::{ResultsError, ResultsResult};

pub const MULTIPLE_MODELS: &str = "Multiple Models";
pub const MULTIPLE_SOLVERS: &str = "Multiple Solvers";

/// True when every run was produced by `reference` (run 0's model by default).
pub fn validate_model<'a>(
    runs: impl IntoIterator<Item = &'a Trajectory>,
    reference: Option<&ModelRef>,
) -> ResultsResult<bool> {
    Ok(first_model_mismatch(runs, reference)?.is_none())
}

/// True when every run used `reference` (run 0's solver by default).
pub fn validate_solver<'a>(
    runs: impl IntoIterator<Item = &'a Trajectory>,
    reference: Option<&str>,
) -> ResultsResult<bool> {
    let mut runs = runs.into_iter();
    let first = runs.next().ok_or(ResultsError::EmptyEnsemble)?;
    let reference = reference.unwrap_or(first.solver_name());
    Ok(first.solver_name() == reference && runs.all(|t| t.solver_name() == reference))
}

/// `"<model> - <solver>"`, with a plural placeholder for each half that is
/// not homogeneous.
pub fn validate_title<'a>(
    runs: impl IntoIterator<Item = &'a Trajectory> + Clone,
) -> ResultsResult<String> {
    let first = runs
        .clone()
        .into_iter()
        .next()
        .ok_or(ResultsError::EmptyEnsemble)?;

    let model = if validate_model(runs.clone(), None)? {
        first.model().name()
    } else {
        MULTIPLE_MODELS
    };
    let solver = if validate_solver(runs, None)? {
        first.solver_name()
    } else {
        MULTIPLE_SOLVERS
    };
    Ok(format!("{model} - {solver}"))
}

/// The reference model and the first run model that differs from it.
pub(crate) fn first_model_mismatch<'a>(
    runs: impl IntoIterator<Item = &'a Trajectory>,
    reference: Option<&ModelRef>,
) -> ResultsResult<Option<(ModelRef, ModelRef)>> {
    let mut runs = runs.into_iter();
    let first = runs.next().ok_or(ResultsError::EmptyEnsemble)?;
    let reference = reference.unwrap_or(first.model());
    Ok(std::iter::once(first)
        .chain(runs)
        .find(|t| t.model() != reference)
        .map(|t| (reference.clone(), t.model().clone())))
}
