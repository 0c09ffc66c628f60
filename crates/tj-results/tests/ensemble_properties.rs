use proptest::prelude::*;
use tj_core::{Tolerances, nearly_equal, slices_nearly_equal};
use tj_results::*;

fn run(model: &str, solver: &str, a: Vec<f64>) -> Trajectory {
    Trajectory::builder(model)
        .solver(solver)
        .time(vec![0.0, 1.0])
        .series("A", a)
        .build()
        .unwrap()
}

#[test]
fn average_matches_worked_example() {
    let results = Results::new(vec![
        run("dimer", "SSA", vec![2.0, 4.0]),
        run("dimer", "SSA", vec![6.0, 8.0]),
    ]);
    let mean = results.average_ensemble().unwrap();
    let only = mean.at_index(0).unwrap();
    assert_eq!(only.get("A").unwrap(), &[4.0, 6.0]);
    assert_eq!(only.time(), &[0.0, 1.0]);
}

#[test]
fn population_stddev_matches_worked_example() {
    let results = Results::new(vec![
        run("dimer", "SSA", vec![2.0, 4.0]),
        run("dimer", "SSA", vec![6.0, 8.0]),
    ]);
    let sd = results.stddev_ensemble(0).unwrap();
    assert!(!sd.has_warnings());
    assert_eq!(
        sd.value().at_index(0).unwrap().get("A").unwrap(),
        &[2.0, 2.0]
    );
}

#[test]
fn ddof_equal_to_run_count_behaves_like_zero() {
    let results = Results::new(vec![
        run("dimer", "SSA", vec![2.0, 4.0]),
        run("dimer", "SSA", vec![6.0, 8.0]),
        run("dimer", "SSA", vec![1.0, 9.0]),
    ]);
    let coerced = results.stddev_ensemble(3).unwrap();
    let population = results.stddev_ensemble(0).unwrap();
    assert_eq!(coerced.value(), population.value());
    assert_eq!(coerced.warnings().len(), 1);
    assert!(matches!(
        coerced.warnings()[0],
        EnsembleWarning::DdofCoerced { requested: 3, runs: 3 }
    ));
}

#[test]
fn concatenating_different_solvers_warns_once() {
    let left = Results::new(vec![
        run("dimer", "SSA", vec![1.0, 2.0]),
        run("dimer", "SSA", vec![1.0, 2.0]),
    ]);
    let right = Results::from_run(run("dimer", "Tau-Leaping", vec![3.0, 4.0]));

    let joined = left.concatenate(&right).unwrap();
    assert_eq!(joined.value().len(), left.len() + right.len());
    assert_eq!(joined.warnings(), &[EnsembleWarning::MultipleSolvers]);
    assert_eq!(
        joined.value().validate_title().unwrap(),
        "dimer - Multiple Solvers"
    );
}

#[test]
fn concatenating_different_models_fails_without_a_value() {
    let left = Results::from_run(run("dimer", "SSA", vec![1.0, 2.0]));
    let right = Results::from_run(run("decay", "SSA", vec![3.0, 4.0]));

    match left.concatenate(&right) {
        Err(ResultsError::ModelMismatch { expected, found }) => {
            assert_eq!(expected, "dimer");
            assert_eq!(found, "decay");
        }
        other => panic!("expected a model mismatch, got {other:?}"),
    }
    assert_eq!(left.len(), 1);
    assert_eq!(right.len(), 1);
}

#[test]
fn return_code_status_round_trip() {
    let ok = Trajectory::builder("m").time(vec![0.0]).build().unwrap();
    assert_eq!(ok.status().to_string(), "Success");
    let timed_out = Trajectory::builder("m")
        .return_code(33)
        .time(vec![0.0])
        .build()
        .unwrap();
    assert_eq!(timed_out.status().to_string(), "Timed Out");
}

fn ensemble(values: &[Vec<f64>]) -> Vec<Trajectory> {
    let len = values.first().map(|v| v.len()).unwrap_or(0);
    let time: Vec<f64> = (0..len).map(|i| i as f64).collect();
    values
        .iter()
        .map(|v| {
            Trajectory::builder("m")
                .time(time.clone())
                .series("A", v.clone())
                .build()
                .unwrap()
        })
        .collect()
}

fn runs_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..6).prop_flat_map(|len| {
        prop::collection::vec(prop::collection::vec(-1.0e3_f64..1.0e3_f64, len), 1..8)
    })
}

proptest! {
    #[test]
    fn mean_is_arithmetic_mean(values in runs_strategy()) {
        let runs = ensemble(&values);
        let mean = aggregate::average(&runs).unwrap();
        let n = values.len() as f64;
        let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
        for (k, &m) in mean.get("A").unwrap().iter().enumerate() {
            let expected = values.iter().map(|v| v[k]).sum::<f64>() / n;
            prop_assert!(nearly_equal(m, expected, tol));
        }
    }

    #[test]
    fn statistics_ignore_run_order(values in runs_strategy()) {
        let forward = ensemble(&values);
        let mut reversed = forward.clone();
        reversed.reverse();
        let tol = Tolerances { abs: 1e-9, rel: 1e-9 };

        let a = aggregate::summary(&forward, 0).unwrap().into_inner();
        let b = aggregate::summary(&reversed, 0).unwrap().into_inner();
        prop_assert!(slices_nearly_equal(a.mean.get("A").unwrap(), b.mean.get("A").unwrap(), tol));
        prop_assert!(slices_nearly_equal(a.stddev.get("A").unwrap(), b.stddev.get("A").unwrap(), tol));
    }

    #[test]
    fn stddev_is_finite_and_non_negative(values in runs_strategy(), ddof in 0usize..3) {
        let runs = ensemble(&values);
        prop_assume!(ddof <= runs.len());
        let sd = aggregate::stddev(&runs, ddof).unwrap();
        prop_assert_eq!(sd.has_warnings(), ddof == runs.len());
        for &s in sd.value().get("A").unwrap() {
            prop_assert!(s.is_finite());
            prop_assert!(s >= 0.0);
        }
    }
}
