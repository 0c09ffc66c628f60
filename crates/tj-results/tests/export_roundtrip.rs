use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tj_core::ModelRef;
use tj_results::*;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn run(a: Vec<f64>) -> Trajectory {
    Trajectory::builder("dimer")
        .solver("SSA")
        .time(vec![0.0, 1.0])
        .series("A", a)
        .build()
        .unwrap()
}

#[test]
fn single_run_export_layout() {
    let parent = unique_temp_dir("tj_export_single");
    let results = Results::from_run(run(vec![5.0, 6.0]));

    let directory = results
        .export_tabular(&ExportOptions::in_dir(&parent).stamp("-stamp"))
        .expect("export failed");
    assert_eq!(directory, parent.join("dimer - SSA-stamp"));

    let files: Vec<_> = fs::read_dir(&directory).unwrap().collect();
    assert_eq!(files.len(), 1);

    let content = fs::read_to_string(directory.join("dimer - SSA0.csv")).unwrap();
    let rows: Vec<Vec<&str>> = content
        .lines()
        .map(|l| l.split(',').collect())
        .collect();
    assert_eq!(rows, vec![vec!["time", "A"], vec!["0", "5"], vec!["1", "6"]]);

    let _ = fs::remove_dir_all(&parent);
}

#[test]
fn nametag_names_directory_and_files() {
    let parent = unique_temp_dir("tj_export_tagged");
    let results = Results::new(vec![run(vec![1.0, 2.0]), run(vec![3.0, 4.0])]);

    let options = ExportOptions::in_dir(&parent).nametag("batch").stamp("7");
    let directory = results.export_tabular(&options).unwrap();
    assert_eq!(directory, parent.join("batch7"));
    assert!(directory.join("batch0.csv").is_file());
    assert!(directory.join("batch1.csv").is_file());

    let _ = fs::remove_dir_all(&parent);
}

#[test]
fn export_never_merges_into_existing_directory() {
    let parent = unique_temp_dir("tj_export_twice");
    let results = Results::from_run(run(vec![1.0, 2.0]));
    let options = ExportOptions::in_dir(&parent).stamp("x");

    results.export_tabular(&options).unwrap();
    let err = results.export_tabular(&options).unwrap_err();
    assert!(matches!(err, ResultsError::ExportDirectory { .. }));

    let _ = fs::remove_dir_all(&parent);
}

#[test]
fn default_stamp_is_fresh() {
    let parent = unique_temp_dir("tj_export_stamp");
    let results = Results::from_run(run(vec![1.0, 2.0]));

    let directory = results
        .export_tabular(&ExportOptions::in_dir(&parent))
        .unwrap();
    let name = directory.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("dimer - SSA"));
    assert!(name.len() > "dimer - SSA".len());

    let _ = fs::remove_dir_all(&parent);
}

#[test]
fn empty_results_need_a_nametag() {
    let parent = unique_temp_dir("tj_export_empty");
    let results = Results::default();
    assert!(matches!(
        results.export_tabular(&ExportOptions::in_dir(&parent)),
        Err(ResultsError::EmptyEnsemble)
    ));
    let directory = results
        .export_tabular(&ExportOptions::in_dir(&parent).nametag("none").stamp("0"))
        .unwrap();
    assert_eq!(fs::read_dir(&directory).unwrap().count(), 0);

    let _ = fs::remove_dir_all(&parent);
}

#[test]
fn exported_tables_read_back_in_run_order() {
    let parent = unique_temp_dir("tj_export_import");
    let runs: Vec<Trajectory> = (0..12).map(|i| run(vec![i as f64, 0.5])).collect();
    let results = Results::new(runs);

    let directory = results
        .export_tabular(&ExportOptions::in_dir(&parent).stamp("s"))
        .unwrap();
    let loaded =
        Results::import_tabular(&directory, &ModelRef::new("dimer"), "SSA").unwrap();

    assert_eq!(loaded, results);

    let _ = fs::remove_dir_all(&parent);
}

#[test]
fn malformed_table_reports_line() {
    let parent = unique_temp_dir("tj_import_bad");
    let file = parent.join("bad0.csv");
    fs::write(&file, "time,A\n0,1\n1,oops\n").unwrap();

    let err = tabular::read_csv(&file, &ModelRef::new("m"), "SSA").unwrap_err();
    assert!(matches!(err, ResultsError::Parse { line: 3, .. }));

    let _ = fs::remove_dir_all(&parent);
}

#[test]
fn series_names_with_line_breaks_read_back() {
    let parent = unique_temp_dir("tj_export_newline");
    let run = Trajectory::builder("m")
        .solver("SSA")
        .time(vec![0.0, 1.0])
        .series("a\nb", vec![3.0, 4.0])
        .series("c\r\nd,\"e\"", vec![5.0, 6.0])
        .build()
        .unwrap();
    let results = Results::from_run(run);

    let directory = results
        .export_tabular(&ExportOptions::in_dir(&parent).stamp("nl"))
        .unwrap();
    let loaded = Results::import_tabular(&directory, &ModelRef::new("m"), "SSA").unwrap();

    assert_eq!(loaded, results);
    assert_eq!(loaded.runs()[0].get("a\nb").unwrap(), &[3.0, 4.0]);

    let _ = fs::remove_dir_all(&parent);
}
