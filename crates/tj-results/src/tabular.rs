//! Tabular (CSV) export and import of runs.
//!
//! Layout: `<path>/<identifier><stamp>/<identifier><run-index>.csv`, one file
//! per run, header = series names in insertion order, one row per time index.

use std::fs;
use std::path::{Path, PathBuf};

use tj_core::{ModelRef, Real};

use crate::results::Results;
use crate::trajectory::{Series, Trajectory};
use crate::{ResultsError, ResultsResult};

/// Where and under which name [`Results::export_tabular`] writes.
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    /// Parent of the export directory; the working directory when unset.
    pub path: Option<PathBuf>,
    /// Identifier for the directory and files; the ensemble title when unset.
    pub nametag: Option<String>,
    /// Directory suffix; a fresh timestamp when unset.
    pub stamp: Option<String>,
}

impl ExportOptions {
    pub fn in_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn nametag(mut self, nametag: impl Into<String>) -> Self {
        self.nametag = Some(nametag.into());
        self
    }

    pub fn stamp(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = Some(stamp.into());
        self
    }
}

/// Seconds since the Unix epoch with microsecond fraction, e.g. `1760745600.123456`.
pub fn timestamp_stamp() -> String {
    let now = chrono::Utc::now();
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}

pub(crate) fn export(results: &Results, options: &ExportOptions) -> ResultsResult<PathBuf> {
    let identifier = match &options.nametag {
        Some(tag) => tag.clone(),
        None => results.validate_title()?,
    };
    let stamp = options.stamp.clone().unwrap_or_else(timestamp_stamp);
    let parent = options.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let directory = parent.join(format!("{identifier}{stamp}"));

    fs::create_dir(&directory).map_err(|source| ResultsError::ExportDirectory {
        path: directory.clone(),
        source,
    })?;

    for (index, run) in results.iter().enumerate() {
        let file = directory.join(format!("{identifier}{index}.csv"));
        fs::write(&file, to_csv(run))?;
        tracing::debug!(path = %file.display(), rows = run.len(), "wrote run table");
    }

    Ok(directory)
}

/// CSV text of one run.
pub fn to_csv(run: &Trajectory) -> String {
    let mut out = String::new();

    let header: Vec<String> = run.series_names().map(escape_field).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for k in 0..run.len() {
        let row: Vec<String> = run.iter().map(|(_, values)| values[k].to_string()).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One parsed row and the line it starts on.
type Record = (usize, Vec<String>);

fn finish_record(start: usize, fields: &mut Vec<String>, records: &mut Vec<Record>) {
    let fields = std::mem::take(fields);
    if !(fields.len() == 1 && fields[0].trim().is_empty()) {
        records.push((start, fields));
    }
}

/// Split CSV text into records. Quoted fields may span line breaks; blank
/// lines between records are skipped. Errors carry the offending line.
fn records(content: &str) -> Result<Vec<Record>, (usize, String)> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut start = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            '\n' if in_quotes => {
                current.push(c);
                line += 1;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            '\r' if !in_quotes => {}
            '\n' => {
                fields.push(std::mem::take(&mut current));
                finish_record(start, &mut fields, &mut records);
                line += 1;
                start = line;
            }
            _ => current.push(c),
        }
    }
    if in_quotes {
        return Err((start, "unterminated quoted field".to_string()));
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        finish_record(start, &mut fields, &mut records);
    }
    Ok(records)
}

/// Read one exported table back into a trajectory.
pub fn read_csv(path: &Path, model: &ModelRef, solver_name: &str) -> ResultsResult<Trajectory> {
    let content = fs::read_to_string(path)?;
    let parse_error = |line: usize, message: String| ResultsError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut rows = records(&content)
        .map_err(|(line, message)| parse_error(line, message))?
        .into_iter();
    let (_, names) = rows
        .next()
        .ok_or_else(|| parse_error(1, "missing header row".to_string()))?;

    let mut columns: Vec<Vec<Real>> = vec![Vec::new(); names.len()];
    for (line_no, fields) in rows {
        if fields.len() != names.len() {
            return Err(parse_error(
                line_no,
                format!("expected {} fields, found {}", names.len(), fields.len()),
            ));
        }
        for (column, field) in columns.iter_mut().zip(&fields) {
            let value = field
                .trim()
                .parse::<Real>()
                .map_err(|e| parse_error(line_no, format!("'{field}': {e}")))?;
            column.push(value);
        }
    }

    let series = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name, values))
        .collect();
    Trajectory::new(model.clone(), solver_name, 0, series)
}

/// Trailing run index of an exported file stem (`"dimer - SSA12"` -> 12).
fn run_index(stem: &str) -> Option<u64> {
    let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    stem[stem.len() - digits..].parse().ok()
}

pub(crate) fn import(
    directory: &Path,
    model: &ModelRef,
    solver_name: &str,
) -> ResultsResult<Results> {
    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            files.push((run_index(&stem), path));
        }
    }
    files.sort();

    files
        .iter()
        .map(|(_, path)| read_csv(path, model, solver_name))
        .collect()
}
