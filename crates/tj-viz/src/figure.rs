//! Figure descriptions handed to a renderer.

use serde::Serialize;
use tj_core::Real;
use tj_results::{Results, TIME, Trajectory, Warned, aggregate};

use crate::palette::Palette;
use crate::series::plot_series;
use crate::{VizError, VizResult};

#[derive(Debug, Clone)]
pub struct FigureOptions {
    /// Runs to plot, by position; all runs when unset.
    pub index: Option<Vec<usize>>,
    pub x_label: String,
    pub y_label: String,
    /// Defaults to the ensemble title.
    pub title: Option<String>,
    pub show_legend: bool,
    /// One subplot per run instead of overlaying them.
    pub multiple_graphs: bool,
    /// Species to plot; empty keeps all.
    pub included_species: Vec<String>,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            index: None,
            x_label: "Time (s)".to_string(),
            y_label: "Species Population".to_string(),
            title: None,
            show_legend: true,
            multiple_graphs: false,
            included_species: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStyle {
    Line,
    /// Dotted bound of a standard-deviation band.
    Bound,
    /// Mean line whose area is shaded down to the previous trace.
    FilledMean,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub color: Option<String>,
    pub x: Vec<Real>,
    pub y: Vec<Real>,
    pub show_in_legend: bool,
    pub style: TraceStyle,
}

/// Grid cell of a figure; rows and columns start at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subplot {
    pub row: usize,
    pub col: usize,
    pub title: Option<String>,
    pub traces: Vec<Trace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub show_legend: bool,
    pub subplots: Vec<Subplot>,
}

impl Figure {
    pub fn to_json(&self) -> VizResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn trace_count(&self) -> usize {
        self.subplots.iter().map(|s| s.traces.len()).sum()
    }
}

/// Mean plus/minus one standard deviation of one species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    pub name: String,
    pub time: Vec<Real>,
    pub lower: Vec<Real>,
    pub mean: Vec<Real>,
    pub upper: Vec<Real>,
}

fn select<'a>(results: &'a Results, index: Option<&[usize]>) -> VizResult<Vec<&'a Trajectory>> {
    let selected = match index {
        Some(indices) => indices
            .iter()
            .map(|&i| results.at_index(i))
            .collect::<Result<Vec<_>, _>>()?,
        None => results.iter().collect(),
    };
    if selected.is_empty() {
        return Err(VizError::EmptySelection);
    }
    Ok(selected)
}

fn line_traces(
    trajectory: &Trajectory,
    palette: Palette,
    included: &[String],
    show_labels: bool,
) -> Vec<Trace> {
    plot_series(trajectory, palette, included)
        .map(|s| Trace {
            name: s.name.to_string(),
            color: Some(s.color.to_string()),
            x: s.time.to_vec(),
            y: s.values.to_vec(),
            show_in_legend: show_labels,
            style: TraceStyle::Line,
        })
        .collect()
}

impl Figure {
    /// Lines for every species of the selected runs.
    ///
    /// Only the first run's lines carry legend entries. With
    /// `multiple_graphs` and at least two runs, each run gets its own subplot,
    /// two per row.
    pub fn from_results(
        results: &Results,
        palette: Palette,
        options: &FigureOptions,
    ) -> VizResult<Figure> {
        let selected = select(results, options.index.as_deref())?;
        let title = match &options.title {
            Some(title) => title.clone(),
            None => results.validate_title()?,
        };
        let included = &options.included_species;

        let subplots = if options.multiple_graphs && selected.len() >= 2 {
            selected
                .iter()
                .enumerate()
                .map(|(i, trajectory)| Subplot {
                    row: i / 2 + 1,
                    col: i % 2 + 1,
                    title: Some(format!("{title} {}", i + 1)),
                    traces: line_traces(trajectory, palette, included, i == 0),
                })
                .collect()
        } else {
            let traces = selected
                .iter()
                .enumerate()
                .flat_map(|(i, trajectory)| line_traces(trajectory, palette, included, i == 0))
                .collect();
            vec![Subplot {
                row: 1,
                col: 1,
                title: None,
                traces,
            }]
        };

        Ok(Figure {
            title,
            x_label: options.x_label.clone(),
            y_label: options.y_label.clone(),
            show_legend: options.show_legend,
            subplots,
        })
    }
}

/// Mean ± stddev band for every species of the ensemble.
pub fn std_dev_bands(
    results: &Results,
    ddof: usize,
    included: &[String],
) -> VizResult<Warned<Vec<Band>>> {
    let summary = aggregate::summary(results.runs(), ddof)?;
    Ok(summary.map(|summary| {
        let time = summary.mean.time().to_vec();
        summary
            .mean
            .iter()
            .filter(|(name, _)| *name != TIME)
            .filter(|(name, _)| included.is_empty() || included.iter().any(|s| s == name))
            .map(|(name, mean)| {
                let stddev = summary.stddev.get(name).unwrap_or(&[]);
                Band {
                    name: name.to_string(),
                    time: time.clone(),
                    lower: mean.iter().zip(stddev).map(|(m, s)| m - s).collect(),
                    mean: mean.to_vec(),
                    upper: mean.iter().zip(stddev).map(|(m, s)| m + s).collect(),
                }
            })
            .collect()
    }))
}

/// Figure of the ensemble mean with a shaded standard-deviation range.
///
/// Per species: upper bound, mean (filled down to the upper bound) and lower
/// bound, of which only the mean shows in the legend.
pub fn std_dev_range(
    results: &Results,
    ddof: usize,
    options: &FigureOptions,
) -> VizResult<Warned<Figure>> {
    let bands = std_dev_bands(results, ddof, &options.included_species)?;
    let title = match &options.title {
        Some(title) => title.clone(),
        None => format!("{} - Standard Deviation Range", results.validate_title()?),
    };

    Ok(bands.map(|bands| {
        let bound = |name: String, time: &[Real], y: Vec<Real>| Trace {
            name,
            color: None,
            x: time.to_vec(),
            y,
            show_in_legend: false,
            style: TraceStyle::Bound,
        };
        let traces = bands
            .into_iter()
            .flat_map(|band| {
                [
                    bound(format!("{} Upper Bound", band.name), &band.time, band.upper),
                    Trace {
                        name: band.name.clone(),
                        color: None,
                        x: band.time.clone(),
                        y: band.mean,
                        show_in_legend: true,
                        style: TraceStyle::FilledMean,
                    },
                    bound(format!("{} Lower Bound", band.name), &band.time, band.lower),
                ]
            })
            .collect();

        Figure {
            title,
            x_label: options.x_label.clone(),
            y_label: options.y_label.clone(),
            show_legend: options.show_legend,
            subplots: vec![Subplot {
                row: 1,
                col: 1,
                title: None,
                traces,
            }],
        }
    }))
}
