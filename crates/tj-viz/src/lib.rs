//! tj-viz: plottable views of trajectories for an external renderer.
//!
//! Nothing here draws. The crate turns runs into colored series, figure
//! descriptions and standard-deviation bands that a plotting front end can
//! consume directly or as JSON.

pub mod figure;
pub mod palette;
pub mod series;

pub use figure::{Band, Figure, FigureOptions, Subplot, Trace, TraceStyle, std_dev_bands, std_dev_range};
pub use palette::{DEFAULT_PALETTE, Palette};
pub use series::{PlotSeries, plot_series};

pub type VizResult<T> = Result<T, VizError>;

#[derive(thiserror::Error, Debug)]
pub enum VizError {
    #[error("Results error: {0}")]
    Results(#[from] tj_results::ResultsError),

    #[error("No trajectories selected for plotting")]
    EmptySelection,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
