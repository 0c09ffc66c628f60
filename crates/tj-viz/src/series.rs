//! Per-trajectory plot series.

use serde::Serialize;
use tj_core::Real;
use tj_results::{TIME, Trajectory};

use crate::palette::Palette;

/// One plottable line: a species against the run's time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries<'a> {
    pub name: &'a str,
    pub color: &'static str,
    pub time: &'a [Real],
    pub values: &'a [Real],
}

/// Every series of `trajectory` except `"time"`, in insertion order.
///
/// `included` restricts the output to the named species; an empty list keeps
/// them all. Colors come from each series' position in the full mapping, so a
/// species keeps its color whatever the filter.
pub fn plot_series<'a>(
    trajectory: &'a Trajectory,
    palette: Palette,
    included: &'a [String],
) -> impl Iterator<Item = PlotSeries<'a>> + 'a {
    let time = trajectory.time();
    trajectory
        .iter()
        .enumerate()
        .filter(|(_, (name, _))| *name != TIME)
        .filter(move |(_, (name, _))| included.is_empty() || included.iter().any(|s| s == name))
        .map(move |(position, (name, values))| PlotSeries {
            name,
            color: palette.color_for(position),
            time,
            values,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DEFAULT_PALETTE;

    fn sample() -> Trajectory {
        Trajectory::builder("m")
            .time(vec![0.0, 1.0])
            .series("A", vec![1.0, 2.0])
            .series("B", vec![3.0, 4.0])
            .series("C", vec![5.0, 6.0])
            .build()
            .unwrap()
    }

    #[test]
    fn time_is_not_plotted() {
        let traj = sample();
        let names: Vec<_> = plot_series(&traj, DEFAULT_PALETTE, &[])
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn filter_keeps_colors_stable() {
        let traj = sample();
        let included = vec!["C".to_string()];
        let only: Vec<_> = plot_series(&traj, DEFAULT_PALETTE, &included).collect();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name, "C");
        assert_eq!(only[0].color, DEFAULT_PALETTE.color_for(3));
        assert_eq!(only[0].time, &[0.0, 1.0]);
        assert_eq!(only[0].values, &[5.0, 6.0]);
    }

    #[test]
    fn many_species_reuse_colors() {
        let mut builder = Trajectory::builder("m").time(vec![0.0]);
        for i in 0..60 {
            builder = builder.series(format!("S{i}"), vec![i as Real]);
        }
        let traj = builder.build().unwrap();
        let colors: Vec<_> = plot_series(&traj, DEFAULT_PALETTE, &[])
            .map(|s| s.color)
            .collect();
        assert_eq!(colors.len(), 60);
        assert_eq!(colors[0], colors[50]);
        assert_ne!(colors[0], colors[1]);
    }
}
