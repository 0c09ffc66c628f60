//! Fixed color table for plotted series.

/// Colors a renderer cycles through, one per plotted series.
///
/// Immutable and `Copy`; pass it to whatever needs colors instead of reading
/// a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: &'static [&'static str],
}

const FALLBACK_COLOR: &str = "#000000";

const COMMON_RGB: [&str; 50] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#00ffff", "#ff00ff",
    "#800000", "#808000", "#008000", "#800080", "#008080", "#000080", "#ff9999", "#ffcc99",
    "#ccff99", "#cc99ff", "#ffccff", "#62666a", "#8896bb", "#77a096", "#9d5a6c", "#9d5a6c",
    "#eabc75", "#ff9600", "#885300", "#9172ad", "#a1b9c4", "#18749b", "#dadecf", "#c5b8a8",
    "#000117", "#13a8fe", "#cf0060", "#04354b", "#0297a0", "#037665", "#eed284", "#442244",
    "#ffddee", "#702afb",
];

pub const DEFAULT_PALETTE: Palette = Palette::new(&COMMON_RGB);

impl Palette {
    pub const fn new(colors: &'static [&'static str]) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for the series at `position` in a trajectory's mapping.
    ///
    /// `"time"` normally sits at position 0, so the first plotted series gets
    /// the first color. Positions wrap modulo the palette size, and position
    /// 0 wraps to the last entry.
    pub fn color_for(&self, position: usize) -> &'static str {
        let n = self.colors.len();
        if n == 0 {
            return FALLBACK_COLOR;
        }
        self.colors[(position % n + n - 1) % n]
    }
}

impl Default for Palette {
    fn default() -> Self {
        DEFAULT_PALETTE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_species_gets_first_color() {
        assert_eq!(DEFAULT_PALETTE.len(), 50);
        assert_eq!(DEFAULT_PALETTE.color_for(1), "#1f77b4");
        assert_eq!(DEFAULT_PALETTE.color_for(2), "#ff7f0e");
    }

    #[test]
    fn colors_wrap_after_fifty() {
        assert_eq!(DEFAULT_PALETTE.color_for(50), "#702afb");
        assert_eq!(DEFAULT_PALETTE.color_for(51), DEFAULT_PALETTE.color_for(1));
        assert_eq!(DEFAULT_PALETTE.color_for(0), "#702afb");
    }

    #[test]
    fn custom_palette() {
        const TWO: [&str; 2] = ["red", "blue"];
        let palette = Palette::new(&TWO);
        assert_eq!(palette.color_for(1), "red");
        assert_eq!(palette.color_for(2), "blue");
        assert_eq!(palette.color_for(3), "red");
        assert_eq!(Palette::new(&[]).color_for(4), FALLBACK_COLOR);
    }
}
