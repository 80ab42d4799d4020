use crate::models::TileMetrics;

/// Row count used when a pane should hold as many rows as the content needs.
pub const UNBOUNDED_ROWS: usize = 9999;

/// Pure pane-size estimation for a fixed tile grid.
///
/// Tiles are laid out left-to-right with fixed size and spacing; a pane holds
/// `rows_per_pane` full rows. Every method is side-effect free and always
/// reports at least one tile per row so pane counts stay finite.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeEstimator {
    pub metrics: TileMetrics,
    /// Fixed column count overriding the width-based estimate.
    pub tiles_per_row: Option<u32>,
    /// Rows in one pane; `None` or `Some(0)` fits as many as possible.
    pub rows_per_pane: Option<u32>,
}

impl Default for SizeEstimator {
    fn default() -> Self {
        Self {
            metrics: TileMetrics::default(),
            tiles_per_row: None,
            rows_per_pane: Some(3),
        }
    }
}

impl SizeEstimator {
    pub fn new(metrics: TileMetrics, tiles_per_row: Option<u32>, rows_per_pane: Option<u32>) -> Self {
        Self {
            metrics,
            tiles_per_row,
            rows_per_pane,
        }
    }

    /// Single strip of tiles, as used by the carousel theme.
    pub fn single_row(metrics: TileMetrics, tiles_per_row: Option<u32>) -> Self {
        Self::new(metrics, tiles_per_row, Some(1))
    }

    fn usable_width(&self, container_width: f32) -> f32 {
        let width = if container_width.is_finite() {
            container_width
        } else {
            0.0
        };
        (width - self.metrics.container_padding * 2.0).max(0.0)
    }

    /// Number of whole tiles that fit side by side in `container_width`.
    pub fn tiles_per_row(&self, container_width: f32) -> usize {
        if let Some(fixed) = self.tiles_per_row.filter(|n| *n > 0) {
            return fixed as usize;
        }

        let usable = self.usable_width(container_width);
        let stride = self.metrics.column_stride();
        if stride <= 0.0 {
            return 1;
        }

        // n tiles need n * tile_width + (n - 1) * gap
        let fitting = ((usable + self.metrics.space_between_cols) / stride).floor();
        if fitting.is_finite() && fitting >= 1.0 {
            fitting as usize
        } else {
            1
        }
    }

    pub fn rows_per_pane(&self) -> usize {
        match self.rows_per_pane {
            Some(rows) if rows > 0 => rows as usize,
            _ => UNBOUNDED_ROWS,
        }
    }

    /// Tiles shown together on one pane; never zero.
    pub fn tiles_per_pane(&self, container_width: f32) -> usize {
        self.tiles_per_row(container_width)
            .saturating_mul(self.rows_per_pane())
            .max(1)
    }

    /// `ceil(item_count / tiles_per_pane)`; zero for an empty item set.
    pub fn num_panes(&self, item_count: usize, container_width: f32) -> usize {
        item_count.div_ceil(self.tiles_per_pane(container_width))
    }

    /// Pixel width of the grid, sized for its widest row.
    pub fn grid_width(&self, item_count: usize, container_width: f32) -> f32 {
        let cols = self.tiles_per_row(container_width).min(item_count);
        self.span(cols, self.metrics.tile_width, self.metrics.space_between_cols)
    }

    /// Pixel height of the tallest pane.
    pub fn pane_height(&self, item_count: usize, container_width: f32) -> f32 {
        let per_pane = item_count.min(self.tiles_per_pane(container_width));
        let rows = per_pane.div_ceil(self.tiles_per_row(container_width));
        self.span(rows, self.metrics.tile_height, self.metrics.space_between_rows)
    }

    fn span(&self, count: usize, size: f32, gap: f32) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let count = count as f32;
        count * size + (count - 1.0) * gap + self.metrics.container_padding * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(tile: f32, gap: f32, padding: f32) -> TileMetrics {
        TileMetrics {
            tile_width: tile,
            tile_height: tile,
            space_between_cols: gap,
            space_between_rows: gap,
            container_padding: padding,
        }
    }

    #[test]
    fn test_exact_fit_counts_every_tile() {
        // 4 * 100 + 3 * 10 + 2 * 5 = 440
        let estimator = SizeEstimator::new(metrics(100.0, 10.0, 5.0), None, Some(1));
        assert_eq!(estimator.tiles_per_row(440.0), 4);
        assert_eq!(estimator.tiles_per_row(439.0), 3);
    }

    #[test]
    fn test_oversized_tile_still_yields_one() {
        let estimator = SizeEstimator::new(metrics(500.0, 10.0, 5.0), None, Some(2));
        assert_eq!(estimator.tiles_per_row(120.0), 1);
        assert_eq!(estimator.tiles_per_pane(120.0), 2);
    }

    #[test]
    fn test_degenerate_widths_never_return_zero() {
        let estimator = SizeEstimator::default();
        for width in [0.0, -50.0, f32::NAN, f32::NEG_INFINITY] {
            assert_eq!(estimator.tiles_per_row(width), 1, "width {width}");
        }
    }

    #[test]
    fn test_override_wins_over_estimate() {
        let estimator = SizeEstimator::new(metrics(100.0, 0.0, 0.0), Some(7), Some(2));
        assert_eq!(estimator.tiles_per_row(150.0), 7);
        assert_eq!(estimator.tiles_per_pane(150.0), 14);
    }

    #[test]
    fn test_zero_override_falls_back_to_estimate() {
        let estimator = SizeEstimator::new(metrics(100.0, 0.0, 0.0), Some(0), Some(1));
        assert_eq!(estimator.tiles_per_row(300.0), 3);
    }

    #[test]
    fn test_unbounded_rows() {
        let estimator = SizeEstimator::new(metrics(100.0, 0.0, 0.0), None, None);
        assert_eq!(estimator.rows_per_pane(), UNBOUNDED_ROWS);
        assert_eq!(estimator.num_panes(5000, 300.0), 1);

        let zero_rows = SizeEstimator::new(metrics(100.0, 0.0, 0.0), None, Some(0));
        assert_eq!(zero_rows.rows_per_pane(), UNBOUNDED_ROWS);
    }

    #[test]
    fn test_num_panes_is_ceiling() {
        let estimator = SizeEstimator::new(metrics(100.0, 0.0, 0.0), Some(3), Some(2));
        for n in 0..50usize {
            let expected = if n == 0 { 0 } else { (n + 5) / 6 };
            assert_eq!(estimator.num_panes(n, 1000.0), expected, "items {n}");
        }
    }

    #[test]
    fn test_estimates_are_idempotent() {
        let estimator = SizeEstimator::default();
        let first = estimator.tiles_per_pane(1234.0);
        for _ in 0..10 {
            assert_eq!(estimator.tiles_per_pane(1234.0), first);
        }
    }

    #[test]
    fn test_grid_footprint() {
        let estimator = SizeEstimator::new(metrics(100.0, 10.0, 5.0), Some(3), Some(2));
        // 3 cols: 300 + 20 + 10
        assert_eq!(estimator.grid_width(20, 0.0), 330.0);
        // fewer items than columns shrink the grid
        assert_eq!(estimator.grid_width(2, 0.0), 220.0);
        // 2 rows: 200 + 10 + 10
        assert_eq!(estimator.pane_height(20, 0.0), 220.0);
        assert_eq!(estimator.pane_height(2, 0.0), 110.0);
        assert_eq!(estimator.pane_height(0, 0.0), 0.0);
    }
}
