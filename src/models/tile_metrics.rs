use crate::error::ConfigError;

/// Fixed tile geometry shared by every pane of one gallery run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMetrics {
    /// Tile width in pixels (default: 180)
    pub tile_width: f32,
    /// Tile height in pixels (default: 150)
    pub tile_height: f32,
    /// Horizontal gap between adjacent tiles (default: 20)
    pub space_between_cols: f32,
    /// Vertical gap between tile rows (default: 20)
    pub space_between_rows: f32,
    /// Padding around the whole grid (default: 10)
    pub container_padding: f32,
}

impl Default for TileMetrics {
    fn default() -> Self {
        Self {
            tile_width: 180.0,
            tile_height: 150.0,
            space_between_cols: 20.0,
            space_between_rows: 20.0,
            container_padding: 10.0,
        }
    }
}

impl TileMetrics {
    /// Creates validated metrics.
    pub fn new(
        tile_width: f32,
        tile_height: f32,
        space_between_cols: f32,
        space_between_rows: f32,
        container_padding: f32,
    ) -> Result<Self, ConfigError> {
        let metrics = Self {
            tile_width,
            tile_height,
            space_between_cols,
            space_between_rows,
            container_padding,
        };
        metrics.validate()?;
        Ok(metrics)
    }

    /// Rejects zero/negative tile sizes and negative spacing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tile_width", self.tile_width)?;
        positive("tile_height", self.tile_height)?;
        non_negative("space_between_cols", self.space_between_cols)?;
        non_negative("space_between_rows", self.space_between_rows)?;
        non_negative("grid_padding", self.container_padding)?;
        Ok(())
    }

    /// Width of one tile plus the gap that follows it.
    pub fn column_stride(&self) -> f32 {
        self.tile_width + self.space_between_cols
    }
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDimension { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeSpacing { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metrics_are_valid() {
        assert!(TileMetrics::default().validate().is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        let err = TileMetrics::new(0.0, 150.0, 20.0, 20.0, 10.0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositiveDimension {
                field: "tile_width",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_height_rejected() {
        let err = TileMetrics::new(180.0, -5.0, 20.0, 20.0, 10.0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositiveDimension {
                field: "tile_height",
                ..
            }
        ));
    }

    #[test]
    fn test_nan_spacing_rejected() {
        let err = TileMetrics::new(180.0, 150.0, f32::NAN, 20.0, 10.0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NegativeSpacing {
                field: "space_between_cols",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_spacing_allowed() {
        let metrics = TileMetrics::new(100.0, 100.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(metrics.column_stride(), 100.0);
    }
}
