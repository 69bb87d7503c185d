use super::partition::Partition;
use crate::{
    GridError, DEFAULT_CELL_SIZE_PX, DEFAULT_GRID_SIZE, DEFAULT_PIXEL_THRESHOLD_PCT,
    DEFAULT_THRESHOLD_PCT,
};

/// Configuration for grid scoring.
///
/// # Example
/// ```
/// use gridcover::{Partition, ScoreConfig};
///
/// let config = ScoreConfig::default();
/// assert_eq!(config.partition, Partition::Count(10));
/// assert_eq!(config.threshold_pct, 25.0);
///
/// let config = ScoreConfig::pixel_default();
/// assert_eq!(config.partition, Partition::CellSize(50));
/// assert_eq!(config.threshold_pct, 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScoreConfig {
    /// How the image is divided into cells (default: 10x10)
    pub partition: Partition,
    /// Minimum foreground percentage for a cell to count as a hit (default: 25)
    pub threshold_pct: f64,
}

impl ScoreConfig {
    /// Creates a new `ScoreConfig` with the specified parameters.
    ///
    /// # Example
    /// ```
    /// use gridcover::{Partition, ScoreConfig};
    ///
    /// let config = ScoreConfig::new(Partition::CellSize(20), 40.0);
    /// assert_eq!(config.threshold_pct, 40.0);
    /// ```
    pub fn new(partition: Partition, threshold_pct: f64) -> Self {
        Self {
            partition,
            threshold_pct,
        }
    }

    /// Defaults for pixel-based scoring: 50px cells at a 50% threshold.
    pub fn pixel_default() -> Self {
        ScoreConfig::new(
            Partition::CellSize(DEFAULT_CELL_SIZE_PX),
            DEFAULT_PIXEL_THRESHOLD_PCT,
        )
    }

    /// Builds a count-based config from raw text fields, as typed into a form.
    ///
    /// # Example
    /// ```
    /// use gridcover::{Partition, ScoreConfig};
    ///
    /// let config = ScoreConfig::from_inputs(" 8 ", "12.5").unwrap();
    /// assert_eq!(config, ScoreConfig::new(Partition::Count(8), 12.5));
    /// assert!(ScoreConfig::from_inputs("-1", "25").is_err());
    /// assert!(ScoreConfig::from_inputs("10", "101").is_err());
    /// ```
    pub fn from_inputs(grid_size: &str, threshold: &str) -> Result<Self, GridError> {
        let invalid = || {
            GridError::InvalidParameter(
                "Please enter valid grid size (positive integer) and threshold (0-100).".into(),
            )
        };
        let grid_size: u32 = grid_size.trim().parse().map_err(|_| invalid())?;
        let threshold_pct: f64 = threshold.trim().parse().map_err(|_| invalid())?;
        let config = ScoreConfig::new(Partition::Count(grid_size), threshold_pct);
        config.validate().map_err(|_| invalid())?;
        Ok(config)
    }

    /// Checks the parameters that do not depend on the image.
    pub fn validate(&self) -> Result<(), GridError> {
        if !(0.0..=100.0).contains(&self.threshold_pct) {
            return Err(GridError::InvalidParameter(format!(
                "threshold must be within 0-100, got {}",
                self.threshold_pct
            )));
        }
        match self.partition {
            Partition::Count(0) => Err(GridError::InvalidParameter(
                "grid size must be a positive integer".into(),
            )),
            Partition::CellSize(0) => Err(GridError::InvalidParameter(
                "cell size must be a positive integer".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        ScoreConfig::new(Partition::Count(DEFAULT_GRID_SIZE), DEFAULT_THRESHOLD_PCT)
    }
}
