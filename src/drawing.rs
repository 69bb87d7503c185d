//! This module provides functionality for drawing cell boundaries on grayscale images.
//!
//! Lines are one pixel wide and drawn only at internal boundaries, never along the
//! outer border of the image.
//!
//! # Examples
//!
//! ```rust
//! use gridcover::{drawing::*, Partition};
//! use image::{GrayImage, Luma};
//!
//! let img = GrayImage::from_pixel(10, 10, Luma([0]));
//! let annotated = draw_grid_lines(&img, Partition::Count(2)).unwrap();
//!
//! assert_eq!(annotated.get_pixel(5, 0).0[0], 255);
//! assert_eq!(annotated.get_pixel(0, 5).0[0], 255);
//! assert_eq!(annotated.get_pixel(0, 0).0[0], 0);
//! // The input is left untouched
//! assert_eq!(img.get_pixel(5, 0).0[0], 0);
//! ```

use image::{GrayImage, Luma};
use imageproc::drawing::draw_line_segment_mut;
use tracing::*;

use crate::{Grid, GridError, Partition};

/// Configuration for drawing grid lines.
///
/// # Examples
///
/// ```
/// use gridcover::drawing::GridDrawingConfig;
/// use image::Luma;
///
/// let config = GridDrawingConfig {
///     row_color: Luma([128]),
///     column_color: Luma([255]),
/// };
/// assert_eq!(GridDrawingConfig::default().row_color, Luma([255]));
/// ```
#[derive(Debug, Clone)]
pub struct GridDrawingConfig {
    /// Intensity for horizontal grid lines (rows).
    pub row_color: Luma<u8>,
    /// Intensity for vertical grid lines (columns).
    pub column_color: Luma<u8>,
}

impl Default for GridDrawingConfig {
    fn default() -> Self {
        GridDrawingConfig {
            row_color: Luma([255]),
            column_color: Luma([255]),
        }
    }
}

/// Trait for types that can be drawn on an image.
pub trait Drawable {
    /// Draws the object on the provided image using the given configuration.
    ///
    /// # Errors
    /// Returns [`GridError`] if drawing fails.
    fn draw(&self, image: &mut GrayImage, config: &GridDrawingConfig) -> Result<(), GridError>;
}

impl Drawable for Grid {
    fn draw(&self, image: &mut GrayImage, config: &GridDrawingConfig) -> Result<(), GridError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let (right, bottom) = (width as f32, height as f32);

        // Draw horizontal grid lines
        for y in self.inner_row_boundaries() {
            trace!("Drawing row boundary at y={}", y);
            draw_line_segment_mut(image, (0.0, y as f32), (right, y as f32), config.row_color);
        }

        // Draw vertical grid lines
        for x in self.inner_column_boundaries() {
            trace!("Drawing column boundary at x={}", x);
            draw_line_segment_mut(image, (x as f32, 0.0), (x as f32, bottom), config.column_color);
        }

        Ok(())
    }
}

/// Returns a copy of `image` with the boundaries of `partition` drawn on it.
///
/// # Errors
/// Fails like [`Partition::layout`] when the partition does not fit the image.
pub fn draw_grid_lines(image: &GrayImage, partition: Partition) -> Result<GrayImage, GridError> {
    let (width, height) = image.dimensions();
    let grid = partition.layout(width, height)?;
    let mut annotated = image.clone();
    grid.draw(&mut annotated, &GridDrawingConfig::default())?;
    Ok(annotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_grid;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines_only_at_internal_boundaries() {
        let img = GrayImage::new(9, 6);
        let annotated = draw_grid_lines(&img, Partition::CellSize(3)).unwrap();

        for y in 0..6 {
            for x in 0..9 {
                let on_line = x == 3 || x == 6 || y == 3;
                let expected = if on_line { 255 } else { 0 };
                assert_eq!(annotated.get_pixel(x, y).0[0], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let img = GrayImage::from_fn(12, 12, |x, y| Luma([((x * 12 + y) % 200) as u8]));
        let before = img.clone();
        let annotated = draw_grid_lines(&img, Partition::Count(3)).unwrap();

        assert_eq!(img, before);
        assert_ne!(annotated, before);
    }

    #[test]
    fn test_single_cell_draws_nothing() {
        let img = GrayImage::from_pixel(5, 5, Luma([10]));
        let annotated = draw_grid_lines(&img, Partition::Count(1)).unwrap();
        assert_eq!(annotated, img);
    }

    #[test]
    fn test_custom_colors() {
        let grid = make_grid!(rows: [(0, 2), (2, 2),], columns: [(0, 2), (2, 2),]);
        let mut img = GrayImage::new(4, 4);
        let config = GridDrawingConfig {
            row_color: Luma([100]),
            column_color: Luma([200]),
        };
        grid.draw(&mut img, &config).unwrap();

        assert_eq!(img.get_pixel(0, 2).0[0], 100);
        assert_eq!(img.get_pixel(2, 0).0[0], 200);
        // Columns are drawn last and win at intersections
        assert_eq!(img.get_pixel(2, 2).0[0], 200);
    }

    #[test]
    fn test_invalid_partition_propagates() {
        let img = GrayImage::new(10, 10);
        assert!(matches!(
            draw_grid_lines(&img, Partition::CellSize(3)),
            Err(GridError::InvalidGridGeometry { .. })
        ));
    }
}
