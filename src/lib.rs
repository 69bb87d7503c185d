//! This crate scores how much of an image is covered by foreground pixels.
//! It overlays a grid on a grayscale image, classifies every cell against a density
//! threshold and reduces the result to a single percentage. It uses the `image` and
//! `imageproc` crates for image manipulation and `insta` for snapshot testing.
//!
//! # Example
//! ```
//! use gridcover::*;
//! use image::{DynamicImage, GrayImage, Luma};
//!
//! // Left half white, right half black
//! let img = GrayImage::from_fn(100, 100, |x, _y| Luma([if x < 50 { 255 } else { 0 }]));
//! let img = DynamicImage::ImageLuma8(img);
//!
//! let scored = score_image(&img, &ScoreConfig::default(), None).unwrap();
//! assert_eq!(scored.score, 50.0);
//! assert_eq!(scored.cell_count(), 100);
//! ```

/// Batch scoring of every supported image in a folder.
///
/// # Example
/// ```no_run
/// use gridcover::{batch::*, ScoreConfig};
///
/// let images = list_images("scans").unwrap();
/// let options = BatchOptions::new(ScoreConfig::default());
/// let outcome = score_images(&images, &options).unwrap();
/// for row in &outcome.rows {
///     println!("{}: {:.1}", row.image_name, row.score);
/// }
/// ```
pub mod batch;
/// Debug module for saving annotated images to disk.
///
/// # Example
/// ```no_run
/// use gridcover::*;
///
/// let img = image::open("scan.png").unwrap();
/// let scored = score_image(&img, &ScoreConfig::default(), None).unwrap();
/// gridcover::debug::save_annotated(&scored, "scan_grid.png").unwrap();
/// ```
pub mod debug;
/// This module provides functionality for drawing cell boundaries on grayscale images.
///
/// The main components of this module are:
/// - [`drawing::GridDrawingConfig`]: Configuration for the line intensity.
/// - [`drawing::Drawable`]: A trait implemented by types that can be drawn on an image,
///   such as [`Grid`].
/// - [`drawing::draw_grid_lines`]: Returns an annotated copy of an image for a [`Partition`].
pub mod drawing;
pub mod grid;
pub mod grid_like;
pub mod mask;
pub mod preview;
pub mod report;
pub mod resolver;
pub mod score;

use std::path::PathBuf;

use thiserror::Error;

pub use grid::{
    common_cell_sizes,
    components::{Cell, Column, Row},
    config::ScoreConfig,
    new_grid_like::LineTrait,
    partition::Partition,
    Grid, SmallVecLine, Span,
};
pub use grid_like::GridLike;
pub use score::{score_gray, score_image, CellKind, CellScore, ScoredImage};

// Determined through benchmarking typical use cases
const DEFAULT_SMALLVEC_SIZE: usize = 32;

/// Grid count used when nothing else is configured (10x10 cells).
pub const DEFAULT_GRID_SIZE: u32 = 10;
/// Threshold paired with [`DEFAULT_GRID_SIZE`].
pub const DEFAULT_THRESHOLD_PCT: f64 = 25.0;
/// Cell size used by pixel-based runs when nothing else is configured.
pub const DEFAULT_CELL_SIZE_PX: u32 = 50;
/// Threshold paired with [`DEFAULT_CELL_SIZE_PX`].
pub const DEFAULT_PIXEL_THRESHOLD_PCT: f64 = 50.0;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid grid geometry for {width}x{height} image: {reason}")]
    InvalidGridGeometry {
        width: u32,
        height: u32,
        reason: String,
        /// Cell sizes that divide both dimensions, offered as a hint.
        valid_cell_sizes: Vec<u32>,
    },

    #[error("Mask is {mask_width}x{mask_height} but image is {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("Invalid image dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("No image files found in {0}")]
    NoImages(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Creates a `Row` or `Column` instance from a `(start, length)` tuple.
///
/// # Examples
///
/// ```rust
/// use gridcover::*;
///
/// let row = make_line!(Row, (10, 20));
/// assert_eq!(row.y, 10);
/// assert_eq!(row.height, 20);
///
/// let column = make_line!(Column, (5, 15));
/// assert_eq!(column.x, 5);
/// assert_eq!(column.width, 15);
/// ```
#[macro_export]
macro_rules! make_line {
    (Row, ($y:expr, $height:expr)) => {
        <$crate::Row as $crate::LineTrait>::new($crate::Span::new($y, $height))
    };
    (Column, ($x:expr, $width:expr)) => {
        <$crate::Column as $crate::LineTrait>::new($crate::Span::new($x, $width))
    };
}

/// Creates a `Grid` instance from lists of rows and columns.
///
/// Each tuple is `(start, length)` and is turned into a [`Row`] or [`Column`]
/// with [`make_line!`].
///
/// ```rust
/// use gridcover::{make_grid, GridLike};
///
/// let grid = make_grid!(
///     rows: [
///         (0, 10),
///         (10, 20),
///     ],
///     columns: [
///         (0, 5),
///         (5, 15),
///     ]
/// );
///
/// assert_eq!(grid.row_count(), 2);
/// assert_eq!(grid.cell_count(), 4);
/// ```
#[macro_export]
macro_rules! make_grid {
    (rows: [$($row:tt,)*], columns: [$($col:tt,)*]) => {{
        $crate::Grid::new(
            $crate::SmallVecLine::from_vec(vec![
                $($crate::make_line!(Row, $row)),*
            ]),
            $crate::SmallVecLine::from_vec(vec![
                $($crate::make_line!(Column, $col)),*
            ]),
        )
    }};
}
