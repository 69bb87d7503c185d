//! Grid coverage scoring.
//!
//! The image is reduced to intensity, optionally composited through an exclusion
//! mask, partitioned into cells, and every cell whose share of non-zero pixels
//! reaches the threshold counts as a hit. The score is the share of hit cells.

use image::{DynamicImage, GenericImageView, GrayImage};
use imageproc::rect::Rect;
use tracing::*;

use crate::{
    drawing::{Drawable, GridDrawingConfig},
    mask, Cell, Grid, GridError, GridLike, ScoreConfig,
};

/// Classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CellKind {
    /// Foreground share below the threshold.
    Miss,
    /// Foreground share at or above the threshold.
    Hit,
}

/// Per-cell measurement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellScore {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Pixels with intensity > 0.
    pub foreground: u32,
    pub percentage: f64,
    pub kind: CellKind,
}

/// The outcome of scoring one image.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScoredImage {
    /// Hit cells over all cells, in percent, one decimal place.
    pub score: f64,
    pub hits: u32,
    pub grid: Grid,
    /// Row-major, matching [`Grid::cells`].
    pub cells: Vec<CellScore>,
    /// The scored (possibly masked) intensity image with cell boundaries drawn on it.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub annotated: GrayImage,
}

impl ScoredImage {
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Scores an image of any color type.
///
/// Color images are converted to 8-bit luminance first. When a mask is given
/// it must match the image dimensions; it is checked before anything else.
///
/// # Errors
/// - [`GridError::DimensionMismatch`] when the mask size differs from the image size.
/// - [`GridError::InvalidParameter`] for a threshold outside 0-100 or a zero grid/cell size.
/// - [`GridError::InvalidGridGeometry`] when the partition does not fit the image.
///
/// # Example
/// ```
/// use gridcover::{score_image, Partition, ScoreConfig};
/// use image::{DynamicImage, RgbImage, Rgb};
///
/// let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([255, 255, 255])));
/// let config = ScoreConfig::new(Partition::CellSize(25), 100.0);
/// let scored = score_image(&img, &config, None).unwrap();
/// assert_eq!(scored.score, 100.0);
/// assert_eq!(scored.cell_count(), 16);
/// ```
pub fn score_image(
    image: &DynamicImage,
    config: &ScoreConfig,
    mask: Option<&DynamicImage>,
) -> Result<ScoredImage, GridError> {
    if let Some(mask) = mask {
        let (width, height) = image.dimensions();
        mask::ensure_same_dimensions(mask, width, height)?;
    }
    let gray = image.to_luma8();
    score_gray(&gray, config, mask)
}

/// Scores an image that is already single-channel.
pub fn score_gray(
    image: &GrayImage,
    config: &ScoreConfig,
    mask: Option<&DynamicImage>,
) -> Result<ScoredImage, GridError> {
    trace!("Scoring image with config: {:?}", config);
    let (width, height) = image.dimensions();
    if let Some(mask) = mask {
        mask::ensure_same_dimensions(mask, width, height)?;
    }
    config.validate()?;
    let grid = config.partition.layout(width, height)?;

    let composited;
    let scored: &GrayImage = match mask {
        Some(mask) => {
            composited = mask::apply_exclusion_mask(image, mask)?;
            &composited
        }
        None => image,
    };

    let cells: Vec<CellScore> = grid
        .cells()
        .map(|cell| score_cell(scored, &cell, config.threshold_pct))
        .collect();
    let hits = cells.iter().filter(|c| c.kind == CellKind::Hit).count() as u32;
    let score = normalised_score(hits, grid.cell_count() as u32);
    debug!(
        "{} of {} cells at or above {}% -> {:.1}",
        hits,
        grid.cell_count(),
        config.threshold_pct,
        score
    );

    let mut annotated = scored.clone();
    grid.draw(&mut annotated, &GridDrawingConfig::default())?;

    Ok(ScoredImage {
        score,
        hits,
        grid,
        cells,
        annotated,
    })
}

fn score_cell(image: &GrayImage, cell: &Cell, threshold_pct: f64) -> CellScore {
    let rect = Rect::from(cell);
    let (x, y) = (rect.left() as u32, rect.top() as u32);
    let (width, height) = (rect.width(), rect.height());
    let stride = image.width() as usize;
    let raw = image.as_raw();

    let foreground: u32 = (y..y + height)
        .map(|row| {
            let start = row as usize * stride + x as usize;
            raw[start..start + width as usize]
                .iter()
                .filter(|&&p| p > 0)
                .count() as u32
        })
        .sum();
    let percentage = foreground as f64 / cell.pixel_count() as f64 * 100.0;
    let kind = if percentage >= threshold_pct {
        CellKind::Hit
    } else {
        CellKind::Miss
    };
    trace!(
        "Cell at ({}, {}) {}x{}: {:.2}% foreground, {:?}",
        x,
        y,
        width,
        height,
        percentage,
        kind
    );

    CellScore {
        x,
        y,
        width,
        height,
        foreground,
        percentage,
        kind,
    }
}

/// `100 * hits / cells`, rounded half-up to one decimal place.
///
/// Computed on integers so the same inputs give the same score everywhere.
///
/// # Example
/// ```
/// use gridcover::score::normalised_score;
///
/// assert_eq!(normalised_score(1, 3), 33.3);
/// assert_eq!(normalised_score(2, 3), 66.7);
/// assert_eq!(normalised_score(1, 16), 6.3);
/// ```
pub fn normalised_score(hits: u32, cells: u32) -> f64 {
    if cells == 0 {
        return 0.0;
    }
    let (hits, cells) = (hits as u64, cells as u64);
    let tenths = (2000 * hits + cells) / (2 * cells);
    tenths as f64 / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Partition;
    use image::Luma;
    use proptest::prelude::*;
    use test_case::test_case;

    fn gray(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([value]))
    }

    #[test_case(Partition::Count(10), 25.0; "count grid")]
    #[test_case(Partition::CellSize(20), 0.1; "pixel grid low threshold")]
    #[test_case(Partition::CellSize(100), 100.0; "single cell full threshold")]
    fn test_black_image_scores_zero(partition: Partition, threshold: f64) {
        let config = ScoreConfig::new(partition, threshold);
        let scored = score_gray(&gray(100, 100, 0), &config, None).unwrap();
        assert_eq!(scored.score, 0.0);
        assert_eq!(scored.hits, 0);
    }

    #[test]
    fn test_black_image_with_zero_threshold_scores_full() {
        let scored = score_gray(
            &gray(100, 100, 0),
            &ScoreConfig::new(Partition::Count(10), 0.0),
            None,
        )
        .unwrap();
        assert_eq!(scored.score, 100.0);
    }

    #[test_case(0.0; "zero")]
    #[test_case(25.0; "quarter")]
    #[test_case(100.0; "full")]
    fn test_white_image_scores_full(threshold: f64) {
        let scored = score_gray(
            &gray(101, 101, 255),
            &ScoreConfig::new(Partition::Count(10), threshold),
            None,
        )
        .unwrap();
        assert_eq!(scored.score, 100.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // Each 2x2 cell has exactly one lit pixel: 25% foreground
        let img = GrayImage::from_fn(4, 4, |x, y| {
            Luma([if x % 2 == 0 && y % 2 == 0 { 1 } else { 0 }])
        });
        let partition = Partition::CellSize(2);
        let at = score_gray(&img, &ScoreConfig::new(partition, 25.0), None).unwrap();
        let above = score_gray(&img, &ScoreConfig::new(partition, 25.5), None).unwrap();
        assert_eq!(at.score, 100.0);
        assert_eq!(above.score, 0.0);
        assert!(at.cells.iter().all(|c| c.percentage == 25.0));
    }

    #[test]
    fn test_partial_coverage() {
        // Top 30 rows lit: 3 of 10 grid rows
        let img = GrayImage::from_fn(100, 100, |_x, y| Luma([if y < 30 { 200 } else { 0 }]));
        let scored = score_gray(&img, &ScoreConfig::default(), None).unwrap();
        assert_eq!(scored.score, 30.0);
        assert_eq!(scored.hits, 30);
    }

    #[test]
    fn test_boundary_cells_absorb_remainder() {
        // Only the last pixel column is lit. With 10 columns over 101 pixels the
        // last column is 11 wide, so 1/11 of each boundary cell is foreground.
        let img = GrayImage::from_fn(101, 101, |x, _y| {
            Luma([if x == 100 { 255 } else { 0 }])
        });
        let scored =
            score_gray(&img, &ScoreConfig::new(Partition::Count(10), 9.0), None).unwrap();
        assert_eq!(scored.cell_count(), 100);
        assert_eq!(scored.hits, 10);
        assert_eq!(scored.score, 10.0);
        let last = scored.cells.last().unwrap();
        assert_eq!((last.width, last.height, last.foreground), (11, 11, 11));
    }

    #[test]
    fn test_color_image_is_reduced_to_intensity() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            10,
            10,
            image::Rgb([0, 0, 40]),
        ));
        let config = ScoreConfig::new(Partition::Count(2), 100.0);
        let scored = score_image(&img, &config, None).unwrap();
        assert_eq!(scored.score, 100.0);
    }

    #[test]
    fn test_mask_polarity() {
        // White image; mask excludes the left half (non-zero) and keeps the right half (zero)
        let img = DynamicImage::ImageLuma8(gray(10, 10, 255));
        let mask = DynamicImage::ImageLuma8(GrayImage::from_fn(10, 10, |x, _y| {
            Luma([if x < 5 { 255 } else { 0 }])
        }));
        let config = ScoreConfig::new(Partition::Count(2), 50.0);
        let scored = score_image(&img, &config, Some(&mask)).unwrap();

        assert_eq!(scored.score, 50.0);
        let kinds: Vec<CellKind> = scored.cells.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![CellKind::Miss, CellKind::Hit, CellKind::Miss, CellKind::Hit]
        );
        // Excluded pixels are background in the annotated image
        assert_eq!(scored.annotated.get_pixel(0, 0).0[0], 0);
        assert_eq!(scored.annotated.get_pixel(8, 8).0[0], 255);
    }

    #[test]
    fn test_mask_straddling_cell_reduces_foreground_only() {
        let img = DynamicImage::ImageLuma8(gray(4, 4, 255));
        let mask = DynamicImage::ImageLuma8(GrayImage::from_fn(4, 4, |x, y| {
            Luma([if x == 0 && y == 0 { 1 } else { 0 }])
        }));
        let config = ScoreConfig::new(Partition::CellSize(2), 80.0);
        let scored = score_image(&img, &config, Some(&mask)).unwrap();
        assert_eq!(scored.cells[0].foreground, 3);
        assert_eq!(scored.cells[0].percentage, 75.0);
        assert_eq!(scored.score, 75.0);
    }

    #[test]
    fn test_mask_mismatch_checked_before_other_parameters() {
        let img = DynamicImage::ImageLuma8(gray(100, 100, 255));
        let mask = DynamicImage::ImageLuma8(gray(99, 100, 0));
        // Invalid threshold and invalid geometry still report the mask first
        let config = ScoreConfig::new(Partition::CellSize(30), 150.0);
        assert!(matches!(
            score_image(&img, &config, Some(&mask)),
            Err(GridError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_geometry_and_parameters() {
        let img = gray(100, 100, 255);
        assert!(matches!(
            score_gray(&img, &ScoreConfig::new(Partition::CellSize(30), 50.0), None),
            Err(GridError::InvalidGridGeometry { .. })
        ));
        assert!(matches!(
            score_gray(&img, &ScoreConfig::new(Partition::Count(10), 100.1), None),
            Err(GridError::InvalidParameter(_))
        ));
        assert!(matches!(
            score_gray(&img, &ScoreConfig::new(Partition::Count(0), 50.0), None),
            Err(GridError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_input_image_is_not_mutated() {
        let img = gray(20, 20, 7);
        let config = ScoreConfig::new(Partition::Count(4), 50.0);
        let scored = score_gray(&img, &config, None).unwrap();
        assert!(img.pixels().all(|p| p.0[0] == 7));
        assert_eq!(scored.annotated.get_pixel(5, 1).0[0], 255);
        assert_eq!(scored.annotated.get_pixel(1, 1).0[0], 7);
    }

    #[test_case(0, 7 => 0.0)]
    #[test_case(7, 7 => 100.0)]
    #[test_case(1, 8 => 12.5)]
    #[test_case(1, 6 => 16.7)]
    #[test_case(1, 400 => 0.3; "quarter tenth rounds up")]
    #[test_case(1, 2000 => 0.1; "half tenth rounds up")]
    #[test_case(1, 2001 => 0.0; "just below half tenth")]
    fn test_normalised_score(hits: u32, cells: u32) -> f64 {
        normalised_score(hits, cells)
    }

    proptest! {
        #[test]
        fn test_score_is_bounded_with_one_decimal(
            width in 1..60u32,
            height in 1..60u32,
            n in 1..10u32,
            threshold in 0.0..=100.0f64,
            seed in any::<u64>(),
        ) {
            prop_assume!(n <= width && n <= height);
            let img = GrayImage::from_fn(width, height, |x, y| {
                let h = (x as u64 * 31 + y as u64 * 17) ^ seed;
                Luma([if h % 3 == 0 { 0 } else { (h % 256) as u8 }])
            });
            let config = ScoreConfig::new(Partition::Count(n), threshold);
            let scored = score_gray(&img, &config, None).unwrap();

            prop_assert!((0.0..=100.0).contains(&scored.score));
            let tenths = scored.score * 10.0;
            prop_assert!((tenths - tenths.round()).abs() < 1e-9);
            prop_assert_eq!(scored.cell_count(), (n * n) as usize);
        }
    }
}
