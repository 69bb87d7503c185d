//! Folder scanning and batch scoring.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::*;

use crate::{debug, score_image, GridError, ScoreConfig};

/// File extensions picked up from a folder, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff"];

/// What to do when one image fails to load or score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Stop at the first failure and return it.
    #[default]
    Abort,
    /// Log the failure, record it and move on.
    Skip,
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResultRow {
    pub image_name: String,
    pub score: f64,
}

/// An image that contributed no row.
#[derive(Debug)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub error: GridError,
}

/// Rows in input order, plus the images skipped under [`OnError::Skip`].
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub rows: Vec<ResultRow>,
    pub skipped: Vec<SkippedImage>,
}

/// Settings for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub config: ScoreConfig,
    /// Applied to every image; images of a different size fail individually.
    pub mask: Option<DynamicImage>,
    pub on_error: OnError,
    /// When set, the annotated image of every scored file is saved here as PNG.
    pub overlay_dir: Option<PathBuf>,
}

impl BatchOptions {
    pub fn new(config: ScoreConfig) -> Self {
        Self {
            config,
            mask: None,
            on_error: OnError::default(),
            overlay_dir: None,
        }
    }

    pub fn with_mask(mut self, mask: DynamicImage) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn with_overlay_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.overlay_dir = Some(dir.into());
        self
    }
}

/// Lists the supported image files directly inside `folder`, sorted by file name.
///
/// # Errors
/// [`GridError::Io`] if the folder cannot be read, [`GridError::NoImages`] if it
/// holds no supported image.
pub fn list_images(folder: impl AsRef<Path>) -> Result<Vec<PathBuf>, GridError> {
    let folder = folder.as_ref();
    let mut images = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            images.push(path);
        }
    }
    if images.is_empty() {
        return Err(GridError::NoImages(folder.to_path_buf()));
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} images in {}", images.len(), folder.display());
    Ok(images)
}

/// Whether the path carries one of [`IMAGE_EXTENSIONS`].
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Loads an image from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, GridError> {
    image::open(path).map_err(|source| GridError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// File name used in the report for `path`.
pub fn image_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// PNG file name for the overlay of `path`.
///
/// The source extension is kept in the name so `a.png` and `a.jpg` in the same
/// folder get separate overlays.
///
/// # Example
/// ```
/// use gridcover::batch::overlay_file_name;
/// use std::path::Path;
///
/// assert_eq!(overlay_file_name(Path::new("scans/a.jpg")), "a_jpg_grid.png");
/// ```
pub fn overlay_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    match path.extension() {
        Some(ext) => format!("{stem}_{}_grid.png", ext.to_string_lossy()),
        None => format!("{stem}_grid.png"),
    }
}

/// Scores every image in order.
///
/// Under [`OnError::Abort`] the first failure is returned and no outcome is
/// produced; under [`OnError::Skip`] failures are collected in
/// [`BatchOutcome::skipped`] and never add a row.
pub fn score_images(
    images: &[PathBuf],
    options: &BatchOptions,
) -> Result<BatchOutcome, GridError> {
    info!(
        "Scoring {} images with {} at {}%",
        images.len(),
        options.config.partition,
        options.config.threshold_pct
    );
    if let Some(dir) = &options.overlay_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut outcome = BatchOutcome::default();
    for path in images {
        match score_one(path, options) {
            Ok(row) => {
                info!("{}: {:.1}", row.image_name, row.score);
                outcome.rows.push(row);
            }
            Err(error) => match options.on_error {
                OnError::Abort => {
                    error!("Aborting batch at {}: {}", path.display(), error);
                    return Err(error);
                }
                OnError::Skip => {
                    warn!("Skipping {}: {}", path.display(), error);
                    outcome.skipped.push(SkippedImage {
                        path: path.clone(),
                        error,
                    });
                }
            },
        }
    }
    Ok(outcome)
}

fn score_one(path: &Path, options: &BatchOptions) -> Result<ResultRow, GridError> {
    let image = load_image(path)?;
    let scored = score_image(&image, &options.config, options.mask.as_ref())?;
    if let Some(dir) = &options.overlay_dir {
        debug::save_annotated(&scored, dir.join(overlay_file_name(path)))?;
    }
    Ok(ResultRow {
        image_name: image_name(path),
        score: scored.score,
    })
}
