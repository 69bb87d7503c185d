//! State behind an interactive preview.
//!
//! A front end owns one [`PreviewSession`] and calls into it from its event
//! handlers: update the parameters, re-score the selected image, display the
//! fitted overlay, and finally apply the settings to the whole folder.

use std::path::{Path, PathBuf};

use image::{imageops::FilterType, DynamicImage, GrayImage};
use tracing::*;

use crate::{
    batch::{self, BatchOptions, BatchOutcome, OnError},
    report, score_image, GridError, ScoreConfig, ScoredImage,
};

/// A preview image scaled to fit a canvas, with its top-left offset for centering.
#[derive(Debug, Clone)]
pub struct FittedPreview {
    pub image: GrayImage,
    pub offset: (u32, u32),
}

/// Holds the folder, the selected image, the parameters and the last result.
#[derive(Debug)]
pub struct PreviewSession {
    folder: PathBuf,
    images: Vec<PathBuf>,
    selected: usize,
    config: ScoreConfig,
    mask: Option<DynamicImage>,
    current: Option<ScoredImage>,
}

impl PreviewSession {
    /// Opens a session on every supported image in `folder`, selecting the first.
    pub fn open(folder: impl AsRef<Path>, config: ScoreConfig) -> Result<Self, GridError> {
        let folder = folder.as_ref();
        let images = batch::list_images(folder)?;
        Ok(Self {
            folder: folder.to_path_buf(),
            images,
            selected: 0,
            config,
            mask: None,
            current: None,
        })
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn selected_path(&self) -> &Path {
        &self.images[self.selected]
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Last successful result for the selected image, if any.
    pub fn current(&self) -> Option<&ScoredImage> {
        self.current.as_ref()
    }

    pub fn set_mask(&mut self, mask: Option<DynamicImage>) {
        self.mask = mask;
        self.current = None;
    }

    /// Selects another image; the previous result is dropped.
    pub fn select(&mut self, index: usize) -> Result<(), GridError> {
        if index >= self.images.len() {
            return Err(GridError::InvalidParameter(format!(
                "image index {index} out of range (0..{})",
                self.images.len()
            )));
        }
        self.selected = index;
        self.current = None;
        Ok(())
    }

    /// Re-scores the selected image with `config`.
    ///
    /// On failure the previous parameters and result are kept, so the user can
    /// correct the input and retry.
    pub fn update(&mut self, config: ScoreConfig) -> Result<&ScoredImage, GridError> {
        let image = batch::load_image(&self.images[self.selected])?;
        let scored = score_image(&image, &config, self.mask.as_ref())?;
        debug!(
            "Preview of {} scored {:.1}",
            self.selected_path().display(),
            scored.score
        );
        self.config = config;
        Ok(self.current.insert(scored))
    }

    /// Like [`update`](Self::update), parsing raw grid-size and threshold text fields.
    pub fn update_from_inputs(
        &mut self,
        grid_size: &str,
        threshold: &str,
    ) -> Result<&ScoredImage, GridError> {
        let config = ScoreConfig::from_inputs(grid_size, threshold)?;
        self.update(config)
    }

    /// Scores every image with the current settings and writes the report next
    /// to the images. Returns the report path and the outcome.
    pub fn apply_to_folder(&self, on_error: OnError) -> Result<(PathBuf, BatchOutcome), GridError> {
        let mut options = BatchOptions::new(self.config).with_on_error(on_error);
        options.mask = self.mask.clone();
        let outcome = batch::score_images(&self.images, &options)?;
        let path = self.folder.join(report::report_file_name(&self.config));
        report::save_csv(&path, &outcome.rows)?;
        Ok((path, outcome))
    }

    /// Scales the current overlay to fit a canvas while keeping its aspect ratio.
    ///
    /// Returns `None` when nothing has been scored yet or the canvas is not laid
    /// out (either side at most 1 pixel).
    pub fn fit_to_canvas(&self, canvas_width: u32, canvas_height: u32) -> Option<FittedPreview> {
        let current = self.current.as_ref()?;
        if canvas_width <= 1 || canvas_height <= 1 {
            return None;
        }
        let (width, height) = current.annotated.dimensions();
        let (new_width, new_height) = fit_within(width, height, canvas_width, canvas_height);
        let image = image::imageops::resize(
            &current.annotated,
            new_width,
            new_height,
            FilterType::Lanczos3,
        );
        Some(FittedPreview {
            image,
            offset: (
                (canvas_width - new_width) / 2,
                (canvas_height - new_height) / 2,
            ),
        })
    }
}

/// Largest size with the aspect ratio of `width` x `height` that fits the canvas.
///
/// # Example
/// ```
/// use gridcover::preview::fit_within;
///
/// assert_eq!(fit_within(200, 100, 400, 400), (400, 200));
/// assert_eq!(fit_within(100, 300, 300, 300), (100, 300));
/// ```
pub fn fit_within(width: u32, height: u32, canvas_width: u32, canvas_height: u32) -> (u32, u32) {
    let scale = f64::min(
        canvas_width as f64 / width as f64,
        canvas_height as f64 / height as f64,
    );
    (
        ((width as f64 * scale) as u32).clamp(1, canvas_width),
        ((height as f64 * scale) as u32).clamp(1, canvas_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(100, 100, 50, 80 => (50, 50); "square into tall canvas")]
    #[test_case(640, 480, 320, 480 => (320, 240); "width bound")]
    #[test_case(10, 1000, 500, 500 => (5, 500); "very tall")]
    #[test_case(4, 2, 2, 2 => (2, 1); "downscale small")]
    fn test_fit_within(w: u32, h: u32, cw: u32, ch: u32) -> (u32, u32) {
        fit_within(w, h, cw, ch)
    }
}
