//! Exclusion masks.
//!
//! A mask is an image the same size as the analysed image. A mask pixel whose
//! color channels are all `0` keeps the image pixel; any non-zero sample excludes
//! it, and the excluded pixel is replaced by black background before the grid is
//! scored. Samples are compared at the mask's own bit depth and alpha is ignored.
//! Note the polarity: black in the mask means "keep".

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use tracing::*;

use crate::GridError;

/// Checks that `mask` has the same dimensions as an image of `width` x `height`.
pub fn ensure_same_dimensions(
    mask: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<(), GridError> {
    let (mask_width, mask_height) = mask.dimensions();
    if (mask_width, mask_height) != (width, height) {
        error!(
            "Mask is {}x{} but image is {}x{}",
            mask_width, mask_height, width, height
        );
        return Err(GridError::DimensionMismatch {
            width,
            height,
            mask_width,
            mask_height,
        });
    }
    Ok(())
}

/// Composites `image` against black through the exclusion mask.
///
/// Pixels where the mask is `0` keep their intensity; every other pixel becomes
/// `0`. The input image is not modified.
///
/// # Example
/// ```
/// use gridcover::mask::apply_exclusion_mask;
/// use image::{DynamicImage, GrayImage, Luma};
///
/// let image = GrayImage::from_pixel(2, 1, Luma([200]));
/// let mask = DynamicImage::ImageLuma8(GrayImage::from_raw(2, 1, vec![0, 255]).unwrap());
///
/// let out = apply_exclusion_mask(&image, &mask).unwrap();
/// assert_eq!(out.as_raw(), &vec![200, 0]);
/// ```
pub fn apply_exclusion_mask(
    image: &GrayImage,
    mask: &DynamicImage,
) -> Result<GrayImage, GridError> {
    let (width, height) = image.dimensions();
    ensure_same_dimensions(mask, width, height)?;

    // Float channels keep every non-zero sample non-zero, whatever the source depth
    let mask = mask.to_rgb32f();
    let mut excluded = 0usize;
    let composited = GrayImage::from_fn(width, height, |x, y| {
        if mask.get_pixel(x, y).0.iter().all(|&sample| sample == 0.0) {
            *image.get_pixel(x, y)
        } else {
            excluded += 1;
            Luma([0])
        }
    });
    debug!(
        "Mask excluded {} of {} pixels",
        excluded,
        width as u64 * height as u64
    );
    Ok(composited)
}
