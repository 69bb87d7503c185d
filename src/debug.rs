use std::path::Path;

use super::*;

/// Saves the annotated image of a scoring run.
///
/// The image format is chosen from the file extension.
///
/// # Errors
/// Returns [`GridError::ImageSave`] if encoding or writing fails.
pub fn save_annotated(
    scored: &ScoredImage,
    output_path: impl AsRef<Path>,
) -> Result<(), GridError> {
    let output_path = output_path.as_ref();
    tracing::debug!("Saving annotated image to {}", output_path.display());
    scored
        .annotated
        .save(output_path)
        .map_err(|source| GridError::ImageSave {
            path: output_path.to_path_buf(),
            source,
        })
}
