// ============================================================
// Layer 6 — Image Store
// ============================================================
// Writes decoded sample images to disk as PNG files.
//
// Output layout:
//   {work_dir}/imgs/
//     0.png
//     1.png
//     ...
//     {batch_size - 1}.png
//
// Each file is one 28x28 8-bit grayscale image. The directory
// is created on first use; existing files with the same index
// are overwritten, so re-running `sample` refreshes the folder.
//
// Reference: image crate documentation

use anyhow::{Context, Result};
use image::GrayImage;
use std::{fs, path::PathBuf};

use crate::domain::image_example::IMAGE_SIDE;

/// Persists grayscale sample images into a single directory.
pub struct ImageStore {
    /// Directory all images are written into
    dir: PathBuf,
}

impl ImageStore {
    /// Create a new ImageStore, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create image directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write one flattened grayscale image as {index}.png.
    /// `pixels` must hold exactly IMAGE_SIDE * IMAGE_SIDE bytes.
    pub fn save_grayscale(&self, index: usize, pixels: &[u8]) -> Result<PathBuf> {
        let img = GrayImage::from_raw(
            IMAGE_SIDE as u32,
            IMAGE_SIDE as u32,
            pixels.to_vec(),
        )
        .with_context(|| {
            format!(
                "Pixel buffer has {} bytes, expected {}",
                pixels.len(),
                IMAGE_SIDE * IMAGE_SIDE
            )
        })?;

        let path = self.dir.join(format!("{index}.png"));
        img.save(&path)
            .with_context(|| format!("Cannot write image '{}'", path.display()))?;

        tracing::debug!("Wrote sample image '{}'", path.display());
        Ok(path)
    }

    /// The directory this store writes into
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_buffer_size() {
        let dir = std::env::temp_dir().join("conv_vae_image_store_test");
        let store = ImageStore::new(&dir).unwrap();
        // 3 bytes is not a 28x28 image
        assert!(store.save_grayscale(0, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_writes_png_file() {
        let dir = std::env::temp_dir().join("conv_vae_image_store_test_write");
        let store = ImageStore::new(&dir).unwrap();

        let pixels = vec![128u8; IMAGE_SIDE * IMAGE_SIDE];
        let path = store.save_grayscale(7, &pixels).unwrap();

        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "7.png");

        fs::remove_file(path).ok();
    }
}
