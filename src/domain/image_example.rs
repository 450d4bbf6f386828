// ============================================================
// Layer 3 — ImageExample Domain Type
// ============================================================
// Represents a single grayscale image as a flattened vector
// of normalized pixel intensities. This is a plain data struct
// with no behaviour beyond small accessors — by the time an
// ImageExample is created, the pixels have already been decoded
// from the on-disk array format and scaled to [0, 1].
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// Side length of one square image, in pixels.
pub const IMAGE_SIDE: usize = 28;

/// Number of pixels in one flattened image (28 * 28).
pub const FLAT_SIZE: usize = IMAGE_SIDE * IMAGE_SIDE;

/// One flattened grayscale image.
///
/// Pixels are stored row-major in [0, 1] — the same layout the
/// encoder consumes and the decoder produces, so no reordering
/// happens anywhere between disk and tensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageExample {
    /// Normalized pixel intensities, length == FLAT_SIZE
    pub pixels: Vec<f32>,
}

impl ImageExample {
    /// Create a new ImageExample from already-normalized pixels.
    pub fn new(pixels: Vec<f32>) -> Self {
        Self { pixels }
    }

    /// Number of pixels in this example.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Mean pixel intensity — handy for sanity checks in logs
    /// (a blank image is ~0.0, a fully lit one is ~1.0).
    pub fn mean_intensity(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        self.pixels.iter().sum::<f32>() / self.pixels.len() as f32
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_size_matches_side() {
        assert_eq!(FLAT_SIZE, IMAGE_SIDE * IMAGE_SIDE);
    }

    #[test]
    fn test_mean_intensity() {
        let ex = ImageExample::new(vec![0.0, 1.0, 0.5, 0.5]);
        assert!((ex.mean_intensity() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mean_intensity_empty() {
        let ex = ImageExample::new(Vec::new());
        assert_eq!(ex.mean_intensity(), 0.0);
    }
}
