// ============================================================
// Layer 4 — Array File Loader
// ============================================================
// Loads the pre-converted image dataset from a NumPy .npy file.
//
// How .npy files work:
//   A .npy file is a 6-byte magic string ("\x93NUMPY"), a
//   two-byte format version, a little-endian header length,
//   and then a Python-dict-literal header describing dtype,
//   memory order, and shape. The raw array bytes follow
//   immediately after the (padded) header.
//
//   Example header:
//     {'descr': '|u1', 'fortran_order': False, 'shape': (8523, 784), }
//
// We only accept uint8 C-order arrays — that is what the
// conversion step produces. The total element count must be a
// multiple of 784 so the flat byte stream can be chunked into
// 28x28 images; the stored shape may be (n, 784), (n, 28, 28)
// or fully flat, it makes no difference after flattening.
//
// Pixels are scaled to [0, 1] floats on load, so every layer
// downstream works in normalized intensity space.
//
// Reference: NumPy .npy format specification v1.0
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::{fs, path::Path};

use crate::domain::image_example::{ImageExample, FLAT_SIZE};
use crate::domain::traits::ExampleSource;

const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Loads image examples from a single .npy file.
/// Implements the ExampleSource trait from Layer 3.
pub struct NpyLoader {
    /// Path to the .npy file
    path: String,
}

impl NpyLoader {
    /// Create a new NpyLoader pointed at an array file
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl ExampleSource for NpyLoader {
    fn load_all(&self) -> Result<Vec<ImageExample>> {
        let path = Path::new(&self.path);

        let bytes = fs::read(path)
            .with_context(|| format!("Cannot read dataset file '{}'", self.path))?;

        let pixels = parse_npy_u8(&bytes)
            .with_context(|| format!("Malformed .npy file '{}'", self.path))?;

        if pixels.is_empty() || pixels.len() % FLAT_SIZE != 0 {
            bail!(
                "Dataset '{}' holds {} pixels, which is not a multiple of {}",
                self.path,
                pixels.len(),
                FLAT_SIZE
            );
        }

        // Chunk the flat byte stream into per-image examples,
        // scaling uint8 intensities to [0, 1] floats.
        let examples: Vec<ImageExample> = pixels
            .chunks(FLAT_SIZE)
            .map(|chunk| {
                ImageExample::new(chunk.iter().map(|&b| b as f32 / 255.0).collect())
            })
            .collect();

        tracing::info!(
            "Loaded {} examples ({} pixels each) from '{}'",
            examples.len(),
            FLAT_SIZE,
            self.path
        );

        Ok(examples)
    }
}

/// Parse a .npy byte buffer holding a uint8 array.
/// Returns the raw array bytes (in stored order) on success.
fn parse_npy_u8(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < 10 || &bytes[..6] != NPY_MAGIC {
        bail!("Not a .npy file (bad magic)");
    }

    let major = bytes[6];
    let minor = bytes[7];

    // v1.0 uses a u16 header length, v2.0 and v3.0 a u32.
    let (header_len, header_start) = match major {
        1 => {
            let len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
            (len, 10usize)
        }
        2 | 3 => {
            if bytes.len() < 12 {
                bail!("Truncated .npy header");
            }
            let len =
                u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
            (len, 12usize)
        }
        _ => bail!("Unsupported .npy format version {major}.{minor}"),
    };

    let data_start = header_start + header_len;
    if bytes.len() < data_start {
        bail!("Truncated .npy header");
    }

    let header = std::str::from_utf8(&bytes[header_start..data_start])
        .context("Header is not valid UTF-8")?;

    // The dtype must be unsigned 8-bit. Byte order is irrelevant
    // for single-byte elements so '|u1', '<u1' and '>u1' all pass.
    let descr = header_descr(header);
    if !matches!(descr, "|u1" | "<u1" | ">u1" | "u1") {
        bail!("Expected a uint8 array, got dtype '{descr}'");
    }

    // Fortran order would change the pixel layout within each image.
    if header.contains("'fortran_order': True") {
        bail!("Fortran-ordered arrays are not supported");
    }

    Ok(bytes[data_start..].to_vec())
}

/// Extract the quoted value of the 'descr' key from the header dict.
/// Returns an empty string if the key is missing, which then fails
/// the dtype check with a clear message.
fn header_descr(header: &str) -> &str {
    header
        .split("'descr':")
        .nth(1)
        .and_then(|rest| rest.split('\'').nth(1))
        .unwrap_or("")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal v1.0 .npy buffer around the given payload
    fn npy_v1(descr: &str, shape: &str, payload: &[u8]) -> Vec<u8> {
        let header = format!(
            "{{'descr': '{descr}', 'fortran_order': False, 'shape': {shape}, }}\n"
        );
        let mut out = Vec::new();
        out.extend_from_slice(NPY_MAGIC);
        out.push(1);
        out.push(0);
        out.extend_from_slice(&(header.len() as u16).to_le_bytes());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn test_parses_v1_header() {
        let payload: Vec<u8> = (0..8).collect();
        let bytes = npy_v1("|u1", "(8,)", &payload);
        let parsed = parse_npy_u8(&bytes).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let err = parse_npy_u8(b"NOTNUMPYxxxx").unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_rejects_wrong_dtype() {
        let bytes = npy_v1("<f8", "(2,)", &[0u8; 16]);
        assert!(parse_npy_u8(&bytes).is_err());
    }

    #[test]
    fn test_dtype_check_reads_descr_only() {
        // 'u1' appearing in another header field must not make a
        // non-uint8 array pass the dtype check
        let header =
            "{'descr': '<f8', 'fortran_order': False, 'shape': (2,), 'note': 'u1', }\n";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(NPY_MAGIC);
        bytes.push(1);
        bytes.push(0);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        assert!(parse_npy_u8(&bytes).is_err());
    }

    #[test]
    fn test_descr_extraction() {
        assert_eq!(
            header_descr("{'descr': '|u1', 'fortran_order': False, 'shape': (8,), }"),
            "|u1"
        );
        assert_eq!(header_descr("{'fortran_order': False, }"), "");
    }

    #[test]
    fn test_rejects_fortran_order() {
        let header =
            "{'descr': '|u1', 'fortran_order': True, 'shape': (4,), }\n".to_string();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(NPY_MAGIC);
        bytes.push(1);
        bytes.push(0);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&[1, 2, 3, 4]);
        assert!(parse_npy_u8(&bytes).is_err());
    }

    #[test]
    fn test_scaling_to_unit_interval() {
        // One full image of value 255 should load as all-ones pixels
        let payload = vec![255u8; FLAT_SIZE];
        let raw = parse_npy_u8(&npy_v1("|u1", "(1, 784)", &payload)).unwrap();
        let pixels: Vec<f32> = raw.iter().map(|&b| b as f32 / 255.0).collect();
        assert_eq!(pixels.len(), FLAT_SIZE);
        assert!(pixels.iter().all(|&p| (p - 1.0).abs() < 1e-6));
    }
}
