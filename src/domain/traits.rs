// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - NpyLoader implements ExampleSource
//   - A future IdxLoader could also implement ExampleSource
//   - The application layer only sees ExampleSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::image_example::ImageExample;

// ─── ExampleSource ────────────────────────────────────────────────────────────
/// Any component that can load image examples from a source.
///
/// Implementations:
///   - NpyLoader → loads a pre-converted NumPy array file
///   - (future) IdxLoader → loads the raw MNIST idx format
pub trait ExampleSource {
    /// Load all available examples from this source.
    /// Returns a Vec of ImageExamples or an error.
    fn load_all(&self) -> Result<Vec<ImageExample>>;
}
