//! Path utilities for the shared output directory.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters decide what to do on failure

mod ensure;
mod error;
mod output;

// Error type
pub use error::PathError;

// Directory operations
pub use ensure::{ensure_directory, verify_writable};

// Output directory resolution
pub use output::resolve_output_dir;
