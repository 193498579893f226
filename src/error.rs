//! Error types for the disassembler and classifier.
//!
//! Recoverable conditions (short input files, unparsable interactive input)
//! are handled locally by their callers; the variants here are the ones that
//! must surface to the operator.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for disassembly and classification operations.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The model file exists but cannot be parsed as JSON.
    #[error("corrupt model file {path}: {source}")]
    ModelParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A class in the model file has the wrong weight-vector width.
    #[error("model class {label:?} has {actual} weights, expected {expected}")]
    ModelShape {
        label: String,
        expected: usize,
        actual: usize,
    },

    /// The model defines no classes at all.
    #[error("model has no classes")]
    EmptyModel,

    /// The input buffer is too short to carve a training window from.
    #[error("buffer too small for a training window: {actual} bytes, need at least {expected}")]
    BufferTooSmall { expected: usize, actual: usize },

    /// Model serialization failed on save.
    #[error("failed to serialize model: {0}")]
    ModelSerialize(#[from] serde_json::Error),
}

/// Result type alias for disassembler/classifier operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;
