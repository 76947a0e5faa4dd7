//! Versioned cache file for visualization state.
//!
//! The state is stored as a tagged JSON envelope rather than an opaque
//! object dump, so an old binary reading a newer cache fails with an
//! explicit version error instead of misinterpreting the payload.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::state::VisualizationState;

/// Current cache envelope version. Bump on any incompatible change to
/// [`VisualizationState`] or the envelope itself.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Errors raised while saving or loading a cache file.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache file does not exist.
    #[error("cache file not found: {0}")]
    NotFound(PathBuf),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cache body is not valid JSON or does not match the schema.
    #[error("corrupt cache file: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The cache was written by an incompatible format version.
    #[error("incompatible cache format version {found} (this build reads version {expected})")]
    IncompatibleVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
}

#[derive(Serialize, Deserialize)]
struct CacheEnvelope {
    format_version: u32,
    created: String,
    state: VisualizationState,
}

/// Minimal probe used to read the version tag before committing to the
/// full state deserialization.
#[derive(Deserialize)]
struct VersionProbe {
    format_version: u32,
}

/// Serialize the full visualization state to `path`.
pub fn save_cache(state: &VisualizationState, path: &Path) -> Result<(), CacheError> {
    let envelope = CacheEnvelope {
        format_version: CACHE_FORMAT_VERSION,
        created: chrono::Utc::now().to_rfc3339(),
        state: state.clone(),
    };
    let body = serde_json::to_vec(&envelope)?;
    fs::write(path, body)?;
    Ok(())
}

/// Restore a visualization state from `path`.
///
/// A missing file is a hard error, never a silent empty state.
pub fn load_cache(path: &Path) -> Result<VisualizationState, CacheError> {
    if !path.exists() {
        return Err(CacheError::NotFound(path.to_path_buf()));
    }

    let body = fs::read(path)?;

    let probe: VersionProbe = serde_json::from_slice(&body)?;
    if probe.format_version != CACHE_FORMAT_VERSION {
        return Err(CacheError::IncompatibleVersion {
            found: probe.format_version,
            expected: CACHE_FORMAT_VERSION,
        });
    }

    let envelope: CacheEnvelope = serde_json::from_slice(&body)?;
    Ok(envelope.state)
}
