//! Error types for bundle registration, compilation, and rendering.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the bundling pipeline.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Reading a source file or writing an artifact failed.
    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] io::Error),

    /// Render was requested for a group that was never registered.
    #[error("bundle group '{0}' does not exist")]
    GroupNotFound(String),

    /// An asset kind string at the API boundary was not recognized.
    #[error("unknown asset kind '{0}' (expected 'js' or 'css')")]
    UnknownKind(String),

    /// Options parsing error.
    #[error("options parsing error")]
    Toml(#[from] toml::de::Error),

    /// Options failed validation.
    #[error("invalid bundler options: {0}")]
    Config(String),
}

/// Minifier failures, kept apart from I/O errors.
///
/// Compilation logs these and falls back to the unminified buffer, so a
/// syntax error in one source file never takes the page down.
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("JS minification failed: {0}")]
    Js(String),

    #[error("CSS minification failed: {0}")]
    Css(String),
}
