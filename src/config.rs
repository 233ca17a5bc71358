//! Bundler configuration.
//!
//! Every field is optional except `root_path`, which `validate()` enforces.
//! Options can be built in code or deserialized from TOML:
//!
//! ```toml
//! root_path = "public"
//! minify = true
//! url_prefix = "/static"
//! version = "20260829"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::BundleError;

/// Configuration for a [`Bundler`](crate::Bundler).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerOptions {
    /// Filesystem root under which source files live and compiled
    /// artifacts are written (`<root_path>/_bundled/...`). Required.
    pub root_path: PathBuf,

    /// Minify artifacts after concatenation.
    pub minify: bool,

    /// When false, render one tag per source file and never touch disk
    /// (dev mode).
    pub enabled: bool,

    /// Prepended to every generated URL, e.g. a CDN origin or mount point.
    pub url_prefix: String,

    /// Cache-busting token; appended to URLs as `?_v=<version>` when set
    /// to a non-empty value.
    pub version: Option<String>,

    /// Add `crossorigin="anonymous"` to script tags.
    pub allow_cors: bool,
}

impl Default for BundlerOptions {
    fn default() -> Self {
        Self {
            root_path: PathBuf::new(),
            minify: true,
            enabled: true,
            url_prefix: String::new(),
            version: None,
            allow_cors: false,
        }
    }
}

impl BundlerOptions {
    /// Options rooted at `root_path`, with defaults everywhere else.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            ..Self::default()
        }
    }

    /// Parse options from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, BundleError> {
        Ok(toml::from_str(s)?)
    }

    /// Check that required fields are present.
    pub fn validate(&self) -> Result<(), BundleError> {
        if self.root_path.as_os_str().is_empty() {
            return Err(BundleError::Config("root_path is required".to_string()));
        }
        Ok(())
    }
}
