//! Asset kind definitions.

use std::fmt;
use std::str::FromStr;

use crate::error::BundleError;

/// Kind of bundled asset.
///
/// A closed enumeration: each supported kind carries its own artifact
/// extension and HTML tag shape. Unsupported kind strings are rejected at
/// the API boundary by [`FromStr`] instead of silently rendering nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// JavaScript, included via `<script src=...>`.
    Script,
    /// CSS, included via `<link rel="stylesheet" ...>`.
    Stylesheet,
}

impl AssetKind {
    /// File extension; also the `_bundled/` subdirectory name.
    pub fn ext(self) -> &'static str {
        match self {
            Self::Script => "js",
            Self::Stylesheet => "css",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}

impl FromStr for AssetKind {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "js" => Ok(Self::Script),
            "css" => Ok(Self::Stylesheet),
            other => Err(BundleError::UnknownKind(other.to_string())),
        }
    }
}
