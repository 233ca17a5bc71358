//! A named, ordered collection of source files per asset kind.
//!
//! A [`Bundle`] knows how to concatenate its registered files into one
//! artifact on disk and how to emit the HTML tags referencing either that
//! artifact or the individual files (dev mode).

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::error::BundleError;
use crate::hash;
use crate::kind::AssetKind;

/// Directory under the root path that holds compiled artifacts.
pub const BUNDLED_DIR: &str = "_bundled";

/// An ordered collection of source file paths, partitioned by asset kind.
///
/// Registration order is significant: files are concatenated and rendered
/// in the order they were added. Duplicates are allowed and concatenated
/// twice. Paths are relative to the bundler's root path and appear
/// verbatim in generated URLs, so they should use forward slashes.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    name: String,
    url_prefix: String,
    files: FxHashMap<AssetKind, Vec<String>>,
}

impl Bundle {
    pub(crate) fn new(name: impl Into<String>, url_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_prefix: url_prefix.into(),
            files: FxHashMap::default(),
        }
    }

    /// Bundle name, unique within the owning [`Bundler`](crate::Bundler).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered files for `kind`, in registration order.
    pub fn files(&self, kind: AssetKind) -> &[String] {
        self.files.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Append a file to the ordered list for `kind`.
    pub fn add_file(&mut self, kind: AssetKind, path: impl Into<String>) -> &mut Self {
        self.files.entry(kind).or_default().push(path.into());
        self
    }

    /// Append a JavaScript file. Chains.
    pub fn add_js(&mut self, path: impl Into<String>) -> &mut Self {
        self.add_file(AssetKind::Script, path)
    }

    /// Append a stylesheet. Chains.
    pub fn add_css(&mut self, path: impl Into<String>) -> &mut Self {
        self.add_file(AssetKind::Stylesheet, path)
    }

    /// URL path of the compiled artifact for `kind`.
    pub fn artifact_url_path(&self, kind: AssetKind) -> String {
        let ext = kind.ext();
        format!("/{BUNDLED_DIR}/{ext}/{}_bundle.{ext}", self.name)
    }

    /// On-disk location of the compiled artifact for `kind`.
    pub fn artifact_path(&self, root: &Path, kind: AssetKind) -> PathBuf {
        let ext = kind.ext();
        root.join(BUNDLED_DIR)
            .join(ext)
            .join(format!("{}_bundle.{ext}", self.name))
    }

    /// Read every registered file for `kind`, in registration order.
    ///
    /// Returns `Ok(None)` when nothing is registered. A missing or
    /// unreadable source fails the whole pass with the offending path.
    fn read_sources(
        &self,
        root: &Path,
        kind: AssetKind,
    ) -> Result<Option<Vec<(String, String)>>, BundleError> {
        let files = self.files(kind);
        if files.is_empty() {
            return Ok(None);
        }

        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            let full = root.join(file);
            let content =
                fs::read_to_string(&full).map_err(|e| BundleError::Io(full.clone(), e))?;
            sources.push((file.clone(), content));
        }
        Ok(Some(sources))
    }

    /// Fingerprint of the registered file list and contents for `kind`.
    ///
    /// Covers both the paths and the file bytes, so editing a source file
    /// or the registration list changes the fingerprint. `Ok(None)` when
    /// no files are registered.
    pub fn fingerprint(
        &self,
        root: &Path,
        kind: AssetKind,
    ) -> Result<Option<String>, BundleError> {
        let Some(sources) = self.read_sources(root, kind)? else {
            return Ok(None);
        };
        let chunks = sources
            .iter()
            .flat_map(|(path, content)| [path.as_bytes(), content.as_bytes()]);
        Ok(Some(hash::fingerprint(chunks)))
    }

    /// Concatenate registered files for `kind` into the artifact file.
    ///
    /// No-op when nothing is registered. Each file's content is preceded
    /// by a separator comment carrying its relative path. With `minify`
    /// set, the buffer is minified in memory before the single write, so
    /// the artifact is never observable half-minified; a minifier failure
    /// is logged and the unminified buffer is written instead.
    pub fn compile(&self, root: &Path, kind: AssetKind, minify: bool) -> Result<(), BundleError> {
        let Some(sources) = self.read_sources(root, kind)? else {
            return Ok(());
        };

        let dir = root.join(BUNDLED_DIR).join(kind.ext());
        fs::create_dir_all(&dir).map_err(|e| BundleError::Io(dir.clone(), e))?;

        let mut combined = String::new();
        for (path, content) in &sources {
            combined.push_str("\n/*bundled file ->");
            combined.push_str(path);
            combined.push_str("*/\n");
            combined.push_str(content);
        }

        let output = if minify {
            match crate::minify::minify(kind, &combined) {
                Ok(minified) => minified,
                Err(err) => {
                    warn!(bundle = %self.name, kind = %kind, %err, "writing unminified artifact");
                    combined
                }
            }
        } else {
            combined
        };

        let artifact = self.artifact_path(root, kind);
        fs::write(&artifact, output).map_err(|e| BundleError::Io(artifact.clone(), e))?;
        debug!(bundle = %self.name, kind = %kind, files = sources.len(), "compiled artifact");
        Ok(())
    }

    /// Render HTML include tags.
    ///
    /// Bundle mode emits one tag referencing the compiled artifact, or an
    /// empty string when nothing is registered for `kind`. Per-file mode
    /// emits one tag per registered file, in order, with no separator.
    pub fn render(
        &self,
        version: Option<&str>,
        kind: AssetKind,
        as_bundle: bool,
        cors: bool,
    ) -> String {
        if as_bundle {
            if self.files(kind).is_empty() {
                return String::new();
            }
            return self.html_include(version, kind, &self.artifact_url_path(kind), cors);
        }

        self.files(kind)
            .iter()
            .map(|path| self.html_include(version, kind, path, cors))
            .collect()
    }

    /// Build one include tag for `rel_path`, applying prefix and version.
    fn html_include(
        &self,
        version: Option<&str>,
        kind: AssetKind,
        rel_path: &str,
        cors: bool,
    ) -> String {
        let mut url = String::new();
        if !self.url_prefix.is_empty() {
            url.push_str(&self.url_prefix);
        }
        url.push_str(rel_path);
        if let Some(version) = version.filter(|v| !v.is_empty()) {
            url.push_str("?_v=");
            url.push_str(version);
        }

        match kind {
            AssetKind::Script => {
                let cors_attr = if cors { " crossorigin=\"anonymous\"" } else { "" };
                format!("<script src=\"{url}\"{cors_attr}></script>")
            }
            AssetKind::Stylesheet => {
                format!("<link type=\"text/css\" rel=\"stylesheet\" href=\"{url}\">")
            }
        }
    }
}
