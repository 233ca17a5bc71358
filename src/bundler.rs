//! Registry of named bundles with compile memoization.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::bundle::Bundle;
use crate::config::BundlerOptions;
use crate::error::BundleError;
use crate::kind::AssetKind;

/// Coordinates bundle registration, compilation, and tag rendering.
///
/// Holds the global options, the named bundle groups, and a memo of the
/// content fingerprint last compiled per (group, kind). A pair is only
/// recompiled when its registered file list or any file's content changed
/// since the previous compile; an unchanged bundle never recompiles,
/// minification or not.
#[derive(Debug)]
pub struct Bundler {
    options: BundlerOptions,
    groups: FxHashMap<String, Bundle>,
    compiled: FxHashMap<(String, AssetKind), String>,
}

impl Bundler {
    /// Create a bundler with validated options.
    pub fn new(options: BundlerOptions) -> Result<Self, BundleError> {
        options.validate()?;
        Ok(Self {
            options,
            groups: FxHashMap::default(),
            compiled: FxHashMap::default(),
        })
    }

    pub fn options(&self) -> &BundlerOptions {
        &self.options
    }

    /// Get or create the bundle group registered under `name`.
    ///
    /// A new group inherits the configured URL prefix. Files accumulate
    /// across calls; a group is never reset or removed.
    pub fn bundle(&mut self, name: &str) -> &mut Bundle {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| Bundle::new(name, self.options.url_prefix.clone()))
    }

    /// Render script tags for `group`. See [`Bundler::render`].
    pub fn render_js(&mut self, group: &str) -> Result<String, BundleError> {
        self.render(AssetKind::Script, group)
    }

    /// Render stylesheet tags for `group`. See [`Bundler::render`].
    pub fn render_css(&mut self, group: &str) -> Result<String, BundleError> {
        self.render(AssetKind::Stylesheet, group)
    }

    /// Render include tags for one (kind, group) pair, compiling on demand.
    ///
    /// A disabled bundler renders one tag per registered file and performs
    /// no I/O at all. An enabled bundler compiles the group when its
    /// content fingerprint differs from the memoized one, then renders the
    /// single artifact tag. Rendering an unregistered group is an error.
    pub fn render(&mut self, kind: AssetKind, group: &str) -> Result<String, BundleError> {
        let bundle = self
            .groups
            .get(group)
            .ok_or_else(|| BundleError::GroupNotFound(group.to_string()))?;
        let options = &self.options;
        let version = options.version.as_deref();

        if !options.enabled {
            return Ok(bundle.render(version, kind, false, options.allow_cors));
        }

        if let Some(fingerprint) = bundle.fingerprint(&options.root_path, kind)? {
            let key = (group.to_string(), kind);
            if self.compiled.get(&key).map(String::as_str) != Some(fingerprint.as_str()) {
                bundle.compile(&options.root_path, kind, options.minify)?;
                debug!(group, kind = %kind, %fingerprint, "bundle recompiled");
                self.compiled.insert(key, fingerprint);
            }
        }

        Ok(bundle.render(version, kind, true, options.allow_cors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn bundler_for(dir: &TempDir, options: impl FnOnce(&mut BundlerOptions)) -> Bundler {
        let mut opts = BundlerOptions::new(dir.path());
        opts.minify = false;
        options(&mut opts);
        Bundler::new(opts).unwrap()
    }

    #[test]
    fn test_new_rejects_missing_root_path() {
        assert!(matches!(
            Bundler::new(BundlerOptions::default()),
            Err(BundleError::Config(_))
        ));
    }

    #[test]
    fn test_bundle_is_idempotent_and_accumulates() {
        let dir = TempDir::new().unwrap();
        let mut bundler = bundler_for(&dir, |_| {});

        bundler.bundle("main").add_js("a.js");
        bundler.bundle("main").add_js("b.js");

        let files = bundler.bundle("main").files(AssetKind::Script).to_vec();
        assert_eq!(files, ["a.js", "b.js"]);
    }

    #[test]
    fn test_bundle_inherits_url_prefix() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;\n").unwrap();
        let mut bundler = bundler_for(&dir, |o| {
            o.url_prefix = "/static".to_string();
            o.version = Some("7".to_string());
        });

        bundler.bundle("main").add_js("a.js");
        let tags = bundler.render_js("main").unwrap();
        assert_eq!(
            tags,
            "<script src=\"/static/_bundled/js/main_bundle.js?_v=7\"></script>"
        );
    }

    #[test]
    fn test_render_unknown_group_fails_without_io() {
        let dir = TempDir::new().unwrap();
        let mut bundler = bundler_for(&dir, |_| {});

        let err = bundler.render_js("nope").unwrap_err();
        assert!(matches!(err, BundleError::GroupNotFound(name) if name == "nope"));
        assert!(!dir.path().join("_bundled").exists());
    }

    #[test]
    fn test_render_compiles_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;\n").unwrap();
        let mut bundler = bundler_for(&dir, |_| {});
        bundler.bundle("main").add_js("a.js");

        let first = bundler.render_js("main").unwrap();
        let second = bundler.render_js("main").unwrap();
        assert_eq!(first, second);
        assert!(dir.path().join("_bundled/js/main_bundle.js").exists());
    }

    #[test]
    fn test_render_memoizes_by_fingerprint() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;\n").unwrap();
        let mut bundler = bundler_for(&dir, |_| {});
        bundler.bundle("main").add_js("a.js");

        bundler.render_js("main").unwrap();

        // Unchanged content: the second render must not rewrite the artifact
        let artifact = dir.path().join("_bundled/js/main_bundle.js");
        fs::remove_file(&artifact).unwrap();
        bundler.render_js("main").unwrap();
        assert!(!artifact.exists());

        // Edited content invalidates the memo and recompiles
        fs::write(dir.path().join("a.js"), "var a = 2;\n").unwrap();
        bundler.render_js("main").unwrap();
        let content = fs::read_to_string(&artifact).unwrap();
        assert!(content.contains("var a = 2;"));
    }

    #[test]
    fn test_render_recompiles_after_registration_change() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;\n").unwrap();
        fs::write(dir.path().join("b.js"), "var b = 2;\n").unwrap();
        let mut bundler = bundler_for(&dir, |_| {});

        bundler.bundle("main").add_js("a.js");
        bundler.render_js("main").unwrap();

        bundler.bundle("main").add_js("b.js");
        bundler.render_js("main").unwrap();
        let content =
            fs::read_to_string(dir.path().join("_bundled/js/main_bundle.js")).unwrap();
        assert!(content.contains("var b = 2;"));
    }

    #[test]
    fn test_disabled_renders_per_file_without_io() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;\n").unwrap();
        fs::write(dir.path().join("b.js"), "var b = 2;\n").unwrap();
        let mut bundler = bundler_for(&dir, |o| o.enabled = false);

        bundler.bundle("main").add_js("a.js").add_js("b.js");
        let tags = bundler.render_js("main").unwrap();
        assert_eq!(
            tags,
            "<script src=\"a.js\"></script><script src=\"b.js\"></script>"
        );
        assert!(!dir.path().join("_bundled").exists());
    }

    #[test]
    fn test_render_group_with_no_files_of_kind() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;\n").unwrap();
        let mut bundler = bundler_for(&dir, |_| {});

        bundler.bundle("main").add_js("a.js");
        assert_eq!(bundler.render_css("main").unwrap(), "");
        assert!(!dir.path().join("_bundled/css").exists());
    }

    #[test]
    fn test_js_and_css_compile_independently() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "var a = 1;\n").unwrap();
        fs::write(dir.path().join("site.css"), "body { margin: 0 }\n").unwrap();
        let mut bundler = bundler_for(&dir, |_| {});

        bundler.bundle("main").add_js("a.js").add_css("site.css");
        bundler.render_js("main").unwrap();
        bundler.render_css("main").unwrap();

        assert!(dir.path().join("_bundled/js/main_bundle.js").exists());
        assert!(dir.path().join("_bundled/css/main_bundle.css").exists());
    }

    #[test]
    fn test_missing_source_surfaces_io_error() {
        let dir = TempDir::new().unwrap();
        let mut bundler = bundler_for(&dir, |_| {});
        bundler.bundle("main").add_js("gone.js");

        let err = bundler.render_js("main").unwrap_err();
        assert!(matches!(err, BundleError::Io(path, _) if path.ends_with("gone.js")));
    }
}
