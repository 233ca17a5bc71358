//! Shared bundler service for host applications.
//!
//! A [`BundlerService`] is a cloneable, thread-safe handle meant to be
//! constructed once at startup and passed into every request-handling
//! context. Template engines that only accept plain closures can take
//! [`RenderHelpers`] instead. Hosts without dependency injection can fall
//! back to the process-wide [`init`] / [`global`] pair.

use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::bundler::Bundler;
use crate::config::BundlerOptions;
use crate::error::BundleError;
use crate::kind::AssetKind;

/// Thread-safe, cloneable handle around a [`Bundler`].
#[derive(Clone)]
pub struct BundlerService {
    inner: Arc<Mutex<Bundler>>,
}

impl BundlerService {
    /// Create a service with validated options.
    pub fn new(options: BundlerOptions) -> Result<Self, BundleError> {
        Ok(Self {
            inner: Arc::new(Mutex::new(Bundler::new(options)?)),
        })
    }

    /// Register files into the named bundle group.
    ///
    /// The returned guard holds the service lock, so a registration chain
    /// is atomic with respect to concurrent renders:
    ///
    /// ```ignore
    /// service.bundle("main").add_js("js/app.js").add_js("js/nav.js");
    /// ```
    pub fn bundle(&self, name: &str) -> BundleGuard<'_> {
        BundleGuard {
            guard: self.inner.lock(),
            name: name.to_string(),
        }
    }

    /// Render script tags for `group`, compiling if needed.
    pub fn render_js(&self, group: &str) -> Result<String, BundleError> {
        self.inner.lock().render(AssetKind::Script, group)
    }

    /// Render stylesheet tags for `group`, compiling if needed.
    pub fn render_css(&self, group: &str) -> Result<String, BundleError> {
        self.inner.lock().render(AssetKind::Stylesheet, group)
    }

    /// Run a closure against the locked bundler.
    pub fn with_bundler<T>(&self, f: impl FnOnce(&mut Bundler) -> T) -> T {
        f(&mut self.inner.lock())
    }

    /// Build the pair of per-request template helpers.
    ///
    /// Mirrors the usual middleware shape: the host installs these once
    /// and exposes them to the template-rendering context.
    pub fn helpers(&self) -> RenderHelpers {
        let js = self.clone();
        let css = self.clone();
        RenderHelpers {
            render_js: Box::new(move |group| js.render_js(group)),
            render_css: Box::new(move |group| css.render_css(group)),
        }
    }
}

/// Write access to one bundle group, holding the service lock.
pub struct BundleGuard<'a> {
    guard: MutexGuard<'a, Bundler>,
    name: String,
}

impl BundleGuard<'_> {
    /// Append a file to the group. Chains.
    pub fn add_file(mut self, kind: AssetKind, path: impl Into<String>) -> Self {
        self.guard.bundle(&self.name).add_file(kind, path);
        self
    }

    /// Append a JavaScript file. Chains.
    pub fn add_js(self, path: impl Into<String>) -> Self {
        self.add_file(AssetKind::Script, path)
    }

    /// Append a stylesheet. Chains.
    pub fn add_css(self, path: impl Into<String>) -> Self {
        self.add_file(AssetKind::Stylesheet, path)
    }
}

/// Boxed render closure for template-engine integration.
pub type RenderFn = Box<dyn Fn(&str) -> Result<String, BundleError> + Send + Sync>;

/// Per-request render helpers (`render_js(group)`, `render_css(group)`).
pub struct RenderHelpers {
    pub render_js: RenderFn,
    pub render_css: RenderFn,
}

static GLOBAL: OnceLock<BundlerService> = OnceLock::new();

/// Install the process-wide service on first call and return it.
///
/// Subsequent calls return the already-installed instance and ignore
/// their `options`; that is a documented contract of this initializer,
/// not an accident. Prefer [`BundlerService::new`] plus explicit passing
/// where the host allows it.
pub fn init(options: BundlerOptions) -> Result<BundlerService, BundleError> {
    if let Some(existing) = GLOBAL.get() {
        debug!("bundler service already initialized, ignoring options");
        return Ok(existing.clone());
    }
    let service = BundlerService::new(options)?;
    Ok(GLOBAL.get_or_init(|| service).clone())
}

/// The process-wide service, if [`init`] has run.
pub fn global() -> Option<BundlerService> {
    GLOBAL.get().cloned()
}
