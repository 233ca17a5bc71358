//! assetpack - static-asset bundling for server-rendered web apps.
//!
//! Groups JS/CSS source files into named bundles, concatenates (and by
//! default minifies) them into single artifacts under `_bundled/`, and
//! renders the HTML tags that reference them, with a cache-busting
//! `?_v=` version token. Disabling the bundler switches to per-file tags
//! for development, with no disk writes at all.
//!
//! ```no_run
//! use assetpack::{BundleError, BundlerOptions, BundlerService};
//!
//! fn main() -> Result<(), BundleError> {
//!     let service = BundlerService::new(BundlerOptions::new("public"))?;
//!     service.bundle("main").add_js("js/app.js").add_js("js/nav.js");
//!
//!     // In a request handler / template context:
//!     let tags = service.render_js("main")?;
//!     assert!(tags.contains("main_bundle.js"));
//!     Ok(())
//! }
//! ```

mod bundle;
mod bundler;
mod config;
mod error;
mod hash;
mod kind;
pub mod minify;
pub mod service;

pub use bundle::{BUNDLED_DIR, Bundle};
pub use bundler::Bundler;
pub use config::BundlerOptions;
pub use error::{BundleError, MinifyError};
pub use kind::AssetKind;
pub use service::{BundlerService, RenderHelpers};
