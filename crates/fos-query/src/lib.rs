//! fOS Query
//!
//! jQuery-style element selections over fOS documents.
//!
//! A [`Window`] wraps a document and a table of global names. Bootstrapping
//! it publishes a [`Query`] constructor (by default as `jQuery`, plus `$`
//! when that name is free). Calling the constructor with a selector builds a
//! [`Selection`] whose methods read and write markup and classes.
//!
//! # Example
//! ```rust,ignore
//! use fos_query::Window;
//!
//! let document = fos_html::parse("<h1 class=\"red\">Hi</h1>")?;
//! let window = Window::new(document);
//! let jquery = fos_query::initialize(&window)?;
//!
//! jquery.select("h1")?.set_html("Hello")?.remove_class("red")?;
//! ```

mod bootstrap;
mod config;
mod error;
pub mod helpers;
mod host;
mod query;
mod selection;
pub mod value;

pub use bootstrap::{Bootstrap, Global, Window};
pub use config::QueryConfig;
pub use error::{QueryError, Result, MODULE_NAME};
pub use helpers::{Helpers, Kind};
pub use host::{DomHost, SharedHost};
pub use query::{Behavior, Query};
pub use selection::{Markup, MarkupEntry, Selection, SelectorInput};
pub use value::{Key, Object, Value};

pub use fos_dom::{Document, DomError, NodeId};

use std::sync::Arc;

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Constructor published on `window` under the default name, bootstrapping
/// the window on first use.
pub fn initialize<H: DomHost>(window: &Window<H>) -> Result<Arc<Query<H>>> {
    window.initialize()
}
