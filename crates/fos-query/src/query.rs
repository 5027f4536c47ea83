//! Query constructor
//!
//! A `Query` is what a window publishes: calling [`Query::select`] turns a
//! selector (or a list of elements) into a [`Selection`].

use std::fmt;
use std::sync::Arc;

use crate::error::{fail, QueryError, Result};
use crate::helpers::Helpers;
use crate::host::{read_host, DomHost, SharedHost};
use crate::selection::{Selection, SelectorInput};

/// Behaviour shared by every selection of one constructor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Behavior {
    strict: bool,
}

impl Behavior {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether an instance method should go ahead with class `name`.
    ///
    /// Empty names and names containing whitespace are ignored, or rejected
    /// in strict mode.
    pub(crate) fn accepts_class_name(&self, origin: &str, name: &str) -> Result<bool> {
        if !name.is_empty() && !name.contains(|c: char| c.is_ascii_whitespace()) {
            return Ok(true);
        }
        if self.strict {
            return fail(QueryError::invalid_argument(
                origin,
                format!("'{name}' is not a valid class name"),
            ));
        }
        tracing::debug!(origin, name, "ignoring unusable class name");
        Ok(false)
    }
}

/// Published selection constructor
pub struct Query<H> {
    name: String,
    alias: Option<String>,
    host: SharedHost<H>,
    helpers: Helpers,
    behavior: Arc<Behavior>,
}

impl<H> Query<H> {
    pub(crate) fn new(
        name: String,
        alias: Option<String>,
        host: SharedHost<H>,
        helpers: Helpers,
        behavior: Arc<Behavior>,
    ) -> Self {
        Self { name, alias, host, helpers, behavior }
    }

    /// Canonical name the constructor is published under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short alias, if it was free when the constructor was defined
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Helper namespace attached during bootstrap
    pub fn helpers(&self) -> &Helpers {
        &self.helpers
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn host(&self) -> &SharedHost<H> {
        &self.host
    }
}

impl<H: DomHost> Query<H> {
    /// Build a selection.
    ///
    /// Selector strings are resolved by the host; selector lists are joined
    /// with `,` and resolved as one group; element lists are bound directly.
    /// Host failures (e.g. an invalid selector) propagate unchanged.
    pub fn select(&self, input: impl Into<SelectorInput>) -> Result<Selection<H>> {
        let elements = match input.into() {
            SelectorInput::Selector(selector) => read_host(&self.host).select_all(&selector)?,
            SelectorInput::Selectors(selectors) => {
                read_host(&self.host).select_all(&selectors.join(","))?
            }
            SelectorInput::Elements(elements) => elements,
            SelectorInput::Empty => Vec::new(),
        };
        tracing::trace!(query = %self.name, length = elements.len(), "selection built");
        Ok(Selection::new(Arc::clone(&self.host), elements, Arc::clone(&self.behavior)))
    }
}

impl<H> fmt::Debug for Query<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("behavior", &self.behavior)
            .finish_non_exhaustive()
    }
}
