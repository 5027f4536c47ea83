//! Window registry and bootstrap
//!
//! A [`Window`] owns the name bindings page code looks constructors up by.
//! Publishing a constructor goes through five steps, always in this order:
//!
//! 1. `check_conflict` - the canonical name must be unbound
//! 2. `define_constructor` - reserve the alias if nothing else holds it
//! 3. `attach_helpers` - give the constructor its helper namespace
//! 4. `attach_behavior` - fix the behaviour shared by its selections
//! 5. `publish` - bind the canonical name (and the alias)
//!
//! The registry lock is held from the first step to the last, and nothing
//! is bound before `publish`, so a failed run leaves the window untouched.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::config::QueryConfig;
use crate::error::{fail, QueryError, Result};
use crate::helpers::{raise_error, Helpers};
use crate::host::{DomHost, SharedHost};
use crate::query::{Behavior, Query};

/// A name binding in a window
pub enum Global<H> {
    /// A constructor published by [`Window::bootstrap`]
    Query(Arc<Query<H>>),
    /// Something else page code put there (described, not interpreted)
    Foreign(String),
}

impl<H> Clone for Global<H> {
    fn clone(&self) -> Self {
        match self {
            Global::Query(query) => Global::Query(Arc::clone(query)),
            Global::Foreign(description) => Global::Foreign(description.clone()),
        }
    }
}

impl<H> fmt::Debug for Global<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Global::Query(query) => f.debug_tuple("Query").field(&query.name()).finish(),
            Global::Foreign(description) => f.debug_tuple("Foreign").field(description).finish(),
        }
    }
}

type Bindings<H> = HashMap<String, Global<H>>;

/// Document plus the names bound around it
pub struct Window<H> {
    host: SharedHost<H>,
    globals: Mutex<Bindings<H>>,
}

impl<H> Window<H> {
    pub fn new(document: H) -> Self {
        Self::from_shared(Arc::new(RwLock::new(document)))
    }

    pub fn from_shared(host: SharedHost<H>) -> Self {
        Self { host, globals: Mutex::new(HashMap::new()) }
    }

    pub fn document(&self) -> &SharedHost<H> {
        &self.host
    }

    fn bindings(&self) -> MutexGuard<'_, Bindings<H>> {
        self.globals.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind `name` to something unrelated, returning the previous binding
    pub fn define_foreign(&self, name: &str, description: &str) -> Option<Global<H>> {
        self.bindings()
            .insert(name.to_string(), Global::Foreign(description.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<Global<H>> {
        self.bindings().get(name).cloned()
    }

    /// The constructor bound to `name`, if that binding is one
    pub fn query(&self, name: &str) -> Option<Arc<Query<H>>> {
        match self.get(name)? {
            Global::Query(query) => Some(query),
            Global::Foreign(_) => None,
        }
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.bindings().contains_key(name)
    }

    /// Bound names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<H: DomHost> Window<H> {
    /// Run the full bootstrap; fails if `config.name` is already bound.
    pub fn bootstrap(&self, config: QueryConfig) -> Result<Arc<Query<H>>> {
        self.run(config, false)
    }

    /// Return the constructor published under the default name, running the
    /// bootstrap first if there is none yet.
    pub fn initialize(&self) -> Result<Arc<Query<H>>> {
        self.initialize_with(QueryConfig::default())
    }

    /// Like [`Window::initialize`] for a custom configuration.
    ///
    /// A constructor already published under `config.name` is returned as
    /// it is; `config.alias` and `config.strict` only apply to a new one.
    pub fn initialize_with(&self, config: QueryConfig) -> Result<Arc<Query<H>>> {
        self.run(config, true)
    }

    fn run(&self, config: QueryConfig, reuse_published: bool) -> Result<Arc<Query<H>>> {
        let span = tracing::debug_span!("bootstrap", name = %config.name);
        let _enter = span.enter();

        let bootstrap = Bootstrap::begin(self, config);
        if reuse_published {
            if let Some(existing) = bootstrap.published() {
                let config = &bootstrap.config;
                if existing.behavior().is_strict() != config.strict
                    || existing.alias() != config.alias.as_deref()
                {
                    tracing::debug!(
                        alias = ?existing.alias(),
                        strict = existing.behavior().is_strict(),
                        "already published with a different configuration; keeping it"
                    );
                } else {
                    tracing::trace!("already published");
                }
                return Ok(existing);
            }
        }

        bootstrap
            .check_conflict()?
            .define_constructor()?
            .attach_helpers()?
            .attach_behavior()?
            .publish()
    }
}

impl<H> fmt::Debug for Window<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window").field("globals", &*self.bindings()).finish_non_exhaustive()
    }
}

/// Constructor parts gathered between `define_constructor` and `publish`
#[derive(Debug, Default)]
struct Draft {
    alias: Option<String>,
    helpers: Option<Helpers>,
    behavior: Option<Arc<Behavior>>,
}

/// One bootstrap run; each step consumes it and hands it to the next.
pub struct Bootstrap<'w, H> {
    window: &'w Window<H>,
    bindings: MutexGuard<'w, Bindings<H>>,
    config: QueryConfig,
    checked: bool,
    draft: Option<Draft>,
}

impl<'w, H: DomHost> Bootstrap<'w, H> {
    /// Lock the window's bindings for the duration of the run.
    ///
    /// The lock is released when the run is dropped or published. Until
    /// then, calling [`Window::get`], [`Window::names`], [`Window::is_defined`]
    /// or [`Window::define_foreign`] on the same thread deadlocks (or panics); use
    /// [`Bootstrap::is_bound`] to inspect bindings mid-run.
    pub fn begin(window: &'w Window<H>, config: QueryConfig) -> Self {
        Self {
            window,
            bindings: window.bindings(),
            config,
            checked: false,
            draft: None,
        }
    }

    /// Constructor already published under the configured name
    pub fn published(&self) -> Option<Arc<Query<H>>> {
        match self.bindings.get(&self.config.name)? {
            Global::Query(query) => Some(Arc::clone(query)),
            Global::Foreign(_) => None,
        }
    }

    /// Whether `name` is bound, read through the lock this run holds
    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Step 1: the canonical name must be free
    pub fn check_conflict(mut self) -> Result<Self> {
        if self.bindings.contains_key(&self.config.name) {
            return fail(QueryError::duplicate_definition(
                "check_conflict",
                format!("{} is already defined", self.config.name),
            ));
        }
        tracing::trace!("no conflicting binding");
        self.checked = true;
        Ok(self)
    }

    /// Step 2: start the constructor and reserve the alias if it is free
    pub fn define_constructor(mut self) -> Result<Self> {
        if !self.checked {
            return raise_error("define_constructor", "conflict check has not run");
        }
        if self.draft.is_some() {
            return raise_error("define_constructor", "constructor is already defined");
        }

        let alias = match self.config.alias.take() {
            Some(alias) if alias == self.config.name => None,
            Some(alias) if self.bindings.contains_key(&alias) => {
                tracing::debug!(%alias, "alias already bound, leaving it alone");
                None
            }
            other => other,
        };
        tracing::trace!(alias = ?alias, "constructor defined");
        self.draft = Some(Draft { alias, ..Draft::default() });
        Ok(self)
    }

    /// Step 3: attach the helper namespace
    pub fn attach_helpers(mut self) -> Result<Self> {
        let Some(draft) = self.draft.as_mut() else {
            return raise_error("attach_helpers", "constructor is not defined");
        };
        if draft.helpers.is_some() {
            return raise_error("attach_helpers", "helpers are already attached");
        }
        draft.helpers = Some(Helpers);
        Ok(self)
    }

    /// Step 4: fix the behaviour every selection will share
    pub fn attach_behavior(mut self) -> Result<Self> {
        let strict = self.config.strict;
        let Some(draft) = self.draft.as_mut() else {
            return raise_error("attach_behavior", "constructor is not defined");
        };
        if draft.behavior.is_some() {
            return raise_error("attach_behavior", "behavior is already attached");
        }
        draft.behavior = Some(Arc::new(Behavior::new(strict)));
        Ok(self)
    }

    /// Step 5: bind the constructor under its canonical name and alias
    pub fn publish(mut self) -> Result<Arc<Query<H>>> {
        let Some(Draft { alias, helpers: Some(helpers), behavior: Some(behavior) }) = self.draft.take()
        else {
            return raise_error("publish", "constructor is incomplete");
        };

        let name = self.config.name.clone();
        let query = Arc::new(Query::new(
            name.clone(),
            alias.clone(),
            Arc::clone(&self.window.host),
            helpers,
            behavior,
        ));

        self.bindings.insert(name.clone(), Global::Query(Arc::clone(&query)));
        if let Some(alias) = &alias {
            self.bindings.insert(alias.clone(), Global::Query(Arc::clone(&query)));
        }
        tracing::info!(%name, alias = ?alias, strict = self.config.strict, "constructor published");
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::Document;

    fn window() -> Window<Document> {
        Window::new(Document::default())
    }

    #[test]
    fn test_steps_out_of_order_fail() {
        let window = window();

        let err = Bootstrap::begin(&window, QueryConfig::default())
            .define_constructor()
            .err()
            .unwrap();
        assert_eq!(err.origin(), Some("define_constructor"));

        let err = Bootstrap::begin(&window, QueryConfig::default())
            .check_conflict()
            .and_then(Bootstrap::attach_helpers)
            .err()
            .unwrap();
        assert_eq!(err.origin(), Some("attach_helpers"));

        let err = Bootstrap::begin(&window, QueryConfig::default())
            .check_conflict()
            .and_then(Bootstrap::define_constructor)
            .and_then(Bootstrap::attach_helpers)
            .and_then(Bootstrap::publish)
            .err()
            .unwrap();
        assert_eq!(err.origin(), Some("publish"));

        assert!(window.names().is_empty(), "failed runs must not bind anything");
    }

    #[test]
    fn test_steps_run_individually() {
        let window = window();
        let query = Bootstrap::begin(&window, QueryConfig::default())
            .check_conflict()
            .and_then(Bootstrap::define_constructor)
            .and_then(Bootstrap::attach_helpers)
            .and_then(Bootstrap::attach_behavior)
            .and_then(Bootstrap::publish)
            .unwrap();

        assert_eq!(query.name(), "jQuery");
        assert_eq!(window.names(), vec!["$".to_string(), "jQuery".to_string()]);
    }

    #[test]
    fn test_repeated_step_fails() {
        let window = window();
        let err = Bootstrap::begin(&window, QueryConfig::default())
            .check_conflict()
            .and_then(Bootstrap::define_constructor)
            .and_then(Bootstrap::attach_helpers)
            .and_then(Bootstrap::attach_helpers)
            .err()
            .unwrap();
        assert!(matches!(err, QueryError::Raised { .. }));
    }

    #[test]
    fn test_bindings_visible_mid_run_and_released_after() {
        let window = window();
        window.define_foreign("$", "other");

        let run = Bootstrap::begin(&window, QueryConfig::default())
            .check_conflict()
            .and_then(Bootstrap::define_constructor)
            .unwrap();
        assert!(run.is_bound("$"));
        assert!(!run.is_bound("jQuery"));
        drop(run);

        // Lock released: the window is usable again and nothing was bound
        assert_eq!(window.names(), vec!["$".to_string()]);
    }

    #[test]
    fn test_initialize_with_keeps_published_configuration() {
        let window = window();
        let first = window.initialize().unwrap();

        let again = window
            .initialize_with(QueryConfig::default().strict(true).with_alias(None))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert!(!again.behavior().is_strict());
        assert_eq!(again.alias(), Some("$"));
    }

    #[test]
    fn test_alias_equal_to_name_is_dropped() {
        let window = window();
        let config = QueryConfig::named("q").with_alias(Some("q"));
        let query = window.bootstrap(config).unwrap();
        assert_eq!(query.alias(), None);
        assert_eq!(window.names(), vec!["q".to_string()]);
    }
}
