//! DOM host surface
//!
//! The only DOM capabilities the query layer relies on. `fos_dom::Document`
//! implements it; tests and embedders can supply their own.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fos_dom::{Document, DomError, NodeId};
use fos_html::ParseError;

/// Narrow DOM surface used by selections
pub trait DomHost {
    /// Elements matching `selector`, in document order
    fn select_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError>;

    /// Inner markup of `element`
    fn markup(&self, element: NodeId) -> Result<String, DomError>;

    /// Replace the inner markup of `element`
    fn set_markup(&mut self, element: NodeId, markup: &str) -> Result<(), DomError>;

    fn class_add(&mut self, element: NodeId, name: &str) -> Result<(), DomError>;

    fn class_remove(&mut self, element: NodeId, name: &str) -> Result<(), DomError>;

    /// Returns whether the class is present afterwards
    fn class_toggle(&mut self, element: NodeId, name: &str) -> Result<bool, DomError>;

    fn class_contains(&self, element: NodeId, name: &str) -> Result<bool, DomError>;
}

impl DomHost for Document {
    fn select_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.query_selector_all(selector)
    }

    fn markup(&self, element: NodeId) -> Result<String, DomError> {
        self.inner_html(element)
    }

    fn set_markup(&mut self, element: NodeId, markup: &str) -> Result<(), DomError> {
        fos_html::set_inner_html(self, element, markup).map_err(|err| match err {
            ParseError::Dom(dom) => dom,
            other => DomError::Markup(other.to_string()),
        })
    }

    fn class_add(&mut self, element: NodeId, name: &str) -> Result<(), DomError> {
        self.add_class(element, name)
    }

    fn class_remove(&mut self, element: NodeId, name: &str) -> Result<(), DomError> {
        self.remove_class(element, name)
    }

    fn class_toggle(&mut self, element: NodeId, name: &str) -> Result<bool, DomError> {
        self.toggle_class(element, name)
    }

    fn class_contains(&self, element: NodeId, name: &str) -> Result<bool, DomError> {
        self.has_class(element, name)
    }
}

/// Document handle shared by a window, its constructors and their selections
pub type SharedHost<H> = Arc<RwLock<H>>;

// Poisoned locks still hand out the document.
pub(crate) fn read_host<H>(host: &SharedHost<H>) -> RwLockReadGuard<'_, H> {
    host.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_host<H>(host: &SharedHost<H>) -> RwLockWriteGuard<'_, H> {
    host.write().unwrap_or_else(PoisonError::into_inner)
}
