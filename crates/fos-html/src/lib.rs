//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever: whole documents, and fragments
//! assigned through `innerHTML`.

mod parser;

pub use parser::HtmlParser;
pub use fos_dom::{Document, DomError, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Replace the children of `element` with the parsed `markup`.
///
/// This is the write half of `innerHTML`.
pub fn set_inner_html(document: &mut Document, element: NodeId, markup: &str) -> Result<(), ParseError> {
    document.tree().element(element)?;
    let removed = document.tree_mut().remove_children(element);
    let added = HtmlParser::new().parse_fragment_into(document.tree_mut(), element, markup)?;
    tracing::debug!(%element, removed, added = added.len(), "innerHTML replaced");
    Ok(())
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dom(#[from] DomError),
}
