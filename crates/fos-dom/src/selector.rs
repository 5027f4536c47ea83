//! Selector parsing and matching
//!
//! Supports what `querySelectorAll` callers use day to day: selector groups,
//! type/universal selectors, `#id`, `.class`, `[attr]`, `[attr=value]`, and
//! the descendant and child combinators.

use std::iter::Peekable;
use std::str::Chars;

use crate::{DomError, DomTree, ElementData, NodeId};

/// Relation between a compound selector and the one to its left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    value: Option<String>,
}

/// Compound selector, e.g. `div#main.card[data-x]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    /// None means universal
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

impl Compound {
    fn matches(&self, elem: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if !elem.local_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if elem.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let list = elem.class_list();
            if !self.classes.iter().all(|c| list.contains(c)) {
                return false;
            }
        }
        self.attrs.iter().all(|attr| match (&attr.value, elem.get_attr(&attr.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        })
    }
}

/// One selector of a group: compounds left to right with their combinators
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

/// Parsed selector group (`a, b > c`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    /// Parse a selector group
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let invalid = |reason: &str| DomError::InvalidSelector {
            selector: input.to_string(),
            reason: reason.to_string(),
        };

        let mut selectors = Vec::new();
        for group in split_groups(input) {
            let group = group.trim();
            if group.is_empty() {
                return Err(invalid("empty selector"));
            }
            selectors.push(parse_complex(group).map_err(|reason| invalid(&reason))?);
        }
        Ok(Self { selectors })
    }

    /// Whether `node` matches any selector of the group
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.selectors.iter().any(|s| matches_parts(tree, node, &s.parts))
    }

    /// Matching elements below `root`, in document order
    pub fn select_all(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .filter(|&id| self.matches(tree, id))
            .collect()
    }
}

/// Split on commas that are not inside `[...]` or quotes.
fn split_groups(input: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                groups.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    groups.push(&input[start..]);
    groups
}

fn parse_complex(input: &str) -> Result<Complex, String> {
    let mut chars = input.chars().peekable();
    let mut parts = Vec::new();
    let mut pending = Combinator::Descendant;
    let mut explicit = false;

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.peek() {
            None => break,
            Some('>') => {
                if parts.is_empty() || explicit {
                    return Err("unexpected '>'".to_string());
                }
                chars.next();
                pending = Combinator::Child;
                explicit = true;
            }
            Some(_) => {
                let compound = parse_compound(&mut chars)?;
                parts.push((pending, compound));
                pending = Combinator::Descendant;
                explicit = false;
            }
        }
    }

    if explicit {
        return Err("dangling combinator".to_string());
    }
    if parts.is_empty() {
        return Err("empty selector".to_string());
    }
    Ok(Complex { parts })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

fn parse_compound(chars: &mut Peekable<Chars<'_>>) -> Result<Compound, String> {
    let mut compound = Compound::default();
    let mut empty = true;

    match chars.peek() {
        Some('*') => {
            chars.next();
            empty = false;
        }
        Some(&c) if is_ident_char(c) => {
            compound.tag = Some(read_ident(chars).to_ascii_lowercase());
            empty = false;
        }
        _ => {}
    }

    while let Some(&c) = chars.peek() {
        match c {
            '#' => {
                chars.next();
                let id = read_ident(chars);
                if id.is_empty() {
                    return Err("expected identifier after '#'".to_string());
                }
                compound.id = Some(id);
            }
            '.' => {
                chars.next();
                let class = read_ident(chars);
                if class.is_empty() {
                    return Err("expected identifier after '.'".to_string());
                }
                compound.classes.push(class);
            }
            '[' => {
                chars.next();
                compound.attrs.push(parse_attr(chars)?);
            }
            c if c.is_whitespace() || c == '>' => break,
            other => return Err(format!("unexpected character '{other}'")),
        }
        empty = false;
    }

    if empty {
        return Err("expected a selector".to_string());
    }
    Ok(compound)
}

/// Parse the inside of `[...]`; the opening bracket is already consumed.
fn parse_attr(chars: &mut Peekable<Chars<'_>>) -> Result<AttrSelector, String> {
    let skip_ws = |chars: &mut Peekable<Chars<'_>>| {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
    };

    skip_ws(chars);
    let name = read_ident(chars);
    if name.is_empty() {
        return Err("expected attribute name".to_string());
    }
    skip_ws(chars);

    let value = match chars.next() {
        Some(']') => return Ok(AttrSelector { name, value: None }),
        Some('=') => {
            skip_ws(chars);
            let value = match chars.peek() {
                Some(&q) if q == '"' || q == '\'' => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some(c) if c == q => break,
                            Some(c) => value.push(c),
                            None => return Err("unterminated string".to_string()),
                        }
                    }
                    value
                }
                _ => {
                    let value = read_ident(chars);
                    if value.is_empty() {
                        return Err("expected attribute value".to_string());
                    }
                    value
                }
            };
            skip_ws(chars);
            if chars.next() != Some(']') {
                return Err("expected ']'".to_string());
            }
            value
        }
        Some(other) => return Err(format!("unsupported attribute operator '{other}'")),
        None => return Err("unterminated attribute selector".to_string()),
    };

    Ok(AttrSelector { name, value: Some(value) })
}

/// Right-to-left match of `parts` with `node` as the subject.
fn matches_parts(tree: &DomTree, node: NodeId, parts: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, last), rest)) = parts.split_last() else {
        return true;
    };
    let Ok(elem) = tree.element(node) else {
        return false;
    };
    if !last.matches(elem) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }

    match combinator {
        Combinator::Child => tree
            .parent(node)
            .is_some_and(|parent| matches_parts(tree, parent, rest)),
        Combinator::Descendant => {
            let mut ancestor = tree.parent(node);
            while let Some(id) = ancestor {
                if matches_parts(tree, id, rest) {
                    return true;
                }
                ancestor = tree.parent(id);
            }
            false
        }
    }
}
