//! Selector queries over the document.
//!
//! Supports what templates and `position` declarations are attached to in
//! practice: type, `#id`, `.class` and `*` compounds joined by descendant or
//! child combinators, and comma-separated groups. Anything else (attributes,
//! pseudo-classes, sibling combinators) matches nothing.

use log::debug;

use super::node::{ElementData, ElementId};
use super::tree::Dom;

#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(text: &str) -> Option<Self> {
        let mut compound = Compound::default();
        let mut rest = text;
        let tag_len = rest.find(['#', '.']).unwrap_or(rest.len());
        let tag = &rest[..tag_len];
        if !tag.is_empty() && tag != "*" {
            if !tag.chars().all(is_name_char) {
                return None;
            }
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_len..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let len = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..len];
            if name.is_empty() || !name.chars().all(is_name_char) {
                return None;
            }
            if marker == '#' {
                compound.id = Some(name.to_string());
            } else {
                compound.classes.push(name.to_string());
            }
            rest = &body[len..];
        }
        Some(compound)
    }

    fn matches(&self, data: &ElementData) -> bool {
        self.tag.as_ref().is_none_or(|tag| data.tag.eq_ignore_ascii_case(tag))
            && self.id.as_ref().is_none_or(|id| data.id.as_ref() == Some(id))
            && self.classes.iter().all(|class| data.has_class(class))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

/// A compound selector chain, rightmost compound last.
#[derive(Debug, PartialEq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn parse(text: &str) -> Option<Self> {
        let spaced = text.replace('>', " > ");
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        for word in spaced.split_whitespace() {
            if word == ">" {
                if parts.is_empty() {
                    return None;
                }
                combinator = Combinator::Child;
                continue;
            }
            parts.push((combinator, Compound::parse(word)?));
            combinator = Combinator::Descendant;
        }
        if parts.is_empty() || combinator == Combinator::Child {
            return None;
        }
        Some(Self { parts })
    }

    fn matches(&self, dom: &Dom, element: ElementId) -> bool {
        self.matches_from(dom, element, self.parts.len())
    }

    /// Whether `element` matches the first `len` parts.
    fn matches_from(&self, dom: &Dom, element: ElementId, len: usize) -> bool {
        let (combinator, compound) = &self.parts[len - 1];
        if !dom.get(element).is_some_and(|data| compound.matches(data)) {
            return false;
        }
        if len == 1 {
            return true;
        }
        match combinator {
            Combinator::Child => dom
                .parent(element)
                .is_some_and(|parent| self.matches_from(dom, parent, len - 1)),
            Combinator::Descendant => dom
                .ancestors(element)
                .into_iter()
                .any(|ancestor| self.matches_from(dom, ancestor, len - 1)),
        }
    }
}

impl Dom {
    /// Elements matching `selector`, in document order.
    ///
    /// An unsupported selector matches nothing.
    pub fn query(&self, selector: &str) -> Vec<ElementId> {
        let group: Option<Vec<Complex>> = selector.split(',').map(Complex::parse).collect();
        let Some(group) = group else {
            debug!("unsupported selector {selector:?}");
            return Vec::new();
        };
        let Some(root) = self.root() else {
            return Vec::new();
        };
        self.walk_depth_first(root)
            .into_iter()
            .filter(|&element| group.iter().any(|complex| complex.matches(self, element)))
            .collect()
    }

    /// First element in document order matching `selector`.
    pub fn query_one(&self, selector: &str) -> Option<ElementId> {
        self.query(selector).into_iter().next()
    }
}
