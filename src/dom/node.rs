//! Element data of the reference document.

pub use crate::layout::host::ElementId;

/// What an element is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// Authored content.
    Content,
    /// Visual container created for a template.
    Template,
    /// Visual container created for the named slot of a template.
    Slot(char),
}

/// Data associated with a single element.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, matched by type selectors (e.g. "div").
    pub tag: String,
    /// Optional unique id (`#id` selector).
    pub id: Option<String>,
    /// Classes (`.class` selector).
    pub classes: Vec<String>,
    /// Text content, measured as a single run of words.
    pub text: String,
    /// Explicit width in pixels.
    pub width: Option<f32>,
    pub role: ElementRole,
}

impl ElementData {
    /// Create a content element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            text: String::new(),
            width: None,
            role: ElementRole::Content,
        }
    }

    /// Set the id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class (builder). Duplicates are ignored.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Set the text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an explicit width in pixels (builder).
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub(crate) fn with_role(mut self, role: ElementRole) -> Self {
        self.role = role;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
