//! Layout session: the registries of one layout pass and the pipeline that
//! fills and sizes them.
//!
//! [`LayoutSession`] owns the templates and positioned elements collected
//! while parsing. [`LayoutSession::run`] drives a whole pass against a
//! [`Document`]: load style text, parse, materialize, place content, size,
//! apply geometry.

use log::info;

use crate::config::LayoutConfig;
use crate::css::{self, StyleSheet};
use crate::layout::{Document, LayoutEngine};
use crate::template::{PositionedElement, Template};

/// Context of one layout pass.
#[derive(Debug, Default)]
pub struct LayoutSession {
    config: LayoutConfig,
    templates: Vec<Template>,
    positioned: Vec<PositionedElement>,
}

impl LayoutSession {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            templates: Vec::new(),
            positioned: Vec::new(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Templates in registration order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Positioned elements in declaration order.
    pub fn positioned(&self) -> &[PositionedElement] {
        &self.positioned
    }

    /// Forget everything registered so far.
    pub fn clear(&mut self) {
        self.templates.clear();
        self.positioned.clear();
    }

    /// Register a template, assigning its id and its slots' ids. Returns
    /// its index.
    pub fn register_template(&mut self, mut template: Template) -> usize {
        let index = self.templates.len();
        let id = format!("{}{}", self.config.template_id_prefix, index + 1);
        template.assign_id(id, &self.config.slot_id_infix);
        info!(
            "registered template {} for '{}': {template}",
            template.id, template.selector_text
        );
        self.templates.push(template);
        index
    }

    pub fn register_positioned(&mut self, positioned: PositionedElement) {
        self.positioned.push(positioned);
    }

    /// Parse `text`, registering its templates and positioned elements.
    pub fn parse(&mut self, text: &str) -> StyleSheet {
        css::parse(text, self)
    }

    /// Run a full layout pass over `document`, starting from empty
    /// registries. Returns the parsed style sheet.
    pub fn run<D: Document + ?Sized>(&mut self, document: &mut D) -> StyleSheet {
        self.clear();
        let text = document.load_style_text();
        let sheet = self.parse(&text);
        info!(
            "parsed {} rules, {} templates, {} positioned elements",
            sheet.len(),
            self.templates.len(),
            self.positioned.len()
        );

        document.create_visual_elements(&mut self.templates);
        document.place_positioned_content(&self.positioned);

        LayoutEngine::new(&self.config).run(&mut self.templates, document);
        sheet
    }
}
