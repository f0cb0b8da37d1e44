//! Layout configuration.

use crate::geometry::Size;

/// Text measurement parameters for the reference document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance of every character, in pixels.
    pub char_width: f32,
    pub line_height: f32,
    /// Font size, the size of one `em`.
    pub font_size: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
            font_size: 16.0,
        }
    }
}

/// Configuration for a [`LayoutSession`](crate::session::LayoutSession).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Template ids are this prefix followed by the 1-based registration
    /// index.
    pub template_id_prefix: String,
    /// Slot ids are `<template id>_<infix>_<slot name>`.
    pub slot_id_infix: String,
    /// Iteration cap for column widening. Never below the number of columns
    /// plus one.
    pub max_widening_steps: usize,
    pub text_metrics: TextMetrics,
    /// Viewport size, for `vw`/`vh` lengths and the root container width.
    pub viewport: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            template_id_prefix: "tpl".into(),
            slot_id_infix: "slot".into(),
            max_widening_steps: 30,
            text_metrics: TextMetrics::default(),
            viewport: Size::new(1024.0, 768.0),
        }
    }
}

impl LayoutConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template id prefix (builder).
    pub fn with_template_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.template_id_prefix = prefix.into();
        self
    }

    /// Set the slot id infix (builder).
    pub fn with_slot_id_infix(mut self, infix: impl Into<String>) -> Self {
        self.slot_id_infix = infix.into();
        self
    }

    /// Set the widening iteration cap (builder).
    pub fn with_max_widening_steps(mut self, steps: usize) -> Self {
        self.max_widening_steps = steps;
        self
    }

    /// Set the text metrics (builder).
    pub fn with_text_metrics(mut self, metrics: TextMetrics) -> Self {
        self.text_metrics = metrics;
        self
    }

    /// Set the viewport size (builder).
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Size::new(width, height);
        self
    }

    /// The widening cap to use for a template with `columns` columns.
    pub fn widening_cap(&self, columns: usize) -> usize {
        self.max_widening_steps.max(columns + 1)
    }
}
