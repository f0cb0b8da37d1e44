//! Sizing driver over all templates of a layout pass.
//!
//! [`LayoutEngine`] runs the width pass for every materialized template
//! before any height pass starts, then hands each sized template to the
//! document for geometry application. Against a [`Document`], each
//! template's slot widths are recorded as soon as its width pass ends, so a
//! template nested in an earlier template's slot sizes against that slot.

use log::{info, warn};

use crate::config::LayoutConfig;
use crate::template::Template;

use super::height::compute_heights;
use super::host::{Document, Measure};
use super::width::compute_widths;

/// Runs both sizing passes over a set of templates.
pub struct LayoutEngine<'c> {
    config: &'c LayoutConfig,
}

impl<'c> LayoutEngine<'c> {
    /// Create an engine using `config` for the widening cap.
    pub fn new(config: &'c LayoutConfig) -> Self {
        Self { config }
    }

    /// Size every materialized template: all widths first, then all heights.
    ///
    /// Templates without an element are skipped with a warning. Returns the
    /// number of templates sized.
    pub fn compute<M: Measure + ?Sized>(&self, templates: &mut [Template], measure: &M) -> usize {
        let mut sized = 0;
        for template in templates.iter_mut() {
            if self.widths(template, measure) {
                sized += 1;
            }
        }
        self.heights(templates, measure, sized);
        sized
    }

    /// Size and apply every materialized template of `document`.
    ///
    /// Like [`compute`](Self::compute), but slot widths reach the document
    /// template by template, in registration order.
    pub fn run<D: Document + ?Sized>(&self, templates: &mut [Template], document: &mut D) -> usize {
        let mut sized = 0;
        for template in templates.iter_mut() {
            if self.widths(template, &*document) {
                document.record_slot_widths(template);
                sized += 1;
            }
        }
        self.heights(templates, &*document, sized);
        self.apply(templates, document);
        sized
    }

    fn widths<M: Measure + ?Sized>(&self, template: &mut Template, measure: &M) -> bool {
        if !template.is_materialized() {
            warn!(
                "template {} ({}) matched no element; skipping",
                template.id, template.selector_text
            );
            return false;
        }
        compute_widths(template, measure, self.config);
        true
    }

    fn heights<M: Measure + ?Sized>(&self, templates: &mut [Template], measure: &M, sized: usize) {
        for template in templates.iter_mut().filter(|t| t.is_materialized()) {
            compute_heights(template, measure);
        }
        info!("sized {sized} of {} templates", templates.len());
    }

    /// Write every sized template's geometry onto the document.
    pub fn apply<D: Document + ?Sized>(&self, templates: &[Template], document: &mut D) {
        for template in templates.iter().filter(|t| t.is_materialized()) {
            document.apply_computed_geometry(template);
        }
    }
}
