//! Services the sizing engine consumes from the host document.
//!
//! The engine never touches elements directly. It measures through
//! [`Measure`] and hands templates to a [`Document`] for materialization,
//! content placement and geometry application.

use slotmap::new_key_type;

use crate::template::{Length, PositionedElement, Template};

new_key_type! {
    /// Handle to an element of the host document.
    pub struct ElementId;
}

/// Measurement services.
pub trait Measure {
    /// Width available to the content of `element`.
    fn available_width(&self, element: ElementId) -> f64;

    /// `length` in pixels, relative to `reference` where the unit needs one.
    fn resolve_length(&self, length: &Length, reference: ElementId) -> f64;

    /// Natural width of the content of `element` without line breaks.
    fn intrinsic_preferred_width(&self, element: ElementId) -> f64;

    /// Narrowest width the content of `element` fits in with every possible
    /// line break taken.
    fn intrinsic_minimum_width(&self, element: ElementId) -> f64;

    /// Height of the content of `element` laid out at `width`.
    fn content_height_for_width(&self, element: ElementId, width: f64) -> f64;
}

/// A document that hosts templates.
pub trait Document: Measure {
    /// All style text of the document, in document order.
    fn load_style_text(&self) -> String;

    /// Create the visual elements for each template and its slots, storing
    /// them in [`Template::element`] and [`Slot::element`](crate::template::Slot::element).
    /// Templates whose selector matches nothing stay unmaterialized.
    fn create_visual_elements(&mut self, templates: &mut [Template]);

    /// Move content elements into the slots named by `positioned`.
    fn place_positioned_content(&mut self, positioned: &[PositionedElement]);

    /// Remember each slot's computed width, called as soon as the template's
    /// width pass finishes. Content placed in a slot is then laid out in
    /// that width, nested templates included.
    fn record_slot_widths(&mut self, template: &Template);

    /// Write a sized template's geometry onto its elements.
    fn apply_computed_geometry(&mut self, template: &Template);
}
