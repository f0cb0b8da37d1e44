//! Fixed-size measurement double for sizing tests.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::template::{Length, Template};

use super::host::{ElementId, Measure};

/// Measures slots by name from fixed tables. Lengths resolve as pixels.
pub(crate) struct FixedMeasure {
    available: f64,
    widths: HashMap<char, (f64, f64)>,
    heights: HashMap<char, f64>,
    elements: SlotMap<ElementId, Option<char>>,
}

impl FixedMeasure {
    pub(crate) fn new(available: f64) -> Self {
        Self {
            available,
            widths: HashMap::new(),
            heights: HashMap::new(),
            elements: SlotMap::with_key(),
        }
    }

    pub(crate) fn with_slot(mut self, name: char, minimum: f64, preferred: f64) -> Self {
        self.widths.insert(name, (minimum, preferred));
        self
    }

    pub(crate) fn with_height(mut self, name: char, height: f64) -> Self {
        self.heights.insert(name, height);
        self
    }

    /// Give the template and every slot an element.
    pub(crate) fn materialize(mut self, template: &mut Template) -> Self {
        template.element = Some(self.elements.insert(None));
        for slot in &mut template.slots {
            slot.element = Some(self.elements.insert(Some(slot.name)));
        }
        self
    }

    fn slot_name(&self, element: ElementId) -> Option<char> {
        self.elements.get(element).copied().flatten()
    }
}

impl Measure for FixedMeasure {
    fn available_width(&self, _element: ElementId) -> f64 {
        self.available
    }

    fn resolve_length(&self, length: &Length, _reference: ElementId) -> f64 {
        length.value
    }

    fn intrinsic_preferred_width(&self, element: ElementId) -> f64 {
        self.slot_name(element)
            .and_then(|name| self.widths.get(&name))
            .map_or(0.0, |w| w.1)
    }

    fn intrinsic_minimum_width(&self, element: ElementId) -> f64 {
        self.slot_name(element)
            .and_then(|name| self.widths.get(&name))
            .map_or(0.0, |w| w.0)
    }

    fn content_height_for_width(&self, element: ElementId, _width: f64) -> f64 {
        self.slot_name(element)
            .and_then(|name| self.heights.get(&name))
            .copied()
            .unwrap_or(0.0)
    }
}
