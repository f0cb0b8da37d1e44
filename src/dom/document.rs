//! Host-document services: style text, materialization, placement and
//! geometry application.

use log::{debug, warn};

use crate::geometry::Region;
use crate::layout::host::Document;
use crate::template::{PositionedElement, Template};

use super::node::{ElementData, ElementId, ElementRole};
use super::tree::Dom;

impl Dom {
    /// The template element for `template` under `container`, created on
    /// first use.
    fn template_element(&mut self, container: ElementId, template: &Template) -> ElementId {
        let existing = self.children(container).iter().copied().find(|&child| {
            self.get(child).is_some_and(|data| {
                data.role == ElementRole::Template && data.id.as_deref() == Some(template.id.as_str())
            })
        });
        if let Some(element) = existing {
            return element;
        }
        let data = ElementData::new("div")
            .with_id(template.id.as_str())
            .with_role(ElementRole::Template);
        self.insert_child(container, data)
    }

    fn slot_element_for(&mut self, template_element: ElementId, name: char, id: &str) -> ElementId {
        if let Some(element) = self.slot_element(template_element, name) {
            return element;
        }
        let data = ElementData::new("div").with_id(id).with_role(ElementRole::Slot(name));
        let element = self.insert_child(template_element, data);
        if let Some(entry) = self.slot_elements.entry(template_element) {
            entry.or_default().insert(name, element);
        }
        element
    }

    /// Nearest slot named `name` in a template of one of `element`'s
    /// ancestors.
    fn nearest_slot(&self, element: ElementId, name: char) -> Option<ElementId> {
        self.ancestors(element).into_iter().find_map(|ancestor| {
            let template = self.template_child_with_slot(ancestor, name)?;
            self.slot_element(template, name)
        })
    }
}

impl Document for Dom {
    fn load_style_text(&self) -> String {
        self.styles().join("\n")
    }

    fn create_visual_elements(&mut self, templates: &mut [Template]) {
        for template in templates.iter_mut() {
            let Some(container) = self.query_one(&template.selector_text) else {
                warn!(
                    "no element matches {:?}; template {} not materialized",
                    template.selector_text, template.id
                );
                continue;
            };
            let element = self.template_element(container, template);
            template.element = Some(element);
            for slot in &mut template.slots {
                slot.element = Some(self.slot_element_for(element, slot.name, &slot.id));
            }
            debug!("materialized template {} with {} slots", template.id, template.slots.len());
        }
    }

    fn place_positioned_content(&mut self, positioned: &[PositionedElement]) {
        for entry in positioned {
            let matched: Vec<ElementId> = self
                .query(&entry.selector_text)
                .into_iter()
                .filter(|&e| self.get(e).is_some_and(|d| d.role == ElementRole::Content))
                .collect();
            for element in matched {
                match self.nearest_slot(element, entry.slot) {
                    Some(slot) => self.reparent(element, slot),
                    None => warn!(
                        "{:?} is positioned in slot '{}' but no enclosing template has it",
                        entry.selector_text, entry.slot
                    ),
                }
            }
        }
    }

    fn record_slot_widths(&mut self, template: &Template) {
        for slot in &template.slots {
            if let (Some(element), Some(width)) = (slot.element, slot.computed_width) {
                self.slot_widths.insert(element, width as f32);
            }
        }
    }

    fn apply_computed_geometry(&mut self, template: &Template) {
        let Some(element) = template.element else {
            return;
        };
        let size = Region::new(
            0.0,
            0.0,
            template.computed_width as f32,
            template.computed_height as f32,
        );
        self.geometry.insert(element, size);
        for slot in &template.slots {
            if let (Some(slot_element), Some(region)) = (slot.element, template.slot_region(slot.name)) {
                self.geometry.insert(slot_element, region);
            }
        }
    }
}
