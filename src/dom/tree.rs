//! The reference document: element arena, style sources and geometry.

use std::collections::HashMap;

use slotmap::{SecondaryMap, SlotMap};

use crate::config::{LayoutConfig, TextMetrics};
use crate::geometry::{Region, Size};

use super::node::{ElementData, ElementId, ElementRole};

const NO_CHILDREN: &[ElementId] = &[];

/// An in-memory document, backed by a slotmap arena.
///
/// Parent/child links live in secondary maps. Style sources are kept in
/// document order. Geometry written by the sizing engine is stored per
/// element, relative to the element's parent.
pub struct Dom {
    pub(crate) nodes: SlotMap<ElementId, ElementData>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    root: Option<ElementId>,
    styles: Vec<String>,
    /// Slot elements of each materialized template element.
    pub(crate) slot_elements: SecondaryMap<ElementId, HashMap<char, ElementId>>,
    pub(crate) geometry: SecondaryMap<ElementId, Region>,
    /// Computed width of each sized slot element.
    pub(crate) slot_widths: SecondaryMap<ElementId, f32>,
    pub(crate) metrics: TextMetrics,
    pub(crate) viewport: Size,
}

impl Dom {
    /// Create an empty document with default metrics and viewport.
    pub fn new() -> Self {
        Self::with_config(&LayoutConfig::default())
    }

    /// Create an empty document measuring with `config`'s text metrics and
    /// viewport.
    pub fn with_config(config: &LayoutConfig) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
            styles: Vec::new(),
            slot_elements: SecondaryMap::new(),
            geometry: SecondaryMap::new(),
            slot_widths: SecondaryMap::new(),
            metrics: config.text_metrics,
            viewport: config.viewport,
        }
    }

    /// Insert a parentless element. The first one becomes the root.
    pub fn insert(&mut self, data: ElementData) -> ElementId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert an element as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist.
    pub fn insert_child(&mut self, parent: ElementId, data: ElementData) -> ElementId {
        debug_assert!(self.nodes.contains_key(parent), "parent element does not exist");
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.attach(id, parent);
        id
    }

    /// Move `element` with its subtree to the end of `new_parent`'s children.
    pub fn reparent(&mut self, element: ElementId, new_parent: ElementId) {
        debug_assert!(self.nodes.contains_key(element), "element does not exist");
        debug_assert!(self.nodes.contains_key(new_parent), "new parent does not exist");
        if let Some(old_parent) = self.parent.remove(element) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != element);
            }
        }
        self.attach(element, new_parent);
    }

    fn attach(&mut self, element: ElementId, parent: ElementId) {
        self.parent.insert(element, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(element);
        }
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent.get(id).copied()
    }

    /// Children of `id`; empty if it has none or does not exist.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(NO_CHILDREN)
    }

    /// Ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id)
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Append a style source (the text of a `<style>` block or linked sheet).
    pub fn add_style(&mut self, text: impl Into<String>) {
        self.styles.push(text.into());
    }

    /// Style sources in document order.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// The slot element named `name` of a template element.
    pub fn slot_element(&self, template: ElementId, name: char) -> Option<ElementId> {
        self.slot_elements.get(template)?.get(&name).copied()
    }

    /// Geometry applied to `id`, relative to its parent.
    pub fn geometry(&self, id: ElementId) -> Option<Region> {
        self.geometry.get(id).copied()
    }

    /// Template element with a slot named `name` among `element`'s children.
    pub(crate) fn template_child_with_slot(&self, element: ElementId, name: char) -> Option<ElementId> {
        self.children(element).iter().copied().find(|&child| {
            self.nodes.get(child).is_some_and(|data| data.role == ElementRole::Template)
                && self.slot_element(child, name).is_some()
        })
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
