//! Template aggregate: rows, columns, slots and their computed geometry.

use std::fmt;

use crate::geometry::Region;
use crate::layout::host::ElementId;

use super::length::{Height, Width};
use super::slot::{Slot, Slots};

/// One quoted row string of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Slot names, one per column, whitespace removed.
    pub columns: String,
    pub height: Height,
    pub computed_height: f64,
}

impl Row {
    pub fn new(columns: &str, height: Height) -> Self {
        Self {
            columns: columns.chars().filter(|c| !c.is_whitespace()).collect(),
            height,
            computed_height: 0.0,
        }
    }

    /// Number of cells in this row.
    pub fn len(&self) -> usize {
        self.columns.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = char> + '_ {
        self.columns.chars()
    }

    /// The slot name in column `index`.
    pub fn cell(&self, index: usize) -> Option<char> {
        self.columns.chars().nth(index)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.columns)?;
        if self.height != Height::DEFAULT {
            write!(f, " / {}", self.height)?;
        }
        Ok(())
    }
}

/// One column of a template, built lazily for the width pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub index: usize,
    pub width: Width,
    /// Names of the slots occupying this column, top to bottom.
    pub slots: Vec<char>,
    pub(crate) intrinsic_minimum_width: Option<f64>,
    pub(crate) intrinsic_preferred_width: Option<f64>,
    pub computed_width: f64,
}

impl Column {
    pub fn new(index: usize, width: Width, slots: Vec<char>) -> Self {
        Self {
            index,
            width,
            slots,
            intrinsic_minimum_width: None,
            intrinsic_preferred_width: None,
            computed_width: 0.0,
        }
    }

    /// Intrinsic widths computed by the width pass, if it has run.
    pub fn intrinsic_widths(&self) -> Option<(f64, f64)> {
        Some((self.intrinsic_minimum_width?, self.intrinsic_preferred_width?))
    }
}

/// A `position: <slot>` binding between a selector and a slot name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedElement {
    pub selector_text: String,
    pub slot: char,
}

/// A parsed template: the grid of one `display` declaration.
///
/// Rows and column widths are normalized on construction (see
/// [`create_template`](super::build::create_template)): every row has
/// [`Template::number_of_columns`] cells and there is exactly one width per
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Element id, assigned on registration with a session.
    pub id: String,
    pub selector_text: String,
    pub css_text: String,
    pub rows: Vec<Row>,
    pub column_widths: Vec<Width>,
    pub slots: Slots,
    columns: Option<Vec<Column>>,
    /// Backing visual element, set by the document.
    pub element: Option<ElementId>,
    pub computed_width: f64,
    pub computed_height: f64,
}

impl Template {
    pub(crate) fn new(
        rows: Vec<Row>,
        column_widths: Vec<Width>,
        slots: Slots,
        selector_text: String,
        css_text: String,
    ) -> Self {
        Self {
            id: String::new(),
            selector_text,
            css_text,
            rows,
            column_widths,
            slots,
            columns: None,
            element: None,
            computed_width: 0.0,
            computed_height: 0.0,
        }
    }

    /// Assign the template's id and derive every slot's id from it.
    pub fn assign_id(&mut self, id: String, slot_infix: &str) {
        for slot in &mut self.slots {
            slot.id = format!("{id}_{slot_infix}_{}", slot.name);
        }
        self.id = id;
    }

    pub fn number_of_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn number_of_columns(&self) -> usize {
        self.column_widths.len()
    }

    pub fn slot(&self, name: char) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn has_slot(&self, name: char) -> bool {
        self.slots.contains(name)
    }

    pub fn is_materialized(&self) -> bool {
        self.element.is_some()
    }

    /// Distinct slots with a cell in row `index`, left to right.
    pub fn slots_of_row(&self, index: usize) -> Vec<&Slot> {
        let mut names: Vec<char> = Vec::new();
        if let Some(row) = self.rows.get(index) {
            for name in row.cells() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names.into_iter().filter_map(|name| self.slots.get(name)).collect()
    }

    /// Distinct slots with a cell in column `index`, top to bottom.
    pub fn slots_of_column(&self, index: usize) -> Vec<&Slot> {
        self.column_slot_names(index)
            .into_iter()
            .filter_map(|name| self.slots.get(name))
            .collect()
    }

    fn column_slot_names(&self, index: usize) -> Vec<char> {
        let mut names = Vec::new();
        for name in self.rows.iter().filter_map(|row| row.cell(index)) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// The template's columns, built on first access.
    pub fn columns(&mut self) -> &mut [Column] {
        if self.columns.is_none() {
            let columns = (0..self.number_of_columns())
                .map(|i| Column::new(i, self.column_widths[i], self.column_slot_names(i)))
                .collect();
            self.columns = Some(columns);
        }
        self.columns.as_deref_mut().unwrap_or_default()
    }

    /// Columns, if the width pass has built them.
    pub fn built_columns(&self) -> Option<&[Column]> {
        self.columns.as_deref()
    }

    /// Computed column widths, zero for a template not yet sized.
    pub fn computed_column_widths(&self) -> Vec<f64> {
        match &self.columns {
            Some(columns) => columns.iter().map(|c| c.computed_width).collect(),
            None => vec![0.0; self.number_of_columns()],
        }
    }

    /// The box of slot `name` relative to the template's top-left corner.
    pub fn slot_region(&self, name: char) -> Option<Region> {
        let slot = self.slots.get(name)?;
        // An empty float sum is -0.0; fold from +0.0 so origins print as 0.
        let x = self.computed_column_widths()[..slot.start_column]
            .iter()
            .fold(0.0, |acc, width| acc + width);
        let y = self.rows[..slot.start_row]
            .iter()
            .fold(0.0, |acc, row| acc + row.computed_height);
        Some(Region::new(
            x as f32,
            y as f32,
            slot.computed_width.unwrap_or(0.0) as f32,
            slot.computed_height as f32,
        ))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self.rows.iter().map(Row::to_string).collect();
        let widths: Vec<String> = self.column_widths.iter().map(Width::to_string).collect();
        write!(f, "{}", rows.join(" "))?;
        if !widths.is_empty() {
            write!(f, " {}", widths.join(" "))?;
        }
        Ok(())
    }
}
