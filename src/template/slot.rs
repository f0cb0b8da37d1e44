//! Slots: the named rectangular regions of a template grid.

use std::collections::HashMap;
use std::fmt;

use crate::layout::host::ElementId;

use super::build::TemplateError;

/// Name of the empty slot. Its cells hold no content.
pub const EMPTY_SLOT: char = '.';

/// A named rectangle of grid cells.
///
/// Slots are grown one cell at a time while a template's rows are scanned
/// row-major; [`Slot::expand_to`] only accepts cells that keep the occupied
/// region an axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: char,
    /// Element id, assigned when the owning template is registered.
    pub id: String,
    pub start_row: usize,
    pub start_column: usize,
    pub rowspan: usize,
    pub colspan: usize,
    /// Backing visual element, set by the document.
    pub element: Option<ElementId>,
    pub(crate) intrinsic_minimum_width: Option<f64>,
    pub(crate) intrinsic_preferred_width: Option<f64>,
    /// Set by the width pass. The height pass requires it.
    pub computed_width: Option<f64>,
    pub computed_height: f64,
    last_row: usize,
    last_column: usize,
}

impl Slot {
    pub fn new(name: char, row: usize, column: usize) -> Self {
        Self {
            name,
            id: String::new(),
            start_row: row,
            start_column: column,
            rowspan: 1,
            colspan: 1,
            element: None,
            intrinsic_minimum_width: None,
            intrinsic_preferred_width: None,
            computed_width: None,
            computed_height: 0.0,
            last_row: row,
            last_column: column,
        }
    }

    pub fn is_empty_slot(&self) -> bool {
        self.name == EMPTY_SLOT
    }

    pub fn end_row(&self) -> usize {
        self.start_row + self.rowspan - 1
    }

    pub fn end_column(&self) -> usize {
        self.start_column + self.colspan - 1
    }

    /// Grow the slot to include the cell at (`row`, `column`), the next cell
    /// of the same name in row-major order.
    ///
    /// In the slot's first row the cell must directly follow the last one.
    /// In later rows the cell must either continue the current row inside
    /// the established column span, or start the next row at `start_column`
    /// once the current row is complete.
    pub fn expand_to(&mut self, row: usize, column: usize) -> Result<(), TemplateError> {
        if row == self.last_row && column == self.last_column + 1 {
            if row == self.start_row {
                self.colspan += 1;
            } else if column > self.end_column() {
                return Err(self.not_rectangular(row, column));
            }
        } else if row == self.last_row + 1
            && self.last_column == self.end_column()
            && column == self.start_column
        {
            self.rowspan += 1;
        } else {
            return Err(TemplateError::NotAdjacent {
                slot: self.name,
                row,
                column,
            });
        }

        self.last_row = row;
        self.last_column = column;
        Ok(())
    }

    /// Check that the scan left the slot with its last row complete.
    pub fn check_closed(&self) -> Result<(), TemplateError> {
        if self.last_row > self.start_row && self.last_column != self.end_column() {
            return Err(self.not_rectangular(self.last_row, self.last_column));
        }
        Ok(())
    }

    fn not_rectangular(&self, row: usize, column: usize) -> TemplateError {
        TemplateError::NotRectangular {
            slot: self.name,
            row,
            column,
        }
    }

    /// Intrinsic widths measured by the width pass, if it has run.
    pub fn intrinsic_widths(&self) -> Option<(f64, f64)> {
        Some((self.intrinsic_minimum_width?, self.intrinsic_preferred_width?))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}] {}x{}",
            self.name, self.start_row, self.start_column, self.rowspan, self.colspan
        )
    }
}

/// Slots keyed by name, iterated in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots {
    slots: Vec<Slot>,
    index: HashMap<char, usize>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot. Replaces any slot with the same name in place.
    pub fn insert(&mut self, slot: Slot) {
        match self.index.get(&slot.name) {
            Some(&i) => self.slots[i] = slot,
            None => {
                self.index.insert(slot.name, self.slots.len());
                self.slots.push(slot);
            }
        }
    }

    pub fn get(&self, name: char) -> Option<&Slot> {
        self.index.get(&name).map(|&i| &self.slots[i])
    }

    pub fn get_mut(&mut self, name: char) -> Option<&mut Slot> {
        self.index.get(&name).map(|&i| &mut self.slots[i])
    }

    pub fn contains(&self, name: char) -> bool {
        self.index.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = char> + '_ {
        self.slots.iter().map(|slot| slot.name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Slot> {
        self.slots.iter_mut()
    }
}

impl<'a> IntoIterator for &'a Slots {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Slots {
    type Item = &'a mut Slot;
    type IntoIter = std::slice::IterMut<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
