//! Template construction and validation.

use log::debug;

use super::length::Width;
use super::model::{Row, Template};
use super::slot::{Slot, Slots, EMPTY_SLOT};

/// A structurally invalid template definition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateError {
    #[error("slot '{slot}' is not rectangular at row {row}, column {column}")]
    NotRectangular { slot: char, row: usize, column: usize },
    #[error("slot '{slot}' at row {row}, column {column} is not adjacent to its other cells")]
    NotAdjacent { slot: char, row: usize, column: usize },
    #[error("negative length {value} is not allowed")]
    NegativeLength { value: f64 },
    #[error("unknown length unit '{unit}'")]
    UnknownUnit { unit: String },
    #[error("a template needs at least one non-empty row")]
    Empty,
}

/// Build a [`Template`] from parsed rows and column widths.
///
/// Rows shorter than the longest are padded with the empty slot, and
/// missing trailing column widths default to `*`. Cells are scanned
/// row-major; the first cell that would make a slot's region anything but a
/// rectangle fails the whole template.
pub fn create_template(
    mut rows: Vec<Row>,
    mut column_widths: Vec<Width>,
    selector_text: String,
    css_text: String,
) -> Result<Template, TemplateError> {
    let number_of_columns = rows.iter().map(Row::len).max().unwrap_or(0);
    if number_of_columns == 0 {
        return Err(TemplateError::Empty);
    }

    for row in &mut rows {
        let missing = number_of_columns - row.len();
        row.columns.extend(std::iter::repeat(EMPTY_SLOT).take(missing));
    }
    if column_widths.len() > number_of_columns {
        debug!(
            "{selector_text}: ignoring {} surplus column widths",
            column_widths.len() - number_of_columns
        );
    }
    column_widths.resize(number_of_columns, Width::DEFAULT);

    let slots = scan_slots(&rows)?;
    debug!(
        "{selector_text}: {} rows, {number_of_columns} columns, slots {:?}",
        rows.len(),
        slots.names().collect::<String>()
    );

    Ok(Template::new(rows, column_widths, slots, selector_text, css_text))
}

fn scan_slots(rows: &[Row]) -> Result<Slots, TemplateError> {
    let mut slots = Slots::new();
    let mut previous: Option<char> = None;

    for (row_index, row) in rows.iter().enumerate() {
        for (column_index, name) in row.cells().enumerate() {
            if let Some(left) = previous.filter(|&p| p != name) {
                if let Some(slot) = slots.get(left) {
                    slot.check_closed()?;
                }
            }

            match slots.get_mut(name) {
                Some(slot) => slot.expand_to(row_index, column_index)?,
                None => slots.insert(Slot::new(name, row_index, column_index)),
            }
            previous = Some(name);
        }
    }

    for slot in &slots {
        slot.check_closed()?;
    }
    Ok(slots)
}
