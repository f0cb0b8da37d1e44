//! Template model: rows, slots, columns and template construction.

pub mod build;
pub mod length;
pub mod model;
pub mod slot;

pub use build::{create_template, TemplateError};
pub use length::{Height, Length, LengthUnit, Width};
pub use model::{Column, PositionedElement, Row, Template};
pub use slot::{Slot, Slots, EMPTY_SLOT};
