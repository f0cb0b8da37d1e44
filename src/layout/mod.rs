//! Sizing engine: host services, width and height passes, pass driver.

pub mod engine;
pub mod height;
pub mod host;
pub mod width;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::LayoutEngine;
pub use height::compute_heights;
pub use host::{Document, ElementId, Measure};
pub use width::{compute_widths, widen};
