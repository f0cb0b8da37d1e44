//! Reference document: a slotmap element arena that hosts templates and
//! measures content with taffy.

pub mod document;
pub mod measure;
pub mod node;
pub mod query;
pub mod tree;

pub use node::{ElementData, ElementId, ElementRole};
pub use tree::Dom;
