//! # template-layout
//!
//! The CSS Template Layout Module: a template-aware CSS parser and the
//! sizing engine that lays named slots out in a grid.
//!
//! A `display` declaration whose value is a list of quoted row strings
//! defines a template. Each letter names a slot, a rectangle of grid cells;
//! `position: <letter>` moves an element into that slot:
//!
//! ```text
//! body { display: "aaa" / 40px
//!                 "bcd" 20% * 20%; }
//! nav  { position: b }
//! ```
//!
//! ## Core Systems
//!
//! - **[`css`]**: character classes, tokenizer, parser, style sheet model
//! - **[`template`]**: rows, slots, columns, width/height specifiers, validation
//! - **[`layout`]**: host service traits, width and height passes, pass driver
//! - **[`session`]**: registries of one layout pass and the end-to-end pipeline
//! - **[`dom`]**: in-memory reference document measuring with taffy
//! - **[`geometry`]**: Size, Region
//!
//! ```no_run
//! use template_layout::config::LayoutConfig;
//! use template_layout::dom::{Dom, ElementData};
//! use template_layout::session::LayoutSession;
//!
//! let mut dom = Dom::new();
//! let body = dom.insert(ElementData::new("body").with_width(600.0));
//! dom.insert_child(body, ElementData::new("nav").with_text("Home About"));
//! dom.add_style("body { display: \"ab\" 200px * } nav { position: a }");
//!
//! let mut session = LayoutSession::new(LayoutConfig::default());
//! session.run(&mut dom);
//! assert_eq!(session.templates()[0].computed_column_widths(), vec![200.0, 400.0]);
//! ```

// Foundation
pub mod config;
pub mod geometry;
pub mod logging;

// Core systems
pub mod css;
pub mod layout;
pub mod template;

// Pipeline and host
pub mod dom;
pub mod session;
