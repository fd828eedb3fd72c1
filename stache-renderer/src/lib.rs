//! # stache-renderer
//!
//! Mustache-flavoured template engine rendering against a [`DataNode`] tree.
//!
//! Differences from standard Mustache: output is never HTML-escaped, key
//! lookup falls back to case-insensitive matching, and partials / custom
//! delimiters are rejected.
//!
//! ## Usage
//!
//! ```rust
//! use stache_core::load_data;
//! use stache_renderer::Template;
//!
//! let data = load_data(r#"{ "items": ["a", "b"] }"#, "example.json").unwrap();
//! let template = Template::parse("{{#items}}{{.}}{{/items}}").unwrap();
//! assert_eq!(template.render(&data), "ab");
//! ```
//!
//! [`DataNode`]: stache_core::DataNode

pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod parser;

pub use context::ContextStack;
pub use engine::{render_unit, render_with_data, Template, TEMPLATE_FILE_VARIABLE};
pub use error::{RenderError, TemplateError};
