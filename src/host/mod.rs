//! In-memory host document
//!
//! Provides a [`StyleSource`](crate::variables::StyleSource) without a
//! browser:
//! - tree-sitter-css for parsing style sheets
//! - scraper for the element tree and selector matching

pub mod document;
pub mod loader;
pub mod parser;
pub mod specificity;
pub mod stylesheet;

pub use document::{ElementHandle, HtmlDocument};
pub use loader::{FileLoader, NoResources, ResourceLoader};
