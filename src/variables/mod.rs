//! CSS variable inventory
//!
//! Turns the live style sheets of a document into a selector-indexed
//! [`Snapshot`] of custom property declarations and offers get/set/log
//! operations on top of it:
//! - `source`: the [`StyleSource`] capability the host provides
//! - `origin`: same-origin filtering of style sheets
//! - `extractor`: the scan producing a snapshot
//! - `store`: the stateful [`VariableStore`]

pub mod extractor;
pub mod origin;
pub mod snapshot;
pub mod source;
pub mod store;

pub use extractor::extract;
pub use snapshot::{Snapshot, VariableDeclaration};
pub use source::{CssRule, Declaration, StyleRule, StyleSheetInfo, StyleSource};
pub use store::{Lookup, SetOutcome, VariableStore, CLEARED_VALUE, ROOT_SELECTOR};

#[cfg(test)]
mod store_tests;
