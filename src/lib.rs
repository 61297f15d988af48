//! cssvar
//!
//! Inventory of the CSS custom properties declared in a document's style
//! sheets, indexed by selector text, with get/set/log operations on top.
//! The inventory talks to the page only through the
//! [`StyleSource`](variables::StyleSource) trait; [`host::HtmlDocument`] is an
//! in-memory implementation of it.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod logging;
pub mod variables;
#[cfg(test)]
pub(crate) mod test_utils;

pub use config::CssVarOptions;
pub use diagnostics::{ConsoleSink, DiagnosticSink, LogSink, MemorySink};
pub use error::{CssVarError, CssVarResult};
pub use host::HtmlDocument;
pub use variables::{Lookup, SetOutcome, Snapshot, VariableDeclaration, VariableStore};
