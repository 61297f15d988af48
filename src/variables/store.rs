//! Variable store
//!
//! Owns the current [`Snapshot`] of a document and answers get/set/log
//! requests against it. Every public operation rescans the document first,
//! and no operation ever fails towards the caller: problems are reported to
//! the [`DiagnosticSink`] and a sentinel is returned.

use log::Level;

use super::extractor::{extract, first_match};
use super::snapshot::{Snapshot, VariableDeclaration};
use super::source::StyleSource;
use crate::config::CssVarOptions;
use crate::diagnostics::{DiagnosticSink, LogSink};

/// Selector of the document root
pub const ROOT_SELECTOR: &str = ":root";

/// Value written by `set` when no value is given
pub const CLEARED_VALUE: &str = "";

pub(crate) const MSG_NOT_FOUND_IN_SELECTOR: &str =
    "Variable with the given selector and name not found";
pub(crate) const MSG_NOT_FOUND: &str = "Variable with the given name not found";
pub(crate) const MSG_NAME_REQUIRED: &str = "Variable name is a mandatory parameter for set()";
pub(crate) const MSG_CANNOT_SET: &str = "Cannot set the value for variable";
pub(crate) const MSG_NO_VARIABLES: &str = "No CSS variables available for the selector";

/// Result of [`VariableStore::get`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// No name was given, the whole inventory
    Snapshot(&'a Snapshot),
    Value(&'a str),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn value(&self) -> Option<&'a str> {
        match *self {
            Lookup::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&'a Snapshot> {
        match *self {
            Lookup::Snapshot(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }
}

/// Result of [`VariableStore::set`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// Value written to the inline style of the first element matching `selector`
    Written { selector: String },
    NotFound,
    MissingName,
    /// The variable exists but its selector no longer resolves to a writable element
    WriteFailed,
}

/// Inventory of the CSS variables of one document
pub struct VariableStore<S: StyleSource, D: DiagnosticSink = LogSink> {
    source: S,
    sink: D,
    selector: String,
    snapshot: Snapshot,
}

impl<S: StyleSource> VariableStore<S> {
    /// Create a store over `source` with `:root` as default selector
    pub fn new(source: S) -> Self {
        Self::with_sink(source, LogSink)
    }

    pub fn from_options(source: S, options: &CssVarOptions) -> Self {
        Self::new(source).with_selector(&options.selector)
    }
}

impl<S: StyleSource, D: DiagnosticSink> VariableStore<S, D> {
    /// Create a store reporting to `sink`
    pub fn with_sink(source: S, sink: D) -> Self {
        let mut store = Self {
            source,
            sink,
            selector: ROOT_SELECTOR.to_string(),
            snapshot: Snapshot::default(),
        };
        store.refresh();
        store
    }

    pub fn with_selector(mut self, selector: &str) -> Self {
        self.selector = selector.to_string();
        self
    }

    /// Default selector given at construction
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Snapshot of the last refresh, without rescanning
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Rescan the document and replace the snapshot
    pub fn refresh(&mut self) {
        self.snapshot = extract(&self.source);
    }

    /// Whether `name` is declared for `:root`
    pub fn is_global(&mut self, name: &str) -> bool {
        self.refresh();
        global_variables(&self.snapshot)
            .iter()
            .any(|declaration| declaration.name == name)
    }

    /// Look up a variable.
    ///
    /// Without a name the whole snapshot is returned. With a name, the first
    /// matching declaration is searched either in `selector` only or across
    /// all selectors in snapshot order. Empty strings count as absent.
    pub fn get(&mut self, name: Option<&str>, selector: Option<&str>) -> Lookup<'_> {
        self.refresh();

        let Some(name) = non_empty(name) else {
            return Lookup::Snapshot(&self.snapshot);
        };

        let found = match non_empty(selector) {
            Some(selector) => self.snapshot.find_in(name, selector),
            None => self.snapshot.find(name).map(|(_, declaration)| declaration),
        };

        match found {
            Some(declaration) => Lookup::Value(&declaration.value),
            None => {
                let message = if non_empty(selector).is_some() {
                    MSG_NOT_FOUND_IN_SELECTOR
                } else {
                    MSG_NOT_FOUND
                };
                self.sink.emit(Level::Warn, message);
                Lookup::NotFound
            }
        }
    }

    /// Set a variable on the live document.
    ///
    /// The value is written to the inline style of the first element matched
    /// by the selector the variable was found in. A missing value clears the
    /// variable with [`CLEARED_VALUE`]. The snapshot is not touched; the next
    /// refresh picks the new value up.
    ///
    /// `Written` means the inline value was stored, not that it is now the
    /// effective value: an `!important` declaration in a style sheet still
    /// wins over it, so a later `get` keeps returning the sheet's value.
    pub fn set(
        &mut self,
        name: Option<&str>,
        value: Option<&str>,
        selector: Option<&str>,
    ) -> SetOutcome {
        self.refresh();

        let Some(name) = non_empty(name) else {
            self.sink.emit(Level::Error, MSG_NAME_REQUIRED);
            return SetOutcome::MissingName;
        };
        let value = non_empty(value).unwrap_or(CLEARED_VALUE);

        let target = match non_empty(selector) {
            Some(selector) => match self.snapshot.find_in(name, selector) {
                Some(_) => selector.to_string(),
                None => {
                    self.sink.emit(Level::Warn, MSG_NOT_FOUND_IN_SELECTOR);
                    return SetOutcome::NotFound;
                }
            },
            None => match self.snapshot.find(name) {
                Some((selector, _)) => selector.to_string(),
                None => {
                    self.sink.emit(Level::Warn, MSG_NOT_FOUND);
                    return SetOutcome::NotFound;
                }
            },
        };

        self.write_through(&target, name, value)
    }

    fn write_through(&mut self, selector: &str, name: &str, value: &str) -> SetOutcome {
        let Some(element) = first_match(&self.source, selector) else {
            self.sink.emit(Level::Warn, MSG_CANNOT_SET);
            return SetOutcome::WriteFailed;
        };

        match self
            .source
            .set_inline_value(&element, &format!("--{}", name), value)
        {
            Ok(()) => SetOutcome::Written {
                selector: selector.to_string(),
            },
            Err(e) => {
                log::debug!("Writing --{} on '{}' failed: {}", name, selector, e);
                self.sink.emit(Level::Warn, MSG_CANNOT_SET);
                SetOutcome::WriteFailed
            }
        }
    }

    /// Report the whole snapshot, or the declarations of one selector
    pub fn log(&mut self, selector: Option<&str>) {
        self.refresh();

        match non_empty(selector) {
            Some(selector) => match self.snapshot.get(selector) {
                Some(declarations) if !declarations.is_empty() => {
                    let text = to_json(declarations);
                    self.sink.emit(Level::Info, &text);
                }
                _ => self.sink.emit(Level::Info, MSG_NO_VARIABLES),
            },
            None => {
                let text = to_json(&self.snapshot);
                self.sink.emit(Level::Info, &text);
            }
        }
    }
}

fn non_empty(arg: Option<&str>) -> Option<&str> {
    arg.filter(|s| !s.is_empty())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

/// Declarations of `:root` in `snapshot`, empty when there are none
pub fn global_variables(snapshot: &Snapshot) -> &[VariableDeclaration] {
    snapshot.get(ROOT_SELECTOR).unwrap_or(&[])
}
