//! Tests for the variable store

use log::Level;
use url::Url;

use super::store::{
    Lookup, SetOutcome, VariableStore, MSG_CANNOT_SET, MSG_NAME_REQUIRED, MSG_NOT_FOUND,
    MSG_NOT_FOUND_IN_SELECTOR, MSG_NO_VARIABLES,
};
use super::source::StyleSource;
use crate::config::CssVarOptions;
use crate::diagnostics::MemorySink;
use crate::host::HtmlDocument;
use crate::test_utils::document_with_css;

fn store(sheets: &[&str]) -> VariableStore<HtmlDocument, MemorySink> {
    VariableStore::with_sink(document_with_css(sheets), MemorySink::new())
}

#[test]
fn test_global_variable_lookup() {
    let mut store = store(&[":root { --brand-color: #ff0000; }"]);

    assert_eq!(store.get(Some("brand-color"), None), Lookup::Value("#ff0000"));
    assert!(store.is_global("brand-color"));
    assert!(store.sink().messages().is_empty());
}

#[test]
fn test_scoped_variable_lookup() {
    let mut store = store(&[".card { --gap: 8px; }"]);

    assert!(!store.is_global("gap"));
    assert_eq!(store.get(Some("gap"), Some(".card")).value(), Some("8px"));

    assert!(store.get(Some("gap"), Some(".missing")).is_not_found());
    assert_eq!(store.sink().last(), Some(MSG_NOT_FOUND_IN_SELECTOR));
}

#[test]
fn test_unscoped_lookup_matches_first_selector() {
    let mut store = store(&[
        ".card { --gap: 8px; } #main .card { --pad: 2px; } :root { --gap: 4px; }",
    ]);

    let unscoped = store.get(Some("gap"), None).value().map(str::to_string);
    let scoped = store.get(Some("gap"), Some(".card")).value().map(str::to_string);
    assert_eq!(unscoped, scoped);
    assert_eq!(unscoped.as_deref(), Some("8px"));
}

#[test]
fn test_unknown_name_reports_not_found() {
    let mut store = store(&[":root { --brand: red; }"]);

    assert_eq!(store.get(Some("missing"), None), Lookup::NotFound);
    assert_eq!(store.sink().messages(), &[(Level::Warn, MSG_NOT_FOUND.to_string())]);
}

#[test]
fn test_get_without_name_returns_snapshot() {
    let mut store = store(&[":root { --brand: red; } .card { --gap: 8px; }"]);

    let snapshot = store.get(None, None).snapshot().cloned().unwrap();
    assert_eq!(snapshot.len(), 2);

    // Empty name counts as absent, a selector alone does not scope the result
    let scoped = store.get(Some(""), Some(".card")).snapshot().cloned().unwrap();
    assert_eq!(scoped, snapshot);
}

#[test]
fn test_set_then_refresh_shows_new_value() {
    let mut store = store(&[".card { --gap: 8px; }"]);

    let outcome = store.set(Some("gap"), Some("16px"), Some(".card"));
    assert_eq!(outcome, SetOutcome::Written { selector: ".card".to_string() });

    // The snapshot itself is only replaced on refresh
    assert_eq!(store.snapshot().find_in("gap", ".card").unwrap().value, "8px");
    store.refresh();
    assert_eq!(store.snapshot().find_in("gap", ".card").unwrap().value, "16px");
    assert_eq!(store.get(Some("gap"), Some(".card")).value(), Some("16px"));
}

#[test]
fn test_set_without_selector_writes_where_found() {
    let mut store = store(&[".card { --gap: 8px; } :root { --gap: 4px; }"]);

    let outcome = store.set(Some("gap"), Some("10px"), None);
    assert_eq!(outcome, SetOutcome::Written { selector: ".card".to_string() });

    let root = store.source().match_elements(":root").unwrap()[0];
    assert_eq!(store.source().inline_value(&root, "--gap"), None);
    assert_eq!(store.get(Some("gap"), Some(":root")).value(), Some("4px"));
    assert_eq!(store.get(Some("gap"), Some(".card")).value(), Some("10px"));
}

#[test]
fn test_set_unknown_name_does_not_touch_document() {
    let mut store = store(&[":root { --brand: red; } .card { --gap: 8px; }"]);
    let before = store.snapshot().clone();

    assert_eq!(store.set(Some("missing-name"), Some("1px"), None), SetOutcome::NotFound);
    assert_eq!(store.sink().last(), Some(MSG_NOT_FOUND));

    store.refresh();
    assert_eq!(store.snapshot(), &before);
    let root = store.source().match_elements(":root").unwrap()[0];
    assert_eq!(store.source().inline_value(&root, "--missing-name"), None);
}

#[test]
fn test_set_in_wrong_selector_is_not_found() {
    let mut store = store(&[".card { --gap: 8px; }"]);

    assert_eq!(store.set(Some("gap"), Some("1px"), Some(":root")), SetOutcome::NotFound);
    assert_eq!(store.sink().last(), Some(MSG_NOT_FOUND_IN_SELECTOR));
    assert_eq!(store.get(Some("gap"), None).value(), Some("8px"));
}

#[test]
fn test_set_requires_a_name() {
    let mut store = store(&[".card { --gap: 8px; }"]);

    assert_eq!(store.set(None, Some("1px"), None), SetOutcome::MissingName);
    assert_eq!(store.set(Some(""), Some("1px"), None), SetOutcome::MissingName);
    assert_eq!(
        store.sink().messages(),
        &[
            (Level::Error, MSG_NAME_REQUIRED.to_string()),
            (Level::Error, MSG_NAME_REQUIRED.to_string()),
        ]
    );
}

#[test]
fn test_set_without_value_clears_with_empty_string() {
    let mut store = store(&[".card { --gap: 8px; }"]);

    assert!(matches!(store.set(Some("gap"), None, None), SetOutcome::Written { .. }));
    assert_eq!(store.get(Some("gap"), Some(".card")).value(), Some(""));

    // Still listed, so it can be set again
    assert!(matches!(store.set(Some("gap"), Some("2px"), None), SetOutcome::Written { .. }));
    assert_eq!(store.get(Some("gap"), None).value(), Some("2px"));
}

#[test]
fn test_set_does_not_beat_important_sheet_value() {
    let mut store = store(&[".card { --gap: 8px !important; }"]);

    let outcome = store.set(Some("gap"), Some("16px"), Some(".card"));
    assert_eq!(outcome, SetOutcome::Written { selector: ".card".to_string() });
    assert_eq!(store.get(Some("gap"), Some(".card")).value(), Some("8px"));

    let card = store.source().match_elements(".card").unwrap()[0];
    assert_eq!(store.source().inline_value(&card, "--gap"), Some("16px"));
}

#[test]
fn test_repeated_set_last_write_wins() {
    let mut store = store(&[".card { --gap: 8px; }"]);

    store.set(Some("gap"), Some("1px"), Some(".card"));
    store.set(Some("gap"), Some("2px"), Some(".card"));
    assert_eq!(store.get(Some("gap"), Some(".card")).value(), Some("2px"));
}

#[test]
fn test_set_reports_rejected_write() {
    // Reads are forwarded, every write is refused
    struct Readonly(HtmlDocument);

    impl StyleSource for Readonly {
        type Element = crate::host::ElementHandle;

        fn location(&self) -> &Url {
            self.0.location()
        }
        fn style_sheets(&self) -> Vec<super::StyleSheetInfo> {
            self.0.style_sheets()
        }
        fn css_rules(
            &self,
            sheet: &super::StyleSheetInfo,
        ) -> crate::CssVarResult<&[super::CssRule]> {
            self.0.css_rules(sheet)
        }
        fn match_elements(&self, selector: &str) -> crate::CssVarResult<Vec<Self::Element>> {
            self.0.match_elements(selector)
        }
        fn computed_value(&self, element: &Self::Element, property: &str) -> Option<String> {
            self.0.computed_value(element, property)
        }
        fn set_inline_value(
            &mut self,
            _: &Self::Element,
            _: &str,
            _: &str,
        ) -> crate::CssVarResult<()> {
            Err(crate::CssVarError::UnknownElement)
        }
    }

    let source = Readonly(document_with_css(&[".card { --gap: 8px; }"]));
    let mut store = VariableStore::with_sink(source, MemorySink::new());

    assert_eq!(store.set(Some("gap"), Some("1px"), None), SetOutcome::WriteFailed);
    assert_eq!(store.sink().last(), Some(MSG_CANNOT_SET));
}

#[test]
fn test_is_global_sees_document_changes() {
    let mut store = store(&[".card { --gap: 8px; }"]);
    assert!(!store.is_global("brand"));

    store.source_mut().add_style_sheet(None, Some(":root { --brand: red; }"));
    assert!(store.is_global("brand"));
    assert!(!store.is_global("gap"));
}

#[test]
fn test_is_global_on_empty_document() {
    let mut store = store(&[]);
    assert!(!store.is_global("anything"));
}

#[test]
fn test_cross_origin_sheet_is_ignored() {
    let mut store = store(&[":root { --brand: red; }"]);
    store.source_mut().add_style_sheet(
        Some(Url::parse("https://cdn.example.net/theme.css").unwrap()),
        Some(":root { --cdn: 1; } .card { --gap: 8px; }"),
    );

    store.refresh();
    assert_eq!(store.snapshot().len(), 1);
    assert!(!store.is_global("cdn"));
    assert!(store.get(Some("gap"), None).is_not_found());
}

#[test]
fn test_refresh_is_idempotent() {
    let mut store = store(&[":root { --brand: red; } .card { --gap: 8px; }"]);

    store.refresh();
    let first = store.snapshot().clone();
    store.refresh();
    assert_eq!(store.snapshot(), &first);
}

#[test]
fn test_log_whole_snapshot() {
    let mut store = store(&[":root { --brand: red; }"]);
    store.log(None);

    let (level, message) = store.sink().messages().last().unwrap().clone();
    assert_eq!(level, Level::Info);
    let json: serde_json::Value = serde_json::from_str(&message).unwrap();
    assert_eq!(json, serde_json::json!({ ":root": [{ "name": "brand", "value": "red" }] }));
}

#[test]
fn test_log_one_selector() {
    let mut store = store(&[":root { --brand: red; } .card { --gap: 8px; }"]);
    store.log(Some(".card"));

    let json: serde_json::Value = serde_json::from_str(store.sink().last().unwrap()).unwrap();
    assert_eq!(json, serde_json::json!([{ "name": "gap", "value": "8px" }]));

    store.sink_mut().clear();
    store.log(Some(".missing"));
    assert_eq!(store.sink().messages(), &[(Level::Info, MSG_NO_VARIABLES.to_string())]);
}

#[test]
fn test_default_selector() {
    let document = document_with_css(&[]);
    let store = VariableStore::new(document);
    assert_eq!(store.selector(), ":root");

    let options = CssVarOptions {
        selector: ".theme".to_string(),
        ..CssVarOptions::default()
    };
    let store = VariableStore::from_options(store.into_source(), &options);
    assert_eq!(store.selector(), ".theme");
}
