//! Builds a [`Snapshot`] from the live style sheets of a [`StyleSource`].
//!
//! Values are resolved through the computed style of the first element the
//! rule's selector matches, so they reflect the cascade rather than the text
//! of the one rule. A sheet or rule that cannot be read contributes nothing;
//! the scan itself never fails.

use log::debug;

use super::origin::same_origin_sheets;
use super::snapshot::{Snapshot, VariableDeclaration};
use super::source::{StyleRule, StyleSource};

/// Scan every same-origin style sheet of `source`
pub fn extract<S: StyleSource>(source: &S) -> Snapshot {
    let sheets = same_origin_sheets(source.style_sheets(), source.location());

    let rules: Vec<&StyleRule> = sheets
        .iter()
        .flat_map(|sheet| match source.css_rules(sheet) {
            Ok(rules) => rules
                .iter()
                .filter_map(|rule| rule.as_style_rule())
                .collect::<Vec<_>>(),
            Err(e) => {
                debug!("Skipping style sheet {} ({:?}): {}", sheet.index, sheet.href, e);
                Vec::new()
            }
        })
        .collect();

    let mut builder = Snapshot::builder();
    for rule in rules {
        let names: Vec<&str> = rule
            .declarations
            .iter()
            .filter_map(|declaration| declaration.custom_property_name())
            .collect();
        if names.is_empty() {
            continue;
        }

        let Some(element) = first_match(source, &rule.selector_text) else {
            continue;
        };

        for name in names {
            match source.computed_value(&element, &format!("--{}", name)) {
                Some(value) => {
                    builder.push(&rule.selector_text, VariableDeclaration::new(name, value.trim()))
                }
                None => debug!("No computed value for --{} on '{}'", name, rule.selector_text),
            }
        }
    }

    builder.finish()
}

/// First element matched by `selector`, `None` when it matches nothing or
/// the host rejects the selector
pub(crate) fn first_match<S: StyleSource>(source: &S, selector: &str) -> Option<S::Element> {
    match source.match_elements(selector) {
        Ok(elements) => {
            let element = elements.into_iter().next();
            if element.is_none() {
                debug!("Selector '{}' matches no element", selector);
            }
            element
        }
        Err(e) => {
            debug!("Cannot match selector '{}': {}", selector, e);
            None
        }
    }
}
