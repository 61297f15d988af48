//! The host boundary.
//!
//! The variable store never parses CSS or walks a document itself. Everything
//! it needs from the live page goes through [`StyleSource`].

use url::Url;

use crate::error::CssVarResult;

/// One entry of the document's style sheet list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheetInfo {
    /// Position in the document's style sheet list
    pub index: usize,
    /// Absolute URL for linked sheets, `None` for inline `<style>` sheets
    pub href: Option<String>,
}

/// A single declaration of a style rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }

    /// Bare name of a custom property declaration (`--gap` gives `gap`)
    pub fn custom_property_name(&self) -> Option<&str> {
        custom_property_name(&self.property)
    }
}

/// Strip the two-dash prefix of a custom property name.
/// Returns `None` for ordinary properties and for a bare `--`.
pub fn custom_property_name(property: &str) -> Option<&str> {
    property
        .trim()
        .strip_prefix("--")
        .filter(|name| !name.is_empty())
}

/// An ordinary style rule: selector text plus its declaration block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Selector text exactly as the host reports it
    pub selector_text: String,
    pub declarations: Vec<Declaration>,
}

/// Entry of a style sheet's rule list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssRule {
    Style(StyleRule),
    Media { condition: String },
    Import { href: String },
    Keyframes { name: String },
    /// Any other at-rule, e.g. `@font-face` or `@supports`
    Other { keyword: String },
}

impl CssRule {
    pub fn as_style_rule(&self) -> Option<&StyleRule> {
        match self {
            CssRule::Style(rule) => Some(rule),
            _ => None,
        }
    }
}

/// Live stylesheet and element model of a host document
pub trait StyleSource {
    /// Handle to a live element
    type Element;

    /// URL of the current page
    fn location(&self) -> &Url;

    /// The document's style sheets in document order
    fn style_sheets(&self) -> Vec<StyleSheetInfo>;

    /// Rule list of a sheet. Fails for sheets the host refuses to expose
    /// (cross-origin) or cannot expose yet (still loading).
    fn css_rules(&self, sheet: &StyleSheetInfo) -> CssVarResult<&[CssRule]>;

    /// Elements matched by `selector`, in document order
    fn match_elements(&self, selector: &str) -> CssVarResult<Vec<Self::Element>>;

    /// Fully resolved value of `property` on `element`, `None` when the
    /// element has no value for it
    fn computed_value(&self, element: &Self::Element, property: &str) -> Option<String>;

    /// Set `property` on the inline style of `element`
    fn set_inline_value(
        &mut self,
        element: &Self::Element,
        property: &str,
        value: &str,
    ) -> CssVarResult<()>;
}
