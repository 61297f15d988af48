//! HTML document host
//!
//! An in-memory page that implements [`StyleSource`]: HTML parsed with
//! scraper, style sheets parsed with tree-sitter-css, and a small cascade
//! that is good enough to answer computed custom property values.
//!
//! ## Cascade
//!
//! Declarations are ranked by importance, then inline style over style
//! sheets, then selector specificity, then source order. Custom properties
//! inherit from ancestors, other properties only report the element's own
//! cascaded value. Rules inside at-rules (`@media`, `@supports`, ...) are
//! never applied.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use ego_tree::NodeId;
use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::loader::{FileLoader, NoResources, ResourceLoader};
use super::parser::CssParser;
use super::specificity::Specificity;
use super::stylesheet::{ParsedRule, parse_inline_style, parse_stylesheet};
use crate::error::{CssVarError, CssVarResult, IoContext};
use crate::variables::origin::is_same_origin;
use crate::variables::source::custom_property_name;
use crate::variables::{CssRule, Declaration, StyleSheetInfo, StyleSource};

/// Handle to an element of an [`HtmlDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(NodeId);

/// Style rule prepared for matching against elements
struct CascadeRule {
    selectors: Vec<(Selector, Specificity)>,
    declarations: Vec<Declaration>,
}

impl CascadeRule {
    /// Highest specificity among the selectors matching `element`
    fn matching_specificity(&self, element: &ElementRef<'_>) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|(selector, _)| selector.matches(element))
            .map(|(_, specificity)| *specificity)
            .max()
    }
}

enum SheetContent {
    Loaded {
        rules: Vec<CssRule>,
        cascade: Vec<CascadeRule>,
    },
    /// Linked sheet whose text was never obtained
    Pending,
}

struct DocumentSheet {
    href: Option<Url>,
    content: SheetContent,
}

impl DocumentSheet {
    fn cascade_rules(&self) -> &[CascadeRule] {
        match &self.content {
            SheetContent::Loaded { cascade, .. } => cascade,
            SheetContent::Pending => &[],
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CascadeKey {
    important: bool,
    inline: bool,
    specificity: Specificity,
    order: usize,
}

/// A parsed HTML page with its style sheets and inline styles
pub struct HtmlDocument {
    location: Url,
    html: Html,
    sheets: Vec<DocumentSheet>,
    inline_styles: HashMap<NodeId, Vec<Declaration>>,
    parser: CssParser,
}

impl HtmlDocument {
    /// Parse a page; linked style sheets stay unloaded
    pub fn parse(html: &str, location: Url) -> CssVarResult<Self> {
        Self::parse_with_loader(html, location, &NoResources)
    }

    /// Parse a page, fetching linked style sheets through `loader`
    pub fn parse_with_loader<L: ResourceLoader + ?Sized>(
        html: &str,
        location: Url,
        loader: &L,
    ) -> CssVarResult<Self> {
        let html = Html::parse_document(html);
        let mut parser = CssParser::new()?;

        let mut found_sheets: Vec<(Option<Url>, Option<String>)> = Vec::new();
        for element in html.select(&compile_selector("style, link")?) {
            match element.value().name() {
                "style" => found_sheets.push((None, Some(element.text().collect()))),
                "link" if is_stylesheet_link(&element) => {
                    let Some(href) = element.value().attr("href") else {
                        continue;
                    };
                    match location.join(href) {
                        Ok(url) => {
                            let content = loader.load(&url);
                            if content.is_none() {
                                debug!("Style sheet {} was not loaded", url);
                            }
                            found_sheets.push((Some(url), content));
                        }
                        Err(e) => warn!("Ignoring style sheet link '{}': {}", href, e),
                    }
                }
                _ => {}
            }
        }

        let mut inline_styles = HashMap::new();
        for element in html.select(&compile_selector("[style]")?) {
            let style = element.value().attr("style").unwrap_or_default();
            inline_styles.insert(element.id(), parse_inline_style(&mut parser, style));
        }

        let mut document = Self {
            location,
            html,
            sheets: Vec::new(),
            inline_styles,
            parser,
        };
        for (href, content) in found_sheets {
            document.add_style_sheet(href, content.as_deref());
        }
        Ok(document)
    }

    /// Read a page from disk, linked `file:` style sheets are loaded too
    pub fn from_file(path: &Path) -> CssVarResult<Self> {
        let html = fs::read_to_string(path)
            .with_io_context(&format!("Failed to read {}", path.display()))?;
        let absolute = fs::canonicalize(path)
            .with_io_context(&format!("Failed to resolve {}", path.display()))?;
        let location = Url::from_file_path(&absolute)
            .map_err(|_| CssVarError::InvalidPath { path: absolute.clone() })?;

        Self::parse_with_loader(&html, location, &FileLoader)
    }

    /// Append a style sheet to the document. `css` of `None` adds a sheet
    /// that is still loading. Returns the index of the new sheet.
    pub fn add_style_sheet(&mut self, href: Option<Url>, css: Option<&str>) -> usize {
        let content = match css {
            Some(css) => {
                let parsed = parse_stylesheet(&mut self.parser, css);
                loaded_content(parsed)
            }
            None => SheetContent::Pending,
        };
        self.sheets.push(DocumentSheet { href, content });
        self.sheets.len() - 1
    }

    /// Value of `property` in the inline style of `element`
    pub fn inline_value(&self, element: &ElementHandle, property: &str) -> Option<&str> {
        self.inline_styles
            .get(&element.0)?
            .iter()
            .find(|declaration| property_matches(&declaration.property, property))
            .map(|declaration| declaration.value.as_str())
    }

    fn element(&self, handle: &ElementHandle) -> Option<ElementRef<'_>> {
        self.html.tree.get(handle.0).and_then(ElementRef::wrap)
    }

    /// Winning declared value of `property` on `element` itself
    fn cascaded_value(&self, element: ElementRef<'_>, property: &str) -> Option<&str> {
        let mut winner: Option<(CascadeKey, &str)> = None;
        let mut order = 0;

        for rule in self.sheets.iter().flat_map(DocumentSheet::cascade_rules) {
            let Some(specificity) = rule.matching_specificity(&element) else {
                continue;
            };
            for declaration in &rule.declarations {
                order += 1;
                if !property_matches(&declaration.property, property) {
                    continue;
                }
                let key = CascadeKey {
                    important: declaration.important,
                    inline: false,
                    specificity,
                    order,
                };
                consider(&mut winner, key, &declaration.value);
            }
        }

        for declaration in self.inline_styles.get(&element.id()).into_iter().flatten() {
            order += 1;
            if !property_matches(&declaration.property, property) {
                continue;
            }
            let key = CascadeKey {
                important: declaration.important,
                inline: true,
                specificity: Specificity::default(),
                order,
            };
            consider(&mut winner, key, &declaration.value);
        }

        winner.map(|(_, value)| value)
    }
}

impl StyleSource for HtmlDocument {
    type Element = ElementHandle;

    fn location(&self) -> &Url {
        &self.location
    }

    fn style_sheets(&self) -> Vec<StyleSheetInfo> {
        self.sheets
            .iter()
            .enumerate()
            .map(|(index, sheet)| StyleSheetInfo {
                index,
                href: sheet.href.as_ref().map(Url::to_string),
            })
            .collect()
    }

    fn css_rules(&self, sheet: &StyleSheetInfo) -> CssVarResult<&[CssRule]> {
        let document_sheet = self
            .sheets
            .get(sheet.index)
            .ok_or(CssVarError::UnknownStyleSheet { index: sheet.index })?;

        let href = document_sheet.href.as_ref().map(Url::to_string);
        if !is_same_origin(href.as_deref(), &self.location) {
            return Err(CssVarError::SecurityError {
                href: href.unwrap_or_default(),
            });
        }

        match &document_sheet.content {
            SheetContent::Loaded { rules, .. } => Ok(rules),
            SheetContent::Pending => Err(CssVarError::NotLoaded {
                href: href.unwrap_or_default(),
            }),
        }
    }

    fn match_elements(&self, selector: &str) -> CssVarResult<Vec<ElementHandle>> {
        let selector = compile_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .map(|element| ElementHandle(element.id()))
            .collect())
    }

    fn computed_value(&self, element: &ElementHandle, property: &str) -> Option<String> {
        let element = self.element(element)?;
        if custom_property_name(property).is_none() {
            return self
                .cascaded_value(element, property)
                .map(|value| value.trim().to_string());
        }

        let mut current = Some(element);
        while let Some(element) = current {
            if let Some(value) = self.cascaded_value(element, property) {
                return Some(value.trim().to_string());
            }
            current = element.parent().and_then(ElementRef::wrap);
        }
        None
    }

    fn set_inline_value(
        &mut self,
        element: &ElementHandle,
        property: &str,
        value: &str,
    ) -> CssVarResult<()> {
        if self.element(element).is_none() {
            return Err(CssVarError::UnknownElement);
        }

        let declarations = self.inline_styles.entry(element.0).or_default();
        match declarations
            .iter_mut()
            .find(|declaration| property_matches(&declaration.property, property))
        {
            Some(declaration) => {
                declaration.value = value.to_string();
                declaration.important = false;
            }
            None => declarations.push(Declaration::new(property, value)),
        }
        Ok(())
    }
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("location", &self.location.as_str())
            .field("sheets", &self.sheets.len())
            .field("inline_styles", &self.inline_styles.len())
            .finish()
    }
}

fn loaded_content(parsed: Vec<ParsedRule>) -> SheetContent {
    let mut rules = Vec::with_capacity(parsed.len());
    let mut cascade = Vec::new();

    for ParsedRule { rule, selectors } in parsed {
        if let CssRule::Style(style_rule) = &rule {
            let selectors = selectors
                .into_iter()
                .filter_map(|part| match compile_selector(&part.text) {
                    Ok(selector) => Some((selector, part.specificity)),
                    Err(e) => {
                        debug!("Selector never matches: {}", e);
                        None
                    }
                })
                .collect();
            cascade.push(CascadeRule {
                selectors,
                declarations: style_rule.declarations.clone(),
            });
        }
        rules.push(rule);
    }

    SheetContent::Loaded { rules, cascade }
}

fn consider<'a>(winner: &mut Option<(CascadeKey, &'a str)>, key: CascadeKey, value: &'a str) {
    match winner {
        Some((best, _)) if key <= *best => {}
        _ => *winner = Some((key, value)),
    }
}

fn compile_selector(selector: &str) -> CssVarResult<Selector> {
    Selector::parse(selector).map_err(|e| CssVarError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

fn is_stylesheet_link(element: &ElementRef<'_>) -> bool {
    element
        .value()
        .attr("rel")
        .is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        })
}

/// Custom property names are case-sensitive, other properties are not
fn property_matches(declared: &str, requested: &str) -> bool {
    if declared.starts_with("--") {
        declared == requested
    } else {
        declared.eq_ignore_ascii_case(requested)
    }
}
