//! Turns CSS text into the rule list exposed through `StyleSource`.
//!
//! Only top-level rule sets become style rules. At-rules are classified and
//! kept in the list so hosts report them like a browser would, but their
//! contents are not looked at.

use log::debug;
use tree_sitter::Node;

use super::parser::CssParser;
use super::specificity::Specificity;
use crate::variables::{CssRule, Declaration, StyleRule};

/// One complex selector of a rule's selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPart {
    pub text: String,
    pub specificity: Specificity,
}

/// A rule together with the parts of its selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub rule: CssRule,
    /// Empty for at-rules
    pub selectors: Vec<SelectorPart>,
}

/// Parse a whole style sheet
pub fn parse_stylesheet(parser: &mut CssParser, content: &str) -> Vec<ParsedRule> {
    let Some(tree) = parser.parse(content) else {
        return Vec::new();
    };
    let root = tree.root_node();

    let mut rules = Vec::new();
    let mut resume_at = 0;
    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        // Already consumed by a recovered rule set
        if node.start_byte() < resume_at {
            continue;
        }
        let parsed = match node.kind() {
            "rule_set" => parse_rule_set(node, content).map(|(rule, end)| {
                resume_at = end;
                rule
            }),
            "media_statement" => Some(ParsedRule::at_rule(CssRule::Media {
                condition: prelude_text(node, content, "@media"),
            })),
            "import_statement" => Some(ParsedRule::at_rule(CssRule::Import {
                href: import_href(node, content),
            })),
            "keyframes_statement" => Some(ParsedRule::at_rule(CssRule::Keyframes {
                name: child_text(node, content, "keyframes_name").unwrap_or_default(),
            })),
            "comment" | "ERROR" | "declaration" => None,
            _ => Some(ParsedRule::at_rule(CssRule::Other {
                keyword: at_keyword(node, content),
            })),
        };
        rules.extend(parsed);
    }
    rules
}

/// Parse the content of a `style` attribute
pub fn parse_inline_style(parser: &mut CssParser, content: &str) -> Vec<Declaration> {
    let wrapped = format!("* {{ {} }}", content);
    parse_stylesheet(parser, &wrapped)
        .into_iter()
        .find_map(|parsed| match parsed.rule {
            CssRule::Style(rule) => Some(rule.declarations),
            _ => None,
        })
        .unwrap_or_default()
}

impl ParsedRule {
    fn at_rule(rule: CssRule) -> Self {
        Self {
            rule,
            selectors: Vec::new(),
        }
    }
}

/// Returns the rule and the byte offset where it ends in `content`
fn parse_rule_set(node: Node, content: &str) -> Option<(ParsedRule, usize)> {
    let selectors_node = find_child(node, "selectors")?;
    let block = find_child(node, "block")?;

    let selector_text = node_text(selectors_node, content).trim().to_string();
    let mut selectors = Vec::new();
    let mut cursor = selectors_node.walk();
    for part in selectors_node.named_children(&mut cursor) {
        if part.kind() == "comment" {
            continue;
        }
        selectors.push(SelectorPart {
            text: node_text(part, content).trim().to_string(),
            specificity: Specificity::of(part),
        });
    }

    let (pieces, end) = split_block(content, block.start_byte());
    let declarations = if node.has_error() || end != block.end_byte() {
        debug!("Recovering declarations of '{}' from its text", selector_text);
        pieces
            .iter()
            .filter_map(|piece| declaration_from_text(piece))
            .collect()
    } else {
        let mut declarations = Vec::new();
        let mut cursor = block.walk();
        for child in block.named_children(&mut cursor) {
            if child.kind() == "declaration" {
                declarations.extend(parse_declaration(child, content));
            }
        }
        declarations
    };

    let parsed = ParsedRule {
        rule: CssRule::Style(StyleRule {
            selector_text,
            declarations,
        }),
        selectors,
    };
    Some((parsed, end.max(node.end_byte())))
}

/// Split a declaration block starting at the `{` at `open` on its top-level
/// semicolons. Brackets, strings and comments are skipped over, so a custom
/// property value may hold any balanced token sequence. Returns the pieces
/// and the offset just past the closing brace, or the end of `content` when
/// the block is never closed.
fn split_block(content: &str, open: usize) -> (Vec<String>, usize) {
    let mut pieces = Vec::new();
    let Some(body) = content.get(open..).and_then(|rest| rest.strip_prefix('{')) else {
        return (pieces, content.len());
    };

    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut chars = body.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' {
                if let Some((_, escaped)) = chars.next() {
                    current.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '/' if chars.peek().is_some_and(|&(_, next)| next == '*') => {
                chars.next();
                let mut previous = ' ';
                for (_, c) in chars.by_ref() {
                    if previous == '*' && c == '/' {
                        break;
                    }
                    previous = c;
                }
                current.push(' ');
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            '}' if depth == 0 => {
                pieces.push(current);
                return (pieces, open + 1 + offset + 1);
            }
            '}' => {
                depth -= 1;
                current.push(c);
            }
            ';' if depth == 0 => pieces.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    pieces.push(current);
    (pieces, content.len())
}

/// `property: value [!important]` as found by [`split_block`]
fn declaration_from_text(text: &str) -> Option<Declaration> {
    let (property, value) = text.split_once(':')?;
    let property = property.trim();
    let is_ident = |c: char| c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii();
    if property.is_empty() || !property.chars().all(is_ident) {
        return None;
    }

    let mut value = value.trim();
    let mut important = false;
    if let Some((rest, flag)) = value.rsplit_once('!') {
        if flag.trim().eq_ignore_ascii_case("important") {
            value = rest.trim_end();
            important = true;
        }
    }

    // Blocks are only valid in custom property values
    if !property.starts_with("--") && value.contains('{') {
        return None;
    }

    Some(Declaration {
        property: property.to_string(),
        value: value.to_string(),
        important,
    })
}

fn parse_declaration(node: Node, content: &str) -> Option<Declaration> {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();

    let property = children.iter().find(|c| c.kind() == "property_name")?;
    let colon = children.iter().position(|c| c.kind() == ":")?;

    let mut important = false;
    let mut start = None;
    let mut end = None;
    for child in &children[colon + 1..] {
        match child.kind() {
            ";" => {}
            "important" => important = true,
            _ => {
                start.get_or_insert(child.start_byte());
                end = Some(child.end_byte());
            }
        }
    }

    let value = match (start, end) {
        (Some(start), Some(end)) => content[start..end].trim().to_string(),
        _ => String::new(),
    };

    Some(Declaration {
        property: node_text(*property, content).trim().to_string(),
        value,
        important,
    })
}

/// Text between the at-keyword and the block (or the end of the statement)
fn prelude_text(node: Node, content: &str, keyword: &str) -> String {
    let end = find_child(node, "block").map_or(node.end_byte(), |block| block.start_byte());
    content[node.start_byte()..end]
        .trim()
        .trim_start_matches(keyword)
        .trim_end_matches(';')
        .trim()
        .to_string()
}

fn import_href(node: Node, content: &str) -> String {
    let prelude = prelude_text(node, content, "@import");
    let href = prelude
        .strip_prefix("url(")
        .and_then(|rest| rest.split_once(')'))
        .map_or(prelude.as_str(), |(inner, _)| inner);
    let href = href.split_whitespace().next().unwrap_or("");
    href.trim_matches(|c| c == '"' || c == '\'').to_string()
}

fn at_keyword(node: Node, content: &str) -> String {
    child_text(node, content, "at_keyword").unwrap_or_else(|| {
        node_text(node, content)
            .split(|c: char| c.is_whitespace() || c == '{' || c == ';')
            .next()
            .unwrap_or("")
            .to_string()
    })
}

fn find_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn child_text(node: Node, content: &str, kind: &str) -> Option<String> {
    find_child(node, kind).map(|child| node_text(child, content).trim().to_string())
}

fn node_text<'a>(node: Node, content: &'a str) -> &'a str {
    &content[node.start_byte()..node.end_byte()]
}
