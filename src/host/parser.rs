//! CSS parser using tree-sitter-css

use tree_sitter::{Language, Parser, Tree};

use crate::error::{CssVarError, CssVarResult};

/// CSS parser wrapper around tree-sitter-css
pub struct CssParser {
    parser: Parser,
}

impl CssParser {
    /// Create a new CSS parser
    pub fn new() -> CssVarResult<Self> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_css::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| CssVarError::TreeSitterLanguage {
                message: e.to_string(),
            })?;

        Ok(Self { parser })
    }

    /// Parse CSS content and return the syntax tree
    pub fn parse(&mut self, content: &str) -> Option<Tree> {
        self.parser.parse(content, None)
    }
}
