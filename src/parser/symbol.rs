// Symbol model shared by all extraction strategies
//
// These types are the per-file half of the artifact schema and are designed
// to serialize directly into it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named structural declaration with a location and optional children
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Symbol {
    /// Declared name (never empty)
    pub name: String,
    /// Kind tag
    #[serde(rename = "symbol_type")]
    pub kind: SymbolKind,
    /// 1-based declaration line
    #[serde(rename = "lineno")]
    pub line: usize,
    /// Documentation text, when the extractor can see it
    pub docstring: Option<String>,
    /// Nested declarations (a method belongs to its enclosing class)
    pub children: Vec<Symbol>,
}

impl Symbol {
    /// Create a symbol with no docstring or children
    pub fn new(name: &str, kind: SymbolKind, line: usize) -> Self {
        Self {
            name: name.to_string(),
            kind,
            line,
            docstring: None,
            children: Vec::new(),
        }
    }

    /// Attach a docstring
    pub fn with_docstring(mut self, docstring: Option<String>) -> Self {
        self.docstring = docstring;
        self
    }

    /// Count this symbol and all descendants
    pub fn total_count(&self) -> usize {
        1 + self.children.iter().map(Symbol::total_count).sum::<usize>()
    }
}

/// Kind of extracted symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Function,
    AsyncFunction,
    Method,
    Interface,
    Enum,
    Variable,
    Component,
    DefaultExport,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::AsyncFunction => "async_function",
            SymbolKind::Method => "method",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
            SymbolKind::Variable => "variable",
            SymbolKind::Component => "component",
            SymbolKind::DefaultExport => "default_export",
        };
        f.write_str(s)
    }
}

/// Result of extracting one file: symbol tree, raw import tokens, and a
/// human-readable summary line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOutline {
    pub symbols: Vec<Symbol>,
    pub imports: Vec<String>,
    pub summary: String,
}

impl FileOutline {
    /// An outline with no symbols or imports, keeping only a summary
    pub fn empty(summary: impl Into<String>) -> Self {
        Self {
            symbols: Vec::new(),
            imports: Vec::new(),
            summary: summary.into(),
        }
    }
}

/// Universal fallback summary for data and documentation formats
pub fn line_count_summary(source: &str) -> String {
    let lines = source.lines().filter(|l| !l.trim().is_empty()).count();
    format!("{} non-empty lines", lines)
}
