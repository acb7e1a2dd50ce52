// Python extraction using tree-sitter
//
// Produces the nested symbol outline and flattened dotted import list for a
// Python source file. Files whose tree contains syntax errors degrade to an
// empty outline; a broken file must never abort the run.

use crate::error::{Error, Result};
use crate::parser::symbol::{FileOutline, Symbol, SymbolKind};
use tree_sitter::{Node, Parser};

/// Summary used when a file cannot be parsed
pub const SYNTAX_ERROR_SUMMARY: &str = "Syntax error encountered; detailed summary unavailable.";

/// Precise extractor for Python source files
pub struct PythonExtractor {
    parser: Parser,
}

impl PythonExtractor {
    /// Create a new Python extractor
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set Python language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Extract symbols, imports, and a summary from Python source
    pub fn extract(&mut self, source: &str) -> FileOutline {
        let tree = match self.parser.parse(source, None) {
            Some(tree) => tree,
            None => return FileOutline::empty(SYNTAX_ERROR_SUMMARY),
        };

        let root = tree.root_node();
        if root.has_error() {
            return FileOutline::empty(SYNTAX_ERROR_SUMMARY);
        }

        let bytes = source.as_bytes();
        let mut symbols = Vec::new();
        collect_symbols(&root, bytes, &mut symbols);

        let mut imports = Vec::new();
        collect_imports(&root, bytes, &mut imports);

        let summary = module_summary(&root);

        FileOutline {
            symbols,
            imports,
            summary,
        }
    }
}

/// Walk a node, appending class/function symbols to `container`.
///
/// Definitions nest: anything declared inside a definition's body becomes a
/// child of that definition's symbol, matching source containment.
fn collect_symbols(node: &Node, source: &[u8], container: &mut Vec<Symbol>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "class_definition" => {
                if let Some(mut symbol) = definition_symbol(&child, source, SymbolKind::Class) {
                    collect_symbols(&child, source, &mut symbol.children);
                    container.push(symbol);
                }
            }
            "function_definition" => {
                let kind = if has_async_keyword(&child) {
                    SymbolKind::AsyncFunction
                } else {
                    SymbolKind::Function
                };
                if let Some(mut symbol) = definition_symbol(&child, source, kind) {
                    collect_symbols(&child, source, &mut symbol.children);
                    container.push(symbol);
                }
            }
            _ => collect_symbols(&child, source, container),
        }
    }
}

/// Build a symbol for a class or function definition node
fn definition_symbol(node: &Node, source: &[u8], kind: SymbolKind) -> Option<Symbol> {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())?
        .to_string();
    if name.is_empty() {
        return None;
    }
    let line = node.start_position().row + 1;
    let docstring = body_docstring(node, source);
    Some(Symbol::new(&name, kind, line).with_docstring(docstring))
}

/// Check whether a function_definition carries the async keyword
fn has_async_keyword(node: &Node) -> bool {
    let mut cursor = node.walk();
    let is_async = node.children(&mut cursor).any(|c| c.kind() == "async");
    is_async
}

/// Extract the docstring from a definition body (first string expression)
fn body_docstring(node: &Node, source: &[u8]) -> Option<String> {
    let body = node.child_by_field_name("body")?;
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let mut cursor = first.walk();
    for inner in first.children(&mut cursor) {
        if inner.kind() == "string" {
            return string_content(&inner, source);
        }
    }
    None
}

/// Extract string content, handling triple-quoted strings
fn string_content(node: &Node, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;

    let s = if text.starts_with("\"\"\"") || text.starts_with("'''") {
        &text[3..text.len().saturating_sub(3)]
    } else if text.starts_with('"') || text.starts_with('\'') {
        &text[1..text.len().saturating_sub(1)]
    } else {
        text
    };

    Some(s.trim().to_string())
}

/// Walk the whole tree collecting flattened import tokens
fn collect_imports(node: &Node, source: &[u8], imports: &mut Vec<String>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_statement" => parse_import(&child, source, imports),
            "import_from_statement" => parse_import_from(&child, source, imports),
            _ => collect_imports(&child, source, imports),
        }
    }
}

/// Flatten `import x` / `import x as y` into dotted module tokens
fn parse_import(node: &Node, source: &[u8], imports: &mut Vec<String>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "dotted_name" => {
                if let Ok(text) = child.utf8_text(source) {
                    imports.push(text.to_string());
                }
            }
            "aliased_import" => {
                // The original name, not the alias, is what resolution sees
                let mut inner_cursor = child.walk();
                for inner in child.children(&mut inner_cursor) {
                    if inner.kind() == "dotted_name" {
                        if let Ok(text) = inner.utf8_text(source) {
                            imports.push(text.to_string());
                        }
                        break;
                    }
                }
            }
            _ => {}
        }
    }
}

/// Flatten `from x import a, b` into `x.a`, `x.b` tokens.
///
/// Relative imports keep only the dotted tail (`from ..utils import x`
/// contributes `utils.x`); the leading dots are not represented.
fn parse_import_from(node: &Node, source: &[u8], imports: &mut Vec<String>) {
    let mut module = String::new();
    let mut names: Vec<String> = Vec::new();
    let mut seen_import_keyword = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "relative_import" => {
                let mut inner_cursor = child.walk();
                for inner in child.children(&mut inner_cursor) {
                    if inner.kind() == "dotted_name" {
                        if let Ok(text) = inner.utf8_text(source) {
                            module = text.to_string();
                        }
                    }
                }
            }
            "dotted_name" => {
                if let Ok(text) = child.utf8_text(source) {
                    if seen_import_keyword {
                        names.push(text.to_string());
                    } else {
                        module = text.to_string();
                    }
                }
            }
            "import" => {
                seen_import_keyword = true;
            }
            "wildcard_import" => {
                names.push("*".to_string());
            }
            "aliased_import" => {
                let mut inner_cursor = child.walk();
                for inner in child.children(&mut inner_cursor) {
                    if matches!(inner.kind(), "dotted_name") {
                        if let Ok(text) = inner.utf8_text(source) {
                            names.push(text.to_string());
                        }
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    for name in names {
        if module.is_empty() {
            imports.push(name);
        } else {
            imports.push(format!("{}.{}", module, name));
        }
    }
}

/// Summary from the real tree: top-level declaration counts plus module
/// statement count
fn module_summary(root: &Node) -> String {
    let mut class_count = 0;
    let mut func_count = 0;
    let mut statements = 0;

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "comment" {
            continue;
        }
        statements += 1;
        match child.kind() {
            "class_definition" => class_count += 1,
            "function_definition" => func_count += 1,
            "decorated_definition" => {
                let mut inner_cursor = child.walk();
                for inner in child.named_children(&mut inner_cursor) {
                    match inner.kind() {
                        "class_definition" => class_count += 1,
                        "function_definition" => func_count += 1,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    format!(
        "Top-level declarations: {} classes, {} functions; module length {} statements.",
        class_count, func_count, statements
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> FileOutline {
        let mut extractor = PythonExtractor::new().unwrap();
        extractor.extract(source)
    }

    #[test]
    fn test_extractor_new() {
        assert!(PythonExtractor::new().is_ok());
    }

    #[test]
    fn test_empty_file() {
        let outline = extract("");
        assert!(outline.symbols.is_empty());
        assert!(outline.imports.is_empty());
    }

    #[test]
    fn test_simple_function() {
        let outline = extract("def hello():\n    pass\n");
        assert_eq!(outline.symbols.len(), 1);
        assert_eq!(outline.symbols[0].name, "hello");
        assert_eq!(outline.symbols[0].kind, SymbolKind::Function);
        assert_eq!(outline.symbols[0].line, 1);
    }

    #[test]
    fn test_async_function() {
        let outline = extract("async def fetch(url):\n    pass\n");
        assert_eq!(outline.symbols.len(), 1);
        assert_eq!(outline.symbols[0].kind, SymbolKind::AsyncFunction);
    }

    #[test]
    fn test_class_with_methods_nested() {
        let source = "class Greeter:\n    def greet(self):\n        pass\n    def wave(self):\n        pass\n";
        let outline = extract(source);
        assert_eq!(outline.symbols.len(), 1);
        let class = &outline.symbols[0];
        assert_eq!(class.kind, SymbolKind::Class);
        assert_eq!(class.children.len(), 2);
        assert_eq!(class.children[0].name, "greet");
        assert_eq!(class.children[1].name, "wave");
    }

    #[test]
    fn test_nested_function() {
        let source = "def outer():\n    def inner():\n        pass\n";
        let outline = extract(source);
        assert_eq!(outline.symbols.len(), 1);
        assert_eq!(outline.symbols[0].children.len(), 1);
        assert_eq!(outline.symbols[0].children[0].name, "inner");
    }

    #[test]
    fn test_docstrings() {
        let source = "class C:\n    \"\"\"A class.\"\"\"\n    def m(self):\n        \"\"\"A method.\"\"\"\n        pass\n";
        let outline = extract(source);
        assert_eq!(outline.symbols[0].docstring.as_deref(), Some("A class."));
        assert_eq!(
            outline.symbols[0].children[0].docstring.as_deref(),
            Some("A method.")
        );
    }

    #[test]
    fn test_decorated_definition() {
        let source = "@decorator\ndef helper():\n    pass\n";
        let outline = extract(source);
        assert_eq!(outline.symbols.len(), 1);
        assert_eq!(outline.symbols[0].name, "helper");
    }

    #[test]
    fn test_simple_import() {
        let outline = extract("import os\n");
        assert_eq!(outline.imports, vec!["os"]);
    }

    #[test]
    fn test_import_with_alias() {
        let outline = extract("import numpy as np\n");
        assert_eq!(outline.imports, vec!["numpy"]);
    }

    #[test]
    fn test_from_import_flattened() {
        let outline = extract("from pkg.utils import helper, other\n");
        assert_eq!(outline.imports, vec!["pkg.utils.helper", "pkg.utils.other"]);
    }

    #[test]
    fn test_relative_import_keeps_tail() {
        let outline = extract("from ..utils import helper\n");
        assert_eq!(outline.imports, vec!["utils.helper"]);
    }

    #[test]
    fn test_bare_relative_import() {
        let outline = extract("from . import sibling\n");
        assert_eq!(outline.imports, vec!["sibling"]);
    }

    #[test]
    fn test_wildcard_import() {
        let outline = extract("from pkg import *\n");
        assert_eq!(outline.imports, vec!["pkg.*"]);
    }

    #[test]
    fn test_import_inside_function_is_collected() {
        let source = "def lazy():\n    import json\n";
        let outline = extract(source);
        assert_eq!(outline.imports, vec!["json"]);
    }

    #[test]
    fn test_syntax_error_degrades() {
        let outline = extract("def broken(:\n");
        assert!(outline.symbols.is_empty());
        assert!(outline.imports.is_empty());
        assert_eq!(outline.summary, SYNTAX_ERROR_SUMMARY);
    }

    #[test]
    fn test_summary_counts() {
        let source = "import os\n\nclass A:\n    pass\n\ndef f():\n    pass\n\nX = 1\n";
        let outline = extract(source);
        assert_eq!(
            outline.summary,
            "Top-level declarations: 1 classes, 1 functions; module length 4 statements."
        );
    }
}
