// Java extraction using tree-sitter
//
// Top-level type declarations become symbols with their methods as children.
// When the grammar cannot be loaded at startup the analyzer swaps this
// extractor for the pattern heuristic; that decision is made once, never per
// file.

use crate::error::{Error, Result};
use crate::parser::symbol::{FileOutline, Symbol, SymbolKind};
use crate::parser::type_summary;
use tree_sitter::{Node, Parser};

/// Precise extractor for Java source files
pub struct JavaExtractor {
    parser: Parser,
}

impl JavaExtractor {
    /// Create a new Java extractor
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set Java language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Extract symbols, imports, and a summary from Java source
    pub fn extract(&mut self, source: &str) -> FileOutline {
        let tree = match self.parser.parse(source, None) {
            Some(tree) => tree,
            None => return FileOutline::empty(type_summary(&[])),
        };

        let root = tree.root_node();
        if root.has_error() {
            return FileOutline::empty(type_summary(&[]));
        }

        let bytes = source.as_bytes();
        let mut symbols = Vec::new();
        let mut imports = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "import_declaration" => {
                    if let Some(import) = parse_import(&child, bytes) {
                        imports.push(import);
                    }
                }
                "class_declaration" => {
                    if let Some(symbol) = type_symbol(&child, bytes, SymbolKind::Class) {
                        symbols.push(symbol);
                    }
                }
                "interface_declaration" => {
                    if let Some(symbol) = type_symbol(&child, bytes, SymbolKind::Interface) {
                        symbols.push(symbol);
                    }
                }
                "enum_declaration" => {
                    if let Some(symbol) = type_symbol(&child, bytes, SymbolKind::Enum) {
                        symbols.push(symbol);
                    }
                }
                _ => {}
            }
        }

        let summary = type_summary(&symbols);

        FileOutline {
            symbols,
            imports,
            summary,
        }
    }
}

/// Flatten an import declaration into its qualified token, with a trailing
/// `.*` for on-demand imports
fn parse_import(node: &Node, source: &[u8]) -> Option<String> {
    let mut name = String::new();
    let mut wildcard = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "scoped_identifier" | "identifier" => {
                name = child.utf8_text(source).ok()?.to_string();
            }
            "asterisk" => {
                wildcard = true;
            }
            _ => {}
        }
    }

    if name.is_empty() {
        return None;
    }
    if wildcard {
        name.push_str(".*");
    }
    Some(name)
}

/// Build a symbol for a type declaration, with methods as children
fn type_symbol(node: &Node, source: &[u8], kind: SymbolKind) -> Option<Symbol> {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())?
        .to_string();
    if name.is_empty() {
        return None;
    }

    let line = node.start_position().row + 1;
    let mut symbol = Symbol::new(&name, kind, line).with_docstring(doc_comment(node, source));

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            if member.kind() == "method_declaration" {
                if let Some(method) = method_symbol(&member, source) {
                    symbol.children.push(method);
                }
            }
        }
    }

    Some(symbol)
}

/// Build a method symbol
fn method_symbol(node: &Node, source: &[u8]) -> Option<Symbol> {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())?
        .to_string();
    if name.is_empty() {
        return None;
    }
    let line = node.start_position().row + 1;
    Some(Symbol::new(&name, SymbolKind::Method, line).with_docstring(doc_comment(node, source)))
}

/// Pick up a Javadoc block immediately preceding a declaration
fn doc_comment(node: &Node, source: &[u8]) -> Option<String> {
    let prev = node.prev_named_sibling()?;
    if !matches!(prev.kind(), "block_comment" | "comment") {
        return None;
    }
    let text = prev.utf8_text(source).ok()?;
    if !text.starts_with("/**") {
        return None;
    }

    let inner = text
        .trim_start_matches("/**")
        .trim_end_matches("*/")
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> FileOutline {
        let mut extractor = JavaExtractor::new().unwrap();
        extractor.extract(source)
    }

    #[test]
    fn test_extractor_new() {
        assert!(JavaExtractor::new().is_ok());
    }

    #[test]
    fn test_class_with_methods() {
        let source = r#"
public class Greeter {
    public String greet(String name) {
        return "hi " + name;
    }

    private void wave() {}
}
"#;
        let outline = extract(source);
        assert_eq!(outline.symbols.len(), 1);
        let class = &outline.symbols[0];
        assert_eq!(class.name, "Greeter");
        assert_eq!(class.kind, SymbolKind::Class);
        assert_eq!(class.children.len(), 2);
        assert_eq!(class.children[0].name, "greet");
        assert_eq!(class.children[0].kind, SymbolKind::Method);
    }

    #[test]
    fn test_interface_and_enum() {
        let source = r#"
interface Shape {
    double area();
}

enum Color { RED, GREEN }
"#;
        let outline = extract(source);
        assert_eq!(outline.symbols.len(), 2);
        assert_eq!(outline.symbols[0].kind, SymbolKind::Interface);
        assert_eq!(outline.symbols[1].kind, SymbolKind::Enum);
    }

    #[test]
    fn test_imports() {
        let source = "import java.util.List;\nimport com.example.util.*;\n\nclass A {}\n";
        let outline = extract(source);
        assert_eq!(outline.imports, vec!["java.util.List", "com.example.util.*"]);
    }

    #[test]
    fn test_javadoc_captured() {
        let source = r#"
/**
 * Greets people.
 */
public class Greeter {
}
"#;
        let outline = extract(source);
        assert_eq!(outline.symbols[0].docstring.as_deref(), Some("Greets people."));
    }

    #[test]
    fn test_line_comment_not_a_docstring() {
        let source = "// not javadoc\nclass A {}\n";
        let outline = extract(source);
        assert!(outline.symbols[0].docstring.is_none());
    }

    #[test]
    fn test_syntax_error_degrades() {
        let outline = extract("public class {{{\n");
        assert!(outline.symbols.is_empty());
        assert!(outline.imports.is_empty());
        assert_eq!(outline.summary, "Declares 0 types with 0 methods.");
    }

    #[test]
    fn test_summary_counts() {
        let source = "class A { void m() {} void n() {} }\ninterface B {}\n";
        let outline = extract(source);
        assert_eq!(outline.summary, "Declares 2 types with 2 methods.");
    }
}
