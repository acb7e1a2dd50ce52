// Pattern-heuristic extraction
//
// Used for JavaScript/TypeScript, and for Java when the grammar is
// unavailable at startup. An ordered set of structural regexes is scanned
// over the raw text; matches deduplicate by (name, kind) keeping the first,
// and the flat symbol list is sorted by declaration line. Heuristic output
// does not reconstruct true nesting: a Java type claims every
// modifier-prefixed signature in the text that follows it, which can
// mis-attribute a later sibling's members.

use crate::parser::symbol::{FileOutline, Symbol, SymbolKind};
use crate::parser::type_summary;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static JS_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*import\s+(?:.+?\s+from\s+)?['"]([^'"]+)['"]"#).unwrap());
static JS_REQUIRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
static JS_DYNAMIC_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
static JS_EXPORT_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s+function\s+(\w+)\s*\(").unwrap());
static JS_EXPORT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s+class\s+(\w+)\b").unwrap());
static JS_EXPORT_CONST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s+(?:const|let|var)\s+(\w+)\s*=").unwrap());
static JS_DEFAULT_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s+default\s+function\s*(\w+)?\s*\(").unwrap());
static JS_CLASS_COMPONENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+(\w+)\s+extends\s+React\.Component").unwrap());
static JS_FUNCTION_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"function\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap());
static JS_ARROW_COMPONENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)const\s+([A-Z][A-Za-z0-9_]*)\s*=\s*(?:async\s*)?(?:\([^)]*\)|[^=]+)=>")
        .unwrap()
});

static JAVA_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*import\s+([^;\s]+)\s*;?").unwrap());
static JAVA_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:public|protected|private|abstract|final|static)?\s*(class|interface|enum)\s+(\w+)")
        .unwrap()
});
static JAVA_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:public|protected|private|static|final|synchronized|abstract)\s+[\w\[\]<>?,\s]+\s+(\w+)\s*\(",
    )
    .unwrap()
});

/// 1-based line number of a byte offset
fn line_at(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

/// Accumulates symbols, keeping the first match per (name, kind)
struct SymbolSet {
    seen: HashSet<(String, SymbolKind)>,
    symbols: Vec<Symbol>,
}

impl SymbolSet {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            symbols: Vec::new(),
        }
    }

    fn register(&mut self, name: &str, kind: SymbolKind, line: usize) {
        if name.is_empty() {
            return;
        }
        if self.seen.insert((name.to_string(), kind)) {
            self.symbols.push(Symbol::new(name, kind, line));
        }
    }

    fn into_sorted(mut self) -> Vec<Symbol> {
        self.symbols.sort_by_key(|s| s.line);
        self.symbols
    }
}

/// Extract a JavaScript/TypeScript outline from raw text
pub fn javascript_outline(source: &str) -> FileOutline {
    let mut set = SymbolSet::new();

    for (pattern, kind) in [
        (&*JS_EXPORT_FUNCTION, SymbolKind::Function),
        (&*JS_EXPORT_CLASS, SymbolKind::Class),
        (&*JS_EXPORT_CONST, SymbolKind::Variable),
        (&*JS_CLASS_COMPONENT, SymbolKind::Component),
    ] {
        for cap in pattern.captures_iter(source) {
            if let Some(name) = cap.get(1) {
                set.register(name.as_str(), kind, line_at(source, name.start()));
            }
        }
    }

    for cap in JS_DEFAULT_FUNCTION.captures_iter(source) {
        let (name, offset) = match cap.get(1) {
            Some(m) => (m.as_str(), m.start()),
            None => ("default", cap.get(0).map(|m| m.start()).unwrap_or(0)),
        };
        set.register(name, SymbolKind::DefaultExport, line_at(source, offset));
    }

    for cap in JS_FUNCTION_DECL.captures_iter(source) {
        if let Some(name) = cap.get(1) {
            let kind = if name.as_str().starts_with(char::is_uppercase) {
                SymbolKind::Component
            } else {
                SymbolKind::Function
            };
            set.register(name.as_str(), kind, line_at(source, name.start()));
        }
    }

    for cap in JS_ARROW_COMPONENT.captures_iter(source) {
        if let Some(name) = cap.get(1) {
            set.register(
                name.as_str(),
                SymbolKind::Component,
                line_at(source, name.start()),
            );
        }
    }

    let symbols = set.into_sorted();

    let mut imports: Vec<String> = Vec::new();
    for pattern in [&*JS_IMPORT, &*JS_REQUIRE, &*JS_DYNAMIC_IMPORT] {
        for cap in pattern.captures_iter(source) {
            if let Some(target) = cap.get(1) {
                imports.push(target.as_str().to_string());
            }
        }
    }

    let summary = export_summary(&symbols);

    FileOutline {
        symbols,
        imports,
        summary,
    }
}

/// Extract a Java outline from raw text (fallback when the grammar is
/// unavailable)
pub fn java_outline(source: &str) -> FileOutline {
    let mut symbols = Vec::new();

    for cap in JAVA_CLASS.captures_iter(source) {
        let kind = match cap.get(1).map(|m| m.as_str()) {
            Some("interface") => SymbolKind::Interface,
            Some("enum") => SymbolKind::Enum,
            _ => SymbolKind::Class,
        };
        let name = match cap.get(2) {
            Some(m) => m,
            None => continue,
        };
        let line = line_at(source, name.start());
        let mut symbol = Symbol::new(name.as_str(), kind, line);

        // Everything after the declaration is treated as its scope
        let body_start = cap.get(0).map(|m| m.end()).unwrap_or(name.end());
        let body = &source[body_start..];
        for method_cap in JAVA_METHOD.captures_iter(body) {
            if let Some(method) = method_cap.get(1) {
                let method_line = line + line_at(body, method.start()) - 1;
                symbol
                    .children
                    .push(Symbol::new(method.as_str(), SymbolKind::Method, method_line));
            }
        }

        symbols.push(symbol);
    }

    let imports: Vec<String> = JAVA_IMPORT
        .captures_iter(source)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect();

    let summary = type_summary(&symbols);

    FileOutline {
        symbols,
        imports,
        summary,
    }
}

/// Summary for JavaScript/TypeScript, derived from the extracted symbols
fn export_summary(symbols: &[Symbol]) -> String {
    let components = symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Component)
        .count();
    let functions = symbols
        .iter()
        .filter(|s| matches!(s.kind, SymbolKind::Function | SymbolKind::DefaultExport))
        .count();
    let classes = symbols.iter().filter(|s| s.kind == SymbolKind::Class).count();
    format!(
        "Exports {} components, {} functions, {} classes; {} top-level symbols detected.",
        components,
        functions,
        classes,
        symbols.len()
    )
}
