// Language classification and extraction strategy selection
//
// The classifier is a pure extension -> label table. Strategies are resolved
// once at analyzer startup into a fixed table; no per-file probing happens
// after that.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language label declared for a discovered file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Json,
    Yaml,
    Toml,
    Ini,
    Text,
    Unknown,
}

impl Language {
    /// Classify a file extension (without the leading dot, any case)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Language::Python,
            "js" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "java" => Language::Java,
            "json" => Language::Json,
            "yml" | "yaml" => Language::Yaml,
            "toml" => Language::Toml,
            "ini" | "cfg" => Language::Ini,
            "md" | "txt" => Language::Text,
            _ => Language::Unknown,
        }
    }

    /// Stable lowercase label used in the artifact
    pub fn label(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Ini => "ini",
            Language::Text => "text",
            Language::Unknown => "unknown",
        }
    }

    /// Languages whose imports are dotted module paths
    pub fn uses_dotted_imports(&self) -> bool {
        matches!(self, Language::Python)
    }

    /// Languages whose imports are filesystem-style paths
    pub fn uses_path_imports(&self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript)
    }

    /// Languages whose imports are fully-qualified type names
    pub fn uses_qualified_imports(&self) -> bool {
        matches!(self, Language::Java)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How symbols and imports are extracted for a language family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Full grammar parse via tree-sitter
    PreciseParse(Language),
    /// Ordered structural regexes over the raw text
    PatternHeuristic(Language),
    /// No extraction; summary only (data and documentation formats)
    None,
}

/// Resolved extraction strategies, computed once at startup.
///
/// The only runtime capability in play is whether a tree-sitter grammar can
/// be loaded. Java degrades to the pattern heuristic when its grammar is
/// unavailable; Python has no heuristic fallback and failing to load its
/// grammar is a construction error reported by the analyzer.
#[derive(Debug, Clone, Copy)]
pub struct StrategyTable {
    java_precise: bool,
}

impl StrategyTable {
    /// Build the table from the startup capability check
    pub fn new(java_precise: bool) -> Self {
        Self { java_precise }
    }

    /// Strategy for a language
    pub fn for_language(&self, language: Language) -> Strategy {
        match language {
            Language::Python => Strategy::PreciseParse(language),
            Language::Java => {
                if self.java_precise {
                    Strategy::PreciseParse(language)
                } else {
                    Strategy::PatternHeuristic(language)
                }
            }
            Language::JavaScript | Language::TypeScript => Strategy::PatternHeuristic(language),
            _ => Strategy::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("pyi"), Language::Python);
        assert_eq!(Language::from_extension("js"), Language::JavaScript);
        assert_eq!(Language::from_extension("jsx"), Language::JavaScript);
        assert_eq!(Language::from_extension("ts"), Language::TypeScript);
        assert_eq!(Language::from_extension("tsx"), Language::TypeScript);
        assert_eq!(Language::from_extension("java"), Language::Java);
        assert_eq!(Language::from_extension("json"), Language::Json);
        assert_eq!(Language::from_extension("yaml"), Language::Yaml);
        assert_eq!(Language::from_extension("yml"), Language::Yaml);
        assert_eq!(Language::from_extension("toml"), Language::Toml);
        assert_eq!(Language::from_extension("cfg"), Language::Ini);
        assert_eq!(Language::from_extension("md"), Language::Text);
        assert_eq!(Language::from_extension("rb"), Language::Unknown);
    }

    #[test]
    fn test_from_extension_case_insensitive() {
        assert_eq!(Language::from_extension("PY"), Language::Python);
        assert_eq!(Language::from_extension("Tsx"), Language::TypeScript);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Language::Python.label(), "python");
        assert_eq!(Language::TypeScript.label(), "typescript");
        assert_eq!(Language::Unknown.label(), "unknown");
        assert_eq!(Language::Java.to_string(), "java");
    }

    #[test]
    fn test_label_serialization() {
        let json = serde_json::to_string(&Language::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
        let back: Language = serde_json::from_str("\"python\"").unwrap();
        assert_eq!(back, Language::Python);
    }

    #[test]
    fn test_import_families() {
        assert!(Language::Python.uses_dotted_imports());
        assert!(Language::JavaScript.uses_path_imports());
        assert!(Language::TypeScript.uses_path_imports());
        assert!(Language::Java.uses_qualified_imports());
        assert!(!Language::Json.uses_dotted_imports());
    }

    #[test]
    fn test_strategy_table_defaults() {
        let table = StrategyTable::new(true);
        assert_eq!(
            table.for_language(Language::Python),
            Strategy::PreciseParse(Language::Python)
        );
        assert_eq!(
            table.for_language(Language::Java),
            Strategy::PreciseParse(Language::Java)
        );
        assert_eq!(
            table.for_language(Language::JavaScript),
            Strategy::PatternHeuristic(Language::JavaScript)
        );
        assert_eq!(table.for_language(Language::Yaml), Strategy::None);
        assert_eq!(table.for_language(Language::Unknown), Strategy::None);
    }

    #[test]
    fn test_strategy_table_java_fallback() {
        let table = StrategyTable::new(false);
        assert_eq!(
            table.for_language(Language::Java),
            Strategy::PatternHeuristic(Language::Java)
        );
    }
}
