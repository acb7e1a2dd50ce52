// Extraction strategies for the supported language families

pub mod heuristic;
pub mod java;
pub mod python;
pub mod symbol;

pub use java::JavaExtractor;
pub use python::PythonExtractor;
pub use symbol::{line_count_summary, FileOutline, Symbol, SymbolKind};

/// Summary for type-centric languages, derived from the symbol list
pub fn type_summary(symbols: &[Symbol]) -> String {
    let types = symbols
        .iter()
        .filter(|s| {
            matches!(
                s.kind,
                SymbolKind::Class | SymbolKind::Interface | SymbolKind::Enum
            )
        })
        .count();
    let methods: usize = symbols
        .iter()
        .map(|s| {
            s.children
                .iter()
                .filter(|c| c.kind == SymbolKind::Method)
                .count()
        })
        .sum();
    format!("Declares {} types with {} methods.", types, methods)
}
