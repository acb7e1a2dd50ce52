// HTML viewer rendering
//
// Renders the persisted artifact into a small static site: an index page
// with project metrics and the file table, and one page per file with its
// summary, symbol tree, dependency lists, and focused DOT fragment. The
// serve command renders the same pages per request.

use crate::analysis::Artifact;
use crate::error::{Error, Result};
use crate::output::dot::DotGenerator;
use crate::parser::Symbol;
use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};

/// One row of the index file table
#[derive(Debug, Serialize)]
struct IndexRow {
    href: String,
    path: String,
    language: &'static str,
    summary: String,
    dependency_count: usize,
    dependent_count: usize,
}

/// Result of writing the static site
#[derive(Debug, Clone)]
pub struct SiteReport {
    pub pages_generated: usize,
    pub graph_written: bool,
}

impl SiteReport {
    /// One-line description for CLI output
    pub fn summary(&self) -> String {
        format!(
            "Generated {} pages{}",
            self.pages_generated,
            if self.graph_written {
                " and graph.dot"
            } else {
                ""
            }
        )
    }
}

/// Artifact viewer backed by embedded tera templates
pub struct Viewer {
    tera: Tera,
    dot: DotGenerator,
}

impl Viewer {
    /// Create a viewer with the given full-graph node ceiling
    pub fn new(max_graph_nodes: usize) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html.tera")),
            ("index.html", include_str!("../../templates/index.html.tera")),
            ("file.html", include_str!("../../templates/file.html.tera")),
        ])?;

        Ok(Self {
            tera,
            dot: DotGenerator::new().with_max_nodes(max_graph_nodes),
        })
    }

    /// Render the index page
    pub fn index_page(&self, artifact: &Artifact) -> Result<String> {
        let rows: Vec<IndexRow> = artifact
            .files
            .iter()
            .enumerate()
            .map(|(i, file)| IndexRow {
                href: format!("files/{}.html", i),
                path: file.path.clone(),
                language: file.language.label(),
                summary: file.summary.clone(),
                dependency_count: file.dependencies.len(),
                dependent_count: file.dependents.len(),
            })
            .collect();

        let mut ctx = Context::new();
        ctx.insert("root_prefix", "");
        ctx.insert("root_path", &artifact.root_path);
        ctx.insert("metadata", &artifact.metadata);
        ctx.insert("errors", &artifact.errors);
        ctx.insert("files", &rows);
        ctx.insert("graph_available", &self.graph_dot(artifact).is_some());

        Ok(self.tera.render("index.html", &ctx)?)
    }

    /// Render the detail page for the file at `index` in the sorted list
    pub fn file_page(&self, artifact: &Artifact, index: usize) -> Result<String> {
        let record = artifact
            .files
            .get(index)
            .ok_or_else(|| Error::other(format!("No file at index {}", index)))?;

        let mut ctx = Context::new();
        ctx.insert("root_prefix", "../");
        ctx.insert("path", &record.path);
        ctx.insert("language", record.language.label());
        ctx.insert("summary", &record.summary);
        ctx.insert("dependencies", &record.dependencies);
        ctx.insert("dependents", &record.dependents);
        ctx.insert("symbols_html", &symbols_html(&record.symbols));
        ctx.insert("focused_dot", &self.dot.focused_graph(artifact, record));

        Ok(self.tera.render("file.html", &ctx)?)
    }

    /// Full-graph DOT source, `None` above the node ceiling
    pub fn graph_dot(&self, artifact: &Artifact) -> Option<String> {
        self.dot.full_graph(artifact)
    }

    /// Write the full static site into `out_dir`
    pub fn write_site(&self, artifact: &Artifact, out_dir: &Path) -> Result<SiteReport> {
        std::fs::create_dir_all(out_dir.join("files"))?;

        let mut pages = 0;
        std::fs::write(out_dir.join("index.html"), self.index_page(artifact)?)?;
        pages += 1;

        for index in 0..artifact.files.len() {
            let page = self.file_page(artifact, index)?;
            std::fs::write(out_dir.join(format!("files/{}.html", index)), page)?;
            pages += 1;
        }

        let graph_written = match self.graph_dot(artifact) {
            Some(dot) => {
                std::fs::write(out_dir.join("graph.dot"), dot)?;
                true
            }
            None => false,
        };

        Ok(SiteReport {
            pages_generated: pages,
            graph_written,
        })
    }
}

/// Render a symbol tree as nested lists, escaping all extracted text
fn symbols_html(symbols: &[Symbol]) -> String {
    if symbols.is_empty() {
        return String::new();
    }

    let mut out = String::from("<ul class=\"symbols\">");
    for symbol in symbols {
        out.push_str(&format!(
            "<li><code>{}</code><strong>{}</strong> <span class=\"line\">(line {})</span>",
            symbol.kind,
            tera::escape_html(&symbol.name),
            symbol.line
        ));
        if let Some(doc) = &symbol.docstring {
            if let Some(first_line) = doc.lines().next() {
                out.push_str(&format!(" <em>{}</em>", tera::escape_html(first_line)));
            }
        }
        out.push_str(&symbols_html(&symbol.children));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FileRecord;
    use crate::language::Language;
    use crate::parser::SymbolKind;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn artifact() -> Artifact {
        let mut class = Symbol::new("Greeter", SymbolKind::Class, 1)
            .with_docstring(Some("Says hello.".to_string()));
        class
            .children
            .push(Symbol::new("greet", SymbolKind::Method, 2));

        let mut graph = BTreeMap::new();
        graph.insert("a.py".to_string(), vec!["b.py".to_string()]);
        graph.insert("b.py".to_string(), Vec::new());

        let files = vec![
            FileRecord {
                path: "a.py".to_string(),
                language: Language::Python,
                summary: "Top-level declarations: 1 classes, 0 functions; module length 1 statements.".to_string(),
                symbols: vec![class],
                dependencies: vec!["b.py".to_string()],
                dependents: Vec::new(),
            },
            FileRecord {
                path: "b.py".to_string(),
                language: Language::Python,
                summary: String::new(),
                symbols: Vec::new(),
                dependencies: Vec::new(),
                dependents: vec!["a.py".to_string()],
            },
        ];
        Artifact::assemble("/p".to_string(), files, graph, vec!["a warning".to_string()])
    }

    #[test]
    fn test_viewer_new() {
        assert!(Viewer::new(400).is_ok());
    }

    #[test]
    fn test_index_page() {
        let viewer = Viewer::new(400).unwrap();
        let html = viewer.index_page(&artifact()).unwrap();
        assert!(html.contains("a.py"));
        assert!(html.contains("files/0.html"));
        assert!(html.contains("a warning"));
        assert!(html.contains("graph.dot"));
    }

    #[test]
    fn test_index_page_graph_suppressed() {
        let viewer = Viewer::new(1).unwrap();
        let html = viewer.index_page(&artifact()).unwrap();
        assert!(html.contains("disabled for large projects"));
    }

    #[test]
    fn test_file_page() {
        let viewer = Viewer::new(400).unwrap();
        let html = viewer.file_page(&artifact(), 0).unwrap();
        assert!(html.contains("Greeter"));
        assert!(html.contains("greet"));
        assert!(html.contains("Says hello."));
        assert!(html.contains("digraph Dependencies"));
        assert!(html.contains("b.py"));
    }

    #[test]
    fn test_file_page_out_of_range() {
        let viewer = Viewer::new(400).unwrap();
        assert!(viewer.file_page(&artifact(), 99).is_err());
    }

    #[test]
    fn test_symbols_html_escapes() {
        let symbols = vec![Symbol::new("<script>", SymbolKind::Function, 1)];
        let html = symbols_html(&symbols);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_write_site() {
        let dir = TempDir::new().unwrap();
        let viewer = Viewer::new(400).unwrap();
        let report = viewer.write_site(&artifact(), dir.path()).unwrap();

        assert_eq!(report.pages_generated, 3);
        assert!(report.graph_written);
        assert!(dir.path().join("index.html").exists());
        assert!(dir.path().join("files/0.html").exists());
        assert!(dir.path().join("files/1.html").exists());
        assert!(dir.path().join("graph.dot").exists());
    }

    #[test]
    fn test_site_report_summary() {
        let report = SiteReport {
            pages_generated: 3,
            graph_written: true,
        };
        assert_eq!(report.summary(), "Generated 3 pages and graph.dot");
    }
}
