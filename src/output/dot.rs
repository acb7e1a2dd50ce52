// Graphviz DOT rendering of the dependency graph
//
// Two views: the full graph, suppressed above a node ceiling (a display
// concern, not a core constraint), and a focused view of one file's
// immediate neighborhood with the selected/dependency/dependent palette.

use crate::analysis::{Artifact, FileRecord};
use std::collections::BTreeMap;

/// Role of a node in the focused view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Selected,
    Dependency,
    Dependent,
}

impl Role {
    fn attrs(self) -> &'static str {
        match self {
            Role::Selected => {
                ", fillcolor=\"#fdebd0\", color=\"#e67e22\", fontcolor=\"#4a4a4a\", penwidth=\"2.4\""
            }
            Role::Dependency => ", fillcolor=\"#d6eaf8\", color=\"#3498db\"",
            Role::Dependent => ", fillcolor=\"#f5b7b1\", color=\"#e74c3c\"",
        }
    }
}

/// DOT generator for dependency views
pub struct DotGenerator {
    /// Node ceiling for the full-graph view
    max_nodes: usize,
}

impl DotGenerator {
    /// Create a generator with the default node ceiling
    pub fn new() -> Self {
        Self { max_nodes: 400 }
    }

    /// Override the node ceiling
    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = max;
        self
    }

    /// Render the full dependency graph, or `None` when it exceeds the
    /// node ceiling
    pub fn full_graph(&self, artifact: &Artifact) -> Option<String> {
        let nodes = artifact.graph_nodes();
        if nodes.len() > self.max_nodes {
            return None;
        }

        let mut lines = header();
        for node in &nodes {
            lines.push(format!("  \"{}\";", escape(node)));
        }
        for (source, targets) in &artifact.dependency_graph {
            for target in targets {
                lines.push(format!("  \"{}\" -> \"{}\";", escape(source), escape(target)));
            }
        }
        lines.push("}".to_string());
        Some(lines.join("\n"))
    }

    /// Render one file with its direct dependencies and dependents
    pub fn focused_graph(&self, artifact: &Artifact, record: &FileRecord) -> String {
        let selected = record.path.as_str();

        let mut nodes: BTreeMap<&str, Role> = BTreeMap::new();
        nodes.insert(selected, Role::Selected);
        for dep in &record.dependencies {
            nodes.entry(dep.as_str()).or_insert(Role::Dependency);
        }
        for dep in &record.dependents {
            nodes.entry(dep.as_str()).or_insert(Role::Dependent);
        }

        let mut lines = header();
        for (node, role) in &nodes {
            lines.push(format!("  \"{}\" [{}{}];", escape(node), label_attr(node), role.attrs()));
        }

        for (source, targets) in &artifact.dependency_graph {
            if !nodes.contains_key(source.as_str()) {
                continue;
            }
            for target in targets {
                if !nodes.contains_key(target.as_str()) {
                    continue;
                }
                let attr = if source == selected {
                    " [color=\"#2471a3\", penwidth=\"2.2\"]"
                } else if target == selected {
                    " [color=\"#c0392b\", penwidth=\"2.2\"]"
                } else {
                    ""
                };
                lines.push(format!(
                    "  \"{}\" -> \"{}\"{};",
                    escape(source),
                    escape(target),
                    attr
                ));
            }
        }

        lines.push("}".to_string());
        lines.join("\n")
    }
}

impl Default for DotGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn header() -> Vec<String> {
    vec![
        "digraph Dependencies {".to_string(),
        "  rankdir=LR;".to_string(),
        "  graph [splines=true, nodesep=0.6, ranksep=1.0];".to_string(),
        "  node [shape=box, style=\"rounded,filled\", fontname=\"Helvetica\", fontsize=10, fillcolor=\"#f8f9fa\", color=\"#d5d8dc\"];".to_string(),
        "  edge [color=\"#95a5a6\", arrowsize=0.7, penwidth=1.1];".to_string(),
    ]
}

fn label_attr(node: &str) -> String {
    format!("label=\"{}\"", escape(node))
}

/// Escape a value for a quoted DOT string
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use std::collections::BTreeMap;

    fn artifact() -> Artifact {
        let mut graph = BTreeMap::new();
        graph.insert(
            "pkg/a.py".to_string(),
            vec!["os".to_string(), "pkg/b.py".to_string()],
        );
        graph.insert("pkg/b.py".to_string(), Vec::new());

        let files = vec![
            FileRecord {
                path: "pkg/a.py".to_string(),
                language: Language::Python,
                summary: String::new(),
                symbols: Vec::new(),
                dependencies: vec!["os".to_string(), "pkg/b.py".to_string()],
                dependents: Vec::new(),
            },
            FileRecord {
                path: "pkg/b.py".to_string(),
                language: Language::Python,
                summary: String::new(),
                symbols: Vec::new(),
                dependencies: Vec::new(),
                dependents: vec!["pkg/a.py".to_string()],
            },
        ];
        Artifact::assemble("/p".to_string(), files, graph, Vec::new())
    }

    #[test]
    fn test_full_graph() {
        let dot = DotGenerator::new().full_graph(&artifact()).unwrap();
        assert!(dot.starts_with("digraph Dependencies {"));
        assert!(dot.contains("\"pkg/a.py\" -> \"pkg/b.py\";"));
        assert!(dot.contains("\"pkg/a.py\" -> \"os\";"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn test_full_graph_ceiling() {
        let gen = DotGenerator::new().with_max_nodes(2);
        // Graph has three nodes: pkg/a.py, pkg/b.py, os
        assert!(gen.full_graph(&artifact()).is_none());
    }

    #[test]
    fn test_focused_graph_styles() {
        let art = artifact();
        let record = art.file("pkg/a.py").unwrap();
        let dot = DotGenerator::new().focused_graph(&art, record);

        assert!(dot.contains("#fdebd0")); // selected
        assert!(dot.contains("#d6eaf8")); // dependency
        assert!(dot.contains("\"pkg/a.py\" -> \"pkg/b.py\" [color=\"#2471a3\""));
    }

    #[test]
    fn test_focused_graph_dependent_edge() {
        let art = artifact();
        let record = art.file("pkg/b.py").unwrap();
        let dot = DotGenerator::new().focused_graph(&art, record);

        assert!(dot.contains("#f5b7b1")); // dependent fill
        assert!(dot.contains("\"pkg/a.py\" -> \"pkg/b.py\" [color=\"#c0392b\""));
        // The unrelated external edge is excluded from the focus
        assert!(!dot.contains("\"os\""));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a\"b"), "a\\\"b");
        assert_eq!(escape("a\\b"), "a\\\\b");
    }
}
