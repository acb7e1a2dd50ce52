// Artifact types
//
// The immutable result object for a whole analyzed tree, shaped exactly as
// the persisted JSON schema consumed by downstream tooling.

use crate::error::Result;
use crate::language::Language;
use crate::parser::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One file's analysis result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    /// Canonical key: root-relative path, forward slashes
    pub path: String,
    /// Declared language label
    pub language: Language,
    /// Human-readable summary line
    pub summary: String,
    /// Root symbols in source order
    pub symbols: Vec<Symbol>,
    /// Resolved dependency targets (sorted, deduplicated)
    pub dependencies: Vec<String>,
    /// Keys of files that import this one (sorted, deduplicated)
    pub dependents: Vec<String>,
}

/// Aggregate counters, kept as strings in the persisted schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub file_count: String,
    pub dependency_edges: String,
}

/// Top-level artifact describing the entire analyzed tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    pub root_path: String,
    pub files: Vec<FileRecord>,
    pub dependency_graph: BTreeMap<String, Vec<String>>,
    pub metadata: Metadata,
    pub errors: Vec<String>,
}

impl Artifact {
    /// Assemble the final artifact from the frozen pipeline outputs.
    ///
    /// Files are sorted by path and the aggregate counters are computed from
    /// the final graph, never from intermediate state. Warnings are carried
    /// through unchanged.
    pub fn assemble(
        root_path: String,
        mut files: Vec<FileRecord>,
        dependency_graph: BTreeMap<String, Vec<String>>,
        errors: Vec<String>,
    ) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let edge_count: usize = dependency_graph.values().map(Vec::len).sum();
        let metadata = Metadata {
            file_count: files.len().to_string(),
            dependency_edges: edge_count.to_string(),
        };

        Self {
            root_path,
            files,
            dependency_graph,
            metadata,
            errors,
        }
    }

    /// Persist the artifact as pretty-printed UTF-8 JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a persisted artifact
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Parse an artifact from raw JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Find a file record by its canonical key
    pub fn file(&self, path: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Every node that appears in the dependency graph, as source or target
    pub fn graph_nodes(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = Vec::new();
        for (source, targets) in &self.dependency_graph {
            nodes.push(source);
            nodes.extend(targets.iter().map(String::as_str));
        }
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(path: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            language: Language::Python,
            summary: String::new(),
            symbols: Vec::new(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
        }
    }

    #[test]
    fn test_assemble_sorts_files() {
        let artifact = Artifact::assemble(
            "/p".to_string(),
            vec![record("z.py"), record("a.py")],
            BTreeMap::new(),
            Vec::new(),
        );
        assert_eq!(artifact.files[0].path, "a.py");
        assert_eq!(artifact.files[1].path, "z.py");
    }

    #[test]
    fn test_assemble_metadata_from_graph() {
        let mut graph = BTreeMap::new();
        graph.insert("a.py".to_string(), vec!["b.py".to_string(), "os".to_string()]);
        graph.insert("b.py".to_string(), Vec::new());

        let artifact = Artifact::assemble(
            "/p".to_string(),
            vec![record("a.py"), record("b.py")],
            graph,
            vec!["warning".to_string()],
        );
        assert_eq!(artifact.metadata.file_count, "2");
        assert_eq!(artifact.metadata.dependency_edges, "2");
        assert_eq!(artifact.errors.len(), 1);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.json");

        let artifact = Artifact::assemble(
            "/p".to_string(),
            vec![record("a.py")],
            BTreeMap::new(),
            Vec::new(),
        );
        artifact.save(&path).unwrap();

        let loaded = Artifact::load(&path).unwrap();
        assert_eq!(loaded, artifact);
    }

    #[test]
    fn test_schema_field_names() {
        let artifact = Artifact::assemble(
            "/p".to_string(),
            vec![record("a.py")],
            BTreeMap::new(),
            Vec::new(),
        );
        let value = serde_json::to_value(&artifact).unwrap();
        assert!(value.get("root_path").is_some());
        assert!(value.get("files").is_some());
        assert!(value.get("dependency_graph").is_some());
        assert!(value["metadata"].get("file_count").is_some());
        assert!(value["metadata"].get("dependency_edges").is_some());
        assert!(value.get("errors").is_some());
        assert_eq!(value["files"][0]["language"], "python");
    }

    #[test]
    fn test_graph_nodes() {
        let mut graph = BTreeMap::new();
        graph.insert("a.py".to_string(), vec!["b.py".to_string(), "os".to_string()]);

        let artifact = Artifact::assemble("/p".to_string(), vec![record("a.py")], graph, vec![]);
        assert_eq!(artifact.graph_nodes(), vec!["a.py", "b.py", "os"]);
    }

    #[test]
    fn test_file_lookup() {
        let artifact = Artifact::assemble(
            "/p".to_string(),
            vec![record("a.py")],
            BTreeMap::new(),
            Vec::new(),
        );
        assert!(artifact.file("a.py").is_some());
        assert!(artifact.file("missing.py").is_none());
    }
}
