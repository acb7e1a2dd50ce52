// File discovery
//
// Enumerates candidate source files under a root. Directories in the fixed
// exclusion set are pruned entirely at any depth; files pass only when their
// extension is on the allow-list. Output ordering is lexicographic and does
// not depend on filesystem iteration order.

use crate::config::AnalysisConfig;
use crate::error::Result;
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory base names that are never visited
pub const EXCLUDED_DIRS: &[&str] = &[".git", "__pycache__", "node_modules", ".venv", "venv"];

/// Extensions (lowercase, no dot) accepted by discovery
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "py", "pyi", "md", "txt", "json", "yaml", "yml", "toml", "ini", "cfg", "js", "jsx", "ts",
    "tsx", "java",
];

/// Discover candidate files under `root`, sorted by path.
///
/// Unreadable directories are skipped silently; read failures on individual
/// files are left for the extraction stage to report.
pub fn discover(root: &Path, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let patterns: Vec<Pattern> = config
        .exclude
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let mut files = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !EXCLUDED_DIRS.contains(&name.as_ref())
    });

    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if entry.file_type().is_dir() {
            continue;
        }
        if !has_allowed_extension(path) {
            continue;
        }
        let key = file_key(root, path);
        if patterns.iter().any(|p| p.matches(&key)) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Check the extension allow-list (case-insensitive)
pub fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Canonical key for a discovered file: root-relative path with forward
/// slashes, used for stable comparison everywhere downstream.
pub fn file_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/")
}
