// Module index and import resolution
//
// Raw import tokens (dotted module paths, relative paths, fully-qualified
// type names) are resolved into references to other discovered files, or
// kept verbatim as external references. All probing happens against the
// frozen set of discovered file keys, never the live filesystem, so the
// post-barrier stage is a pure function of the extraction results.

use crate::language::Language;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Extensions probed, in order, when resolving path-style imports
pub const PATH_EXTENSION_CANDIDATES: &[&str] =
    &[".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".json"];

/// Lookup table from plausible module-name spellings to discovered file keys
#[derive(Debug, Default)]
pub struct ModuleIndex {
    spellings: HashMap<String, String>,
    files: HashSet<String>,
    directories: HashSet<String>,
}

impl ModuleIndex {
    /// Build the index from file keys in discovery order.
    ///
    /// First registration wins on spelling collisions; later files stay
    /// resolvable through their other spellings.
    pub fn build<S: AsRef<str>>(keys: &[S]) -> Self {
        let mut index = ModuleIndex::default();
        for key in keys {
            let key = key.as_ref();
            index.files.insert(key.to_string());
            for spelling in module_spellings(key) {
                index
                    .spellings
                    .entry(spelling)
                    .or_insert_with(|| key.to_string());
            }
            let mut dir = key;
            while let Some((parent, _)) = dir.rsplit_once('/') {
                index.directories.insert(parent.to_string());
                dir = parent;
            }
        }
        index
    }

    /// Look up a spelling
    pub fn lookup(&self, spelling: &str) -> Option<&str> {
        self.spellings.get(spelling).map(String::as_str)
    }

    /// Whether a key names a discovered file
    pub fn is_file(&self, key: &str) -> bool {
        self.files.contains(key)
    }

    /// Whether any discovered file lives under this directory
    pub fn has_directory(&self, dir: &str) -> bool {
        self.directories.contains(dir)
    }

    /// Number of indexed files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Plausible spellings by which another file might reference `key`: the
/// slash path itself, the dotted path with the extension stripped, and the
/// bare filename stem.
pub fn module_spellings(key: &str) -> Vec<String> {
    let mut spellings = vec![key.to_string()];

    let without_ext = match key.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => key,
    };
    let dotted = without_ext.replace('/', ".");
    if !spellings.contains(&dotted) {
        spellings.push(dotted);
    }

    let stem = without_ext.rsplit('/').next().unwrap_or(without_ext);
    if !stem.is_empty() && !spellings.iter().any(|s| s == stem) {
        spellings.push(stem.to_string());
    }

    spellings
}

/// One importing file presented to the resolver
pub struct Importer<'a> {
    pub key: &'a str,
    pub language: Language,
    pub imports: &'a [String],
}

/// Dependency graph plus its transpose.
///
/// `dependencies` holds every file key (possibly with an empty adjacency
/// list); targets may be other file keys, directory keys, or verbatim
/// external tokens. `dependents` is restricted to keys present in the file
/// set.
#[derive(Debug, Default)]
pub struct ResolvedGraph {
    pub dependencies: BTreeMap<String, Vec<String>>,
    pub dependents: BTreeMap<String, Vec<String>>,
}

/// Resolve every importer's raw tokens against the frozen index.
///
/// Per-importer resolution is independent and runs in parallel; the
/// dependents merge is a small single-threaded pass afterwards.
pub fn resolve_all(index: &ModuleIndex, importers: &[Importer]) -> ResolvedGraph {
    let per_file: Vec<(String, Vec<String>)> = importers
        .par_iter()
        .map(|importer| {
            let mut targets: Vec<String> = Vec::new();
            for token in importer.imports {
                match resolve_import(index, importer.key, importer.language, token) {
                    Some(target) if target != importer.key => targets.push(target),
                    // Unresolved and self-resolving imports stay verbatim
                    _ => {
                        if token != importer.key {
                            targets.push(token.clone());
                        }
                    }
                }
            }
            targets.sort();
            targets.dedup();
            (importer.key.to_string(), targets)
        })
        .collect();

    let mut graph = ResolvedGraph::default();
    for (key, targets) in per_file {
        for target in &targets {
            if index.is_file(target) {
                graph
                    .dependents
                    .entry(target.clone())
                    .or_default()
                    .push(key.clone());
            }
        }
        graph.dependencies.insert(key, targets);
    }
    for list in graph.dependents.values_mut() {
        list.sort();
        list.dedup();
    }
    graph
}

/// Resolve one raw import token to a discovered file or directory key.
///
/// The module index is consulted first (dotted spelling, slash spelling,
/// raw token, raw token as a file key), then the language family's own
/// probing rules. `None` means the token stays an external reference.
pub fn resolve_import(
    index: &ModuleIndex,
    importer: &str,
    language: Language,
    token: &str,
) -> Option<String> {
    let slashed = token.replace('\\', "/");
    let dotted = slashed.replace('/', ".");

    if let Some(key) = index
        .lookup(&dotted)
        .or_else(|| index.lookup(&slashed))
        .or_else(|| index.lookup(token))
    {
        return Some(key.to_string());
    }
    if index.is_file(token) {
        return Some(token.to_string());
    }

    if language.uses_dotted_imports() {
        resolve_dotted(index, importer, &dotted)
    } else if language.uses_path_imports() {
        resolve_path(index, importer, &slashed)
    } else if language.uses_qualified_imports() {
        resolve_qualified(index, token)
    } else {
        None
    }
}

/// Dotted-module probing: module file or package index relative to the
/// importing file's directory and the root, retried with the trailing
/// segment trimmed for member imports (`pkg.b.thing` -> `pkg/b`).
fn resolve_dotted(index: &ModuleIndex, importer: &str, dotted: &str) -> Option<String> {
    let importer_dir = parent_dir(importer);

    if let Some(key) = probe_module(index, importer_dir.as_deref(), dotted) {
        return Some(key);
    }

    if let Some((parent, _member)) = dotted.rsplit_once('.') {
        if let Some(key) = index.lookup(parent) {
            return Some(key.to_string());
        }
        if let Some(key) = probe_module(index, importer_dir.as_deref(), parent) {
            return Some(key);
        }
    }

    None
}

/// Probe a dotted module name as a file or package under a directory and
/// under the root
fn probe_module(index: &ModuleIndex, importer_dir: Option<&str>, dotted: &str) -> Option<String> {
    let relative = dotted.replace('.', "/");

    if let Some(dir) = importer_dir {
        for candidate in [
            format!("{}/{}.py", dir, relative),
            format!("{}/{}/__init__.py", dir, relative),
        ] {
            if index.is_file(&candidate) {
                return Some(candidate);
            }
        }
    }

    for candidate in [
        format!("{}.py", relative),
        format!("{}/__init__.py", relative),
    ] {
        if index.is_file(&candidate) {
            return Some(candidate);
        }
    }

    None
}

/// Path-style probing for `./`, `../`, rooted, and bare slash imports
fn resolve_path(index: &ModuleIndex, importer: &str, token: &str) -> Option<String> {
    let base = if token.starts_with("./") || token.starts_with("../") {
        let dir = parent_dir(importer).unwrap_or_default();
        normalize_join(&dir, token)?
    } else if let Some(rooted) = token.strip_prefix('/') {
        normalize_join("", rooted)?
    } else if token.contains('/') {
        normalize_join("", token)?
    } else {
        return None;
    };

    if index.is_file(&base) {
        return Some(base);
    }
    for ext in PATH_EXTENSION_CANDIDATES {
        let candidate = format!("{}{}", base, ext);
        if index.is_file(&candidate) {
            return Some(candidate);
        }
    }
    // Directory import resolves to an index file inside it
    for ext in PATH_EXTENSION_CANDIDATES {
        let candidate = format!("{}/index{}", base, ext);
        if index.is_file(&candidate) {
            return Some(candidate);
        }
    }

    None
}

/// Fully-qualified type imports: wildcard -> package directory, specific
/// type -> source file built from the dotted name
fn resolve_qualified(index: &ModuleIndex, token: &str) -> Option<String> {
    if let Some(package) = token.strip_suffix(".*") {
        let dir = package.replace('.', "/");
        if index.has_directory(&dir) {
            return Some(dir);
        }
        return None;
    }

    let candidate = format!("{}.java", token.replace('.', "/"));
    if index.is_file(&candidate) {
        return Some(candidate);
    }
    None
}

/// Directory part of a file key, if any
fn parent_dir(key: &str) -> Option<String> {
    key.rsplit_once('/').map(|(dir, _)| dir.to_string())
}

/// Lexically join a relative token onto a directory, resolving `.` and
/// `..` segments. `None` when the token escapes the analysis root.
fn normalize_join(dir: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = if dir.is_empty() {
        Vec::new()
    } else {
        dir.split('/').collect()
    };

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    Some(parts.join("/"))
}
