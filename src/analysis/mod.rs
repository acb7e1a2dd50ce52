// Analysis pipeline orchestration
//
// Discovery produces an immutable sorted file list; extraction runs per file
// across a rayon pool with no shared mutable state; the module index and
// resolution stage waits on the complete extraction arena (hard barrier);
// assembly is a single-threaded merge.

pub mod artifact;
pub mod resolve;

pub use artifact::{Artifact, FileRecord, Metadata};
pub use resolve::{ModuleIndex, ResolvedGraph};

use crate::config::Config;
use crate::discovery;
use crate::error::{Error, Result};
use crate::language::{Language, Strategy, StrategyTable};
use crate::parser::{heuristic, line_count_summary, FileOutline, JavaExtractor, PythonExtractor};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;

/// One slot of the extraction arena, frozen before resolution reads it
#[derive(Debug)]
struct FileEntry {
    key: String,
    language: Language,
    outline: FileOutline,
}

/// Per-worker parser state.
///
/// tree-sitter parsers are not shareable across threads, so each rayon
/// worker builds its own pair according to the startup strategy table.
struct Workers {
    python: Option<PythonExtractor>,
    java: Option<JavaExtractor>,
}

impl Workers {
    fn new(table: &StrategyTable) -> Self {
        let java = match table.for_language(Language::Java) {
            Strategy::PreciseParse(_) => JavaExtractor::new().ok(),
            _ => None,
        };
        Self {
            python: PythonExtractor::new().ok(),
            java,
        }
    }
}

/// Main analyzer that runs the pipeline
pub struct Analyzer {
    config: Config,
    strategies: StrategyTable,
    verbose: bool,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration.
    ///
    /// The extraction capability check happens here, once: Python's grammar
    /// is required; Java silently degrades to the pattern heuristic when its
    /// grammar cannot be loaded.
    pub fn new(config: Config) -> Result<Self> {
        PythonExtractor::new()?;
        let java_precise = JavaExtractor::new().is_ok();

        Ok(Self {
            config,
            strategies: StrategyTable::new(java_precise),
            verbose: false,
        })
    }

    /// Create analyzer with verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Analyze a codebase at the given path
    pub fn analyze(&self, root: &Path) -> Result<Artifact> {
        if !root.exists() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }
        let root = root.canonicalize()?;

        // Stage 1: discovery
        let files = discovery::discover(&root, &self.config.analysis)?;

        let progress = if self.verbose {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        // Stage 2: per-file extraction, parallel and side-effect free
        let table = self.strategies;
        let outcomes: Vec<std::result::Result<FileEntry, String>> = files
            .par_iter()
            .map_init(
                || Workers::new(&table),
                |workers, path| {
                    let key = discovery::file_key(&root, path);
                    let outcome = match std::fs::read(path) {
                        Ok(bytes) => {
                            let source = String::from_utf8_lossy(&bytes);
                            let language = classify(path);
                            let outline = extract_outline(workers, &table, language, &source);
                            Ok(FileEntry {
                                key,
                                language,
                                outline,
                            })
                        }
                        Err(e) => Err(format!("Failed to read {}: {}", key, e)),
                    };
                    if let Some(pb) = &progress {
                        pb.inc(1);
                    }
                    outcome
                },
            )
            .collect();

        if let Some(pb) = progress {
            pb.finish_with_message("Extraction complete");
        }

        let mut errors = Vec::new();
        let mut entries = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(entry) => entries.push(entry),
                Err(warning) => errors.push(warning),
            }
        }

        // Stage 3: index build + resolution. The index needs the complete
        // arena, so this is a hard barrier.
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        let index = ModuleIndex::build(&keys);
        let importers: Vec<resolve::Importer> = entries
            .iter()
            .map(|entry| resolve::Importer {
                key: &entry.key,
                language: entry.language,
                imports: &entry.outline.imports,
            })
            .collect();
        let graph = resolve::resolve_all(&index, &importers);

        // Stage 4: assembly
        let records: Vec<FileRecord> = entries
            .into_iter()
            .map(|entry| {
                let dependencies = graph
                    .dependencies
                    .get(&entry.key)
                    .cloned()
                    .unwrap_or_default();
                let dependents = graph.dependents.get(&entry.key).cloned().unwrap_or_default();
                FileRecord {
                    path: entry.key,
                    language: entry.language,
                    summary: entry.outline.summary,
                    symbols: entry.outline.symbols,
                    dependencies,
                    dependents,
                }
            })
            .collect();

        Ok(Artifact::assemble(
            root.to_string_lossy().into_owned(),
            records,
            graph.dependencies,
            errors,
        ))
    }

    /// Number of files discovery would report, for CLI output
    pub fn file_count(&self, root: &Path) -> Result<usize> {
        discovery::discover(root, &self.config.analysis).map(|f| f.len())
    }
}

/// Classify a path by extension
fn classify(path: &Path) -> Language {
    path.extension()
        .and_then(|e| e.to_str())
        .map(Language::from_extension)
        .unwrap_or(Language::Unknown)
}

/// Run the strategy selected for a language over one file's text
fn extract_outline(
    workers: &mut Workers,
    table: &StrategyTable,
    language: Language,
    source: &str,
) -> FileOutline {
    match table.for_language(language) {
        Strategy::PreciseParse(Language::Python) => match workers.python.as_mut() {
            Some(python) => python.extract(source),
            None => FileOutline::empty(line_count_summary(source)),
        },
        Strategy::PreciseParse(Language::Java) => match workers.java.as_mut() {
            Some(java) => java.extract(source),
            None => heuristic::java_outline(source),
        },
        Strategy::PatternHeuristic(Language::Java) => heuristic::java_outline(source),
        Strategy::PatternHeuristic(_) => heuristic::javascript_outline(source),
        _ => FileOutline::empty(line_count_summary(source)),
    }
}
