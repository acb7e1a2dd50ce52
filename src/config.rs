use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub viewer: ViewerConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
}

/// Analysis settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Glob patterns (root-relative) excluded in addition to the fixed
    /// directory exclusion set
    pub exclude: Vec<String>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination for the artifact JSON
    pub artifact: PathBuf,
    /// Destination directory for the rendered viewer
    pub site_directory: PathBuf,
}

/// Viewer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Node ceiling above which the full-graph view is suppressed
    pub max_graph_nodes: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            description: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact: PathBuf::from("artifacts/codetree.json"),
            site_directory: PathBuf::from("codetree-site"),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_graph_nodes: 400,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, output: Option<PathBuf>, exclude: Vec<String>) {
        if let Some(out) = output {
            self.output.artifact = out;
        }

        if !exclude.is_empty() {
            self.analysis.exclude.extend(exclude);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.viewer.max_graph_nodes == 0 {
            return Err(Error::config_validation("max_graph_nodes must be at least 1"));
        }

        for pattern in &self.analysis.exclude {
            glob::Pattern::new(pattern)?;
        }

        Ok(())
    }
}
