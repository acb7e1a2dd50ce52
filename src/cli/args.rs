//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build structural maps of mixed-language codebases
#[derive(Parser, Debug)]
#[command(name = "codetree")]
#[command(about = "Build structural maps of mixed-language codebases")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a source tree and write the artifact JSON
    Analyze {
        /// Path to the repository or source tree
        path: PathBuf,

        /// Destination file for the generated artifact
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render a static HTML viewer from a persisted artifact
    Render {
        /// Path to the artifact JSON
        artifact: PathBuf,

        /// Output directory for the viewer
        #[arg(short, long, default_value = "codetree-site")]
        output: PathBuf,
    },

    /// Serve the viewer for a persisted artifact
    Serve {
        /// Path to the artifact JSON
        artifact: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Show version information
    Version,
}
