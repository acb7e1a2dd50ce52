//! CLI for codetree

mod args;
mod cache;

pub use args::{Args, Command};
pub use cache::ArtifactCache;

use crate::analysis::{Analyzer, Artifact};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::Viewer;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Analyze {
            path,
            output,
            exclude,
            config,
            verbose,
        } => analyze(path, output, exclude, config, verbose),

        Command::Render { artifact, output } => render(&artifact, &output),

        Command::Serve { artifact, port } => serve(artifact, port),

        Command::Version => {
            println!("codetree {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn analyze(
    path: PathBuf,
    output: Option<PathBuf>,
    exclude: Vec<String>,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    // Load config file if it exists; CLI arguments take precedence
    let mut cfg = match &config {
        Some(config_path) => Config::load_or_default(config_path),
        None => Config::load_or_default(Path::new("codetree.toml")),
    };
    cfg.merge_cli(output, exclude);
    cfg.validate()?;

    if verbose {
        println!("Analyzing: {}", path.display());
        println!("Artifact: {}", cfg.output.artifact.display());
        if !cfg.analysis.exclude.is_empty() {
            println!("Excludes: {:?}", cfg.analysis.exclude);
        }
    }

    if !path.exists() {
        return Err(Error::PathNotFound(path));
    }

    let analyzer = Analyzer::new(cfg.clone())?.with_verbose(verbose);

    println!("Discovering files...");
    let count = analyzer.file_count(&path)?;
    println!("Found {} candidate files", count);

    println!("Analyzing codebase...");
    let artifact = analyzer.analyze(&path)?;

    let destination = cfg.output.artifact.clone();
    artifact.save(&destination)?;
    println!("Artifact written to: {}", destination.display());

    println!();
    println!("{:<18} {:>8}", "Metric", "Value");
    println!("{:<18} {:>8}", "Files", artifact.metadata.file_count);
    println!(
        "{:<18} {:>8}",
        "Dependency edges", artifact.metadata.dependency_edges
    );
    println!("{:<18} {:>8}", "Warnings", artifact.errors.len());

    if !artifact.errors.is_empty() {
        println!("\nWarnings detected during analysis:");
        for warning in &artifact.errors {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

fn render(artifact_path: &Path, output: &Path) -> Result<()> {
    if !artifact_path.exists() {
        return Err(Error::PathNotFound(artifact_path.to_path_buf()));
    }

    let cfg = Config::load_or_default(Path::new("codetree.toml"));
    let artifact = Artifact::load(artifact_path)?;
    let viewer = Viewer::new(cfg.viewer.max_graph_nodes)?;

    let report = viewer.write_site(&artifact, output)?;
    println!("{}", report.summary());
    println!("Viewer written to: {}", output.display());

    Ok(())
}

fn serve(artifact_path: PathBuf, port: u16) -> Result<()> {
    if !artifact_path.exists() {
        return Err(Error::PathNotFound(artifact_path));
    }

    let cfg = Config::load_or_default(Path::new("codetree.toml"));
    let cache = Arc::new(ArtifactCache::new(artifact_path));
    let viewer = Arc::new(Viewer::new(cfg.viewer.max_graph_nodes)?);

    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))
        .map_err(|e| Error::Other(format!("Failed to bind to port {}: {}", port, e)))?;

    println!(
        "Serving {} on http://localhost:{}",
        cache.source().display(),
        port
    );
    println!("Press Ctrl+C to stop");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let cache = Arc::clone(&cache);
                let viewer = Arc::clone(&viewer);
                std::thread::spawn(move || {
                    if let Err(e) = handle_request(stream, &cache, &viewer) {
                        eprintln!("Request error: {}", e);
                    }
                });
            }
            Err(e) => eprintln!("Connection error: {}", e),
        }
    }

    Ok(())
}

/// Handle a single HTTP request, rendering pages from the cached artifact
fn handle_request(mut stream: TcpStream, cache: &ArtifactCache, viewer: &Viewer) -> Result<()> {
    let mut buffer = [0; 4096];
    let n = stream.read(&mut buffer)?;
    let request = String::from_utf8_lossy(&buffer[..n]);

    let request_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = request_line.split_whitespace().collect();

    if parts.len() < 2 {
        return send_response(&mut stream, 400, "Bad Request", "text/plain", b"Bad Request");
    }

    let method = parts[0];
    let path = urlparse(parts[1]);

    if method != "GET" {
        return send_response(
            &mut stream,
            405,
            "Method Not Allowed",
            "text/plain",
            b"Method Not Allowed",
        );
    }

    // Revalidated on every request; unchanged artifacts stay cached
    let artifact = match cache.load() {
        Ok(artifact) => artifact,
        Err(e) => {
            let body = format!("Failed to load artifact: {}", e);
            return send_response(
                &mut stream,
                500,
                "Internal Server Error",
                "text/plain; charset=utf-8",
                body.as_bytes(),
            );
        }
    };

    let page = match path.as_str() {
        "/" | "/index.html" => Some((viewer.index_page(&artifact)?, "text/html; charset=utf-8")),
        "/graph.dot" => viewer
            .graph_dot(&artifact)
            .map(|dot| (dot, "text/plain; charset=utf-8")),
        other => file_page_index(other)
            .and_then(|index| viewer.file_page(&artifact, index).ok())
            .map(|html| (html, "text/html; charset=utf-8")),
    };

    match page {
        Some((body, content_type)) => {
            send_response(&mut stream, 200, "OK", content_type, body.as_bytes())?;
            println!("200 {} {}", method, path);
        }
        None => {
            send_response(&mut stream, 404, "Not Found", "text/plain", b"Not Found")?;
            println!("404 {} {}", method, path);
        }
    }

    Ok(())
}

/// Extract N from a `/files/N.html` route
fn file_page_index(path: &str) -> Option<usize> {
    path.strip_prefix("/files/")?
        .strip_suffix(".html")?
        .parse()
        .ok()
}

/// Send an HTTP response
fn send_response(
    stream: &mut TcpStream,
    status_code: u16,
    status_text: &str,
    content_type: &str,
    body: &[u8],
) -> Result<()> {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status_code,
        status_text,
        content_type,
        body.len()
    );

    stream.write_all(response.as_bytes())?;
    stream.write_all(body)?;
    stream.flush()?;

    Ok(())
}

/// Simple URL decoding
fn urlparse(s: &str) -> String {
    // Split off query string
    let path = s.split('?').next().unwrap_or(s);

    let mut result = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            } else {
                result.push('%');
                result.push_str(&hex);
            }
        } else {
            result.push(c);
        }
    }

    result
}
