//! rfdoc: generate HTML or Markdown documentation for Robot Framework
//! Python libraries.
//!
//! `rfdoc ExcelLibrary.py -f html -c rfdoc.json`

mod config;
mod docstring;
mod error;
mod markup;
mod model;
mod parser;
mod render;
mod robot;
mod toc;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rfdoc",
    about = "Generate documentation for Robot Framework Python libraries"
)]
struct Cli {
    /// Python library source file
    input: PathBuf,

    /// Output file (default: <stem>.md or <stem>.html)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), html
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// JSON configuration file with metadata, links and custom keywords
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// HTML template with {{placeholder}} markers
    #[arg(short = 't', long)]
    template: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let mut lib = parser::parse_file(&cli.input, &source)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;

    let config = match cli.config {
        Some(ref path) => config::Config::load(path),
        None => config::Config::default(),
    };
    lib.metadata = Some(config.metadata());

    let template = match cli.template {
        Some(ref path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read template {}", path.display()))?,
        ),
        None => None,
    };

    let index = robot::KeywordIndex::for_library(&lib, config.custom_keywords());
    info!(keywords = index.len(), "highlighter keyword index built");
    debug!(names = ?index.names(), "highlighter keywords");
    let robot = robot::RobotHighlighter::new(index);
    let generic = markup::ClientSideHighlighter;
    let markup = markup::MarkupRenderer::new(&robot, &generic);

    let options = render::RenderOptions {
        generated_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        template,
    };
    let renderer = render::create_renderer(&cli.format, options)?;
    let output = renderer.render(&lib, &markup)?;

    let out_path = match cli.output {
        Some(ref path) => path.clone(),
        None => default_output(&cli.input, renderer.file_extension()),
    };
    fs::write(&out_path, output)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    println!(
        "Successfully parsed {} keywords from {}",
        lib.keyword_count(),
        lib.name
    );
    println!("Documentation generated: {}", out_path.display());
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `<stem>.<ext>` in the current directory.
/// "libs/ExcelLibrary.py" → "ExcelLibrary.html"
fn default_output(input: &Path, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "library".to_string());
    PathBuf::from(format!("{}.{}", stem, ext))
}
