//! AdCompose CLI - Bridge interface for the studio backend
//!
//! Commands: formats, compose, resize, multi, score, compile
//! Outputs JSON to stdout, logs to stderr (RUST_LOG, default warn)
//! Returns 2 when a score fails its threshold, 1 on input errors

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use adcompose_core::{
    formats::{format_table, recommended_formats},
    AdDocument, AdFormat, ComposeRequest, CompositionPipeline, EngineConfig, FocalPoint, Platform, ScoreContext,
};

#[derive(Parser)]
#[command(name = "adcompose-cli")]
#[command(about = "AdCompose CLI - Ad Composition Engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine config JSON file; defaults apply when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the format table
    Formats {
        /// Only formats recommended for this platform
        #[arg(short, long)]
        platform: Option<Platform>,
    },

    /// Compose a master document
    Compose {
        /// JSON payload (ComposeRequest), inline or @path
        #[arg(short, long)]
        payload: String,
    },

    /// Resize a document to one format
    Resize {
        /// JSON document, inline or @path
        #[arg(short, long)]
        document: String,

        /// Target format id
        #[arg(short, long)]
        format: AdFormat,

        /// Focal point as x,y in source pixels
        #[arg(long, value_parser = parse_focal)]
        focal: Option<FocalPoint>,
    },

    /// Resize a document to several formats
    Multi {
        /// JSON document, inline or @path
        #[arg(short, long)]
        document: String,

        /// Comma-separated format ids; config defaults when absent
        #[arg(short, long, value_delimiter = ',')]
        formats: Vec<AdFormat>,
    },

    /// Score a document
    Score {
        /// JSON document, inline or @path
        #[arg(short, long)]
        document: String,

        /// JSON payload (ScoreContext), inline or @path
        #[arg(long)]
        context: Option<String>,
    },

    /// Compose, fan out and score everything
    Compile {
        /// JSON payload (ComposeRequest), inline or @path
        #[arg(short, long)]
        payload: String,
    },
}

fn parse_focal(raw: &str) -> Result<FocalPoint, String> {
    let (x, y) = raw.split_once(',').ok_or("expected x,y")?;
    let coord = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("{v:?}: {e}"));
    Ok(FocalPoint { x: coord(x)?, y: coord(y)? })
}

/// Inline JSON, or the contents of a file when prefixed with `@`.
fn read_payload(arg: &str) -> std::io::Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path),
        None => Ok(arg.to_string()),
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(arg: &str) -> Result<T, Box<dyn Error>> {
    let raw = read_payload(arg)?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid payload: {e}").into())
}

fn emit(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let pipeline = CompositionPipeline::new(config);

    match cli.command {
        Commands::Formats { platform } => {
            let specs: Vec<_> = match platform {
                Some(p) => recommended_formats(p).into_iter().map(AdFormat::spec).collect(),
                None => format_table(),
            };
            emit(&specs)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Compose { payload } => {
            let request: ComposeRequest = parse_payload(&payload)?;
            let tokens = request.resolve_tokens()?;
            emit(&pipeline.composer().compose(&request.brief, &tokens)?)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Resize { document, format, focal } => {
            let doc: AdDocument = parse_payload(&document)?;
            emit(&pipeline.resizer().smart_resize(&doc, &format.spec(), focal)?)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Multi { document, formats } => {
            let doc: AdDocument = parse_payload(&document)?;
            let formats = if formats.is_empty() {
                pipeline.config().default_formats.clone()
            } else {
                formats
            };
            emit(&pipeline.resizer().generate_multi_format_ads(&doc, &formats)?)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Score { document, context } => {
            let doc: AdDocument = parse_payload(&document)?;
            let ctx: ScoreContext = match context {
                Some(raw) => parse_payload(&raw)?,
                None => ScoreContext::default(),
            };
            let report = pipeline.score(&doc, &ctx);
            emit(&report)?;
            Ok(if report.passed { ExitCode::SUCCESS } else { ExitCode::from(2) })
        }

        Commands::Compile { payload } => {
            let request: ComposeRequest = parse_payload(&payload)?;
            let compiled = pipeline.compile(&request)?;
            emit(&serde_json::json!({ "success": true, "ad": compiled }))?;
            Ok(if compiled.all_passed() { ExitCode::SUCCESS } else { ExitCode::from(2) })
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let output = serde_json::json!({ "success": false, "error": e.to_string() });
            println!("{output}");
            ExitCode::FAILURE
        }
    }
}
