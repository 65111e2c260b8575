//! Runs the graph construction pipeline on saved detection results.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pnid_graph::{
    construct_graph, Config, GraphConstructionRequest, GraphConstructionResponse,
    LineDetectionResponse,
};

#[derive(Debug, Parser)]
#[command(name = "construct-graph", about = "Construct the asset graph for one diagram")]
struct Args {
    /// Diagram identifier
    #[arg(long, default_value = "pid_sub1")]
    pid_id: String,

    /// Path to the text detection results JSON
    #[arg(long)]
    text_detection_path: PathBuf,

    /// Path to the line detection results JSON
    #[arg(long)]
    line_detection_path: PathBuf,

    /// Where to write the connectivity JSON
    #[arg(long)]
    output_connectivity_json_path: PathBuf,

    /// Where to write the arrow records JSON
    #[arg(long)]
    output_arrows_json_path: Option<PathBuf>,

    /// Optional configuration JSON; defaults apply otherwise
    #[arg(long)]
    config_path: Option<PathBuf>,

    /// Exhaust all simple paths during the propagation pass
    #[arg(long)]
    propagation_exhaustive_search: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("graph construction failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> pnid_graph::Result<()> {
    let config = match &args.config_path {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    let mut text_detection_results: GraphConstructionRequest =
        serde_json::from_str(&fs::read_to_string(&args.text_detection_path)?)?;
    text_detection_results.propagation_pass_exhaustive_search = args.propagation_exhaustive_search;

    let line_detection_results: LineDetectionResponse =
        serde_json::from_str(&fs::read_to_string(&args.line_detection_path)?)?;

    let outcome = construct_graph(
        &args.pid_id,
        &text_detection_results,
        &line_detection_results,
        &config,
    )?;

    let response = GraphConstructionResponse {
        connected_symbols: outcome.connected_symbols,
    };
    fs::write(
        &args.output_connectivity_json_path,
        serde_json::to_string_pretty(&response)?,
    )?;

    if let Some(arrows_path) = &args.output_arrows_json_path {
        fs::write(arrows_path, serde_json::to_string_pretty(&outcome.arrow_nodes)?)?;
    }

    Ok(())
}
