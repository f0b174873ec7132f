//! `shoulder-angle` measures the shoulder angle on one frontal photo.
//!
//! # Usage
//!
//! ```bash
//! shoulder-angle --image patient.jpg --side right
//! shoulder-angle --image patient.jpg --config shoulder.toml --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::{Context, Error};
use clap::Parser;
use tracing::{error, info};
use frozen_shoulder_angle::{PipelineConfig, PipelineError, PoseDetectionClient, ShoulderAnglePipeline, Side};

#[derive(Parser, Debug)]
#[command(
    name = "shoulder-angle",
    version,
    about = "Estimate the shoulder angle from a frontal photo",
    long_about = None
)]
struct Args {
    /// Frontal JPEG or PNG photo showing shoulder, elbow and hip.
    #[arg(short, long, value_name = "FILE")]
    image: PathBuf,

    /// Shoulder to analyze: left or right.
    #[arg(short, long, default_value = "left")]
    side: String,

    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the pose detection service endpoint.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Where to write the annotated PNG. Defaults to the configured output filename.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the result as JSON instead of a message.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

async fn run(args: Args) -> Result<(), Error> {
    let side: Side = args.side.parse()?;

    let mut config = match args.config.as_deref() {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => PipelineConfig::new(),
    };
    if let Some(endpoint) = args.endpoint {
        config.detection.endpoint = endpoint;
    }

    let im_bytes = std::fs::read(&args.image)
        .with_context(|| format!("failed to read {}", args.image.display()))?;

    let detector = PoseDetectionClient::from_config(&config.detection)?;
    let pipeline = ShoulderAnglePipeline::new(detector, config);
    let analysis = pipeline.process(&im_bytes, side).await?;

    let output = args.output.unwrap_or_else(|| PathBuf::from(pipeline.output_filename()));
    std::fs::write(&output, &analysis.png)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("{} written to {}", analysis.caption(), output.display());

    if args.json {
        let report = analysis.report(&output.to_string_lossy());
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if analysis.is_success() {
        println!("{}", analysis.message());
    } else {
        eprintln!("{}", analysis.message());
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<PipelineError>() {
                Some(PipelineError::Decode(_)) => eprintln!("Unable to read the image. Try another file."),
                Some(PipelineError::InvalidSide(_)) => eprintln!("{e}"),
                _ => error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
