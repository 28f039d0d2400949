use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use retouch_ai::{EditService, GeminiClient, GeminiConfig, ServiceError};
use retouch_core::{Artifact, Hotspot};
use retouch_ui::config::{default_config_path, load_config, AppConfig};
use retouch_ui::editor::{AspectRatio, EditorSession};
use retouch_ui::logging::init_logging;
use retouch_ui::presets::{ADJUSTMENTS, FILTERS, QUICK_ACTIONS};
use retouch_ui::samples::{fetch_sample, find_sample, SAMPLES};
use retouch_ui::script::{load_steps, run_steps, Step};
use serde_json::json;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "retouch",
    version,
    about = "AI photo retouching: localized edits, filters, adjustments and crops with undo history"
)]
struct Cli {
    /// Config file (default: <config dir>/retouch/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory for downloaded results (overrides the config file)
    #[arg(long, global = true)]
    out: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Localized edit around one pixel
    Edit(EditArgs),
    /// One-click retouch at a hotspot (see `retouch presets`)
    Quick(QuickArgs),
    /// Apply a stylistic filter to the whole image
    Filter(GlobalArgs),
    /// Apply a photographic adjustment to the whole image
    Adjust(GlobalArgs),
    /// Crop locally, no service call
    Crop(CropArgs),
    /// Replay a JSON list of steps against one session
    Run(RunArgs),
    /// Print the built-in presets as JSON
    Presets,
    /// Download one of the sample images
    Sample(SampleArgs),
}

#[derive(Args, Debug)]
struct EditArgs {
    input: PathBuf,
    /// What to change at the hotspot
    #[arg(long)]
    prompt: String,
    /// Hotspot x in image pixels
    #[arg(long)]
    x: u32,
    /// Hotspot y in image pixels
    #[arg(long)]
    y: u32,
}

#[derive(Args, Debug)]
struct QuickArgs {
    input: PathBuf,
    /// Quick action id or label, e.g. teeth
    #[arg(long)]
    action: String,
    #[arg(long)]
    x: u32,
    #[arg(long)]
    y: u32,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    input: PathBuf,
    /// Preset id (see `retouch presets`)
    #[arg(long, conflicts_with = "prompt")]
    preset: Option<String>,
    /// Free-text instruction
    #[arg(long)]
    prompt: Option<String>,
}

#[derive(Args, Debug)]
struct CropArgs {
    input: PathBuf,
    #[arg(long, default_value_t = 0)]
    x: u32,
    #[arg(long, default_value_t = 0)]
    y: u32,
    #[arg(long)]
    width: u32,
    #[arg(long)]
    height: u32,
    /// free, 1:1, 4:3 or 16:9
    #[arg(long, default_value = "free", value_parser = parse_aspect)]
    aspect: AspectRatio,
}

#[derive(Args, Debug)]
struct RunArgs {
    input: PathBuf,
    /// JSON file with the steps to run
    #[arg(long)]
    steps: PathBuf,
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Sample label, e.g. portrait
    label: String,
}

fn parse_aspect(value: &str) -> Result<AspectRatio, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "free" => Ok(AspectRatio::Free),
        "1:1" | "square" => Ok(AspectRatio::Square),
        "4:3" => Ok(AspectRatio::FourThree),
        "16:9" => Ok(AspectRatio::SixteenNine),
        _ => Err(format!("unknown aspect ratio: {value}")),
    }
}

/// Stands in for the service when no API key is configured; crops still work.
struct UnconfiguredService;

impl EditService for UnconfiguredService {
    fn edit(&self, _: &Artifact, _: &str, _: Hotspot) -> Result<Artifact, ServiceError> {
        Err(ServiceError::MissingApiKey)
    }

    fn filter(&self, _: &Artifact, _: &str) -> Result<Artifact, ServiceError> {
        Err(ServiceError::MissingApiKey)
    }

    fn adjust(&self, _: &Artifact, _: &str) -> Result<Artifact, ServiceError> {
        Err(ServiceError::MissingApiKey)
    }
}

fn build_service(config: &AppConfig) -> Result<Arc<dyn EditService>> {
    match GeminiConfig::from_env() {
        Ok(env_config) => {
            let client = GeminiClient::new(config.gemini_config(env_config.api_key))
                .context("create Gemini client")?;
            Ok(Arc::new(client))
        }
        Err(err) => {
            warn!("{}; only local crops are available", err);
            Ok(Arc::new(UnconfiguredService))
        }
    }
}

fn run_session(config: &AppConfig, out: PathBuf, input: PathBuf, steps: Vec<Step>) -> Result<()> {
    let service = build_service(config)?;
    let mut session = EditorSession::with_gesture(service, config.swipe_gesture());

    let artifact = Artifact::from_path(&input)?;
    session.load_image(artifact);
    run_steps(&mut session, &steps)?;

    let path = session.download(&out)?;
    println!("{}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let loaded = load_config(&config_path);
    if let Some(reason) = &loaded.reset_reason {
        warn!("Using default configuration: {}", reason);
    }
    let config = loaded.config;
    let out = cli.out.clone().unwrap_or_else(|| config.output_dir());

    match cli.command {
        Commands::Edit(args) => run_session(
            &config,
            out,
            args.input,
            vec![Step::Edit {
                prompt: args.prompt,
                x: args.x,
                y: args.y,
            }],
        ),
        Commands::Quick(args) => run_session(
            &config,
            out,
            args.input,
            vec![Step::Quick {
                action: args.action,
                x: args.x,
                y: args.y,
            }],
        ),
        Commands::Filter(args) => run_session(
            &config,
            out,
            args.input,
            vec![Step::Filter {
                preset: args.preset,
                prompt: args.prompt,
            }],
        ),
        Commands::Adjust(args) => run_session(
            &config,
            out,
            args.input,
            vec![Step::Adjust {
                preset: args.preset,
                prompt: args.prompt,
            }],
        ),
        Commands::Crop(args) => run_session(
            &config,
            out,
            args.input,
            vec![Step::Crop {
                x: args.x,
                y: args.y,
                width: args.width,
                height: args.height,
                aspect: args.aspect,
            }],
        ),
        Commands::Run(args) => {
            let steps = load_steps(&args.steps)?;
            info!("Loaded {} steps from {}", steps.len(), args.steps.display());
            run_session(&config, out, args.input, steps)
        }
        Commands::Presets => {
            let presets = json!({
                "filters": FILTERS,
                "adjustments": ADJUSTMENTS,
                "quick_actions": QUICK_ACTIONS,
                "samples": SAMPLES,
            });
            println!("{}", serde_json::to_string_pretty(&presets)?);
            Ok(())
        }
        Commands::Sample(args) => {
            let sample = find_sample(&args.label)
                .with_context(|| format!("unknown sample: {}", args.label))?;
            let artifact = fetch_sample(sample, config.timeout())?;
            std::fs::create_dir_all(&out)
                .with_context(|| format!("create output dir: {}", out.display()))?;
            let path = out.join(artifact.name());
            std::fs::write(&path, artifact.bytes())
                .with_context(|| format!("write sample: {}", path.display()))?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
