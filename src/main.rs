use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use meetscribe::cli::{Cli, Commands, ModelsAction};
use meetscribe::config::Config;
use meetscribe::pipeline::{BatchConfig, BatchDriver, BatchSummary};
use meetscribe::stt::whisper::{WhisperGateway, WhisperGatewayConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Status lines go to stdout; everything detailed goes through the log.
    // Default to warnings so batch output stays scannable; RUST_LOG=info
    // (or debug) opts into the full trail.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match cli.command {
        Commands::Run {
            ref input_dir,
            ref output,
            recursive,
            ref model,
            ref language,
            default_speakers,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(model) = model {
                config.transcription.model = model.clone();
            }
            if let Some(language) = language {
                config.transcription.language = language.clone();
            }
            if let Some(count) = default_speakers {
                config.diarization.default_speaker_count = count;
            }
            if let Some(output) = output {
                config.output.base_dir = Some(output.clone());
            }
            config.scan.recursive = config.scan.recursive || recursive;

            run_batch(input_dir, &config, cli.quiet, cli.no_download)?;
        }
        Commands::Models { action } => {
            handle_models_command(action, cli.quiet)?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "meetscribe", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/meetscribe/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path).with_context(|| format!("loading config from {}", path.display()))?
    } else {
        Config::load_or_default(&Config::default_path())?
    };
    Ok(config.with_env_overrides())
}

/// Run the batch over a directory of recordings.
///
/// Per-file failures are reported in the summary and never affect the exit
/// code; only setup-level failures (missing input directory, no recordings,
/// missing models) make this return an error.
fn run_batch(input_dir: &Path, config: &Config, quiet: bool, no_download: bool) -> Result<()> {
    let (asr_model, segmentation_model, embedding_model) =
        resolve_model_paths(config, no_download)?;

    let gateway = WhisperGateway::new(WhisperGatewayConfig {
        asr_model,
        language: config.transcription.language.clone(),
        threads: config.transcription.threads,
        segmentation_model,
        embedding_model,
        similarity_threshold: config.diarization.similarity_threshold,
    })?;

    let mut batch_config = BatchConfig::for_input_dir(input_dir);
    if let Some(base_dir) = &config.output.base_dir {
        batch_config.output_base = base_dir.clone();
    }
    batch_config.recursive = config.scan.recursive;
    batch_config.extensions = config.scan.extensions.clone();
    batch_config.language = config.transcription.language.clone();
    batch_config.default_speaker_count = config.diarization.default_speaker_count;
    batch_config.legacy_text = config.output.legacy_text;
    batch_config.quiet = quiet;

    let interrupt = meetscribe::sys::install_interrupt_handler();
    let driver = BatchDriver::new(batch_config, &gateway).with_interrupt(interrupt);
    let outcomes = driver.run()?;
    let summary = BatchSummary::from_outcomes(&outcomes);

    println!();
    println!("{}", "=== Processing Summary ===".cyan());
    println!("  {} {}", "Succeeded:".green(), summary.succeeded);
    if summary.failed > 0 {
        println!("  {}    {}", "Failed:".red(), summary.failed);
    } else {
        println!("  Failed:    {}", summary.failed);
    }
    println!("  Success rate: {:.1}%", summary.success_rate());

    Ok(())
}

/// Resolve the three model files the gateway needs, downloading missing ones
/// from the catalog when allowed.
#[cfg(feature = "model-download")]
fn resolve_model_paths(config: &Config, no_download: bool) -> Result<(PathBuf, PathBuf, PathBuf)> {
    use meetscribe::models::download::ensure_model;

    let asr = match &config.transcription.model_path {
        Some(path) => path.clone(),
        None => ensure_model(&config.transcription.model, no_download, true)?,
    };
    let segmentation = match &config.diarization.segmentation_model {
        Some(path) => path.clone(),
        None => ensure_model("segmentation-3.0", no_download, true)?,
    };
    let embedding = match &config.diarization.embedding_model {
        Some(path) => path.clone(),
        None => ensure_model("wespeaker", no_download, true)?,
    };
    Ok((asr, segmentation, embedding))
}

/// Without the model-download feature every model path must be configured.
#[cfg(not(feature = "model-download"))]
fn resolve_model_paths(config: &Config, _no_download: bool) -> Result<(PathBuf, PathBuf, PathBuf)> {
    let require = |path: &Option<PathBuf>, key: &str| -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.clone()),
            None => anyhow::bail!(
                "this build has no model downloader; set {key} in the config file"
            ),
        }
    };
    Ok((
        require(&config.transcription.model_path, "transcription.model_path")?,
        require(&config.diarization.segmentation_model, "diarization.segmentation_model")?,
        require(&config.diarization.embedding_model, "diarization.embedding_model")?,
    ))
}

/// Handle model management commands.
#[cfg(feature = "model-download")]
fn handle_models_command(action: ModelsAction, _quiet: bool) -> Result<()> {
    use meetscribe::models::catalog::MODELS;
    use meetscribe::models::download::{download_model, format_model_info};

    match action {
        ModelsAction::List => {
            println!("Available models:");
            for model in MODELS {
                println!("  {}", format_model_info(model));
            }
        }
        ModelsAction::Install { name } => {
            let path = download_model(&name, true)?;
            println!("Model '{}' installed successfully", name);
            println!("Location: {}", path.display());
        }
    }
    Ok(())
}

#[cfg(not(feature = "model-download"))]
fn handle_models_command(_action: ModelsAction, _quiet: bool) -> Result<()> {
    anyhow::bail!("this build has no model downloader; rebuild with --features model-download");
}
