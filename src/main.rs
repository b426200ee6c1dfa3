//! career-compass: rank CVs against job descriptions

use career_compass::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use career_compass::config::{BackendKind, Config, OutputFormat};
use career_compass::error::{CareerCompassError, Result};
use career_compass::input::InputManager;
use career_compass::output::{save_report_to_file, ReportGenerator};
use career_compass::processing::embedding_manager::EmbeddingModelManager;
use career_compass::processing::RankingPipeline;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone();
    let config = match &config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Rank {
            cvs,
            jobs,
            backend,
            model,
            mode,
            top,
            min_score,
            output,
            save,
            detailed,
        } => {
            let mut config = config;

            if let Some(backend) = backend {
                config.scoring.backend = cli::parse_backend(&backend).map_err(CareerCompassError::InvalidInput)?;
            }
            if let Some(mode) = mode {
                config.ranking.mode = cli::parse_mode(&mode).map_err(CareerCompassError::InvalidInput)?;
            }
            if let Some(output) = output {
                config.output.format =
                    cli::parse_output_format(&output).map_err(CareerCompassError::InvalidInput)?;
            }
            if top.is_some() {
                config.ranking.top_n = top;
            }
            if let Some(min_score) = min_score {
                config.scoring.min_score = min_score;
            }
            config.output.detailed |= detailed;

            if let Some(model) = model {
                let manager = EmbeddingModelManager::from_config(&config).await?;
                config.models.default_embedding_model = manager
                    .resolve_model_id(&model)
                    .ok_or(CareerCompassError::ModelNotFound(model))?;
            }

            let mut input_manager = InputManager::new().with_cache(config.processing.enable_caching);

            if !jobs.is_empty() {
                for job in &jobs {
                    cli::validate_file_extension(job, &["txt", "md", "markdown", "pdf"]).map_err(|e| {
                        CareerCompassError::InvalidInput(format!("Job description file: {}", e))
                    })?;
                }
                config.references = input_manager.load_references(&jobs[..]).await?;
                info!("Loaded {} job descriptions from files", config.references.len());
            }

            if config.scoring.backend == BackendKind::Embedding {
                println!("🧠 Loading embedding model: {}", config.models.default_embedding_model);
            }
            let pipeline = RankingPipeline::from_config(&config)?;

            let batch = input_manager.load_uploads(&cvs[..]).await?;

            let progress = progress_bar(batch.uploads.len() as u64, config.output.format);
            let report = pipeline.run_batch(&batch, progress.as_ref());
            if let Some(pb) = &progress {
                pb.finish_and_clear();
            }

            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(use_colors, config.output.detailed);
            let rendered = generator.generate_report(&report, &config.output.format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)?;
                    println!("💾 Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Models { action } => run_models_command(action, &config).await?,

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => print_config(&config, &path)?,

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset: {}", path.display());
                }

                Some(ConfigAction::Path) => println!("{}", path.display()),
            }
        }
    }

    Ok(())
}

async fn run_models_command(action: ModelAction, config: &Config) -> Result<()> {
    let mut manager = EmbeddingModelManager::from_config(config).await?;

    match action {
        ModelAction::List => {
            println!("📚 Available Embedding Models\n");
            for model in manager.list_available_models() {
                let status = if manager.is_model_downloaded(&model.name) {
                    "✅ Downloaded"
                } else {
                    "⬇️  Available"
                };
                let default_marker = if model.name == config.models.default_embedding_model {
                    " (default)"
                } else {
                    ""
                };
                println!(
                    "  • {}{} ({}) - {} MB [{}]",
                    model.name, default_marker, model.repo_id, model.size_mb, status
                );
                println!("    {}", model.description);
            }

            if manager.list_downloaded_models().is_empty() {
                if let Some(recommended) = manager.auto_select_model() {
                    println!("\n💡 No models downloaded yet. Get started with:");
                    println!("   career-compass models download {}", recommended);
                }
            }
        }

        ModelAction::Download { model, force } => {
            let model_id = manager
                .resolve_model_id(&model)
                .ok_or_else(|| CareerCompassError::ModelNotFound(model.clone()))?;

            if !force && manager.is_model_downloaded(&model_id) {
                println!("✅ Model '{}' is already downloaded!", model_id);
                println!("💡 Use --force to re-download");
                return Ok(());
            }

            let model_path = manager.download_model(&model_id, force).await?;
            println!("📁 Location: {}", model_path.display());
        }

        ModelAction::Remove { model } => {
            println!("🗑️  Removing model: {}", model);
            manager.remove_model(&model).await?;
            println!("✅ Model '{}' removed successfully!", model);
        }

        ModelAction::Info { model } => {
            let model_info = manager
                .get_model_info(&model)
                .or_else(|| {
                    manager
                        .resolve_model_id(&model)
                        .and_then(|id| manager.get_model_info(&id))
                })
                .ok_or_else(|| CareerCompassError::ModelNotFound(model.clone()))?;

            println!("📋 Model Information for '{}'\n", model_info.name);
            println!("Repository: {}", model_info.repo_id);
            println!("Size: ~{} MB", model_info.size_mb);
            println!("Description: {}", model_info.description);

            match manager.get_model_path(&model_info.name) {
                Some(path) => {
                    println!("Status: ✅ Downloaded");
                    println!("Location: {}", path.display());
                }
                None => {
                    println!("Status: ⬇️  Available for download");
                    println!("\n💡 To download this model, run:");
                    println!("   career-compass models download {}", model_info.name);
                }
            }
        }
    }

    Ok(())
}

fn print_config(config: &Config, path: &Path) -> Result<()> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| CareerCompassError::Configuration(format!("Failed to render config: {}", e)))?;

    println!("⚙️  Current Configuration ({})\n", path.display());
    println!("{}", rendered);
    Ok(())
}

/// Progress bar for interactive console runs only
fn progress_bar(len: u64, format: OutputFormat) -> Option<ProgressBar> {
    if format != OutputFormat::Console || len < 2 {
        return None;
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("=> "));
    }
    Some(pb)
}
