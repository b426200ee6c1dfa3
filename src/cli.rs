//! CLI interface for career-compass

use crate::config::{BackendKind, OutputFormat, RankingMode};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "career-compass")]
#[command(version)]
#[command(about = "Rank CVs against job descriptions by text similarity")]
#[command(long_about = "Extract text from PDF CVs, normalize it, and rank each CV against a set of job descriptions using term-vector or Model2Vec embedding similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank one or more CVs against the job descriptions
    Rank {
        /// CV files (PDF)
        #[arg(required = true)]
        cvs: Vec<PathBuf>,

        /// Job description files (TXT, MD, PDF); replaces the configured list
        #[arg(short, long, num_args = 1..)]
        jobs: Vec<PathBuf>,

        /// Similarity backend: term or embedding
        #[arg(short, long)]
        backend: Option<String>,

        /// Embedding model to use with the embedding backend
        #[arg(short, long)]
        model: Option<String>,

        /// Ranking mode: per-document or flattened
        #[arg(long)]
        mode: Option<String>,

        /// Keep only the N best matches
        #[arg(short, long)]
        top: Option<usize>,

        /// Drop matches scoring below this value (0-100)
        #[arg(long)]
        min_score: Option<f32>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Output detailed results
        #[arg(short, long)]
        detailed: bool,
    },

    /// Model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download a model
    Download {
        /// Model name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a downloaded model
    Remove {
        /// Model name to remove
        model: String,
    },

    /// Show model information
    Info {
        /// Model name
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

pub fn parse_backend(backend: &str) -> Result<BackendKind, String> {
    match backend.to_lowercase().as_str() {
        "term" | "term-vector" | "tfidf" => Ok(BackendKind::TermVector),
        "embedding" | "embeddings" | "model2vec" => Ok(BackendKind::Embedding),
        _ => Err(format!("Invalid backend: {}. Supported: term, embedding", backend)),
    }
}

pub fn parse_mode(mode: &str) -> Result<RankingMode, String> {
    match mode.to_lowercase().as_str() {
        "per-document" | "document" => Ok(RankingMode::PerDocument),
        "flattened" | "flat" | "global" => Ok(RankingMode::Flattened),
        _ => Err(format!("Invalid ranking mode: {}. Supported: per-document, flattened", mode)),
    }
}

pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err(format!("File has no extension: {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rank_command() {
        let cli = Cli::parse_from([
            "career-compass",
            "rank",
            "alice.pdf",
            "bob.pdf",
            "--jobs",
            "backend.md",
            "data.txt",
            "--top",
            "2",
        ]);

        match cli.command {
            Commands::Rank { cvs, jobs, top, .. } => {
                assert_eq!(cvs.len(), 2);
                assert_eq!(jobs, vec![PathBuf::from("backend.md"), PathBuf::from("data.txt")]);
                assert_eq!(top, Some(2));
            }
            _ => panic!("expected rank command"),
        }
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
        assert_eq!(parse_backend("term").unwrap(), BackendKind::TermVector);
        assert_eq!(parse_backend("embedding").unwrap(), BackendKind::Embedding);
        assert_eq!(parse_mode("flattened").unwrap(), RankingMode::Flattened);
        assert!(parse_mode("sideways").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
