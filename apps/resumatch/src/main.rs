use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resumatch::extraction::{self, DocumentFormat};
use resumatch::{AnalyzerConfig, ResumeAnalyzer, SUPPORTED_EXTENSIONS};

#[derive(Parser)]
#[clap(name = "resumatch", version, about = "Score resumes against a job description")]
struct Cli {
    /// JSON configuration file; RESUMATCH_* variables override it
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one resume against a job description
    Analyze {
        /// Resume file (.pdf, .docx, .txt, .rtf)
        resume: PathBuf,

        /// File holding the job description
        #[clap(short, long, conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[clap(long)]
        job_text: Option<String>,
    },

    /// Analyze several resumes against one job description, best first
    Batch {
        #[clap(required = true, num_args = 1..)]
        resumes: Vec<PathBuf>,

        #[clap(short, long)]
        job: PathBuf,

        /// Run documents concurrently on the blocking pool
        #[clap(short, long)]
        parallel: bool,

        /// Per-document time limit when running in parallel
        #[clap(long)]
        timeout_secs: Option<u64>,
    },

    /// ATS compatibility check of a resume on its own
    Ats { resume: PathBuf },

    /// Keyword inventory of any supported document, most important first
    Keywords { file: PathBuf },

    /// List supported input formats
    Formats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let config = load_config(args.config.as_deref())?;

    // stdout carries the JSON output, logs go to stderr
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resumatch v{}", ResumeAnalyzer::version());

    let analyzer = ResumeAnalyzer::new(config).context("Invalid analyzer configuration")?;

    match args.command {
        Commands::Analyze {
            resume,
            job,
            job_text,
        } => {
            let job_description = match (job, job_text) {
                (Some(path), _) => read_text(&analyzer, &path)?,
                (None, Some(text)) => text,
                (None, None) => bail!("Provide a job description with --job or --job-text"),
            };
            let report = analyzer
                .analyze_path(&resume, &job_description)
                .with_context(|| format!("Failed to analyze '{}'", resume.display()))?;
            print_json(&report)?;
        }
        Commands::Batch {
            resumes,
            job,
            parallel,
            timeout_secs,
        } => {
            let job_description = read_text(&analyzer, &job)?;
            let entries = if parallel {
                analyzer
                    .analyze_batch_parallel(
                        &resumes,
                        &job_description,
                        timeout_secs.map(Duration::from_secs),
                    )
                    .await
            } else {
                analyzer.analyze_batch(&resumes, &job_description)
            };
            let failed = entries.iter().filter(|e| e.is_error()).count();
            info!("Batch finished: {} analyzed, {} failed", entries.len() - failed, failed);
            print_json(&entries)?;
        }
        Commands::Ats { resume } => {
            let document = analyzer
                .load(&resume)
                .with_context(|| format!("Failed to read '{}'", resume.display()))?;
            let ats = analyzer
                .ats_check(&document)
                .with_context(|| format!("Failed to analyze '{}'", resume.display()))?;
            print_json(&ats)?;
        }
        Commands::Keywords { file } => {
            let text = read_text(&analyzer, &file)?;
            print_json(&analyzer.keyword_inventory(&text))?;
        }
        Commands::Formats => {
            print_json(&SUPPORTED_EXTENSIONS)?;
        }
    }

    Ok(())
}

/// Defaults, then the optional JSON file, then `RESUMATCH_*` overrides.
fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    match path {
        Some(path) => {
            dotenvy::dotenv().ok();
            AnalyzerConfig::from_file(path)?.with_overrides(|key| std::env::var(key).ok())
        }
        None => AnalyzerConfig::from_env(),
    }
}

/// Plain text, or the extracted text of any supported document format.
fn read_text(analyzer: &ResumeAnalyzer, path: &Path) -> Result<String> {
    if DocumentFormat::from_path(path).is_ok() {
        let document = analyzer
            .load(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let text = extraction::extract_text(&document)
            .with_context(|| format!("Failed to extract text from '{}'", path.display()))?;
        return Ok(text.into_string());
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
