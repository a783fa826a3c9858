use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use seolens_core::{
    CONFIG_FILE_NAME, FailOn, SeoConfig, exit_code, pipeline, project, render_json,
    render_markdown,
};

#[derive(Debug, Parser)]
#[command(
    name = "seolens",
    version,
    about = "seolens: SEO checks for Next.js and React page sources",
    after_help = "Developed by Pon Datalab"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze the project's pages for SEO issues
    Analyze(AnalyzeArgs),
    /// Write a starter seo.config.json
    Init(InitArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOnLevel {
    Error,
    Warning,
}

impl From<FailOnLevel> for FailOn {
    fn from(level: FailOnLevel) -> Self {
        match level {
            FailOnLevel::Error => FailOn::Error,
            FailOnLevel::Warning => FailOn::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Markdown,
    Json,
}

impl ReportFormat {
    fn default_file_name(self) -> &'static str {
        match self {
            Self::Markdown => "seo-report.md",
            Self::Json => "seo-report.json",
        }
    }
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Project root containing package.json
    #[arg(long, default_value = ".", env = "SEOLENS_ROOT")]
    pub root: PathBuf,

    /// Configuration file (defaults to <root>/seo.config.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lowest issue severity that makes the command fail
    #[arg(long, value_enum, default_value_t = FailOnLevel::Error)]
    pub fail_on: FailOnLevel,

    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
    pub format: ReportFormat,

    /// Report file (defaults to <root>/seo-report.md or .json)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the report without writing a report file
    #[arg(long)]
    pub report_only: bool,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Run a parsed command and return the process exit code.
pub async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Analyze(args) => analyze(args).await,
        Command::Init(args) => init(&args).map(|()| 0),
    }
}

async fn analyze(args: AnalyzeArgs) -> Result<i32> {
    eprintln!("🔍 seolens: starting analysis...");

    let info = project::detect(&args.root).context("failed to detect project")?;
    eprintln!(
        "Detected: {} (Router: {})",
        info.framework,
        info.router()
            .map(|router| router.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    let config = match &args.config {
        Some(path) => SeoConfig::load(path),
        None => SeoConfig::load_or_default(&args.root),
    }
    .context("failed to load configuration")?;

    let run = pipeline::run(&info, &config)
        .await
        .context("analysis failed")?;

    let report = match args.format {
        ReportFormat::Markdown => render_markdown(&run),
        ReportFormat::Json => render_json(&run)?,
    };
    println!("{report}");

    if !args.report_only {
        let target = args
            .output
            .clone()
            .unwrap_or_else(|| args.root.join(args.format.default_file_name()));
        write_report(&target, &report)?;
        eprintln!("📝 Report saved to {}", target.display());
    }

    Ok(exit_code(&run, args.fail_on.into()))
}

fn write_report(target: &Path, report: &str) -> Result<()> {
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(target, report).with_context(|| format!("failed to write {}", target.display()))
}

fn init(args: &InitArgs) -> Result<()> {
    let path = args.root.join(CONFIG_FILE_NAME);
    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut contents = serde_json::to_string_pretty(&SeoConfig::starter())?;
    contents.push('\n');
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;

    eprintln!(
        "✅ Created {}. Edit it to match your project details.",
        path.display()
    );
    Ok(())
}
