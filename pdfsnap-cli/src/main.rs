use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pdfsnap::config::settings;
use pdfsnap::{count_pages, Pipeline, RunInfo, RunOptions, Settings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "pdfsnap",
    about = "Visual regression snapshots for rendered PDF documents",
    version,
    author
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate snapshot configs and run the snapshot service for every document
    Run {
        /// PDF docs run info file (e.g. configs/pdf-run-info-baseline.yml)
        #[arg(value_name = "RUN_INFO")]
        config: PathBuf,

        /// Write the snapshot configs without running the snapshot service
        #[arg(long)]
        dry_run: bool,

        /// Do not reset the viewer and output folders
        #[arg(long)]
        skip_setup: bool,

        /// Cancel remaining documents after the first failure
        #[arg(long)]
        stop_on_error: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Show the pages and branches each document would be snapshotted with
    Plan {
        /// PDF docs run info file
        #[arg(value_name = "RUN_INFO")]
        config: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Print the page count of PDF files
    Pages {
        /// Input PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct SettingsArgs {
    /// Folder holding one sub-folder per project
    #[arg(long, env = "PDFSNAP_PROJECTS_DIR", default_value = settings::DEFAULT_PROJECTS_DIR)]
    projects_dir: PathBuf,

    /// Projects folder served by the PDF viewer
    #[arg(long, env = "PDFSNAP_SERVER_DIR", default_value = settings::DEFAULT_SERVER_PROJECTS_DIR)]
    server_dir: PathBuf,

    /// Folder receiving the generated snapshot configs
    #[arg(long, env = "PDFSNAP_OUTPUT_DIR", default_value = settings::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Host of the PDF viewer server
    #[arg(long, env = "PDFSNAP_HOST", default_value = settings::DEFAULT_HOST)]
    host: String,

    /// Port of the PDF viewer server
    #[arg(long, env = "PDFSNAP_PORT", default_value_t = settings::DEFAULT_PORT)]
    port: u16,

    /// Prefix of document ids and branch names
    #[arg(long, env = "PDFSNAP_BRANCH_PREFIX", default_value = settings::DEFAULT_BRANCH_PREFIX)]
    branch_prefix: String,

    /// Snapshot service command; the config path is appended
    ///
    /// Split on whitespace without quoting, unless the whole value is the path
    /// of an existing file.
    #[arg(long, env = "PDFSNAP_SNAPSHOT_COMMAND", default_value = settings::DEFAULT_SNAPSHOT_COMMAND)]
    snapshot_command: String,

    /// Documents processed concurrently (defaults to the CPU count, up to 8)
    #[arg(short, long, env = "PDFSNAP_JOBS")]
    jobs: Option<usize>,
}

impl SettingsArgs {
    fn into_settings(self) -> Settings {
        let mut settings = Settings::default()
            .with_projects_dir(self.projects_dir)
            .with_server_projects_dir(self.server_dir)
            .with_output_dir(self.output_dir)
            .with_server(self.host, self.port)
            .with_branch_prefix(self.branch_prefix)
            .with_snapshot_command(self.snapshot_command);

        if let Some(jobs) = self.jobs {
            settings = settings.with_parallelism(jobs);
        }
        settings
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "pdfsnap=info",
        1 => "pdfsnap=debug",
        _ => "pdfsnap=trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_run_info(path: &Path) -> Result<RunInfo> {
    RunInfo::load(path)
        .with_context(|| format!("Failed to load PDF docs run info {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            dry_run,
            skip_setup,
            stop_on_error,
            settings,
        } => {
            let run_info = load_run_info(&config)?;
            let options = RunOptions::default()
                .dry_run(dry_run)
                .skip_setup(skip_setup)
                .stop_on_error(stop_on_error);

            info!("Run mode: {}", run_info.run_mode);
            let pipeline = Arc::new(Pipeline::new(run_info, settings.into_settings(), options));

            let canceller = Arc::clone(&pipeline);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, waiting for running documents to finish");
                    canceller.cancel();
                }
            });

            let summary = pipeline.execute().await.context("Snapshot run failed")?;
            println!("{summary}");

            if !summary.is_success() {
                std::process::exit(1);
            }
        }

        Commands::Plan {
            config,
            format,
            settings,
        } => {
            let run_info = load_run_info(&config)?;
            let pipeline = Pipeline::new(run_info, settings.into_settings(), RunOptions::default());
            let plan = pipeline.plan().context("Failed to plan snapshot run")?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&plan.documents)?);
                }
                OutputFormat::Text => {
                    for doc in &plan.documents {
                        println!("{} => {}", doc.doc, doc.describe_pages());
                        println!("  url:    {}", doc.url);
                        println!("  config: {}", doc.config_file);
                        println!("  branch: {}", doc.branch);
                        if !doc.target_branch.is_empty() {
                            println!("  target: {}", doc.target_branch);
                        }
                    }
                    println!("{} documents", plan.documents.len());
                }
            }

            for failure in &plan.failed {
                eprintln!("Error: {}: {}", failure.doc, failure.error);
            }

            if !plan.is_success() {
                std::process::exit(1);
            }
        }

        Commands::Pages { inputs } => {
            let mut failed = false;
            for input in &inputs {
                match count_pages(input) {
                    Ok(count) => println!("{}: {} pages", input.display(), count),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        failed = true;
                    }
                }
            }

            if failed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
