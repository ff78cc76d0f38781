//! Batch processing of every discovered document
//!
//! Documents are independent: each one is counted, turned into a snapshot
//! config, written to the output folder and handed to the snapshot service.
//! Up to `Settings::parallelism` documents are in flight at once, and every
//! document reports an outcome instead of aborting the run.
//!
//! # Example
//!
//! ```rust,no_run
//! use pdfsnap::config::{RunInfo, Settings};
//! use pdfsnap::pipeline::{Pipeline, RunOptions};
//!
//! # async fn run() -> pdfsnap::Result<()> {
//! let run_info = RunInfo::load("configs/pdf-run-info-baseline.yml")?;
//! let pipeline = Pipeline::new(run_info, Settings::default(), RunOptions::default());
//!
//! let summary = pipeline.execute().await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

use crate::config::{RunInfo, RunMode, Settings};
use crate::discovery::{self, DocumentJob};
use crate::error::{Result, SnapshotError};
use crate::pages;
use crate::plan::{DocumentRun, PlanFailure, RunPlan};
use crate::runner::SnapshotRunner;
use crate::snapshot::{render_yaml, SnapshotConfig};
use crate::workspace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

pub mod progress;
pub mod result;

pub use progress::{ProgressInfo, RunProgress};
pub use result::{DocumentOutcome, RunSummary};

/// Options of a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Generate configs without invoking the snapshot service
    pub dry_run: bool,
    /// Keep the viewer and output folders as they are
    pub skip_setup: bool,
    /// Cancel documents that have not started once one fails
    pub stop_on_error: bool,
}

impl RunOptions {
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn skip_setup(mut self, skip: bool) -> Self {
        self.skip_setup = skip;
        self
    }

    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }
}

/// Drives a run over every discovered document
pub struct Pipeline {
    run_info: Arc<RunInfo>,
    settings: Arc<Settings>,
    options: RunOptions,
    cancelled: Arc<AtomicBool>,
    progress: Arc<RunProgress>,
}

/// State shared by the document tasks
struct DocumentContext {
    run_info: Arc<RunInfo>,
    settings: Arc<Settings>,
    runner: Option<SnapshotRunner>,
    progress: Arc<RunProgress>,
    cancelled: Arc<AtomicBool>,
    stop_on_error: bool,
}

impl Pipeline {
    pub fn new(run_info: RunInfo, settings: Settings, options: RunOptions) -> Self {
        Self {
            run_info: Arc::new(run_info),
            settings: Arc::new(settings),
            options,
            cancelled: Arc::new(AtomicBool::new(false)),
            progress: Arc::new(RunProgress::new()),
        }
    }

    /// Stop starting new documents; running ones finish
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn progress(&self) -> ProgressInfo {
        self.progress.get_info()
    }

    /// Describe what a run would do, without writing anything
    ///
    /// Documents that `execute` would fail before rendering are reported in
    /// `RunPlan::failed` instead of aborting the plan.
    pub fn plan(&self) -> Result<RunPlan> {
        let mut plan = RunPlan::default();

        for job in discovery::discover(&self.run_info, &self.settings)? {
            match load_document(&self.run_info, &self.settings, &job) {
                Ok(run) => plan.documents.push(run.to_planned()),
                Err(e) => plan.failed.push(PlanFailure {
                    doc: job.display_name(),
                    error: e.to_string(),
                }),
            }
        }

        Ok(plan)
    }

    /// Run every document and collect the outcomes
    pub async fn execute(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let dry_run = self.options.dry_run;

        let runner = if dry_run {
            None
        } else {
            Some(SnapshotRunner::new(&self.settings.snapshot_command)?)
        };

        if !self.options.skip_setup {
            workspace::prepare(&self.settings)?;
        }

        let jobs = discovery::discover(&self.run_info, &self.settings)?;
        if jobs.is_empty() {
            warn!("No documents found for the configured projects");
            return Ok(RunSummary::empty(dry_run));
        }

        info!(
            "Processing {} documents ({} at a time, mode: {})",
            jobs.len(),
            self.settings.parallelism,
            self.run_info.run_mode
        );
        self.progress.add_docs(jobs.len());

        let context = Arc::new(DocumentContext {
            run_info: Arc::clone(&self.run_info),
            settings: Arc::clone(&self.settings),
            runner,
            progress: Arc::clone(&self.progress),
            cancelled: Arc::clone(&self.cancelled),
            stop_on_error: self.options.stop_on_error,
        });

        let semaphore = Arc::new(Semaphore::new(self.settings.parallelism.max(1)));
        let names: Vec<String> = jobs.iter().map(DocumentJob::display_name).collect();
        let mut tasks = Vec::with_capacity(jobs.len());

        for job in jobs {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|_| SnapshotError::Cancelled)?;
            let context = Arc::clone(&context);

            tasks.push(tokio::spawn(async move {
                let outcome = process_document(&context, job).await;
                drop(permit);
                outcome
            }));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (task, doc) in tasks.into_iter().zip(names) {
            let outcome = task.await.unwrap_or_else(|e| {
                self.progress.fail_doc();
                DocumentOutcome::Failed {
                    doc,
                    duration: start_time.elapsed(),
                    error: format!("document task aborted: {e}"),
                }
            });
            outcomes.push(outcome);
        }

        Ok(RunSummary::from_outcomes(
            outcomes,
            start_time.elapsed(),
            dry_run,
        ))
    }
}

async fn process_document(context: &DocumentContext, job: DocumentJob) -> DocumentOutcome {
    if context.cancelled.load(Ordering::SeqCst) {
        context.progress.skip_doc();
        return DocumentOutcome::Cancelled {
            doc: job.display_name(),
        };
    }

    context.progress.start_doc();
    let start = Instant::now();
    let name = job.display_name();

    let outcome = match snapshot_document(context, job).await {
        Ok(outcome) => {
            context.progress.complete_doc();
            outcome
        }
        Err(e) => {
            context.progress.fail_doc();
            if context.stop_on_error {
                context.cancelled.store(true, Ordering::SeqCst);
            }
            DocumentOutcome::Failed {
                doc: name,
                duration: start.elapsed(),
                error: e.to_string(),
            }
        }
    };

    let progress = context.progress.get_info().format_progress();
    if outcome.is_failed() {
        error!("[{}] {}", progress, outcome);
    } else {
        info!("[{}] {}", progress, outcome);
    }
    outcome
}

/// Check the document, count its pages and build its run record
fn load_document(run_info: &RunInfo, settings: &Settings, job: &DocumentJob) -> Result<DocumentRun> {
    if run_info.run_mode == RunMode::CompareReleaseWithBaseline && !job.working_copy.is_file() {
        return Err(SnapshotError::Discovery(format!(
            "{} has no release copy at {}",
            job.display_name(),
            job.working_copy.display()
        )));
    }

    let page_count = pages::count_pages(&job.source)?;
    if page_count == 0 {
        return Err(SnapshotError::Pdf {
            path: job.source.clone(),
            message: "document has no pages".to_string(),
        });
    }

    Ok(DocumentRun::new(
        run_info,
        settings,
        &job.project,
        &job.file_name,
        page_count,
        job.filters.clone(),
    ))
}

async fn snapshot_document(context: &DocumentContext, job: DocumentJob) -> Result<DocumentOutcome> {
    let start = Instant::now();
    let settings = &context.settings;

    let source = job.source.clone();
    let run_info = Arc::clone(&context.run_info);
    let blocking_settings = Arc::clone(&context.settings);
    let run = tokio::task::spawn_blocking(move || load_document(&run_info, &blocking_settings, &job))
        .await
        .map_err(|e| SnapshotError::Pdf {
            path: source,
            message: e.to_string(),
        })??;

    let doc = run.doc_key();
    let pages = run.snapshot_pages();
    info!(
        "Pages considered for snapshot in DOC: {} => {}",
        doc,
        pages::describe_selection(&pages)
    );

    let yaml = render_yaml(&SnapshotConfig::for_document(&run, settings))?;
    let config_path =
        workspace::write_snapshot_config(&settings.output_dir, &run.config_file_name(), &yaml)?;

    match &context.runner {
        Some(runner) => {
            runner
                .run(&doc, &config_path, &run.branch, &run.target_branch)
                .await?;
            Ok(DocumentOutcome::Completed {
                doc,
                config_path,
                pages,
                duration: start.elapsed(),
            })
        }
        None => Ok(DocumentOutcome::Generated {
            doc,
            config_path,
            pages,
            duration: start.elapsed(),
        }),
    }
}
