//! Discovery of the documents to snapshot
//!
//! Documents are always enumerated from each project's baseline folder, so a
//! release run snapshots exactly the documents that have a baseline.

use crate::config::{RunInfo, RunMode, Settings};
use crate::error::{Result, SnapshotError};
use crate::pages::PageFilters;
use crate::workspace;
use std::path::PathBuf;
use tracing::{debug, info};

/// A document found for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentJob {
    pub project: String,
    pub file_name: String,
    /// Baseline copy, used for page counting
    pub source: PathBuf,
    /// Copy in the folder snapshotted by this run
    pub working_copy: PathBuf,
    pub filters: PageFilters,
}

impl DocumentJob {
    /// Short name for logs
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.project, self.file_name)
    }
}

/// Find every document of every configured project
pub fn discover(run_info: &RunInfo, settings: &Settings) -> Result<Vec<DocumentJob>> {
    let mut jobs = Vec::new();

    for project in run_info.projects() {
        info!("Project folder found: {}", project);
        jobs.extend(discover_project(run_info, settings, project)?);
    }

    Ok(jobs)
}

fn discover_project(
    run_info: &RunInfo,
    settings: &Settings,
    project: &str,
) -> Result<Vec<DocumentJob>> {
    let project_dir = settings.projects_dir.join(project);
    let baseline_dir = project_dir.join(&run_info.baseline_dir);
    if !baseline_dir.is_dir() {
        return Err(SnapshotError::Discovery(format!(
            "baseline folder {} of project '{project}' not found",
            baseline_dir.display()
        )));
    }

    let files = workspace::list_pdf_files(&baseline_dir)?;
    let found = files.len();
    let files = run_info.filter_docs(project, files);
    let mut filters = run_info.page_filters(project, &files);

    debug!(
        "Project '{}': {} of {} documents selected",
        project,
        files.len(),
        found
    );

    let working_dir = project_dir.join(run_info.working_dir());
    let jobs = files
        .into_iter()
        .map(|file_name| DocumentJob {
            project: project.to_string(),
            source: baseline_dir.join(&file_name),
            working_copy: match run_info.run_mode {
                RunMode::CreateBaseline => baseline_dir.join(&file_name),
                RunMode::CompareReleaseWithBaseline => working_dir.join(&file_name),
            },
            filters: filters.remove(&file_name).unwrap_or_default(),
            file_name,
        })
        .collect();

    Ok(jobs)
}
