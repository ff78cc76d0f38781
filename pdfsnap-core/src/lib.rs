//! # pdfsnap
//!
//! Visual regression testing for rendered PDF documents.
//!
//! pdfsnap walks per-project folders of PDF files, counts the pages of each
//! document, decides which pages to capture and writes one snapshot
//! configuration per document for an external snapshot service (Percy's
//! `snapshot` command by default). Each configuration scripts the PDF viewer
//! to advance page by page, and carries branch names that pair every release
//! document with its baseline.
//!
//! ## Layout
//!
//! ```text
//! projects/
//!   acme/
//!     v1/           <- baselineDir
//!       report.pdf
//!     v2/           <- releaseDir
//!       report.pdf
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfsnap::{Pipeline, RunInfo, RunOptions, Settings};
//!
//! #[tokio::main]
//! async fn main() -> pdfsnap::Result<()> {
//!     let run_info = RunInfo::load("configs/pdf-run-info-release.yml")?;
//!     let pipeline = Pipeline::new(run_info, Settings::default(), RunOptions::default());
//!
//!     let summary = pipeline.execute().await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Run description and tool settings
//! - [`discovery`] - Documents per project
//! - [`pages`] - Page counting and page selection
//! - [`plan`] - Per-document identifiers and branches
//! - [`snapshot`] - Snapshot configs and viewer scripts
//! - [`runner`] - Snapshot service invocation
//! - [`pipeline`] - Concurrent processing of every document

pub mod config;
pub mod discovery;
pub mod error;
pub mod pages;
pub mod pipeline;
pub mod plan;
pub mod runner;
pub mod snapshot;
pub mod workspace;

pub use config::{RunInfo, RunMode, Settings};
pub use discovery::DocumentJob;
pub use error::{Result, SnapshotError};
pub use pages::{count_pages, select_pages, PageFilters};
pub use pipeline::{DocumentOutcome, Pipeline, RunOptions, RunSummary};
pub use plan::{DocumentRun, PlanFailure, PlannedDocument, RunPlan};
pub use runner::SnapshotRunner;
pub use snapshot::{render_yaml, SnapshotConfig};

/// Current version of pdfsnap
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
