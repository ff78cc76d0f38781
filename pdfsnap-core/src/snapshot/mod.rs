//! Snapshot configurations for the external snapshot service
//!
//! # Example
//!
//! ```rust
//! use pdfsnap::config::{RunInfo, Settings};
//! use pdfsnap::pages::PageFilters;
//! use pdfsnap::plan::DocumentRun;
//! use pdfsnap::snapshot::{render_yaml, SnapshotConfig};
//!
//! # fn main() -> pdfsnap::Result<()> {
//! let info = RunInfo::from_yaml_str("runMode: create-baseline\nbaselineDir: v1\n")?;
//! let settings = Settings::default();
//! let run = DocumentRun::new(&info, &settings, "acme", "report.pdf", 3, PageFilters::default());
//!
//! let yaml = render_yaml(&SnapshotConfig::for_document(&run, &settings))?;
//! assert!(yaml.contains("execute: *restore-page-state"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod render;
pub mod script;

pub use config::{AdditionalSnapshot, Execute, References, Snapshot, SnapshotConfig};
pub use render::render_yaml;
pub use script::{advance_script, RESTORE_PAGE_STATE, WAIT_FOR_SELECTOR};
