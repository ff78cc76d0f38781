//! Per-document run record
//!
//! A [`DocumentRun`] combines the run description with one discovered
//! document and its page count. It owns the identifiers handed to the
//! snapshot service: the document id doubles as the snapshot branch, and in
//! compare mode the target branch points at the same document's baseline.

use crate::config::settings::CONFIG_FILE_EXTENSION;
use crate::config::{RunInfo, RunMode, Settings};
use crate::pages::{self, PageFilters};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRun {
    pub run_mode: RunMode,
    pub baseline_dir: String,
    pub release_dir: String,
    pub project: String,
    pub file_name: String,
    pub page_count: u32,
    pub filters: PageFilters,
    pub doc_id: String,
    pub branch: String,
    pub target_branch: String,
    pub working_dir: String,
    viewer_path: String,
    config_file_prefix: String,
}

impl DocumentRun {
    pub fn new(
        run_info: &RunInfo,
        settings: &Settings,
        project: &str,
        file_name: &str,
        page_count: u32,
        filters: PageFilters,
    ) -> Self {
        let working_dir = run_info.working_dir().to_string();
        let prefix = &settings.branch_prefix;
        let doc_id = format!("{prefix}_{project}_{working_dir}_{file_name}");

        let target_branch = match run_info.run_mode {
            RunMode::CreateBaseline => String::new(),
            RunMode::CompareReleaseWithBaseline => {
                format!("{prefix}_{project}_{}_{file_name}", run_info.baseline_dir)
            }
        };

        Self {
            run_mode: run_info.run_mode,
            baseline_dir: run_info.baseline_dir.clone(),
            release_dir: run_info.release_dir.clone(),
            project: project.to_string(),
            file_name: file_name.to_string(),
            page_count,
            filters,
            branch: doc_id.clone(),
            doc_id,
            target_branch,
            working_dir,
            viewer_path: settings.viewer_path.clone(),
            config_file_prefix: settings.config_file_prefix.clone(),
        }
    }

    /// Document id without whitespace
    pub fn doc_key(&self) -> String {
        strip_whitespace(&self.doc_id)
    }

    /// File name of the generated snapshot config
    pub fn config_file_name(&self) -> String {
        format!(
            "{}{}_{}{}",
            self.config_file_prefix,
            self.doc_key(),
            self.working_dir,
            CONFIG_FILE_EXTENSION
        )
    }

    /// Viewer URL, relative to the server base URL
    pub fn viewer_url(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.viewer_path, self.project, self.working_dir, self.file_name
        )
    }

    /// Pages captured as additional snapshots
    pub fn snapshot_pages(&self) -> Vec<u32> {
        self.filters.select(self.page_count)
    }

    pub fn to_planned(&self) -> PlannedDocument {
        PlannedDocument {
            doc: self.doc_key(),
            project: self.project.clone(),
            file_name: self.file_name.clone(),
            page_count: self.page_count,
            pages: self.snapshot_pages(),
            branch: strip_whitespace(&self.branch),
            target_branch: strip_whitespace(&self.target_branch),
            config_file: self.config_file_name(),
            url: self.viewer_url(),
        }
    }
}

/// What a run would do for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedDocument {
    pub doc: String,
    pub project: String,
    pub file_name: String,
    pub page_count: u32,
    /// Additional snapshot pages; page 1 is always captured
    pub pages: Vec<u32>,
    pub branch: String,
    pub target_branch: String,
    pub config_file: String,
    pub url: String,
}

impl PlannedDocument {
    pub fn describe_pages(&self) -> String {
        pages::describe_selection(&self.pages)
    }
}

/// A document that cannot be snapshotted, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanFailure {
    pub doc: String,
    pub error: String,
}

/// What a run would do for every discovered document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunPlan {
    pub documents: Vec<PlannedDocument>,
    pub failed: Vec<PlanFailure>,
}

impl RunPlan {
    /// True when `run` would not fail any document
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub(crate) fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_info(mode: &str) -> RunInfo {
        RunInfo::from_yaml_str(&format!(
            "runMode: {mode}\nbaselineDir: v1\nreleaseDir: v2\nprojectFolders: [acme]\n"
        ))
        .unwrap()
    }

    #[test]
    fn test_baseline_identifiers() {
        let run = DocumentRun::new(
            &run_info("create-baseline"),
            &Settings::default(),
            "acme",
            "report.pdf",
            4,
            PageFilters::default(),
        );

        assert_eq!(run.working_dir, "v1");
        assert_eq!(run.doc_id, "DOC_acme_v1_report.pdf");
        assert_eq!(run.branch, run.doc_id);
        assert!(run.target_branch.is_empty());
        assert_eq!(run.config_file_name(), "snapshots_DOC_acme_v1_report.pdf_v1.yml");
        assert_eq!(
            run.viewer_url(),
            "/web/viewer.html?file=/web/projects/acme/v1/report.pdf"
        );
        assert_eq!(run.snapshot_pages(), vec![2, 3, 4]);
    }

    #[test]
    fn test_compare_identifiers_target_the_baseline() {
        let run = DocumentRun::new(
            &run_info("compare-release-with-baseline"),
            &Settings::default(),
            "acme",
            "report.pdf",
            1,
            PageFilters::default(),
        );

        assert_eq!(run.working_dir, "v2");
        assert_eq!(run.branch, "DOC_acme_v2_report.pdf");
        assert_eq!(run.target_branch, "DOC_acme_v1_report.pdf");
        assert!(run.snapshot_pages().is_empty());
    }

    #[test]
    fn test_whitespace_is_stripped_from_keys() {
        let run = DocumentRun::new(
            &run_info("compare-release-with-baseline"),
            &Settings::default().with_branch_prefix("PDF"),
            "acme",
            "annual report.pdf",
            3,
            PageFilters::new(vec![3], vec![]),
        );

        assert_eq!(run.doc_id, "PDF_acme_v2_annual report.pdf");
        assert_eq!(run.doc_key(), "PDF_acme_v2_annualreport.pdf");
        assert_eq!(run.config_file_name(), "snapshots_PDF_acme_v2_annualreport.pdf_v2.yml");

        let planned = run.to_planned();
        assert_eq!(planned.branch, "PDF_acme_v2_annualreport.pdf");
        assert_eq!(planned.target_branch, "PDF_acme_v1_annualreport.pdf");
        assert_eq!(planned.pages, vec![3]);
        assert_eq!(planned.describe_pages(), "[1,3]");
        // the viewer still needs the real file name
        assert!(planned.url.ends_with("/acme/v2/annual report.pdf"));
    }

    #[test]
    fn test_planned_document_json() {
        let run = DocumentRun::new(
            &run_info("create-baseline"),
            &Settings::default(),
            "acme",
            "report.pdf",
            3,
            PageFilters::new(vec![], vec![2]),
        );

        let json = serde_json::to_value(run.to_planned()).unwrap();
        assert_eq!(json["doc"], "DOC_acme_v1_report.pdf");
        assert_eq!(json["pages"], serde_json::json!([3]));
        assert_eq!(json["target_branch"], "");
        assert_eq!(json["config_file"], "snapshots_DOC_acme_v1_report.pdf_v1.yml");
    }
}
