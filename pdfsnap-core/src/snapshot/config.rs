//! Snapshot configuration model
//!
//! One configuration is generated per document. Its single snapshot opens the
//! document in the viewer (capturing page 1); every selected page after that
//! becomes an additional snapshot whose script advances the viewer first.

use super::script::{self, RESTORE_PAGE_STATE, WAIT_FOR_SELECTOR};
use crate::config::Settings;
use crate::plan::DocumentRun;
use serde::{Deserialize, Serialize};

/// Alias text referring to the shared script
pub const RESTORE_PAGE_STATE_ALIAS: &str = "*restore-page-state";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(rename = "base-url")]
    pub base_url: String,
    pub references: References,
    pub snapshots: Vec<Snapshot>,
}

/// Scripts shared between snapshots through YAML anchors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct References {
    #[serde(rename = "restore-page-state")]
    pub restore_page_state: String,
}

impl Default for References {
    fn default() -> Self {
        Self {
            restore_page_state: RESTORE_PAGE_STATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub name: String,
    pub url: String,
    pub wait_for_selector: String,
    #[serde(default)]
    pub additional_snapshots: Vec<AdditionalSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalSnapshot {
    pub suffix: String,
    pub wait_for_selector: String,
    pub execute: Execute,
}

/// Script run before an additional snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Execute {
    /// The shared script in `references`
    RestorePageState,
    /// A script of its own
    Script(String),
}

impl From<String> for Execute {
    fn from(value: String) -> Self {
        if value == RESTORE_PAGE_STATE || value == RESTORE_PAGE_STATE_ALIAS {
            Execute::RestorePageState
        } else {
            Execute::Script(value)
        }
    }
}

impl From<Execute> for String {
    fn from(execute: Execute) -> Self {
        match execute {
            Execute::RestorePageState => RESTORE_PAGE_STATE_ALIAS.to_string(),
            Execute::Script(script) => script,
        }
    }
}

impl Execute {
    /// The script text, with the shared reference resolved
    pub fn script(&self) -> &str {
        match self {
            Execute::RestorePageState => RESTORE_PAGE_STATE,
            Execute::Script(script) => script,
        }
    }
}

impl SnapshotConfig {
    /// Build the configuration of one document
    ///
    /// Without page filters every selected page directly follows the previous
    /// one, so each additional snapshot reuses the shared one-page script.
    /// With filters each snapshot gets its own script skipping the pages in
    /// between.
    pub fn for_document(run: &DocumentRun, settings: &Settings) -> Self {
        let pages = run.snapshot_pages();

        let executes: Vec<Execute> = if run.filters.is_empty() {
            vec![Execute::RestorePageState; pages.len()]
        } else {
            script::advance_scripts(&pages)
                .into_iter()
                .map(Execute::Script)
                .collect()
        };

        let additional_snapshots = pages
            .iter()
            .zip(executes)
            .map(|(page, execute)| AdditionalSnapshot {
                suffix: page_suffix(*page),
                wait_for_selector: WAIT_FOR_SELECTOR.to_string(),
                execute,
            })
            .collect();

        Self {
            base_url: settings.base_url(),
            references: References::default(),
            snapshots: vec![Snapshot {
                name: run.file_name.clone(),
                url: run.viewer_url(),
                wait_for_selector: WAIT_FOR_SELECTOR.to_string(),
                additional_snapshots,
            }],
        }
    }

    /// Total number of captures, including the base page of each snapshot
    pub fn capture_count(&self) -> usize {
        self.snapshots
            .iter()
            .map(|s| 1 + s.additional_snapshots.len())
            .sum()
    }
}

pub fn page_suffix(page: u32) -> String {
    format!(" | Page {page}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunInfo;
    use crate::pages::PageFilters;

    fn document(page_count: u32, filters: PageFilters) -> DocumentRun {
        let info = RunInfo::from_yaml_str("runMode: create-baseline\nbaselineDir: v1\n").unwrap();
        DocumentRun::new(
            &info,
            &Settings::default(),
            "acme",
            "report.pdf",
            page_count,
            filters,
        )
    }

    #[test]
    fn test_unfiltered_document_uses_shared_script() {
        let config = SnapshotConfig::for_document(&document(4, PageFilters::default()), &Settings::default());

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.snapshots.len(), 1);

        let snapshot = &config.snapshots[0];
        assert_eq!(snapshot.name, "report.pdf");
        assert_eq!(snapshot.url, "/web/viewer.html?file=/web/projects/acme/v1/report.pdf");
        assert_eq!(snapshot.wait_for_selector, WAIT_FOR_SELECTOR);

        let suffixes: Vec<_> = snapshot
            .additional_snapshots
            .iter()
            .map(|s| s.suffix.as_str())
            .collect();
        assert_eq!(suffixes, vec![" | Page 2", " | Page 3", " | Page 4"]);
        assert!(snapshot
            .additional_snapshots
            .iter()
            .all(|s| s.execute == Execute::RestorePageState));
        assert_eq!(config.capture_count(), 4);
    }

    #[test]
    fn test_filtered_document_skips_pages() {
        let filters = PageFilters::new(vec![], vec![3, 4]);
        let config = SnapshotConfig::for_document(&document(6, filters), &Settings::default());
        let additional = &config.snapshots[0].additional_snapshots;

        assert_eq!(additional.len(), 3);
        assert_eq!(additional[0].suffix, " | Page 2");
        assert_eq!(additional[1].suffix, " | Page 5");
        assert_eq!(additional[2].suffix, " | Page 6");
        assert_eq!(additional[1].execute, Execute::Script(script::advance_script(2, 5)));
    }

    #[test]
    fn test_filters_selecting_everything_still_use_own_scripts() {
        let filters = PageFilters::new(vec![2, 3], vec![]);
        let config = SnapshotConfig::for_document(&document(3, filters), &Settings::default());
        let additional = &config.snapshots[0].additional_snapshots;

        assert_eq!(additional[0].execute, Execute::Script(script::advance_script(1, 2)));
        assert_eq!(additional[1].execute.script(), script::advance_script(2, 3));
    }

    #[test]
    fn test_single_page_document() {
        let config = SnapshotConfig::for_document(&document(1, PageFilters::default()), &Settings::default());
        assert!(config.snapshots[0].additional_snapshots.is_empty());
        assert_eq!(config.capture_count(), 1);
    }

    #[test]
    fn test_execute_string_conversions() {
        assert_eq!(Execute::from(RESTORE_PAGE_STATE.to_string()), Execute::RestorePageState);
        assert_eq!(Execute::from("*restore-page-state".to_string()), Execute::RestorePageState);
        assert_eq!(String::from(Execute::RestorePageState), "*restore-page-state");
    }
}
