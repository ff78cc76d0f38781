//! Run description loaded from the user's YAML file
//!
//! A run description names the projects to process, the baseline and release
//! sub-folders inside each project, and optional per-document filters:
//!
//! ```yaml
//! runMode: compare-release-with-baseline
//! baselineDir: v1
//! releaseDir: v2
//! projectFolders:
//!   - acme
//! includeDocs:
//!   - project: acme
//!     doc: report.pdf
//! specialDocConfigs:
//!   - project: acme
//!     doc: report.pdf
//!     excludePages: [3, 4]
//! ```

use crate::error::{Result, SnapshotError};
use crate::pages::PageFilters;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which side of the comparison a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RunMode {
    /// Snapshot the baseline documents
    CreateBaseline,
    /// Snapshot the release documents and compare them with the baseline
    CompareReleaseWithBaseline,
}

impl RunMode {
    pub const CREATE_BASELINE: &'static str = "create-baseline";
    pub const COMPARE_RELEASE_WITH_BASELINE: &'static str = "compare-release-with-baseline";

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::CreateBaseline => Self::CREATE_BASELINE,
            RunMode::CompareReleaseWithBaseline => Self::COMPARE_RELEASE_WITH_BASELINE,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            Self::CREATE_BASELINE => Ok(RunMode::CreateBaseline),
            Self::COMPARE_RELEASE_WITH_BASELINE => Ok(RunMode::CompareReleaseWithBaseline),
            other => Err(invalid_run_mode(other)),
        }
    }
}

fn accepted_run_modes() -> String {
    format!(
        "either '{}' OR '{}'",
        RunMode::CREATE_BASELINE,
        RunMode::COMPARE_RELEASE_WITH_BASELINE
    )
}

fn invalid_run_mode(found: &str) -> String {
    format!("'runMode' found: {found}. It should be {}", accepted_run_modes())
}

impl TryFrom<String> for RunMode {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RunMode> for String {
    fn from(mode: RunMode) -> Self {
        mode.as_str().to_string()
    }
}

/// A document of a given project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRef {
    #[serde(deserialize_with = "scalar_string")]
    pub project: String,
    #[serde(deserialize_with = "scalar_string")]
    pub doc: String,
}

/// Page filters for a single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialDocConfig {
    #[serde(deserialize_with = "scalar_string")]
    pub project: String,
    #[serde(deserialize_with = "scalar_string")]
    pub doc: String,
    #[serde(default)]
    pub include_pages: Option<Vec<u32>>,
    #[serde(default)]
    pub exclude_pages: Option<Vec<u32>>,
}

/// The run description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRunInfo")]
pub struct RunInfo {
    pub run_mode: RunMode,
    pub baseline_dir: String,
    pub release_dir: String,
    pub project_folders: Option<Vec<String>>,
    pub include_docs: Option<Vec<DocRef>>,
    pub exclude_docs: Option<Vec<DocRef>>,
    pub special_doc_configs: Option<Vec<SpecialDocConfig>>,
}

/// The run description as written, before `runMode` is checked
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRunInfo {
    #[serde(default)]
    run_mode: Option<serde_yaml::Value>,
    #[serde(default, deserialize_with = "scalar_string")]
    baseline_dir: String,
    #[serde(default, deserialize_with = "scalar_string")]
    release_dir: String,
    #[serde(default, deserialize_with = "scalar_string_list")]
    project_folders: Option<Vec<String>>,
    #[serde(default)]
    include_docs: Option<Vec<DocRef>>,
    #[serde(default)]
    exclude_docs: Option<Vec<DocRef>>,
    #[serde(default)]
    special_doc_configs: Option<Vec<SpecialDocConfig>>,
}

impl TryFrom<RawRunInfo> for RunInfo {
    type Error = String;

    fn try_from(raw: RawRunInfo) -> std::result::Result<Self, Self::Error> {
        let run_mode = match raw.run_mode {
            None | Some(serde_yaml::Value::Null) => return Err(invalid_run_mode("nothing")),
            Some(value) => value_to_string(value)
                .map_err(|_| invalid_run_mode("a list or mapping"))?
                .parse()?,
        };

        Ok(Self {
            run_mode,
            baseline_dir: raw.baseline_dir,
            release_dir: raw.release_dir,
            project_folders: raw.project_folders,
            include_docs: raw.include_docs,
            exclude_docs: raw.exclude_docs,
            special_doc_configs: raw.special_doc_configs,
        })
    }
}

impl RunInfo {
    /// Load and validate a run description from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SnapshotError::Config(format!("cannot read {}: {e}", path.display()))
        })?;

        Self::from_yaml_str(&raw).map_err(|e| match e {
            SnapshotError::Config(msg) => {
                SnapshotError::Config(format!("{msg}. Please update {}", path.display()))
            }
            other => other,
        })
    }

    /// Parse and validate a run description
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let info: RunInfo = serde_yaml::from_str(yaml).map_err(|e| {
            let message = e.to_string();
            if message.contains("'runMode' found") {
                SnapshotError::Config(format!("invalid run description: {message}"))
            } else {
                SnapshotError::Config(format!(
                    "invalid run description: {message}. 'runMode' should be {}",
                    accepted_run_modes()
                ))
            }
        })?;
        info.validate()?;
        Ok(info)
    }

    fn validate(&self) -> Result<()> {
        if self.baseline_dir.trim().is_empty() {
            return Err(SnapshotError::Config(
                "'baselineDir' must name the baseline folder of each project".to_string(),
            ));
        }

        if self.run_mode == RunMode::CompareReleaseWithBaseline
            && self.release_dir.trim().is_empty()
        {
            return Err(SnapshotError::Config(format!(
                "'releaseDir' is required when 'runMode' is '{}'",
                RunMode::COMPARE_RELEASE_WITH_BASELINE
            )));
        }

        Ok(())
    }

    /// Folder whose documents are snapshotted in this run
    pub fn working_dir(&self) -> &str {
        match self.run_mode {
            RunMode::CreateBaseline => &self.baseline_dir,
            RunMode::CompareReleaseWithBaseline => &self.release_dir,
        }
    }

    pub fn projects(&self) -> &[String] {
        self.project_folders.as_deref().unwrap_or_default()
    }

    /// Apply `includeDocs` and `excludeDocs` to the files of one project
    pub fn filter_docs(&self, project: &str, files: Vec<String>) -> Vec<String> {
        let mut files = files;

        if let Some(included) = docs_of(self.include_docs.as_deref(), project) {
            files.retain(|file| included.contains(&file.as_str()));
        }

        if let Some(excluded) = docs_of(self.exclude_docs.as_deref(), project) {
            files.retain(|file| !excluded.contains(&file.as_str()));
        }

        files
    }

    /// Page filters of the given project's documents, keyed by file name
    ///
    /// Only documents present in `files` are considered. A later entry for the
    /// same document replaces an earlier one.
    pub fn page_filters(&self, project: &str, files: &[String]) -> HashMap<String, PageFilters> {
        let mut filters = HashMap::new();

        for special in self.special_doc_configs.iter().flatten() {
            if special.project == project && files.contains(&special.doc) {
                filters.insert(
                    special.doc.clone(),
                    PageFilters::new(
                        special.include_pages.clone().unwrap_or_default(),
                        special.exclude_pages.clone().unwrap_or_default(),
                    ),
                );
            }
        }

        filters
    }
}

fn docs_of<'a>(docs: Option<&'a [DocRef]>, project: &str) -> Option<Vec<&'a str>> {
    docs.map(|docs| {
        docs.iter()
            .filter(|d| d.project == project)
            .map(|d| d.doc.as_str())
            .collect()
    })
}

/// Folder and project names are often numeric (`2023`, `1.0`); accept any scalar
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    value_to_string(value).map_err(serde::de::Error::custom)
}

fn scalar_string_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_yaml::Value>>::deserialize(deserializer)?;
    values
        .map(|values| {
            values
                .into_iter()
                .map(value_to_string)
                .collect::<std::result::Result<Vec<_>, _>>()
        })
        .transpose()
        .map_err(serde::de::Error::custom)
}

fn value_to_string(value: serde_yaml::Value) -> std::result::Result<String, String> {
    match value {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok(String::new()),
        other => Err(format!("expected a scalar value, found {other:?}")),
    }
}
