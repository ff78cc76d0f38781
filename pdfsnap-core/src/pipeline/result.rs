//! Per-document outcomes and the run summary

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// What happened to one document
#[derive(Debug, Clone)]
pub enum DocumentOutcome {
    /// Config generated and the snapshot service succeeded
    Completed {
        doc: String,
        config_path: PathBuf,
        pages: Vec<u32>,
        duration: Duration,
    },

    /// Config generated, snapshot service not invoked
    Generated {
        doc: String,
        config_path: PathBuf,
        pages: Vec<u32>,
        duration: Duration,
    },

    /// Processing failed
    Failed {
        doc: String,
        duration: Duration,
        error: String,
    },

    /// Not started because the run was cancelled
    Cancelled { doc: String },
}

impl DocumentOutcome {
    /// Config generated (and snapshotted, unless dry run)
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            DocumentOutcome::Completed { .. } | DocumentOutcome::Generated { .. }
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DocumentOutcome::Failed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DocumentOutcome::Cancelled { .. })
    }

    pub fn doc(&self) -> &str {
        match self {
            DocumentOutcome::Completed { doc, .. }
            | DocumentOutcome::Generated { doc, .. }
            | DocumentOutcome::Failed { doc, .. }
            | DocumentOutcome::Cancelled { doc } => doc,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            DocumentOutcome::Completed { duration, .. }
            | DocumentOutcome::Generated { duration, .. }
            | DocumentOutcome::Failed { duration, .. } => Some(*duration),
            DocumentOutcome::Cancelled { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DocumentOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        match self {
            DocumentOutcome::Completed { config_path, .. }
            | DocumentOutcome::Generated { config_path, .. } => Some(config_path),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentOutcome::Completed {
                doc,
                pages,
                duration,
                ..
            } => write!(
                f,
                "✓ {doc} - {} snapshots in {:.2}s",
                pages.len() + 1,
                duration.as_secs_f64()
            ),
            DocumentOutcome::Generated {
                doc, config_path, ..
            } => write!(f, "✓ {doc} - config written to {}", config_path.display()),
            DocumentOutcome::Failed {
                doc,
                duration,
                error,
            } => write!(
                f,
                "✗ {doc} - failed after {:.2}s: {error}",
                duration.as_secs_f64()
            ),
            DocumentOutcome::Cancelled { doc } => write!(f, "⚠ {doc} - cancelled"),
        }
    }
}

/// Summary of a run
#[derive(Debug)]
pub struct RunSummary {
    pub total_docs: usize,
    pub successful: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub dry_run: bool,
    pub duration: Duration,
    pub outcomes: Vec<DocumentOutcome>,
}

impl RunSummary {
    pub fn empty(dry_run: bool) -> Self {
        Self::from_outcomes(Vec::new(), Duration::from_secs(0), dry_run)
    }

    pub fn from_outcomes(outcomes: Vec<DocumentOutcome>, duration: Duration, dry_run: bool) -> Self {
        Self {
            total_docs: outcomes.len(),
            successful: outcomes.iter().filter(|o| o.is_success()).count(),
            failed: outcomes.iter().filter(|o| o.is_failed()).count(),
            cancelled: outcomes.iter().filter(|o| o.is_cancelled()).count(),
            dry_run,
            duration,
            outcomes,
        }
    }

    /// True when no document failed or was cancelled
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.cancelled == 0
    }

    /// Paths of every generated config
    pub fn config_paths(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| o.config_path())
            .collect()
    }

    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|e| (o.doc(), e)))
            .collect()
    }

    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!(
            "Snapshot Run Summary{}\n\
             ====================\n\
             Documents: {}\n\
             Successful: {}\n\
             Failed: {}\n\
             Duration: {:.2}s\n",
            if self.dry_run { " (dry run)" } else { "" },
            self.total_docs,
            self.successful,
            self.failed,
            self.duration.as_secs_f64()
        ));

        if self.cancelled > 0 {
            report.push_str(&format!("Cancelled: {}\n", self.cancelled));
        }

        let failed: Vec<_> = self.outcomes.iter().filter(|o| o.is_failed()).collect();
        if !failed.is_empty() {
            report.push_str("\nFailed Documents:\n");
            for outcome in failed {
                report.push_str(&format!("  - {outcome}\n"));
            }
        }

        report
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes() -> Vec<DocumentOutcome> {
        vec![
            DocumentOutcome::Completed {
                doc: "DOC_acme_v1_a.pdf".to_string(),
                config_path: PathBuf::from(".dist/snapshots_DOC_acme_v1_a.pdf_v1.yml"),
                pages: vec![2, 3],
                duration: Duration::from_secs(3),
            },
            DocumentOutcome::Failed {
                doc: "DOC_acme_v1_b.pdf".to_string(),
                duration: Duration::from_millis(500),
                error: "Invalid PDF header".to_string(),
            },
            DocumentOutcome::Cancelled {
                doc: "acme/c.pdf".to_string(),
            },
        ]
    }

    #[test]
    fn test_outcome_accessors() {
        let outcomes = outcomes();
        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[0].duration(), Some(Duration::from_secs(3)));
        assert!(outcomes[1].is_failed());
        assert_eq!(outcomes[1].error(), Some("Invalid PDF header"));
        assert!(outcomes[2].is_cancelled());
        assert_eq!(outcomes[2].duration(), None);
        assert_eq!(outcomes[2].doc(), "acme/c.pdf");
    }

    #[test]
    fn test_outcome_display() {
        let outcomes = outcomes();
        assert_eq!(
            outcomes[0].to_string(),
            "✓ DOC_acme_v1_a.pdf - 3 snapshots in 3.00s"
        );
        assert!(outcomes[1].to_string().starts_with("✗ DOC_acme_v1_b.pdf"));
        assert_eq!(outcomes[2].to_string(), "⚠ acme/c.pdf - cancelled");
    }

    #[test]
    fn test_summary() {
        let summary = RunSummary::from_outcomes(outcomes(), Duration::from_secs(4), false);

        assert_eq!(summary.total_docs, 3);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.cancelled, 1);
        assert!(!summary.is_success());
        assert_eq!(summary.config_paths().len(), 1);
        assert_eq!(
            summary.errors(),
            vec![("DOC_acme_v1_b.pdf", "Invalid PDF header")]
        );

        let report = summary.to_string();
        assert!(report.contains("Documents: 3"));
        assert!(report.contains("Cancelled: 1"));
        assert!(report.contains("Failed Documents:"));
        assert!(report.contains("DOC_acme_v1_b.pdf"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::empty(true);
        assert!(summary.is_success());
        assert!(summary.to_string().contains("(dry run)"));
    }
}
