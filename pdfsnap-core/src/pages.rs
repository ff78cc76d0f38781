//! Page counting and page selection
//!
//! Page 1 of every document is captured by the base snapshot of the viewer
//! URL. The remaining pages become additional snapshots, optionally narrowed
//! by per-document include/exclude lists.

use crate::error::{Result, SnapshotError};
use oxidize_pdf::PdfReader;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-document page filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFilters {
    /// Keep only these pages (empty keeps all)
    pub include: Vec<u32>,
    /// Drop these pages
    pub exclude: Vec<u32>,
}

impl PageFilters {
    pub fn new(include: Vec<u32>, exclude: Vec<u32>) -> Self {
        Self { include, exclude }
    }

    /// True when neither list narrows the selection
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn select(&self, page_count: u32) -> Vec<u32> {
        select_pages(page_count, &self.include, &self.exclude)
    }
}

/// Count the pages of a PDF file
pub fn count_pages<P: AsRef<Path>>(path: P) -> Result<u32> {
    let path = path.as_ref();
    let pdf_error = |message: String| SnapshotError::Pdf {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = PdfReader::open(path).map_err(|e| pdf_error(e.to_string()))?;
    reader.page_count().map_err(|e| pdf_error(e.to_string()))
}

/// Pages captured as additional snapshots, in ascending order
pub fn select_pages(page_count: u32, include: &[u32], exclude: &[u32]) -> Vec<u32> {
    (2..=page_count)
        .filter(|page| include.is_empty() || include.contains(page))
        .filter(|page| !exclude.contains(page))
        .collect()
}

/// Render a selection including the base page, e.g. `[1,2,5]`
pub fn describe_selection(pages: &[u32]) -> String {
    let listed = std::iter::once(1)
        .chain(pages.iter().copied())
        .map(|page| page.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("[{listed}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pages_after_the_first() {
        assert_eq!(select_pages(5, &[], &[]), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_single_and_empty_documents() {
        assert!(select_pages(1, &[], &[]).is_empty());
        assert!(select_pages(0, &[], &[]).is_empty());
    }

    #[test]
    fn test_include_pages() {
        assert_eq!(select_pages(10, &[9, 3, 3, 42], &[]), vec![3, 9]);
    }

    #[test]
    fn test_exclude_pages() {
        assert_eq!(select_pages(6, &[], &[2, 5]), vec![3, 4, 6]);
    }

    #[test]
    fn test_include_then_exclude() {
        assert_eq!(select_pages(8, &[2, 4, 6], &[4]), vec![2, 6]);
    }

    #[test]
    fn test_page_one_cannot_be_included() {
        assert!(select_pages(3, &[1], &[]).is_empty());
    }

    #[test]
    fn test_filters() {
        assert!(PageFilters::default().is_empty());
        let filters = PageFilters::new(vec![], vec![3]);
        assert!(!filters.is_empty());
        assert_eq!(filters.select(4), vec![2, 4]);
    }

    #[test]
    fn test_describe_selection() {
        assert_eq!(describe_selection(&[2, 3, 7]), "[1,2,3,7]");
        assert_eq!(describe_selection(&[]), "[1]");
    }

    #[test]
    fn test_count_pages_missing_file() {
        let err = count_pages("does/not/exist.pdf").unwrap_err();
        match err {
            SnapshotError::Pdf { path, .. } => {
                assert_eq!(path, Path::new("does/not/exist.pdf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
