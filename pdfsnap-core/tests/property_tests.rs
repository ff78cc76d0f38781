//! Property-based tests for page selection and viewer scripts

use pdfsnap::pages::{describe_selection, select_pages};
use pdfsnap::snapshot::script::advance_scripts;
use proptest::prelude::*;

proptest! {
    #[test]
    fn selection_is_sorted_unique_and_in_range(
        page_count in 0u32..200,
        include in prop::collection::vec(0u32..250, 0..20),
        exclude in prop::collection::vec(0u32..250, 0..20),
    ) {
        let pages = select_pages(page_count, &include, &exclude);

        prop_assert!(pages.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(pages.iter().all(|p| (2..=page_count).contains(p)));
        prop_assert!(pages.iter().all(|p| !exclude.contains(p)));
        if !include.is_empty() {
            prop_assert!(pages.iter().all(|p| include.contains(p)));
        }
    }

    #[test]
    fn unfiltered_selection_covers_every_page_after_the_first(page_count in 0u32..500) {
        let pages = select_pages(page_count, &[], &[]);
        prop_assert_eq!(pages.len() as u32, page_count.saturating_sub(1));
    }

    #[test]
    fn include_and_exclude_are_order_insensitive(
        page_count in 0u32..100,
        mut include in prop::collection::vec(0u32..120, 0..10),
        mut exclude in prop::collection::vec(0u32..120, 0..10),
    ) {
        let original = select_pages(page_count, &include, &exclude);
        include.reverse();
        exclude.reverse();
        prop_assert_eq!(original, select_pages(page_count, &include, &exclude));
    }

    #[test]
    fn description_always_starts_with_page_one(
        pages in prop::collection::btree_set(2u32..1000, 0..30),
    ) {
        let pages: Vec<u32> = pages.into_iter().collect();
        let description = describe_selection(&pages);
        prop_assert!(description.starts_with("[1"));
        prop_assert!(description.ends_with(']'));
        prop_assert_eq!(description.matches(',').count(), pages.len());
    }

    #[test]
    fn scripts_advance_from_the_previous_page(
        pages in prop::collection::btree_set(2u32..1000, 1..30),
    ) {
        let pages: Vec<u32> = pages.into_iter().collect();
        let scripts = advance_scripts(&pages);
        prop_assert_eq!(scripts.len(), pages.len());

        let mut previous = 1;
        for (script, page) in scripts.iter().zip(&pages) {
            let expected = format!(
                "let nextIndex = {page};\nfor(currentIndex = {previous};"
            );
            prop_assert!(script.starts_with(&expected));
            previous = *page;
        }
    }
}
