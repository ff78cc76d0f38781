//! Viewer navigation scripts
//!
//! The viewer renders pages as children of `div#viewer`. Removing the first
//! child and scrolling the next one into view makes the following page the
//! one captured by the next snapshot. When a single child is left the viewer
//! is asked for the next page instead.

/// Selector that matches once the current page is rendered
pub const WAIT_FOR_SELECTOR: &str = "div#viewer > div.page[data-loaded]";

/// Name of the shared script in the `references` section
pub const RESTORE_PAGE_STATE_NAME: &str = "restore-page-state";

/// Advances the viewer by exactly one page
pub const RESTORE_PAGE_STATE: &str = "document.querySelector('div#viewer').children.item(0).remove();
document.querySelector('div#viewer').children.length == 1
  ? document.querySelector('button#next').click()
  : document
      .querySelector('div#viewer')
      .children.item(1)
      .scrollIntoView();
document
  .querySelector('div#viewer')
  .children.item(0)
  .scrollIntoView();
";

const SCROLL_TO_NEXT: &str = "document.querySelector('div#viewer').children.length == 1
  ? document.querySelector('button#next').click()
  : document
      .querySelector('div#viewer')
      .children.item(1)
      .scrollIntoView();
document
  .querySelector('div#viewer')
  .children.item(0)
  .scrollIntoView();
";

/// Advances the viewer from page `current` to page `next`
pub fn advance_script(current: u32, next: u32) -> String {
    format!(
        "let nextIndex = {next};
for(currentIndex = {current};currentIndex < nextIndex; currentIndex++)
{{
document.querySelector('div#viewer').children.item(0).remove();
}}
{SCROLL_TO_NEXT}"
    )
}

/// Scripts for each selected page, each starting where the previous one stopped
pub fn advance_scripts(pages: &[u32]) -> Vec<String> {
    let mut current = 1;
    pages
        .iter()
        .map(|&next| {
            let script = advance_script(current, next);
            current = next;
            script
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_script_shares_the_scroll_tail() {
        assert!(RESTORE_PAGE_STATE.ends_with(SCROLL_TO_NEXT));
        assert!(RESTORE_PAGE_STATE.starts_with(
            "document.querySelector('div#viewer').children.item(0).remove();\n"
        ));
    }

    #[test]
    fn test_advance_script() {
        let script = advance_script(3, 7);
        assert!(script.starts_with("let nextIndex = 7;\nfor(currentIndex = 3;currentIndex < nextIndex; currentIndex++)\n{\n"));
        assert!(script.ends_with(SCROLL_TO_NEXT));
        assert_eq!(script.matches(".remove();").count(), 1);
    }

    #[test]
    fn test_advance_scripts_chain_from_page_one() {
        let scripts = advance_scripts(&[2, 5, 6]);
        assert_eq!(scripts.len(), 3);
        assert!(scripts[0].contains("nextIndex = 2;\nfor(currentIndex = 1;"));
        assert!(scripts[1].contains("nextIndex = 5;\nfor(currentIndex = 2;"));
        assert!(scripts[2].contains("nextIndex = 6;\nfor(currentIndex = 5;"));
    }
}
