//! YAML rendering of snapshot configurations
//!
//! `serde_yaml` cannot emit anchors, so the shared script is serialized as a
//! placeholder and spliced back in as a literal block carrying the
//! `&restore-page-state` anchor. References to it become bare
//! `*restore-page-state` aliases.

use super::config::{SnapshotConfig, RESTORE_PAGE_STATE_ALIAS};
use super::script::RESTORE_PAGE_STATE_NAME;
use crate::error::Result;

const SCRIPT_PLACEHOLDER: &str = "PDFSNAP_RESTORE_PAGE_STATE_SCRIPT";

/// Render a configuration as the YAML document read by the snapshot service
pub fn render_yaml(config: &SnapshotConfig) -> Result<String> {
    let mut shadow = config.clone();
    let script = std::mem::replace(
        &mut shadow.references.restore_page_state,
        SCRIPT_PLACEHOLDER.to_string(),
    );
    let yaml = serde_yaml::to_string(&shadow)?;

    let anchor_line = format!("{RESTORE_PAGE_STATE_NAME}: {SCRIPT_PLACEHOLDER}");
    let quoted_aliases = [
        format!("execute: '{RESTORE_PAGE_STATE_ALIAS}'"),
        format!("execute: \"{RESTORE_PAGE_STATE_ALIAS}\""),
    ];
    let bare_alias = format!("execute: {RESTORE_PAGE_STATE_ALIAS}");

    let mut out = String::with_capacity(yaml.len() + script.len() * 2);
    for line in yaml.lines() {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        if trimmed.trim_end() == anchor_line {
            out.push_str(indent);
            out.push_str(RESTORE_PAGE_STATE_NAME);
            out.push_str(": &");
            out.push_str(RESTORE_PAGE_STATE_NAME);
            out.push(' ');
            out.push_str(&literal_block(&script, indent.len() + 2));
            continue;
        }

        match quoted_aliases
            .iter()
            .find(|alias| line.trim_end().ends_with(alias.as_str()))
        {
            Some(alias) => {
                let head = &line.trim_end()[..line.trim_end().len() - alias.len()];
                out.push_str(head);
                out.push_str(&bare_alias);
                out.push('\n');
            }
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    Ok(out)
}

/// A literal block scalar (header line included) indented by `indent` spaces
fn literal_block(text: &str, indent: usize) -> String {
    if text.is_empty() {
        return "''\n".to_string();
    }

    let body = text.trim_end_matches('\n');
    let trailing = text.len() - body.len();
    let chomping = match trailing {
        0 => "-",
        1 => "",
        _ => "+",
    };
    let indicator = if body.starts_with(' ') { "2" } else { "" };

    let pad = " ".repeat(indent);
    let mut block = format!("|{indicator}{chomping}\n");
    for line in body.split('\n') {
        if !line.is_empty() {
            block.push_str(&pad);
            block.push_str(line);
        }
        block.push('\n');
    }
    for _ in 1..trailing {
        block.push('\n');
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RunInfo, Settings};
    use crate::pages::PageFilters;
    use crate::plan::DocumentRun;
    use crate::snapshot::config::Execute;
    use crate::snapshot::script::RESTORE_PAGE_STATE;
    use pretty_assertions::assert_eq;

    fn config(page_count: u32, filters: PageFilters) -> SnapshotConfig {
        let info = RunInfo::from_yaml_str("runMode: create-baseline\nbaselineDir: v1\n").unwrap();
        let settings = Settings::default();
        let run = DocumentRun::new(&info, &settings, "acme", "report.pdf", page_count, filters);
        SnapshotConfig::for_document(&run, &settings)
    }

    #[test]
    fn test_anchor_and_aliases() {
        let yaml = render_yaml(&config(3, PageFilters::default())).unwrap();

        assert!(yaml.contains(
            "  restore-page-state: &restore-page-state |\n    document.querySelector('div#viewer').children.item(0).remove();\n"
        ));
        assert_eq!(yaml.matches("execute: *restore-page-state\n").count(), 2);
        assert!(!yaml.contains(SCRIPT_PLACEHOLDER));
        assert!(!yaml.contains("'*restore-page-state'"));
    }

    #[test]
    fn test_rendered_yaml_resolves_aliases() {
        let original = config(5, PageFilters::default());
        let yaml = render_yaml(&original).unwrap();

        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            value["references"]["restore-page-state"].as_str(),
            Some(RESTORE_PAGE_STATE)
        );
        let execute = &value["snapshots"][0]["additionalSnapshots"][3]["execute"];
        assert_eq!(execute.as_str(), Some(RESTORE_PAGE_STATE));

        let parsed: SnapshotConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_filtered_config_round_trips() {
        let original = config(6, PageFilters::new(vec![2, 4, 6], vec![4]));
        let yaml = render_yaml(&original).unwrap();
        assert!(!yaml.contains("execute: *restore-page-state"));

        let parsed: SnapshotConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, original);
        assert!(matches!(
            parsed.snapshots[0].additional_snapshots[1].execute,
            Execute::Script(_)
        ));
    }

    #[test]
    fn test_literal_block_chomping() {
        assert_eq!(literal_block("a\nb\n", 2), "|\n  a\n  b\n");
        assert_eq!(literal_block("a\n\nb", 4), "|-\n    a\n\n    b\n");
        assert_eq!(literal_block("a\n\n", 2), "|+\n  a\n\n");
        assert_eq!(literal_block(" a\n", 2), "|2\n   a\n");
    }
}
