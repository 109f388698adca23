//! Human-readable summary renderer for change lists.

use crate::diff::stats::compute_stats;
use crate::model::{Change, ChangeType};
use serde_json::Value;

/// Longest rendered value before truncation
const MAX_VALUE_CHARS: usize = 60;

/// Render a Markdown/text summary of a change list
///
/// Informational only; intended for history displays and CLI output.
pub fn render_change_summary(changes: &[Change]) -> String {
    let mut out = String::new();

    out.push_str("## Changes\n\n");

    if changes.is_empty() {
        out.push_str("_No changes._\n");
        return out;
    }

    let stats = compute_stats(changes);
    out.push_str(&format!(
        "**Added**: {}  \n**Modified**: {}  \n**Deleted**: {}  \n**Paths**: {}\n\n",
        stats.additions, stats.modifications, stats.deletions, stats.paths_changed
    ));

    for section in ["steps", "variables", "metadata", "assets"] {
        let in_section: Vec<&Change> = changes
            .iter()
            .filter(|c| c.path.split('.').next() == Some(section))
            .collect();
        if in_section.is_empty() {
            continue;
        }
        out.push_str(&format!("### {}\n\n", section));
        for change in in_section {
            out.push_str(&render_line(change));
        }
        out.push('\n');
    }

    let other: Vec<&Change> = changes
        .iter()
        .filter(|c| {
            !matches!(
                c.path.split('.').next(),
                Some("steps" | "variables" | "metadata" | "assets")
            )
        })
        .collect();
    if !other.is_empty() {
        out.push_str("### other\n\n");
        for change in other {
            out.push_str(&render_line(change));
        }
        out.push('\n');
    }

    out
}

fn render_line(change: &Change) -> String {
    match change.change_type {
        ChangeType::Add => format!(
            "- `+` `{}` = {}\n",
            change.path,
            short(change.new_value.as_ref())
        ),
        ChangeType::Delete => format!(
            "- `-` `{}` (was {})\n",
            change.path,
            short(change.old_value.as_ref())
        ),
        ChangeType::Modify => format!(
            "- `~` `{}`: {} → {}\n",
            change.path,
            short(change.old_value.as_ref()),
            short(change.new_value.as_ref())
        ),
        ChangeType::Rename => format!("- `>` `{}`\n", change.path),
    }
}

fn short(value: Option<&Value>) -> String {
    let rendered = match value {
        Some(v) => v.to_string(),
        None => "∅".to_string(),
    };
    if rendered.chars().count() > MAX_VALUE_CHARS {
        let truncated: String = rendered.chars().take(MAX_VALUE_CHARS).collect();
        format!("{}…", truncated)
    } else {
        rendered
    }
}
