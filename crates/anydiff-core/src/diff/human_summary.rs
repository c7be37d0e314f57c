//! Human-readable summary renderer for difference lists.

use crate::diff::model::{Difference, DifferenceKind};
use std::collections::BTreeMap;

/// Render a Markdown summary of `diffs`.
///
/// The summary is intended for review output. It is informational only and
/// carries nothing the structured list does not.
pub fn render_human_summary(diffs: &[Difference]) -> String {
    let mut out = String::new();

    out.push_str("## Object Diff\n\n");
    out.push_str(&format!("**Differences**: {}\n\n", diffs.len()));

    if diffs.is_empty() {
        out.push_str("_No differences detected._\n");
        return out;
    }

    // Counts per kind, in declaration order of the kinds
    let mut by_kind: BTreeMap<u8, (DifferenceKind, usize)> = BTreeMap::new();
    for diff in diffs {
        by_kind
            .entry(kind_rank(diff.kind))
            .or_insert((diff.kind, 0))
            .1 += 1;
    }
    out.push_str("### By Kind\n\n");
    for (kind, count) in by_kind.values() {
        out.push_str(&format!("- **{}**: {}\n", kind.label(), count));
    }
    out.push('\n');

    out.push_str("### Details\n\n");
    out.push_str("| Path | Kind | Left | Right | Delta | Position |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for diff in diffs {
        let delta = diff.delta.map(|d| d.to_string()).unwrap_or_default();
        let position = match (&diff.array_index, &diff.key) {
            (Some(index), _) => format!("[{}]", index),
            (None, Some(key)) => format!("[{}]", key),
            (None, None) => String::new(),
        };
        out.push_str(&format!(
            "| `{}` | {} | {} | {} | {} | {} |\n",
            diff.path,
            diff.kind.label(),
            cell(&diff.left.to_string()),
            cell(&diff.right.to_string()),
            delta,
            cell(&position),
        ));
    }

    out
}

fn kind_rank(kind: DifferenceKind) -> u8 {
    match kind {
        DifferenceKind::Changed => 0,
        DifferenceKind::NullMismatch => 1,
        DifferenceKind::CountMismatch => 2,
        DifferenceKind::Missing => 3,
        DifferenceKind::Extra => 4,
        DifferenceKind::TypeMismatch => 5,
    }
}

/// Escape table separators in a cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}
