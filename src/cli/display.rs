//! Plain-text views printed by the CLI.

use std::fmt::Write as _;

use capability_core::CapabilityDefinition;

use crate::core::deadline::{Deadline, format_short_date};
use crate::core::focus::{Bucket, FocusBoard, FocusItem};
use crate::core::money::{MoneyItem, MoneyType, format_usd, total_usd};

fn checkbox(item: &FocusItem) -> &'static str {
    if item.done { "[x]" } else { "[ ]" }
}

/// Two-column weekly board, one column after the other.
#[must_use]
pub fn board(items: &[FocusItem], week_label: &str) -> String {
    let board = FocusBoard::from_items(items);
    let mut out = format!("Weekly Focus Board\n{week_label}\n");

    for bucket in [Bucket::ThisWeek, Bucket::NextWeek] {
        let _ = write!(out, "\n{}\n", bucket.label());
        let column = board.column(bucket);
        if column.is_empty() {
            let _ = writeln!(out, "  No items for {}.", bucket.label().to_lowercase());
        }
        for item in column {
            let _ = writeln!(out, "  {} {:<40} {}", checkbox(item), item.title, item.id);
        }
    }

    out
}

/// Focus items as a table.
#[must_use]
pub fn focus_table(items: &[FocusItem]) -> String {
    let mut out = format!("{:<6} {:<10} {:<6} Title\n", "ID", "Bucket", "Done");
    out.push_str(&"-".repeat(60));
    out.push('\n');
    for item in items {
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:<6} {}",
            item.id,
            item.bucket.to_string(),
            if item.done { "yes" } else { "no" },
            item.title
        );
    }
    out
}

/// Deadlines sorted by date.
#[must_use]
pub fn deadlines(deadlines: &[Deadline]) -> String {
    if deadlines.is_empty() {
        return "No deadlines found.\n".to_string();
    }

    let mut sorted: Vec<&Deadline> = deadlines.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut out = String::from("Upcoming Deadlines\n");
    for deadline in sorted {
        let severity = deadline
            .severity
            .map_or(String::new(), |s| format!(" [{s}]"));
        let _ = writeln!(
            out,
            "  {:<8} {}{} ({})",
            format_short_date(&deadline.date),
            deadline.title,
            severity,
            deadline.id
        );
    }
    out
}

/// Payments with the total due.
#[must_use]
pub fn money(items: &[MoneyItem]) -> String {
    let mut out = format!("Money Snapshot\nTotal due: {}\n", format_usd(total_usd(items)));
    if items.is_empty() {
        out.push_str("No upcoming payments found.\n");
        return out;
    }

    for item in items {
        let kind = match item.kind {
            MoneyType::Bill => "Bill",
            MoneyType::Subscription => "Subscription",
        };
        let mut details = format!("Due {}", format_short_date(&item.due_date));
        if let Some(cadence) = item.cadence {
            let _ = write!(details, " • {cadence}");
        }
        if let Some(note) = &item.note {
            let _ = write!(details, " • {note}");
        }
        let _ = writeln!(
            out,
            "  {:<12} {:<16} {:>8}  {} ({})",
            kind,
            item.name,
            format_usd(item.amount_usd),
            details,
            item.id
        );
    }
    out
}

/// Capability names, kinds and descriptions.
#[must_use]
pub fn capabilities(definitions: &[CapabilityDefinition]) -> String {
    let mut out = format!("{:<20} {:<10} Description\n", "Name", "Kind");
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for def in definitions {
        let description: String = def.description.chars().take(48).collect();
        let _ = writeln!(out, "{:<20} {:<10} {}", def.name, def.kind, description);
    }
    out
}
