//! Read-only deadline records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How much trouble missing a deadline causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [&'static str; 3] = ["low", "medium", "high"];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Something due on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Deadline {
    fn new(id: &str, title: &str, date: &str, severity: Severity) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            severity: Some(severity),
        }
    }
}

/// The demo deadlines, in fixture order.
#[must_use]
pub fn demo_deadlines() -> Vec<Deadline> {
    vec![
        Deadline::new("d1", "Pay internet bill", "2026-02-07", Severity::High),
        Deadline::new("d2", "Cancel trial subscription", "2026-02-09", Severity::Medium),
        Deadline::new("d3", "Car insurance renewal", "2026-02-14", Severity::High),
        Deadline::new(
            "d4",
            "Submit apartment maintenance request",
            "2026-02-12",
            Severity::Low,
        ),
    ]
}

/// Format a `YYYY-MM-DD` date as `Feb 7`. Unparseable input is returned as is.
#[must_use]
pub fn format_short_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_or_else(|_| date.to_string(), |d| d.format("%b %-d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_ids_are_unique() {
        let deadlines = demo_deadlines();
        let mut ids: Vec<&str> = deadlines.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), deadlines.len());
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_value(&demo_deadlines()[1]).unwrap();
        assert_eq!(json["severity"], "medium");
    }

    #[test]
    fn missing_severity_is_omitted() {
        let deadline = Deadline {
            severity: None,
            ..demo_deadlines()[0].clone()
        };
        let json = serde_json::to_value(&deadline).unwrap();
        assert!(json.get("severity").is_none());
    }

    #[test]
    fn short_date_format() {
        assert_eq!(format_short_date("2026-02-07"), "Feb 7");
        assert_eq!(format_short_date("2026-12-25"), "Dec 25");
        assert_eq!(format_short_date("soon"), "soon");
    }
}
