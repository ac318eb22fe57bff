//! Weekly focus items.

mod store;

use serde::{Deserialize, Serialize};

pub use store::{FOCUS_ITEMS_KEY, FocusStore, StoreError};

/// Which week a focus item is planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    ThisWeek,
    NextWeek,
}

impl Bucket {
    /// Wire names, in display order.
    pub const ALL: [&'static str; 2] = ["thisWeek", "nextWeek"];

    /// Column heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ThisWeek => "This Week",
            Self::NextWeek => "Next Week",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThisWeek => write!(f, "thisWeek"),
            Self::NextWeek => write!(f, "nextWeek"),
        }
    }
}

impl std::str::FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thisWeek" | "this-week" | "this" => Ok(Self::ThisWeek),
            "nextWeek" | "next-week" | "next" => Ok(Self::NextWeek),
            other => Err(format!("unknown bucket: {other} (expected thisWeek or nextWeek)")),
        }
    }
}

/// A to-do-like record with a week bucket and done flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusItem {
    pub id: String,
    pub title: String,
    pub bucket: Bucket,
    #[serde(default)]
    pub done: bool,
}

impl FocusItem {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, bucket: Bucket) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            bucket,
            done: false,
        }
    }
}

/// Partial update: only the fields present are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl FocusPatch {
    /// Merge into `item`, leaving absent fields unchanged.
    pub fn apply(&self, item: &mut FocusItem) {
        if let Some(bucket) = self.bucket {
            item.bucket = bucket;
        }
        if let Some(done) = self.done {
            item.done = done;
        }
        if let Some(title) = &self.title {
            item.title.clone_from(title);
        }
    }
}

/// The seed collection used on first access and on reset.
#[must_use]
pub fn default_focus_items() -> Vec<FocusItem> {
    vec![
        FocusItem::new("f1", "Write a blog post", Bucket::ThisWeek),
        FocusItem::new("f2", "Meal prep for 3 days", Bucket::ThisWeek),
        FocusItem::new("f3", "Cancel trial subscription", Bucket::ThisWeek),
        FocusItem::new("f4", "Clean up resumes / apply to 5 roles", Bucket::NextWeek),
        FocusItem::new("f5", "Plan weekend errands", Bucket::NextWeek),
    ]
}

/// Two-column view of a focus collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusBoard {
    pub this_week: Vec<FocusItem>,
    pub next_week: Vec<FocusItem>,
}

impl FocusBoard {
    /// Split `items` by bucket, preserving order within each column.
    #[must_use]
    pub fn from_items(items: &[FocusItem]) -> Self {
        let (this_week, next_week) = items
            .iter()
            .cloned()
            .partition(|item| item.bucket == Bucket::ThisWeek);
        Self {
            this_week,
            next_week,
        }
    }

    /// Items of one column.
    #[must_use]
    pub fn column(&self, bucket: Bucket) -> &[FocusItem] {
        match bucket {
            Bucket::ThisWeek => &self.this_week,
            Bucket::NextWeek => &self.next_week,
        }
    }
}
