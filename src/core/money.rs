//! Read-only bills and subscriptions.

use serde::{Deserialize, Serialize};

/// Whether a payment is a bill or a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoneyType {
    Bill,
    Subscription,
}

impl MoneyType {
    pub const ALL: [&'static str; 2] = ["bill", "subscription"];
}

/// How often a payment repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cadence {
    Monthly,
    Yearly,
    OneTime,
}

impl Cadence {
    pub const ALL: [&'static str; 3] = ["monthly", "yearly", "one-time"];
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
            Self::OneTime => write!(f, "one-time"),
        }
    }
}

/// An upcoming payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MoneyType,
    /// `YYYY-MM-DD`.
    pub due_date: String,
    #[serde(serialize_with = "serialize_amount")]
    pub amount_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<Cadence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Whole amounts go on the wire as integers (`70`, not `70.0`).
#[allow(clippy::trivially_copy_pass_by_ref, clippy::cast_possible_truncation)]
fn serialize_amount<S: serde::Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if amount.fract() == 0.0 && amount.abs() < MAX_EXACT {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

impl MoneyItem {
    fn monthly(id: &str, name: &str, kind: MoneyType, due_date: &str, amount_usd: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            due_date: due_date.to_string(),
            amount_usd,
            cadence: Some(Cadence::Monthly),
            note: None,
        }
    }
}

/// The demo payments, in fixture order.
#[must_use]
pub fn demo_money_items() -> Vec<MoneyItem> {
    vec![
        MoneyItem::monthly("m1", "Internet", MoneyType::Bill, "2026-02-07", 70.0),
        MoneyItem {
            note: Some("Trial ends soon".to_string()),
            ..MoneyItem::monthly("m2", "Netflix", MoneyType::Subscription, "2026-02-09", 15.49)
        },
        MoneyItem::monthly("m3", "Car insurance", MoneyType::Bill, "2026-02-14", 210.0),
        MoneyItem::monthly("m4", "Gym membership", MoneyType::Subscription, "2026-02-16", 35.0),
        MoneyItem {
            cadence: Some(Cadence::Yearly),
            ..MoneyItem::monthly(
                "m5",
                "Domain renewal",
                MoneyType::Subscription,
                "2026-02-20",
                12.0,
            )
        },
    ]
}

/// Sum of all amounts.
#[must_use]
pub fn total_usd(items: &[MoneyItem]) -> f64 {
    items.iter().map(|i| i.amount_usd).sum()
}

/// `$70` for whole amounts, `$15.49` otherwise.
#[must_use]
pub fn format_usd(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("${amount:.0}")
    } else {
        format!("${amount:.2}")
    }
}
