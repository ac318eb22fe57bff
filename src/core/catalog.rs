//! The dashboard's tools and components.

use std::sync::Arc;

use capability_core::{
    CapabilityDescriptor, CapabilityRegistry, Field, RegistryError, Schema, ToolError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::deadline::{Severity, demo_deadlines};
use super::focus::{Bucket, FocusPatch, FocusStore, StoreError};
use super::money::{Cadence, MoneyType, demo_money_items};

pub const GET_DEADLINES: &str = "get-deadlines";
pub const GET_FOCUS_ITEMS: &str = "get-focus-items";
pub const UPDATE_FOCUS_ITEM: &str = "update-focus-item";
pub const GET_MONEY_ITEMS: &str = "get-money-items";

pub const DEADLINE_TIMELINE: &str = "DeadlineTimeline";
pub const WEEKLY_FOCUS_BOARD: &str = "WeeklyFocusBoard";
pub const RISK_ALERT_PANEL: &str = "RiskAlertPanel";
pub const MONEY_SNAPSHOT: &str = "MoneySnapshot";

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::ConstraintViolation { .. } => Self::Constraint(message),
            _ => Self::Failed(message),
        }
    }
}

fn deadline_schema() -> Schema {
    Schema::object([
        Field::required("id", Schema::String),
        Field::required("title", Schema::String),
        Field::required("date", Schema::String),
        Field::optional("severity", Schema::enumeration(Severity::ALL)),
    ])
}

fn focus_item_schema() -> Schema {
    Schema::object([
        Field::required("id", Schema::String),
        Field::required("title", Schema::String),
        Field::required("bucket", Schema::enumeration(Bucket::ALL)),
        Field::optional("done", Schema::Boolean),
    ])
}

fn money_item_schema() -> Schema {
    Schema::object([
        Field::required("id", Schema::String),
        Field::required("name", Schema::String),
        Field::required("type", Schema::enumeration(MoneyType::ALL)),
        Field::required("dueDate", Schema::String).describe("YYYY-MM-DD"),
        Field::required("amountUsd", Schema::Number),
        Field::optional("cadence", Schema::enumeration(Cadence::ALL)),
        Field::optional("note", Schema::String),
    ])
}

fn risk_schema() -> Schema {
    Schema::object([
        Field::required("id", Schema::String),
        Field::required("title", Schema::String),
        Field::required("reason", Schema::String),
    ])
}

fn to_output<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Failed(e.to_string()))
}

/// Arguments of `update-focus-item`, after schema validation.
#[derive(Debug, Deserialize)]
struct UpdateFocusArgs {
    id: String,
    #[serde(flatten)]
    patch: FocusPatch,
}

fn tools(store: &Arc<FocusStore>) -> Vec<CapabilityDescriptor> {
    let read_store = Arc::clone(store);
    let write_store = Arc::clone(store);

    vec![
        CapabilityDescriptor::tool(
            GET_DEADLINES,
            "Returns a list of upcoming deadlines the user is tracking. Use this before rendering deadline timelines or answering questions about what is due soon.",
            Schema::empty_object(),
            Schema::array(deadline_schema()),
            |_args: Value| to_output(&demo_deadlines()),
        ),
        CapabilityDescriptor::tool(
            GET_FOCUS_ITEMS,
            "Returns the user's weekly focus items split into this week and next week. Use this before rendering a weekly focus board or answering what to focus on.",
            Schema::empty_object(),
            Schema::array(focus_item_schema()),
            move |_args: Value| to_output(&read_store.load_all()),
        ),
        CapabilityDescriptor::tool(
            UPDATE_FOCUS_ITEM,
            "Use get-focus-items to find the correct item id from title before updating.",
            Schema::object([
                Field::required("id", Schema::String)
                    .describe("The id of the focus item to update"),
                Field::optional("bucket", Schema::enumeration(Bucket::ALL))
                    .describe("Move item to thisWeek or nextWeek"),
                Field::optional("done", Schema::Boolean).describe("Mark item done or not done"),
                Field::optional("title", Schema::String).describe("Rename the item title"),
            ]),
            Schema::array(focus_item_schema()),
            move |args: Value| -> Result<Value, ToolError> {
                let args: UpdateFocusArgs = serde_json::from_value(args)?;
                let items = write_store.update_by_id(&args.id, &args.patch)?;
                to_output(&items)
            },
        ),
        CapabilityDescriptor::tool(
            GET_MONEY_ITEMS,
            "Returns upcoming bills and subscriptions with due dates and amounts. Use this before rendering a money snapshot or answering what payments are coming up.",
            Schema::empty_object(),
            Schema::array(money_item_schema()),
            |_args: Value| to_output(&demo_money_items()),
        ),
    ]
}

fn components() -> Vec<CapabilityDescriptor> {
    vec![
        CapabilityDescriptor::component(
            DEADLINE_TIMELINE,
            "Shows upcoming deadlines in a timeline. Use when the user asks about deadlines, what's due, upcoming dates, next two weeks, or this month.",
            Schema::object([
                Field::optional("title", Schema::String),
                Field::optional("rangeLabel", Schema::String),
                Field::optional("deadlines", Schema::array(deadline_schema())),
            ]),
            "deadline-timeline",
        ),
        CapabilityDescriptor::component(
            WEEKLY_FOCUS_BOARD,
            "Shows a weekly focus board with two columns: This Week and Next Week. Always call `get-focus-items` before rendering. Use when user asks what to focus on this week, plan the week, prioritize tasks, or move items between weeks.",
            Schema::object([
                Field::optional("weekLabel", Schema::String),
                Field::optional("items", Schema::array(focus_item_schema())),
            ]),
            "weekly-focus-board",
        ),
        CapabilityDescriptor::component(
            RISK_ALERT_PANEL,
            "Highlights overdue or high-risk items. Use when the user asks what they are missing, what could cause trouble, overdue tasks, or risks this week or month. Call get-deadlines and get-focus-items to identify risks.",
            Schema::object([
                Field::optional("title", Schema::String),
                Field::optional("risks", Schema::array(risk_schema())),
            ]),
            "risk-alert-panel",
        ),
        CapabilityDescriptor::component(
            MONEY_SNAPSHOT,
            "Shows upcoming bills and subscriptions with the total due. Call get-money-items before rendering. Use when the user asks about money, bills, subscriptions, or upcoming payments.",
            Schema::object([
                Field::optional("title", Schema::String),
                Field::optional("rangeLabel", Schema::String),
                Field::optional("totalUsd", Schema::Number),
                Field::optional("items", Schema::array(money_item_schema())),
            ]),
            "money-snapshot",
        ),
    ]
}

/// Build the registry of every tool and component, backed by `store`.
///
/// # Errors
///
/// Returns an error if two capabilities share a name.
pub fn build_registry(store: &Arc<FocusStore>) -> Result<CapabilityRegistry, RegistryError> {
    let mut registry = CapabilityRegistry::new();
    for descriptor in tools(store).into_iter().chain(components()) {
        registry.register(descriptor)?;
    }
    Ok(registry)
}
