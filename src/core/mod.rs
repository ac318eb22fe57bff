//! Core business logic shared by the CLI and the HTTP API.

pub mod catalog;
mod dashboard;
pub mod deadline;
mod error;
pub mod focus;
pub mod money;
pub mod storage;

pub use dashboard::Dashboard;
pub use error::{Error, Result};
