//! ClearPlate - agent-driven weekly focus dashboard.
//!
//! This library provides:
//! - A catalog of tools and components registered with [`capability_core`]
//! - A persisted focus-item store
//! - CLI command parsing and an HTTP API for the agent runtime
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐        ┌─────────────┐
//! │     CLI     │        │   HTTP API  │
//! └──────┬──────┘        └──────┬──────┘
//!        └──────────┬───────────┘
//!            ┌──────┴──────┐
//!            │  Dashboard  │
//!            └──────┬──────┘
//!        ┌──────────┴───────────┐
//! ┌──────┴──────┐        ┌──────┴──────┐
//! │ Dispatcher  │        │ FocusStore  │
//! └─────────────┘        └─────────────┘
//! ```

pub mod api;
pub mod build_info;
pub mod cli;
pub mod config;
pub mod core;

pub use config::Config;
pub use core::Dashboard;
