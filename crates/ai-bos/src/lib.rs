//! Client-side core of the AI-BOS penalty dashboard: the service client,
//! bounded calculation history, view state, and the actions tying them
//! together.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod form;
pub mod format;
pub mod history;
pub mod notice;
pub mod share;
pub mod storage;
pub mod telemetry;
pub mod ui;

pub use dashboard::{Dashboard, DashboardError};
