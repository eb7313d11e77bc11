//! # Restwatch - activity tracking with enforced breaks
//!
//! Measures how long the user has been active at the keyboard and mouse versus
//! inactive, enforces a rest break after a configured amount of active time and
//! exports a report of the session.
//!
//! ## Features
//!
//! - **Activity Tracking**: active/inactive classification against a configurable margin
//! - **Pause Control**: suspend accrual without losing the session
//! - **Mandatory Breaks**: break cycles triggered by accumulated active time
//! - **Session Reports**: compacted state history with totals
//! - **Data Export**: CSV, JSON and Excel report files
//!
//! ## Usage
//!
//! ```rust,no_run
//! use restwatch::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod libs;
