//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Health data form
//! - Checkup progress
//! - Report (outcome, health tip, model accuracy)
//! - Voice command

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::CheckupTheme;
pub use worker::{CheckupWorker, CheckupWorkerHandle, Job, WorkerProgress};
