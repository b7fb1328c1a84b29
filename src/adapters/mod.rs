//! Adapters layer: Concrete implementations of ports.
//!
//! - `csv_dataset`: loads the labeled table with the `csv` crate
//! - `forest`: seeded random forest behind [`crate::ports::Trainer`]
//! - `speech`: external recognizer/synthesizer programs
//! - `sanitize`: health-measurement filtering for logs

pub mod csv_dataset;
pub mod forest;
pub mod sanitize;
pub mod speech;
