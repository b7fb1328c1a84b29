//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the checkup workflow and the voice command session.

mod checkup;
mod session;

pub use checkup::{CheckupService, Stage};
pub use session::{Session, VoiceOutcome, VoiceResponse};
