//! Check-in orchestration on top of a [`SessionApi`](crate::traits::SessionApi).

pub mod orchestrator;

pub use orchestrator::{CheckInOrchestrator, CheckInOutcome};
