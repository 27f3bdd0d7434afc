//! Chore assignment.
//!
//! [`AssignmentEngine`] places a day's chore instances greedily by
//! effective load and then narrows the gap between the most- and
//! least-loaded members with bounded local repair.

mod engine;
mod result;
pub mod scoring;

pub use engine::{AssignmentEngine, EngineConfig};
pub use result::{Assignment, AssignmentResult, RepairSummary};
