//! # SmartChore Core Library
//!
//! This library provides the core logic for SmartChore, a household chore
//! assignment and fairness engine. It follows a CLI-first design: every
//! operation is available through the standalone `smartchore` binary, which
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Catalog**: chore definitions and their daily/weekly/monthly cadence
//! - **Availability**: who is home on a day and how much of each slot they have
//! - **Assignment**: greedy placement by skill and effective load, followed by
//!   local repair of the minute gap
//! - **Fairness**: coefficient-of-variation scoring with a narrative
//! - **Advisor**: rule-based advisories, optionally extended by a text
//!   generator under a strict timeout
//! - **Storage**: SQLite roster/run persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`AssignmentEngine`]: pure assignment core
//! - [`FairnessScorer`]: workload distribution scoring
//! - [`Advisor`]: advisory generation
//! - [`DailyPlanner`]: instantiate, assign, advise and persist one day
//! - [`SqliteStore`]: the default [`Store`]

pub mod advisor;
pub mod assignment;
pub mod availability;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod fairness;
pub mod household;
pub mod intake;
pub mod planner;
pub mod storage;
pub mod workload;

pub use advisor::{Advisor, AdvisorConfig, Advisory, HttpTextAdvisor, Severity, TextAdvisor};
pub use assignment::{Assignment, AssignmentEngine, AssignmentResult, EngineConfig, RepairSummary};
pub use availability::{AvailabilityModel, AvailabilitySnapshot, OutOfHomeEvent};
pub use catalog::{
    Cadence, CadenceConfig, ChoreCatalog, ChoreDefinition, ChoreInstance, ChoreStatus,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AdvisorError, ConfigError, CoreError, StoreError, ValidationError};
pub use fairness::{FairnessBand, FairnessScore, FairnessScorer, WorkloadLevel};
pub use household::{AvailabilityGrid, DisplayName, Member, Preferences, SkillCategory, TimeSlot};
pub use planner::DailyPlanner;
pub use storage::{Config, RunRecord, SqliteStore, Store};
pub use workload::{WorkloadRecord, WorkloadTracker};
