mod config;
pub mod database;
pub mod migrations;

pub use config::{CatalogConfig, Config};
pub use database::{RunSummary, SqliteStore};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::assignment::AssignmentResult;
use crate::availability::OutOfHomeEvent;
use crate::catalog::ChoreInstance;
use crate::error::{ConfigError, StoreError};
use crate::household::Member;

/// A persisted assignment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: uuid::Uuid,
    pub generated_at: DateTime<Utc>,
    pub result: AssignmentResult,
}

impl RunRecord {
    pub fn new(result: AssignmentResult, generated_at: DateTime<Utc>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            generated_at,
            result,
        }
    }
}

/// Persistence seam for the planner.
///
/// The assignment core never touches a store; only [`crate::DailyPlanner`]
/// and the CLI do.
pub trait Store {
    /// All members, normalized, in the order they were added.
    fn load_roster(&self) -> Result<Vec<Member>, StoreError>;

    /// Out-of-home events overlapping `date`.
    fn load_out_of_home(&self, date: NaiveDate) -> Result<Vec<OutOfHomeEvent>, StoreError>;

    /// Chore instances already stored for `date`.
    fn load_instances(&self, date: NaiveDate) -> Result<Vec<ChoreInstance>, StoreError>;

    /// Persist a run and upsert its chore instances with their assignees.
    fn save_assignments(&self, run: &RunRecord) -> Result<(), StoreError>;

    /// Delete a member. Pending instances dated `today` or later lose them
    /// as assignee; earlier history is kept. Returns how many were cleared.
    fn remove_member(&self, member_id: &str, today: NaiveDate) -> Result<usize, StoreError>;
}

/// Returns the smartchore data directory, creating it if needed.
///
/// `SMARTCHORE_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/smartchore[-dev]/`, with `SMARTCHORE_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var("SMARTCHORE_DATA_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("SMARTCHORE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("smartchore-dev")
            } else {
                base_dir.join("smartchore")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
