//! Dated chore instances.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::household::{SkillCategory, TimeSlot};

/// Status of a chore instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChoreStatus {
    #[default]
    Pending,
    Completed,
}

impl ChoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A catalog chore instantiated for a specific date.
///
/// Holds at most one assignee; [`ChoreInstance::assign`] replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreInstance {
    pub id: String,
    pub chore_id: String,
    pub name: String,
    pub category: String,
    pub skill: SkillCategory,
    pub duration_minutes: u32,
    pub difficulty: u8,
    #[serde(default)]
    pub time_slot: TimeSlot,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: ChoreStatus,
    #[serde(default)]
    pub assignee: Option<String>,
}

impl ChoreInstance {
    /// Weighted priority used to order placement: heaviest and hardest first.
    pub fn priority(&self) -> u64 {
        u64::from(self.difficulty) * u64::from(self.duration_minutes)
    }

    pub fn is_completed(&self) -> bool {
        self.status == ChoreStatus::Completed
    }

    /// Set the assignee, returning the previous one if it was different.
    pub fn assign(&mut self, member_id: impl Into<String>) -> Option<String> {
        let member_id = member_id.into();
        match self.assignee.replace(member_id.clone()) {
            Some(previous) if previous != member_id => Some(previous),
            _ => None,
        }
    }

    pub fn unassign(&mut self) -> Option<String> {
        self.assignee.take()
    }
}
