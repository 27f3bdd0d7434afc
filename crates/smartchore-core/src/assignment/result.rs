//! Assignment run output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::advisor::Advisory;
use crate::catalog::ChoreInstance;
use crate::fairness::FairnessScore;
use crate::household::{DisplayName, SkillCategory, TimeSlot};
use crate::workload::WorkloadRecord;

/// One chore instance placed with one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub instance_id: String,
    pub chore_id: String,
    pub chore_name: String,
    pub category: String,
    pub skill: SkillCategory,
    pub duration_minutes: u32,
    pub difficulty: u8,
    pub time_slot: TimeSlot,
    pub member_id: String,
    pub member_name: DisplayName,
    /// Member's skill score for the chore (see [`super::scoring::skill_score`]).
    pub skill_score: f64,
    /// Effective load when the member was chosen.
    pub effective_load: f64,
    pub reason: String,
    /// The instance already had a different assignee, which was replaced.
    pub reassigned: bool,
    pub previous_assignee: Option<String>,
    /// Moved by local repair after the greedy pass.
    pub repaired: bool,
    /// Completed instances keep their existing assignee.
    #[serde(default)]
    pub completed: bool,
}

impl Assignment {
    /// The instance with this assignment applied.
    pub fn apply_to(&self, chore: &ChoreInstance) -> ChoreInstance {
        let mut updated = chore.clone();
        updated.assign(self.member_id.clone());
        updated
    }
}

/// What local repair did after the greedy pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairSummary {
    pub iterations: u32,
    pub moves: u32,
    pub gap_before: u32,
    pub gap_after: u32,
}

/// Immutable outcome of one assignment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub date: NaiveDate,
    /// In input chore order.
    pub assignments: Vec<Assignment>,
    /// In roster order.
    pub workloads: Vec<WorkloadRecord>,
    pub fairness: FairnessScore,
    #[serde(default)]
    pub advisories: Vec<Advisory>,
    pub availability_rate: f64,
    pub repair: RepairSummary,
}

impl AssignmentResult {
    /// Replace the advisory list.
    pub fn with_advisories(mut self, advisories: Vec<Advisory>) -> Self {
        self.advisories = advisories;
        self
    }

    pub fn assignment_for(&self, instance_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.instance_id == instance_id)
    }

    pub fn assignee_of(&self, instance_id: &str) -> Option<&str> {
        self.assignment_for(instance_id).map(|a| a.member_id.as_str())
    }

    pub fn assignments_for_member<'a>(
        &'a self,
        member_id: &'a str,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments.iter().filter(move |a| a.member_id == member_id)
    }

    pub fn workload_of(&self, member_id: &str) -> Option<&WorkloadRecord> {
        self.workloads.iter().find(|w| w.member_id == member_id)
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
