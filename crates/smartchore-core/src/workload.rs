//! Per-member running totals for one assignment run.
//!
//! A [`WorkloadTracker`] is created fresh by every call to
//! [`crate::AssignmentEngine::assign`] and dropped (as a snapshot) into the
//! result. Nothing here is shared between runs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::catalog::ChoreInstance;
use crate::household::{DisplayName, Member, TimeSlot};

/// Workload totals for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub member_id: String,
    /// Always resolved; see [`DisplayName`].
    pub display_name: DisplayName,
    pub total_minutes: u32,
    pub task_count: u32,
    pub total_difficulty: u32,
    /// Sum of the member's skill level for every chore they hold.
    pub skill_alignment_total: u32,
    /// Chores already marked completed at the time of the run.
    pub completed_count: u32,
    /// Minutes per preferred slot.
    #[serde(default)]
    pub slot_minutes: BTreeMap<TimeSlot, u32>,
}

impl WorkloadRecord {
    pub fn new(member: &Member) -> Self {
        Self {
            member_id: member.id.clone(),
            display_name: member.name.clone(),
            total_minutes: 0,
            task_count: 0,
            total_difficulty: 0,
            skill_alignment_total: 0,
            completed_count: 0,
            slot_minutes: BTreeMap::new(),
        }
    }

    /// Mean skill level across held chores, or `None` with no chores.
    pub fn mean_skill_alignment(&self) -> Option<f64> {
        (self.task_count > 0).then(|| self.skill_alignment_total as f64 / self.task_count as f64)
    }

    pub fn minutes_in(&self, slot: TimeSlot) -> u32 {
        self.slot_minutes.get(&slot).copied().unwrap_or(0)
    }

    fn add(&mut self, chore: &ChoreInstance, skill_level: u8) {
        self.total_minutes = self.total_minutes.saturating_add(chore.duration_minutes);
        self.task_count += 1;
        self.total_difficulty += u32::from(chore.difficulty);
        self.skill_alignment_total += u32::from(skill_level);
        if chore.is_completed() {
            self.completed_count += 1;
        }
        let slot = self.slot_minutes.entry(chore.time_slot).or_insert(0);
        *slot = slot.saturating_add(chore.duration_minutes);
    }

    fn remove(&mut self, chore: &ChoreInstance, skill_level: u8) {
        self.total_minutes = self.total_minutes.saturating_sub(chore.duration_minutes);
        self.task_count = self.task_count.saturating_sub(1);
        self.total_difficulty = self
            .total_difficulty
            .saturating_sub(u32::from(chore.difficulty));
        self.skill_alignment_total = self
            .skill_alignment_total
            .saturating_sub(u32::from(skill_level));
        if chore.is_completed() {
            self.completed_count = self.completed_count.saturating_sub(1);
        }
        if let Some(m) = self.slot_minutes.get_mut(&chore.time_slot) {
            *m = m.saturating_sub(chore.duration_minutes);
            if *m == 0 {
                self.slot_minutes.remove(&chore.time_slot);
            }
        }
    }
}

/// Running workload for every member in one run, kept in roster order.
#[derive(Debug, Clone)]
pub struct WorkloadTracker {
    records: Vec<WorkloadRecord>,
    index: HashMap<String, usize>,
}

impl WorkloadTracker {
    pub fn new(members: &[Member]) -> Self {
        let records: Vec<WorkloadRecord> = members.iter().map(WorkloadRecord::new).collect();
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.member_id.clone(), i))
            .collect();
        Self { records, index }
    }

    pub fn get(&self, member_id: &str) -> Option<&WorkloadRecord> {
        self.index.get(member_id).map(|&i| &self.records[i])
    }

    pub fn minutes(&self, member_id: &str) -> u32 {
        self.get(member_id).map(|r| r.total_minutes).unwrap_or(0)
    }

    /// Record that `member_id` holds `chore`. Unknown ids are ignored.
    pub fn record(&mut self, member_id: &str, chore: &ChoreInstance, skill_level: u8) {
        if let Some(&i) = self.index.get(member_id) {
            self.records[i].add(chore, skill_level);
        }
    }

    /// Undo a previous [`record`](Self::record).
    pub fn release(&mut self, member_id: &str, chore: &ChoreInstance, skill_level: u8) {
        if let Some(&i) = self.index.get(member_id) {
            self.records[i].remove(chore, skill_level);
        }
    }

    /// Most-loaded member by minutes; ties go to the earlier roster entry.
    pub fn max_loaded(&self) -> Option<&WorkloadRecord> {
        self.records
            .iter()
            .reduce(|best, r| if r.total_minutes > best.total_minutes { r } else { best })
    }

    /// Least-loaded member by minutes; ties go to the earlier roster entry.
    pub fn min_loaded(&self) -> Option<&WorkloadRecord> {
        self.records
            .iter()
            .reduce(|best, r| if r.total_minutes < best.total_minutes { r } else { best })
    }

    /// Max minus min total minutes across the roster.
    pub fn gap_minutes(&self) -> u32 {
        match (self.max_loaded(), self.min_loaded()) {
            (Some(max), Some(min)) => max.total_minutes - min.total_minutes,
            _ => 0,
        }
    }

    pub fn records(&self) -> &[WorkloadRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<WorkloadRecord> {
        self.records
    }
}
