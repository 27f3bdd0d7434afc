//! Five-factor fairness breakdown.
//!
//! Informational only: the canonical score is [`super::FairnessScore::score`].

use serde::{Deserialize, Serialize};

use super::{cv_fairness, mean};
use crate::workload::WorkloadRecord;

/// Weights for [`DetailedScores::blended`].
const TIME_WEIGHT: f64 = 0.40;
const COUNT_WEIGHT: f64 = 0.25;
const DIFFICULTY_WEIGHT: f64 = 0.20;
const SKILL_WEIGHT: f64 = 0.10;
const COMPLETION_WEIGHT: f64 = 0.05;

/// Skill level treated as a full match when averaged.
const SKILL_ALIGNMENT_TARGET: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedScores {
    /// CV fairness over total minutes.
    pub time_balance: f64,
    /// CV fairness over task counts.
    pub count_balance: f64,
    /// CV fairness over each busy member's mean difficulty.
    pub difficulty_balance: f64,
    /// Mean held-skill level across busy members over 5, capped at 1.
    pub skill_alignment: f64,
    /// Mean completion rate across busy members.
    pub completion_rate: f64,
    /// Weighted blend of the five factors.
    pub blended: f64,
}

impl DetailedScores {
    pub fn compute(records: &[WorkloadRecord]) -> Self {
        let busy: Vec<&WorkloadRecord> = records.iter().filter(|r| r.task_count > 0).collect();

        let minutes: Vec<f64> = records.iter().map(|r| r.total_minutes as f64).collect();
        let counts: Vec<f64> = records.iter().map(|r| r.task_count as f64).collect();
        let mean_difficulty: Vec<f64> = busy
            .iter()
            .map(|r| r.total_difficulty as f64 / r.task_count as f64)
            .collect();

        let time_balance = cv_fairness(&minutes);
        let count_balance = cv_fairness(&counts);
        let difficulty_balance = cv_fairness(&mean_difficulty);

        let skill_alignment = if busy.is_empty() {
            1.0
        } else {
            let levels: Vec<f64> = busy.iter().filter_map(|r| r.mean_skill_alignment()).collect();
            (mean(&levels) / SKILL_ALIGNMENT_TARGET).min(1.0)
        };

        let completion_rate = if busy.is_empty() {
            1.0
        } else {
            let rates: Vec<f64> = busy
                .iter()
                .map(|r| r.completed_count as f64 / r.task_count as f64)
                .collect();
            mean(&rates)
        };

        let blended = (time_balance * TIME_WEIGHT
            + count_balance * COUNT_WEIGHT
            + difficulty_balance * DIFFICULTY_WEIGHT
            + skill_alignment * SKILL_WEIGHT
            + completion_rate * COMPLETION_WEIGHT)
            .clamp(0.0, 1.0);

        Self {
            time_balance,
            count_balance,
            difficulty_balance,
            skill_alignment,
            completion_rate,
            blended,
        }
    }
}
