//! Fairness scoring over a run's workload records.
//!
//! The canonical score blends coefficient-of-variation fairness over total
//! minutes and task counts. [`DetailedScores`] adds a five-factor breakdown
//! that is informational only and never feeds the canonical score.

mod detailed;

pub use detailed::DetailedScores;

use serde::{Deserialize, Serialize};

use crate::household::DisplayName;
use crate::workload::WorkloadRecord;

/// Weights and thresholds for the fairness scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairnessConfig {
    #[serde(default = "default_time_weight")]
    pub time_weight: f64,
    #[serde(default = "default_count_weight")]
    pub count_weight: f64,
    /// Member minutes above `mean × overload_ratio` are [`WorkloadLevel::High`].
    #[serde(default = "default_overload_ratio")]
    pub overload_ratio: f64,
    /// Member minutes below `mean × underload_ratio` are [`WorkloadLevel::Low`].
    #[serde(default = "default_underload_ratio")]
    pub underload_ratio: f64,
}

fn default_time_weight() -> f64 {
    0.6
}

fn default_count_weight() -> f64 {
    0.4
}

fn default_overload_ratio() -> f64 {
    1.5
}

fn default_underload_ratio() -> f64 {
    0.5
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            time_weight: default_time_weight(),
            count_weight: default_count_weight(),
            overload_ratio: default_overload_ratio(),
            underload_ratio: default_underload_ratio(),
        }
    }
}

/// Narrative band of a fairness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FairnessBand {
    Excellent,
    VeryGood,
    Good,
    NeedsAttention,
    Poor,
}

impl FairnessBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::Excellent
        } else if score >= 0.8 {
            Self::VeryGood
        } else if score >= 0.65 {
            Self::Good
        } else if score >= 0.5 {
            Self::NeedsAttention
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent balance",
            Self::VeryGood => "Very good balance",
            Self::Good => "Good balance",
            Self::NeedsAttention => "Balance needs attention",
            Self::Poor => "Poor balance",
        }
    }
}

/// Where a member's minutes sit relative to the household mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadLevel {
    High,
    Normal,
    Low,
}

/// A member's total minutes, named for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberLoad {
    pub member_id: String,
    pub display_name: DisplayName,
    pub minutes: u32,
}

impl MemberLoad {
    fn of(record: &WorkloadRecord) -> Self {
        Self {
            member_id: record.member_id.clone(),
            display_name: record.display_name.clone(),
            minutes: record.total_minutes,
        }
    }
}

/// Per-member workload level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberLevel {
    pub member_id: String,
    pub display_name: DisplayName,
    pub level: WorkloadLevel,
    /// Member minutes divided by the household mean (1.0 when the mean is 0).
    pub ratio_to_mean: f64,
}

/// Fairness score plus its narrative breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessScore {
    /// Canonical score in [0, 1].
    pub score: f64,
    pub time_fairness: f64,
    pub count_fairness: f64,
    pub band: FairnessBand,
    pub narrative: String,
    pub highest: Option<MemberLoad>,
    pub lowest: Option<MemberLoad>,
    pub gap_minutes: u32,
    pub mean_minutes: f64,
    pub detailed: DetailedScores,
    pub member_levels: Vec<MemberLevel>,
}

impl FairnessScore {
    pub fn is_balanced(&self) -> bool {
        matches!(self.band, FairnessBand::Excellent | FairnessBand::VeryGood)
    }

    pub fn level_of(&self, member_id: &str) -> Option<WorkloadLevel> {
        self.member_levels
            .iter()
            .find(|l| l.member_id == member_id)
            .map(|l| l.level)
    }
}

/// Scores workload distributions.
#[derive(Debug, Clone, Default)]
pub struct FairnessScorer {
    config: FairnessConfig,
}

impl FairnessScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FairnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FairnessConfig {
        &self.config
    }

    /// Score a set of workload records. Deterministic for the same input.
    pub fn score(&self, records: &[WorkloadRecord]) -> FairnessScore {
        let minutes: Vec<f64> = records.iter().map(|r| r.total_minutes as f64).collect();
        let counts: Vec<f64> = records.iter().map(|r| r.task_count as f64).collect();

        let time_fairness = cv_fairness(&minutes);
        let count_fairness = cv_fairness(&counts);

        let score = if records.len() <= 1 {
            1.0
        } else {
            let weight_sum = self.config.time_weight + self.config.count_weight;
            let blended = if weight_sum > 0.0 {
                let time = self.config.time_weight * time_fairness;
                let count = self.config.count_weight * count_fairness;
                (time + count) / weight_sum
            } else {
                1.0
            };
            blended.clamp(0.0, 1.0)
        };

        let highest = first_by(records, |candidate, best| candidate > best).map(MemberLoad::of);
        let lowest = first_by(records, |candidate, best| candidate < best).map(MemberLoad::of);
        let gap_minutes = match (&highest, &lowest) {
            (Some(h), Some(l)) => h.minutes - l.minutes,
            _ => 0,
        };

        let mean_minutes = mean(&minutes);
        let band = FairnessBand::from_score(score);
        let narrative = narrative(band, score, highest.as_ref(), lowest.as_ref(), gap_minutes);

        tracing::debug!(score, time_fairness, count_fairness, gap_minutes, "scored workload");

        FairnessScore {
            score,
            time_fairness,
            count_fairness,
            band,
            narrative,
            highest,
            lowest,
            gap_minutes,
            mean_minutes,
            detailed: DetailedScores::compute(records),
            member_levels: self.member_levels(records, mean_minutes),
        }
    }

    fn member_levels(&self, records: &[WorkloadRecord], mean_minutes: f64) -> Vec<MemberLevel> {
        records
            .iter()
            .map(|r| {
                let ratio_to_mean = if mean_minutes > 0.0 {
                    r.total_minutes as f64 / mean_minutes
                } else {
                    1.0
                };
                let level = if ratio_to_mean > self.config.overload_ratio {
                    WorkloadLevel::High
                } else if ratio_to_mean < self.config.underload_ratio {
                    WorkloadLevel::Low
                } else {
                    WorkloadLevel::Normal
                };
                MemberLevel {
                    member_id: r.member_id.clone(),
                    display_name: r.display_name.clone(),
                    level,
                    ratio_to_mean,
                }
            })
            .collect()
    }
}

/// First record (roster order) whose minutes beat every earlier one under `better`.
fn first_by(
    records: &[WorkloadRecord],
    better: impl Fn(u32, u32) -> bool,
) -> Option<&WorkloadRecord> {
    records
        .iter()
        .reduce(|best, r| if better(r.total_minutes, best.total_minutes) { r } else { best })
}

fn narrative(
    band: FairnessBand,
    score: f64,
    highest: Option<&MemberLoad>,
    lowest: Option<&MemberLoad>,
    gap_minutes: u32,
) -> String {
    match (highest, lowest) {
        (Some(h), Some(l)) => format!(
            "{} (score {:.2}). {} has the most work at {} min and {} the least at {} min, a gap of {} min.",
            band.label(),
            score,
            h.display_name,
            h.minutes,
            l.display_name,
            l.minutes,
            gap_minutes
        ),
        _ => format!("{} (score {:.2}). No workload recorded.", band.label(), score),
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// `max(0, 1 − CV)` with population standard deviation.
///
/// One or zero values, or a zero mean, are vacuously fair (1.0).
pub(crate) fn cv_fairness(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 1.0;
    }
    let mean = mean(values);
    if mean <= 0.0 {
        return 1.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    let cv = variance.sqrt() / mean;
    (1.0 - cv).clamp(0.0, 1.0)
}
