//! Deterministic advisory rules.

use super::{Advisory, Severity};
use crate::assignment::AssignmentResult;
use crate::fairness::WorkloadLevel;

const REBALANCE_BELOW: f64 = 0.6;
const PRAISE_ABOVE: f64 = 0.8;
const LARGE_GAP_MINUTES: u32 = 60;
/// Mean held-skill level under which a member's chores are a poor match.
const SKILL_MISMATCH_BELOW: f64 = 3.0;

pub(super) fn evaluate(result: &AssignmentResult, low_availability_rate: f64) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    let fairness = &result.fairness;

    if result.assignments.is_empty() {
        advisories.push(Advisory::rule(
            Severity::Info,
            format!("No chores are scheduled for {}.", result.date),
        ));
    } else {
        let (high, low) = match (&fairness.highest, &fairness.lowest) {
            (Some(h), Some(l)) => (h.display_name.to_string(), l.display_name.to_string()),
            _ => Default::default(),
        };
        let score = fairness.score;
        if score < REBALANCE_BELOW {
            advisories.push(Advisory::rule(
                Severity::High,
                format!(
                    "Chores are unevenly split (score {score:.2}). Move some of {high}'s lighter chores to {low}."
                ),
            ));
        } else if score <= PRAISE_ABOVE {
            advisories.push(Advisory::rule(
                Severity::Medium,
                format!(
                    "The split is reasonable (score {score:.2}). Swapping one short chore from {high} to {low} would even it out."
                ),
            ));
        } else {
            advisories.push(Advisory::rule(
                Severity::Low,
                format!("Great teamwork: chores are shared fairly today (score {score:.2})."),
            ));
        }

        if result.workloads.len() > 1 {
            for level in &fairness.member_levels {
                let Some(record) = result.workload_of(&level.member_id) else {
                    continue;
                };
                match level.level {
                    WorkloadLevel::High => advisories.push(
                        Advisory::rule(
                            Severity::Medium,
                            format!(
                                "{} has {} min of chores, well above the household average of {:.0} min.",
                                record.display_name, record.total_minutes, fairness.mean_minutes
                            ),
                        )
                        .for_member(&record.member_id),
                    ),
                    WorkloadLevel::Low => advisories.push(
                        Advisory::rule(
                            Severity::Low,
                            format!(
                                "{} has only {} min of chores today and could take on more.",
                                record.display_name, record.total_minutes
                            ),
                        )
                        .for_member(&record.member_id),
                    ),
                    WorkloadLevel::Normal => {}
                }
            }
        }

        for record in &result.workloads {
            if let Some(mean_level) = record.mean_skill_alignment() {
                if mean_level < SKILL_MISMATCH_BELOW {
                    advisories.push(
                        Advisory::rule(
                            Severity::Medium,
                            format!(
                                "{}'s chores are a weak skill match (average level {:.1}). Consider pairing up or swapping.",
                                record.display_name, mean_level
                            ),
                        )
                        .for_member(&record.member_id),
                    );
                }
            }
        }

        if fairness.gap_minutes > LARGE_GAP_MINUTES {
            advisories.push(Advisory::rule(
                Severity::Medium,
                format!("{high} and {low} are {} min apart.", fairness.gap_minutes),
            ));
        }
    }

    if result.availability_rate < low_availability_rate {
        advisories.push(Advisory::rule(
            Severity::Medium,
            format!(
                "Only {:.0}% of the household is home today, so chores rest on fewer people.",
                result.availability_rate * 100.0
            ),
        ));
    }

    advisories
}
