//! Greedy chore placement with local repair.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::result::{Assignment, AssignmentResult, RepairSummary};
use super::scoring::{candidate_score, load_penalty, member_skill_score, preference_adjustment};
use crate::availability::{AvailabilityModel, AvailabilitySnapshot};
use crate::catalog::ChoreInstance;
use crate::error::{CoreError, Result};
use crate::fairness::FairnessScorer;
use crate::household::{Member, SkillCategory, TimeSlot};
use crate::workload::WorkloadTracker;

/// Skill score at which the reason names the member's skill.
const STRONG_SKILL_SCORE: f64 = 0.7;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on local-repair iterations
    #[serde(default = "default_repair_max_iterations")]
    pub repair_max_iterations: u32,
    /// Repair runs while the max-min minute gap exceeds this
    #[serde(default = "default_repair_gap_minutes")]
    pub repair_gap_minutes: u32,
    /// Only chores at or below this difficulty may be moved by repair
    #[serde(default = "default_reassign_max_difficulty")]
    pub reassign_max_difficulty: u8,
    /// Minimum candidate score the receiving member needs
    #[serde(default = "default_min_acceptability")]
    pub min_acceptability: f64,
    /// Minutes taken off the effective load for a liked skill
    #[serde(default = "default_liked_minutes")]
    pub liked_minutes: f64,
    /// Minutes added to the effective load for a disliked skill
    #[serde(default = "default_disliked_minutes")]
    pub disliked_minutes: f64,
}

fn default_repair_max_iterations() -> u32 {
    100
}

fn default_repair_gap_minutes() -> u32 {
    60
}

fn default_reassign_max_difficulty() -> u8 {
    6
}

fn default_min_acceptability() -> f64 {
    0.6
}

fn default_liked_minutes() -> f64 {
    5.0
}

fn default_disliked_minutes() -> f64 {
    10.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            repair_max_iterations: default_repair_max_iterations(),
            repair_gap_minutes: default_repair_gap_minutes(),
            reassign_max_difficulty: default_reassign_max_difficulty(),
            min_acceptability: default_min_acceptability(),
            liked_minutes: default_liked_minutes(),
            disliked_minutes: default_disliked_minutes(),
        }
    }
}

/// Maps chore instances to members.
///
/// Holds no per-run state: every [`assign`](Self::assign) call builds its
/// own workload tracker, so one engine can serve concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct AssignmentEngine {
    config: EngineConfig,
    availability: AvailabilityModel,
    fairness: FairnessScorer,
}

impl AssignmentEngine {
    /// Create an engine with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_availability(mut self, availability: AvailabilityModel) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_fairness(mut self, fairness: FairnessScorer) -> Self {
        self.fairness = fairness;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn availability(&self) -> &AvailabilityModel {
        &self.availability
    }

    /// `current_minutes + load_penalty(skill) + preference nudge`.
    pub fn effective_load(
        &self,
        member: &Member,
        skill: SkillCategory,
        current_minutes: u32,
    ) -> f64 {
        f64::from(current_minutes)
            + load_penalty(member_skill_score(member, skill))
            + preference_adjustment(
                member,
                skill,
                self.config.liked_minutes,
                self.config.disliked_minutes,
            )
    }

    /// Assign every chore to exactly one member.
    ///
    /// Chores are placed heaviest first (`difficulty × duration`, stable),
    /// then local repair narrows the minute gap. Only members available on
    /// the snapshot date take part, unless nobody is.
    pub fn assign(
        &self,
        chores: &[ChoreInstance],
        roster: &[Member],
        snapshot: &AvailabilitySnapshot,
    ) -> Result<AssignmentResult> {
        if roster.is_empty() {
            return Err(CoreError::NoMembers);
        }

        let availability_rate = self.availability.availability_rate(roster, snapshot);
        let pool = self.availability.available_members_or_all(roster, snapshot);
        let mut run = Run::new(self, roster, &pool, snapshot);

        // Completed work counts toward loads before anything pending is scored
        let mut placed: Vec<Option<Assignment>> =
            chores.iter().map(|c| run.keep_completed(c)).collect();

        let mut order: Vec<usize> = (0..chores.len()).filter(|&i| placed[i].is_none()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(chores[i].priority()));
        for i in order {
            placed[i] = Some(run.place(&chores[i]));
        }
        let mut assignments: Vec<Assignment> = placed.into_iter().flatten().collect();

        let repair = run.repair(chores, &mut assignments);

        for (assignment, chore) in assignments.iter_mut().zip(chores) {
            let previous = chore.clone().assign(assignment.member_id.clone());
            assignment.reassigned = previous.is_some();
            assignment.previous_assignee = previous;
        }

        let workloads = run.tracker.into_records();
        let fairness = self.fairness.score(&workloads);

        tracing::info!(
            date = %snapshot.date,
            chores = chores.len(),
            members = pool.len(),
            score = fairness.score,
            repair_moves = repair.moves,
            "assignment run complete"
        );

        Ok(AssignmentResult {
            date: snapshot.date,
            assignments,
            workloads,
            fairness,
            advisories: Vec::new(),
            availability_rate,
            repair,
        })
    }
}

/// Mutable state of one assignment run.
struct Run<'a> {
    engine: &'a AssignmentEngine,
    roster: &'a [Member],
    pool: &'a [Member],
    snapshot: &'a AvailabilitySnapshot,
    tracker: WorkloadTracker,
    /// Free minutes per pool member per slot, before any placement.
    free: Vec<HashMap<TimeSlot, i64>>,
}

impl<'a> Run<'a> {
    fn new(
        engine: &'a AssignmentEngine,
        roster: &'a [Member],
        pool: &'a [Member],
        snapshot: &'a AvailabilitySnapshot,
    ) -> Self {
        let free = pool
            .iter()
            .map(|m| {
                [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening, TimeSlot::Anytime]
                    .into_iter()
                    .map(|slot| (slot, engine.availability.slot_free_minutes(m, snapshot, slot)))
                    .collect()
            })
            .collect();
        Self {
            engine,
            roster,
            pool,
            snapshot,
            tracker: WorkloadTracker::new(pool),
            free,
        }
    }

    /// Free minutes the pool member at `idx` still has in `slot`.
    fn remaining(&self, idx: usize, slot: TimeSlot) -> i64 {
        let member = &self.pool[idx];
        let free = self.free[idx].get(&slot).copied().unwrap_or(0);
        let used = match (slot, self.tracker.get(&member.id)) {
            (_, None) => 0,
            (TimeSlot::Anytime, Some(r)) => i64::from(r.total_minutes),
            (slot, Some(r)) => i64::from(r.minutes_in(slot)),
        };
        free - used
    }

    fn can_take(&self, idx: usize, slot: TimeSlot) -> bool {
        self.pool[idx].availability.is_open(self.snapshot.date, slot)
            && self.remaining(idx, slot) > 0
    }

    fn pool_index(&self, member_id: &str) -> Option<usize> {
        self.pool.iter().position(|m| m.id == member_id)
    }

    fn place(&mut self, chore: &ChoreInstance) -> Assignment {
        let eligible: Vec<usize> = (0..self.pool.len())
            .filter(|&i| self.can_take(i, chore.time_slot))
            .collect();
        let fallback = eligible.is_empty();
        let candidates = if fallback {
            (0..self.pool.len()).collect()
        } else {
            eligible
        };

        let scored: Vec<(usize, f64, f64)> = candidates
            .iter()
            .map(|&i| {
                let member = &self.pool[i];
                let skill = member_skill_score(member, chore.skill);
                let load = self
                    .engine
                    .effective_load(member, chore.skill, self.tracker.minutes(&member.id));
                (i, skill, load)
            })
            .collect();

        // Lowest load, then higher skill, then lowest id
        let Some(&(idx, skill_score, effective_load)) = scored.iter().min_by(|a, b| {
            a.2.total_cmp(&b.2)
                .then(b.1.total_cmp(&a.1))
                .then_with(|| self.pool[a.0].id.cmp(&self.pool[b.0].id))
        }) else {
            // pool is never empty: available_members_or_all falls back to the roster
            return self.unplaced(chore);
        };

        let member = &self.pool[idx];
        let level = member.skill_level(chore.skill);
        let reason = if fallback {
            format!(
                "nobody has free time in the {} slot; lightest load",
                chore.time_slot
            )
        } else if candidates.len() == 1 {
            format!("only member free in the {} slot", chore.time_slot)
        } else if skill_score >= STRONG_SKILL_SCORE {
            format!("strong {} skill (level {})", chore.skill, level)
        } else {
            format!("lightest effective load ({:.0} min)", effective_load)
        };

        tracing::debug!(
            chore = %chore.id,
            member = %member.id,
            effective_load,
            skill_score,
            fallback,
            "placed chore"
        );

        self.tracker.record(&member.id, chore, level);
        assignment(chore, member, skill_score, effective_load, reason)
    }

    /// Completed instances stay with the member who did them.
    fn keep_completed(&mut self, chore: &ChoreInstance) -> Option<Assignment> {
        if !chore.is_completed() {
            return None;
        }
        let member = self
            .roster
            .iter()
            .find(|m| Some(m.id.as_str()) == chore.assignee.as_deref())?;
        let load = self
            .engine
            .effective_load(member, chore.skill, self.tracker.minutes(&member.id));
        self.tracker
            .record(&member.id, chore, member.skill_level(chore.skill));
        let mut kept = assignment(
            chore,
            member,
            member_skill_score(member, chore.skill),
            load,
            format!("already completed by {}", member.name),
        );
        kept.completed = true;
        Some(kept)
    }

    fn unplaced(&self, chore: &ChoreInstance) -> Assignment {
        let member = &self.roster[0];
        assignment(
            chore,
            member,
            member_skill_score(member, chore.skill),
            0.0,
            "first member on the roster".to_string(),
        )
    }

    /// Move movable chores from the most- to the least-loaded member while
    /// that strictly narrows the global minute gap.
    fn repair(
        &mut self,
        chores: &[ChoreInstance],
        assignments: &mut [Assignment],
    ) -> RepairSummary {
        let engine = self.engine;
        let config = &engine.config;
        let gap_before = self.tracker.gap_minutes();
        let mut summary = RepairSummary {
            gap_before,
            gap_after: gap_before,
            ..RepairSummary::default()
        };

        while summary.iterations < config.repair_max_iterations {
            let gap = self.tracker.gap_minutes();
            if gap <= config.repair_gap_minutes {
                break;
            }
            summary.iterations += 1;

            let (Some(max), Some(min)) = (self.tracker.max_loaded(), self.tracker.min_loaded())
            else {
                break;
            };
            let max_id = max.member_id.clone();
            let min_id = min.member_id.clone();
            let Some(min_idx) = self.pool_index(&min_id) else {
                break;
            };

            let mut best: Option<(usize, u32)> = None;
            for (i, (a, chore)) in assignments.iter().zip(chores).enumerate() {
                if a.member_id != max_id
                    || a.completed
                    || chore.difficulty > config.reassign_max_difficulty
                {
                    continue;
                }
                let acceptability = if self.can_take(min_idx, chore.time_slot) {
                    candidate_score(member_skill_score(&self.pool[min_idx], chore.skill))
                } else {
                    0.0
                };
                if acceptability < config.min_acceptability {
                    continue;
                }
                let new_gap = self.gap_after_move(&max_id, &min_id, chore.duration_minutes);
                if new_gap < gap && best.map_or(true, |(_, g)| new_gap < g) {
                    best = Some((i, new_gap));
                }
            }

            let Some((i, new_gap)) = best else {
                break;
            };
            self.move_chore(&chores[i], &mut assignments[i], &max_id, min_idx);
            summary.moves += 1;
            tracing::debug!(
                chore = %chores[i].id,
                from = %max_id,
                to = %min_id,
                gap,
                new_gap,
                "repair move"
            );
        }

        summary.gap_after = self.tracker.gap_minutes();
        summary
    }

    fn gap_after_move(&self, from: &str, to: &str, minutes: u32) -> u32 {
        let loads = self.tracker.records().iter().map(|r| {
            if r.member_id == from {
                r.total_minutes.saturating_sub(minutes)
            } else if r.member_id == to {
                r.total_minutes.saturating_add(minutes)
            } else {
                r.total_minutes
            }
        });
        let (lo, hi) = loads.fold((u32::MAX, 0), |(lo, hi), m| (lo.min(m), hi.max(m)));
        hi.saturating_sub(lo)
    }

    fn move_chore(
        &mut self,
        chore: &ChoreInstance,
        assignment: &mut Assignment,
        from: &str,
        to_idx: usize,
    ) {
        let from_level = self
            .pool
            .iter()
            .find(|m| m.id == from)
            .map(|m| m.skill_level(chore.skill))
            .unwrap_or_default();
        self.tracker.release(from, chore, from_level);

        let to = &self.pool[to_idx];
        let effective_load = self
            .engine
            .effective_load(to, chore.skill, self.tracker.minutes(&to.id));
        self.tracker.record(&to.id, chore, to.skill_level(chore.skill));

        assignment.reason = format!("rebalanced from {}", assignment.member_name);
        assignment.member_id = to.id.clone();
        assignment.member_name = to.name.clone();
        assignment.skill_score = member_skill_score(to, chore.skill);
        assignment.effective_load = effective_load;
        assignment.repaired = true;
    }
}

fn assignment(
    chore: &ChoreInstance,
    member: &Member,
    skill_score: f64,
    effective_load: f64,
    reason: String,
) -> Assignment {
    Assignment {
        instance_id: chore.id.clone(),
        chore_id: chore.chore_id.clone(),
        chore_name: chore.name.clone(),
        category: chore.category.clone(),
        skill: chore.skill,
        duration_minutes: chore.duration_minutes,
        difficulty: chore.difficulty,
        time_slot: chore.time_slot,
        member_id: member.id.clone(),
        member_name: member.name.clone(),
        skill_score,
        effective_load,
        reason,
        reassigned: false,
        previous_assignee: None,
        repaired: false,
        completed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::OutOfHomeEvent;
    use crate::catalog::ChoreStatus;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn chore(id: &str, skill: SkillCategory, minutes: u32, difficulty: u8) -> ChoreInstance {
        ChoreInstance {
            id: id.to_string(),
            chore_id: id.to_string(),
            name: id.to_string(),
            category: "test".to_string(),
            skill,
            duration_minutes: minutes,
            difficulty,
            time_slot: TimeSlot::Anytime,
            date: date(),
            status: ChoreStatus::Pending,
            assignee: None,
        }
    }

    fn snapshot() -> AvailabilitySnapshot {
        AvailabilitySnapshot::empty(date())
    }

    #[test]
    fn empty_roster_is_an_error() {
        let engine = AssignmentEngine::new();
        let err = engine
            .assign(&[chore("c", SkillCategory::Cooking, 30, 5)], &[], &snapshot())
            .unwrap_err();
        assert!(matches!(err, CoreError::NoMembers));
    }

    #[test]
    fn skilled_cook_gets_the_cooking() {
        let alice = Member::new("alice", "Alice").with_skill(SkillCategory::Cooking, 9);
        let bob = Member::new("bob", "Bob").with_skill(SkillCategory::Cooking, 2);
        let engine = AssignmentEngine::new();

        assert!(
            engine.effective_load(&bob, SkillCategory::Cooking, 0)
                > engine.effective_load(&alice, SkillCategory::Cooking, 0)
        );

        let result = engine
            .assign(
                &[chore("dinner", SkillCategory::Cooking, 60, 5)],
                &[alice, bob],
                &snapshot(),
            )
            .unwrap();
        assert_eq!(result.assignee_of("dinner"), Some("alice"));
        assert!(result.assignments[0].reason.contains("cooking"));
    }

    #[test]
    fn ties_go_to_lowest_id() {
        let engine = AssignmentEngine::new();
        let roster = vec![Member::new("b", "Bob"), Member::new("a", "Alice")];
        let result = engine
            .assign(&[chore("x", SkillCategory::Cleaning, 20, 3)], &roster, &snapshot())
            .unwrap();
        assert_eq!(result.assignee_of("x"), Some("a"));
    }

    #[test]
    fn heaviest_chore_is_placed_first() {
        let engine = AssignmentEngine::new();
        let roster = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
        let chores = vec![
            chore("light", SkillCategory::Cleaning, 10, 2),
            chore("heavy", SkillCategory::Cleaning, 90, 6),
        ];
        let result = engine.assign(&chores, &roster, &snapshot()).unwrap();
        // heavy placed first goes to "a"; light then goes to the idle "b"
        assert_eq!(result.assignee_of("heavy"), Some("a"));
        assert_eq!(result.assignee_of("light"), Some("b"));
        // output keeps input order
        assert_eq!(result.assignments[0].instance_id, "light");
    }

    #[test]
    fn previous_assignee_is_replaced_and_flagged() {
        let engine = AssignmentEngine::new();
        let roster = vec![Member::new("a", "Alice")];
        let mut c = chore("x", SkillCategory::Cleaning, 20, 3);
        c.assignee = Some("zed".to_string());
        let result = engine.assign(&[c], &roster, &snapshot()).unwrap();
        let a = &result.assignments[0];
        assert_eq!(a.member_id, "a");
        assert!(a.reassigned);
        assert_eq!(a.previous_assignee.as_deref(), Some("zed"));
    }

    #[test]
    fn same_assignee_is_not_flagged() {
        let engine = AssignmentEngine::new();
        let roster = vec![Member::new("a", "Alice")];
        let mut c = chore("x", SkillCategory::Cleaning, 20, 3);
        c.assignee = Some("a".to_string());
        let result = engine.assign(&[c], &roster, &snapshot()).unwrap();
        assert!(!result.assignments[0].reassigned);
        assert_eq!(result.assignments[0].previous_assignee, None);
    }

    #[test]
    fn completed_chores_keep_their_assignee() {
        let engine = AssignmentEngine::new();
        let roster = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
        let mut done = chore("done", SkillCategory::Cleaning, 30, 3);
        done.status = ChoreStatus::Completed;
        done.assignee = Some("b".to_string());
        let result = engine.assign(&[done], &roster, &snapshot()).unwrap();
        let a = &result.assignments[0];
        assert_eq!(a.member_id, "b");
        assert!(a.completed);
        assert!(!a.reassigned);
        assert_eq!(result.workload_of("b").unwrap().completed_count, 1);
    }

    #[test]
    fn completed_minutes_count_before_pending_placement() {
        let engine = AssignmentEngine::new();
        let roster = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
        let mut done = chore("done", SkillCategory::Cleaning, 90, 1);
        done.status = ChoreStatus::Completed;
        done.assignee = Some("a".to_string());
        let hard = chore("hard", SkillCategory::Cleaning, 60, 7);

        let result = engine.assign(&[done, hard], &roster, &snapshot()).unwrap();
        assert_eq!(result.assignee_of("done"), Some("a"));
        assert_eq!(result.assignee_of("hard"), Some("b"));
        assert_eq!(result.workload_of("a").unwrap().total_minutes, 90);
        assert_eq!(result.workload_of("b").unwrap().total_minutes, 60);
        assert_eq!(result.assignments[0].instance_id, "done");
    }

    #[test]
    fn away_member_is_skipped() {
        let engine = AssignmentEngine::new();
        let roster = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
        let away = OutOfHomeEvent::new(
            "a",
            "Trip",
            date().and_hms_opt(0, 0, 0).unwrap(),
            date().and_hms_opt(23, 59, 0).unwrap(),
        )
        .unwrap();
        let snapshot = AvailabilitySnapshot::new(date(), vec![away]);
        let result = engine
            .assign(&[chore("x", SkillCategory::Cleaning, 20, 3)], &roster, &snapshot)
            .unwrap();
        assert_eq!(result.assignee_of("x"), Some("b"));
        assert_eq!(result.availability_rate, 0.5);
        assert_eq!(result.workloads.len(), 1);
    }

    #[test]
    fn closed_slot_excludes_member() {
        use crate::household::{AvailabilityGrid, SlotFlags};
        let closed_evenings = SlotFlags {
            morning: true,
            afternoon: true,
            evening: false,
        };
        let alice = Member::new("a", "Alice")
            .with_skill(SkillCategory::Cooking, 10)
            .with_availability(AvailabilityGrid {
                weekday: closed_evenings,
                weekend: closed_evenings,
            });
        let bob = Member::new("b", "Bob").with_skill(SkillCategory::Cooking, 3);
        let mut dinner = chore("dinner", SkillCategory::Cooking, 60, 7);
        dinner.time_slot = TimeSlot::Evening;
        let result = AssignmentEngine::new()
            .assign(&[dinner], &[alice, bob], &snapshot())
            .unwrap();
        assert_eq!(result.assignee_of("dinner"), Some("b"));
        assert!(result.assignments[0].reason.contains("only member"));
    }

    #[test]
    fn repair_moves_easy_chore_to_idle_member() {
        // Alice is much stronger at cleaning, so greedy gives her everything
        let alice = Member::new("a", "Alice").with_skill(SkillCategory::Cleaning, 10);
        let bob = Member::new("b", "Bob").with_skill(SkillCategory::Cleaning, 5);
        let chores = vec![
            chore("c1", SkillCategory::Cleaning, 20, 3),
            chore("c2", SkillCategory::Cleaning, 20, 3),
            chore("c3", SkillCategory::Cleaning, 20, 3),
            chore("c4", SkillCategory::Cleaning, 20, 3),
        ];
        let config = EngineConfig {
            repair_gap_minutes: 10,
            ..EngineConfig::default()
        };
        let result = AssignmentEngine::with_config(config)
            .assign(&chores, &[alice, bob], &snapshot())
            .unwrap();
        assert!(result.repair.gap_after <= result.repair.gap_before);
        assert!(result.repair.gap_after <= 20);
    }

    #[test]
    fn repair_never_touches_hard_chores() {
        let alice = Member::new("a", "Alice").with_skill(SkillCategory::Cooking, 10);
        let bob = Member::new("b", "Bob").with_skill(SkillCategory::Cooking, 1);
        let chores = vec![chore("feast", SkillCategory::Cooking, 180, 9)];
        let result = AssignmentEngine::new()
            .assign(&chores, &[alice, bob], &snapshot())
            .unwrap();
        assert_eq!(result.repair.moves, 0);
        assert_eq!(result.assignee_of("feast"), Some("a"));
    }
}
