//! Member availability from out-of-home time blocks.
//!
//! Availability is a hint for the assignment engine, never a hard
//! exclusion: when nobody would be available the full roster is used
//! instead, so a day can always be solved.

mod event;

pub use event::OutOfHomeEvent;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::household::{Member, TimeSlot};

/// Everything the availability model needs to know about one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub date: NaiveDate,
    #[serde(default)]
    pub events: Vec<OutOfHomeEvent>,
}

impl AvailabilitySnapshot {
    pub fn new(date: NaiveDate, events: Vec<OutOfHomeEvent>) -> Self {
        Self { date, events }
    }

    /// A snapshot with nobody away.
    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, Vec::new())
    }

    pub fn events_for<'a>(
        &'a self,
        member_id: &'a str,
    ) -> impl Iterator<Item = &'a OutOfHomeEvent> + 'a {
        self.events.iter().filter(move |e| e.member_id == member_id)
    }
}

/// Check instants and thresholds for the availability model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// Early-morning instant checked for presence at home.
    #[serde(default = "default_morning_check")]
    pub morning_check: NaiveTime,
    /// Late-evening instant checked for presence at home.
    #[serde(default = "default_evening_check")]
    pub evening_check: NaiveTime,
    /// Availability rate below which the advisor flags the day.
    #[serde(default = "default_low_rate")]
    pub low_rate_threshold: f64,
}

fn default_morning_check() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_evening_check() -> NaiveTime {
    NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_low_rate() -> f64 {
    0.5
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            morning_check: default_morning_check(),
            evening_check: default_evening_check(),
            low_rate_threshold: default_low_rate(),
        }
    }
}

/// Computes who is home on a given day and how much of each slot they have.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityModel {
    config: AvailabilityConfig,
}

impl AvailabilityModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AvailabilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AvailabilityConfig {
        &self.config
    }

    /// True if the member is home at either check instant on the snapshot date.
    pub fn is_available(&self, member: &Member, snapshot: &AvailabilitySnapshot) -> bool {
        let checks = [
            snapshot.date.and_time(self.config.morning_check),
            snapshot.date.and_time(self.config.evening_check),
        ];
        checks.iter().any(|instant| {
            !snapshot
                .events_for(&member.id)
                .any(|e| e.covers(*instant))
        })
    }

    /// Members available on the snapshot date, in roster order. May be empty.
    pub fn available_members<'a>(
        &self,
        roster: &'a [Member],
        snapshot: &AvailabilitySnapshot,
    ) -> Vec<&'a Member> {
        roster
            .iter()
            .filter(|m| self.is_available(m, snapshot))
            .collect()
    }

    /// Available members, or the full roster when nobody is available.
    pub fn available_members_or_all(
        &self,
        roster: &[Member],
        snapshot: &AvailabilitySnapshot,
    ) -> Vec<Member> {
        let available = self.available_members(roster, snapshot);
        if available.is_empty() {
            tracing::info!(
                date = %snapshot.date,
                roster = roster.len(),
                "nobody available; falling back to full roster"
            );
            roster.to_vec()
        } else {
            available.into_iter().cloned().collect()
        }
    }

    /// `|available| / |roster|`; 1.0 for an empty roster.
    pub fn availability_rate(&self, roster: &[Member], snapshot: &AvailabilitySnapshot) -> f64 {
        if roster.is_empty() {
            return 1.0;
        }
        self.available_members(roster, snapshot).len() as f64 / roster.len() as f64
    }

    pub fn is_low_rate(&self, rate: f64) -> bool {
        rate < self.config.low_rate_threshold
    }

    /// Minutes of `slot` the member can spend at home on the snapshot date.
    ///
    /// Zero when the member's grid closes the slot; otherwise the slot
    /// window minus overlap with their out-of-home events. `Anytime` sums
    /// the open concrete slots.
    pub fn slot_free_minutes(
        &self,
        member: &Member,
        snapshot: &AvailabilitySnapshot,
        slot: TimeSlot,
    ) -> i64 {
        match slot {
            TimeSlot::Anytime => TimeSlot::CONCRETE
                .iter()
                .map(|s| self.slot_free_minutes(member, snapshot, *s))
                .sum(),
            concrete => {
                if !member.availability.is_open(snapshot.date, concrete) {
                    return 0;
                }
                let Some((start, end)) = concrete.window() else {
                    return 0;
                };
                let window_start = snapshot.date.and_time(start);
                let window_end = snapshot.date.and_time(end);
                let busy = busy_minutes(
                    snapshot.events_for(&member.id),
                    window_start,
                    window_end,
                );
                ((window_end - window_start).num_minutes() - busy).max(0)
            }
        }
    }
}

/// Minutes of `[start, end)` covered by the union of `events`.
fn busy_minutes<'a>(
    events: impl Iterator<Item = &'a OutOfHomeEvent>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> i64 {
    let mut spans: Vec<(NaiveDateTime, NaiveDateTime)> = events
        .filter_map(|e| e.clip(start, end))
        .collect();
    spans.sort();

    let mut total = 0;
    let mut cursor = start;
    for (s, e) in spans {
        let s = s.max(cursor);
        if e > s {
            total += (e - s).num_minutes();
            cursor = e;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{AvailabilityGrid, SlotFlags};

    fn date() -> NaiveDate {
        // Friday
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    fn away(member: &str, from: NaiveDateTime, to: NaiveDateTime) -> OutOfHomeEvent {
        OutOfHomeEvent::new(member, "Out", from, to).unwrap()
    }

    fn roster() -> Vec<Member> {
        vec![Member::new("a", "Alice"), Member::new("b", "Bob")]
    }

    #[test]
    fn member_away_all_day_is_unavailable() {
        let snapshot = AvailabilitySnapshot::new(
            date(),
            vec![away("a", at(5, 0), at(23, 30))],
        );
        let model = AvailabilityModel::new();
        let members = roster();
        let available = model.available_members(&members, &snapshot);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, "b");
        assert_eq!(model.availability_rate(&roster(), &snapshot), 0.5);
    }

    #[test]
    fn one_free_check_window_is_enough() {
        // Away 8:00-22:00 covers the evening check but not the morning one
        let snapshot = AvailabilitySnapshot::new(date(), vec![away("a", at(8, 0), at(22, 0))]);
        let model = AvailabilityModel::new();
        assert!(model.is_available(&roster()[0], &snapshot));
    }

    #[test]
    fn nobody_available_falls_back_to_full_roster() {
        let snapshot = AvailabilitySnapshot::new(
            date(),
            vec![
                away("a", at(0, 0), at(23, 59)),
                away("b", at(0, 0), at(23, 59)),
            ],
        );
        let model = AvailabilityModel::new();
        assert!(model.available_members(&roster(), &snapshot).is_empty());
        assert_eq!(model.available_members_or_all(&roster(), &snapshot).len(), 2);
        assert_eq!(model.availability_rate(&roster(), &snapshot), 0.0);
    }

    #[test]
    fn empty_roster_rate_is_one() {
        let model = AvailabilityModel::new();
        assert_eq!(model.availability_rate(&[], &AvailabilitySnapshot::empty(date())), 1.0);
    }

    #[test]
    fn slot_free_minutes_subtracts_overlapping_events() {
        let snapshot = AvailabilitySnapshot::new(
            date(),
            vec![
                away("a", at(9, 0), at(10, 0)),
                // overlaps the first event by 30 minutes
                away("a", at(9, 30), at(11, 0)),
            ],
        );
        let model = AvailabilityModel::new();
        let alice = &roster()[0];
        assert_eq!(model.slot_free_minutes(alice, &snapshot, TimeSlot::Morning), 360 - 120);
        assert_eq!(model.slot_free_minutes(alice, &snapshot, TimeSlot::Afternoon), 360);
        assert_eq!(
            model.slot_free_minutes(alice, &snapshot, TimeSlot::Anytime),
            240 + 360 + 300
        );
    }

    #[test]
    fn closed_grid_slot_has_no_free_time() {
        let member = Member::new("a", "Alice").with_availability(AvailabilityGrid {
            weekday: SlotFlags {
                morning: false,
                afternoon: true,
                evening: true,
            },
            weekend: SlotFlags::default(),
        });
        let model = AvailabilityModel::new();
        let snapshot = AvailabilitySnapshot::empty(date());
        assert_eq!(model.slot_free_minutes(&member, &snapshot, TimeSlot::Morning), 0);
        assert_eq!(model.slot_free_minutes(&member, &snapshot, TimeSlot::Evening), 300);
    }
}
