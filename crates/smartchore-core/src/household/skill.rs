//! Skill categories, time-of-day slots and the per-member availability grid.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Skill category a chore requires and a member is rated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Cooking,
    Cleaning,
    Laundry,
    Shopping,
    Childcare,
    Maintenance,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 6] = [
        SkillCategory::Cooking,
        SkillCategory::Cleaning,
        SkillCategory::Laundry,
        SkillCategory::Shopping,
        SkillCategory::Childcare,
        SkillCategory::Maintenance,
    ];

    /// Fallback category for chores whose skill cannot be mapped.
    pub const FALLBACK: SkillCategory = SkillCategory::Cleaning;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cooking => "cooking",
            Self::Cleaning => "cleaning",
            Self::Laundry => "laundry",
            Self::Shopping => "shopping",
            Self::Childcare => "childcare",
            Self::Maintenance => "maintenance",
        }
    }

    /// Parse a canonical label (case-insensitive). Free text is not
    /// inferred here; see `catalog::import::infer_skill` for that.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|s| s.as_str() == label)
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred time-of-day for a chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Anytime,
}

impl TimeSlot {
    /// The concrete slots, in day order.
    pub const CONCRETE: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Anytime => "anytime",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            "evening" => Some(Self::Evening),
            "anytime" | "" => Some(Self::Anytime),
            _ => None,
        }
    }

    /// Household-local window for a concrete slot. `Anytime` has none.
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        let hm = |h: u32, m: u32| NaiveTime::from_hms_opt(h, m, 0);
        match self {
            Self::Morning => Some((hm(6, 0)?, hm(12, 0)?)),
            Self::Afternoon => Some((hm(12, 0)?, hm(18, 0)?)),
            Self::Evening => Some((hm(18, 0)?, hm(23, 0)?)),
            Self::Anytime => None,
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekday or weekend, the two rows of the availability grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weekday,
        }
    }
}

/// Morning / afternoon / evening flags for one day type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFlags {
    #[serde(default = "default_true")]
    pub morning: bool,
    #[serde(default = "default_true")]
    pub afternoon: bool,
    #[serde(default = "default_true")]
    pub evening: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SlotFlags {
    fn default() -> Self {
        Self {
            morning: true,
            afternoon: true,
            evening: true,
        }
    }
}

impl SlotFlags {
    pub fn is_open(&self, slot: TimeSlot) -> bool {
        match slot {
            TimeSlot::Morning => self.morning,
            TimeSlot::Afternoon => self.afternoon,
            TimeSlot::Evening => self.evening,
            TimeSlot::Anytime => self.morning || self.afternoon || self.evening,
        }
    }
}

/// Weekday/weekend × morning/afternoon/evening availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AvailabilityGrid {
    #[serde(default)]
    pub weekday: SlotFlags,
    #[serde(default)]
    pub weekend: SlotFlags,
}

impl AvailabilityGrid {
    pub fn flags(&self, day: DayType) -> &SlotFlags {
        match day {
            DayType::Weekday => &self.weekday,
            DayType::Weekend => &self.weekend,
        }
    }

    pub fn is_open(&self, date: NaiveDate, slot: TimeSlot) -> bool {
        self.flags(DayType::of(date)).is_open(slot)
    }
}
