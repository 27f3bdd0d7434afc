//! Household members: identity, skills, availability grid and preferences.
//!
//! Members are always fully normalized: every skill level is within 1..=10
//! and the display name is never blank. Raw records from storage or the CLI
//! go through [`crate::intake`] first.

mod skill;

pub use skill::{AvailabilityGrid, DayType, SkillCategory, SlotFlags, TimeSlot};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Skill level assumed when a member has no entry for a category.
pub const DEFAULT_SKILL_LEVEL: u8 = 5;
pub const MIN_SKILL_LEVEL: u8 = 1;
pub const MAX_SKILL_LEVEL: u8 = 10;

/// A display name that is never empty.
///
/// Blank input resolves to [`DisplayName::PLACEHOLDER`] at construction, so
/// user-facing text built from it cannot contain an unresolved name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub const PLACEHOLDER: &'static str = "a member";

    pub fn new(name: impl AsRef<str>) -> Self {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            Self(Self::PLACEHOLDER.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn placeholder() -> Self {
        Self(Self::PLACEHOLDER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == Self::PLACEHOLDER
    }
}

impl From<String> for DisplayName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for DisplayName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Liked / disliked skill categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub liked: Vec<SkillCategory>,
    #[serde(default)]
    pub disliked: Vec<SkillCategory>,
}

impl Preferences {
    pub fn likes(&self, skill: SkillCategory) -> bool {
        self.liked.contains(&skill)
    }

    pub fn dislikes(&self, skill: SkillCategory) -> bool {
        self.disliked.contains(&skill)
    }
}

/// A household member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: DisplayName,
    #[serde(default)]
    pub skills: BTreeMap<SkillCategory, u8>,
    #[serde(default)]
    pub availability: AvailabilityGrid,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Member {
    /// Create a member with no skill ratings and an always-open grid.
    pub fn new(id: impl Into<String>, name: impl AsRef<str>) -> Self {
        Self {
            id: id.into(),
            name: DisplayName::new(name),
            skills: BTreeMap::new(),
            availability: AvailabilityGrid::default(),
            preferences: Preferences::default(),
        }
    }

    /// Builder: rate a skill, clamped into 1..=10.
    pub fn with_skill(mut self, skill: SkillCategory, level: u8) -> Self {
        self.skills
            .insert(skill, level.clamp(MIN_SKILL_LEVEL, MAX_SKILL_LEVEL));
        self
    }

    pub fn with_availability(mut self, availability: AvailabilityGrid) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Rated level for a skill, if the member has one.
    pub fn rated_skill(&self, skill: SkillCategory) -> Option<u8> {
        self.skills.get(&skill).copied()
    }

    /// Level for a skill, defaulting to [`DEFAULT_SKILL_LEVEL`].
    pub fn skill_level(&self, skill: SkillCategory) -> u8 {
        self.rated_skill(skill).unwrap_or(DEFAULT_SKILL_LEVEL)
    }
}
