//! Normalization boundary for member and chore records.
//!
//! Raw records arrive with optional or out-of-range fields (legacy exports,
//! hand-edited JSON, CLI input). They are normalized exactly once here;
//! everything downstream works on complete [`Member`] and [`ChoreInstance`]
//! values. Problems are returned as [`ValidationError`] issues alongside the
//! normalized value and logged; they never abort intake.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::import::infer_skill;
use crate::catalog::{
    ChoreInstance, ChoreStatus, DEFAULT_DIFFICULTY, DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES,
};
use crate::error::ValidationError;
use crate::household::{
    AvailabilityGrid, DisplayName, Member, Preferences, SkillCategory, TimeSlot, MAX_SKILL_LEVEL,
    MIN_SKILL_LEVEL,
};

/// A normalized value plus the issues found while normalizing it.
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub value: T,
    pub issues: Vec<ValidationError>,
}

impl<T> Normalized<T> {
    fn new(value: T, issues: Vec<ValidationError>) -> Self {
        for issue in &issues {
            tracing::warn!(%issue, "normalized record with defaults");
        }
        Self { value, issues }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Member record as stored or imported, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Skill labels to levels. Unknown labels are dropped.
    #[serde(default)]
    pub skills: BTreeMap<String, i64>,
    #[serde(default)]
    pub availability: Option<AvailabilityGrid>,
    #[serde(default)]
    pub liked: Vec<String>,
    #[serde(default)]
    pub disliked: Vec<String>,
}

/// Chore instance record as stored or imported, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoreRecord {
    pub id: String,
    #[serde(default)]
    pub chore_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<i64>,
    #[serde(default)]
    pub time_slot: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

/// Normalize a member record.
pub fn normalize_member(record: MemberRecord) -> Normalized<Member> {
    let mut issues = Vec::new();

    let name = match record.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => DisplayName::new(n),
        _ => {
            issues.push(ValidationError::InvalidMemberData {
                member_id: record.id.clone(),
                field: "name",
                default: DisplayName::PLACEHOLDER.to_string(),
            });
            DisplayName::placeholder()
        }
    };

    let mut skills = BTreeMap::new();
    for (label, level) in &record.skills {
        let Some(skill) = SkillCategory::from_label(label) else {
            issues.push(ValidationError::InvalidValue {
                field: format!("{}.skills", record.id),
                message: format!("unknown skill '{label}' ignored"),
            });
            continue;
        };
        let clamped = (*level).clamp(i64::from(MIN_SKILL_LEVEL), i64::from(MAX_SKILL_LEVEL)) as u8;
        if clamped as i64 != *level {
            issues.push(ValidationError::InvalidMemberData {
                member_id: record.id.clone(),
                field: "skill level",
                default: clamped.to_string(),
            });
        }
        skills.insert(skill, clamped);
    }

    let preferences = Preferences {
        liked: parse_skills(&record.liked),
        disliked: parse_skills(&record.disliked),
    };

    let member = Member {
        id: record.id,
        name,
        skills,
        availability: record.availability.unwrap_or_default(),
        preferences,
    };
    Normalized::new(member, issues)
}

fn parse_skills(labels: &[String]) -> Vec<SkillCategory> {
    labels
        .iter()
        .filter_map(|l| SkillCategory::from_label(l))
        .collect()
}

/// Normalize a chore instance record.
///
/// Missing duration → 30 minutes, missing difficulty → 5, missing or
/// unmappable skill → keyword inference on the name, then `cleaning`.
pub fn normalize_chore(record: ChoreRecord) -> Normalized<ChoreInstance> {
    let mut issues = Vec::new();
    let id = record.id;

    let duration_minutes = match record.duration_minutes {
        Some(d) if d > i64::from(MAX_DURATION_MINUTES) => {
            issues.push(ValidationError::InvalidChoreData {
                chore_id: id.clone(),
                field: "duration",
                default: MAX_DURATION_MINUTES.to_string(),
            });
            MAX_DURATION_MINUTES
        }
        Some(d) if d > 0 => d as u32,
        _ => {
            issues.push(ValidationError::InvalidChoreData {
                chore_id: id.clone(),
                field: "duration",
                default: DEFAULT_DURATION_MINUTES.to_string(),
            });
            DEFAULT_DURATION_MINUTES
        }
    };

    let difficulty = match record.difficulty {
        Some(d) if (1..=10).contains(&d) => d as u8,
        _ => {
            issues.push(ValidationError::InvalidChoreData {
                chore_id: id.clone(),
                field: "difficulty",
                default: DEFAULT_DIFFICULTY.to_string(),
            });
            DEFAULT_DIFFICULTY
        }
    };

    let name = record
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| id.clone());
    let category = record.category.unwrap_or_else(|| "general".to_string());

    let skill = match record.skill.as_deref().and_then(SkillCategory::from_label) {
        Some(skill) => skill,
        None => {
            let inferred = infer_skill(&name, &category);
            if inferred.is_none() {
                issues.push(ValidationError::InvalidChoreData {
                    chore_id: id.clone(),
                    field: "skill",
                    default: SkillCategory::FALLBACK.to_string(),
                });
            }
            inferred.unwrap_or(SkillCategory::FALLBACK)
        }
    };

    let time_slot = record
        .time_slot
        .as_deref()
        .and_then(TimeSlot::from_label)
        .unwrap_or_default();

    let status = record
        .status
        .as_deref()
        .and_then(ChoreStatus::from_label)
        .unwrap_or_default();

    let chore = ChoreInstance {
        chore_id: record.chore_id.unwrap_or_else(|| id.clone()),
        id,
        name,
        category,
        skill,
        duration_minutes,
        difficulty,
        time_slot,
        date: record.date,
        status,
        assignee: record.assignee.filter(|a| !a.is_empty()),
    };
    Normalized::new(chore, issues)
}
