//! Chore catalog: immutable chore definitions and their per-day instances.
//!
//! The catalog is an explicitly constructed value. Callers build it once
//! (from [`ChoreCatalog::household_default`] or a TOML file) and pass it to
//! whatever needs it.

pub mod import;
mod instance;

pub use instance::{ChoreInstance, ChoreStatus};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::household::{SkillCategory, TimeSlot};

/// Defaults applied when a chore record lacks duration or difficulty.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_DIFFICULTY: u8 = 5;
/// Longest duration a single chore may have: one full day.
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// How often a chore recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

type DefaultChore = (
    &'static str,
    &'static str,
    &'static str,
    u32,
    u8,
    SkillCategory,
    Cadence,
    TimeSlot,
    &'static str,
);

/// id, name, category, minutes, difficulty, skill, cadence, slot, description
#[rustfmt::skip]
const DEFAULT_CHORES: &[DefaultChore] = {
    use Cadence::*;
    use SkillCategory::*;
    use TimeSlot::*;
    &[
        ("cooking_breakfast", "Make breakfast", "kitchen", 30, 5, Cooking, Daily, Morning, "Prepare breakfast for the family"),
        ("cooking_dinner", "Cook dinner", "kitchen", 60, 7, Cooking, Daily, Evening, "Prepare a balanced dinner"),
        ("dishes", "Wash dishes", "kitchen", 20, 3, Cleaning, Daily, Evening, "Wash and put away dishes after meals"),
        ("trash_prep", "Gather trash", "tidying", 10, 2, Cleaning, Daily, Evening, "Collect and sort trash from every room"),
        ("laundry", "Laundry", "laundry", 120, 4, Laundry, Weekly, Morning, "Wash, dry and fold clothes"),
        ("vacuum", "Vacuum", "floors", 45, 5, Cleaning, Weekly, Afternoon, "Vacuum the whole house"),
        ("grocery_shopping", "Grocery shopping", "errands", 90, 6, Shopping, Weekly, Afternoon, "Buy groceries for the week"),
        ("bathroom_cleaning", "Clean bathroom and toilet", "bathroom", 60, 6, Cleaning, Weekly, Afternoon, "Scrub bath and toilet"),
        ("floor_mopping", "Mop floors", "floors", 40, 4, Cleaning, Weekly, Afternoon, "Wet-mop all floors"),
        ("deep_cleaning", "Deep cleaning", "whole house", 180, 8, Cleaning, Monthly, Afternoon, "Thorough whole-house cleaning"),
        ("organization", "Tidy and organize", "tidying", 120, 5, Cleaning, Monthly, Afternoon, "Declutter and organize each room"),
        ("appliance_maintenance", "Appliance maintenance", "upkeep", 90, 7, Maintenance, Monthly, Afternoon, "Clean and inspect fridge, washer and other appliances"),
        ("window_cleaning", "Clean windows", "whole house", 60, 6, Cleaning, Monthly, Afternoon, "Wipe all windows inside and out"),
    ]
};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreDefinition {
    pub id: String,
    pub name: String,
    pub category: String,
    pub duration_minutes: u32,
    pub difficulty: u8,
    pub skill: SkillCategory,
    pub cadence: Cadence,
    #[serde(default)]
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub description: String,
}

impl ChoreDefinition {
    /// Instantiate this chore for a date.
    pub fn instantiate(&self, date: NaiveDate) -> ChoreInstance {
        ChoreInstance {
            id: format!("{}@{}", self.id, date),
            chore_id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            skill: self.skill,
            duration_minutes: self.duration_minutes,
            difficulty: self.difficulty,
            time_slot: self.time_slot,
            date,
            status: ChoreStatus::Pending,
            assignee: None,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "id".to_string(),
                message: format!("chore '{}' has an empty id", self.name),
            });
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.duration_minutes", self.id),
                message: "must be positive".to_string(),
            });
        }
        if self.duration_minutes > MAX_DURATION_MINUTES {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.duration_minutes", self.id),
                message: format!(
                    "{} exceeds {MAX_DURATION_MINUTES}",
                    self.duration_minutes
                ),
            });
        }
        if !(1..=10).contains(&self.difficulty) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.difficulty", self.id),
                message: format!("{} is outside 1..=10", self.difficulty),
            });
        }
        Ok(())
    }
}

/// When weekly and monthly chores fall due.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CadenceConfig {
    /// Weekday weekly chores are instantiated on.
    #[serde(default = "default_weekly_day")]
    pub weekly_day: Weekday,
    /// Day of month monthly chores are instantiated on (clamped to month end).
    #[serde(default = "default_monthly_day")]
    pub monthly_day: u32,
}

fn default_weekly_day() -> Weekday {
    Weekday::Sat
}

fn default_monthly_day() -> u32 {
    1
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            weekly_day: default_weekly_day(),
            monthly_day: default_monthly_day(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "chore")]
    chores: Vec<ChoreDefinition>,
}

/// Registry of chore definitions.
#[derive(Debug, Clone, Default)]
pub struct ChoreCatalog {
    chores: Vec<ChoreDefinition>,
}

impl ChoreCatalog {
    /// Build a catalog from definitions, rejecting invalid or duplicate ids.
    pub fn new(chores: Vec<ChoreDefinition>) -> Result<Self, ValidationError> {
        let mut seen = std::collections::HashSet::new();
        for chore in &chores {
            chore.validate()?;
            if !seen.insert(chore.id.as_str()) {
                return Err(ValidationError::InvalidValue {
                    field: "id".to_string(),
                    message: format!("duplicate chore id '{}'", chore.id),
                });
            }
        }
        Ok(Self { chores })
    }

    /// Parse a catalog from TOML (`[[chore]]` tables).
    pub fn from_toml_str(content: &str) -> Result<Self, ValidationError> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| ValidationError::InvalidValue {
            field: "catalog".to_string(),
            message: e.to_string(),
        })?;
        Self::new(file.chores)
    }

    /// The standard household catalog.
    pub fn household_default() -> Self {
        let chores = DEFAULT_CHORES
            .iter()
            .map(|&(id, name, category, duration, difficulty, skill, cadence, slot, description)| {
                ChoreDefinition {
                    id: id.to_string(),
                    name: name.to_string(),
                    category: category.to_string(),
                    duration_minutes: duration,
                    difficulty,
                    skill,
                    cadence,
                    time_slot: slot,
                    description: description.to_string(),
                }
            })
            .collect();
        Self { chores }
    }

    pub fn chores(&self) -> &[ChoreDefinition] {
        &self.chores
    }

    pub fn len(&self) -> usize {
        self.chores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chores.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ChoreDefinition> {
        self.chores.iter().find(|c| c.id == id)
    }

    pub fn by_cadence(&self, cadence: Cadence) -> impl Iterator<Item = &ChoreDefinition> {
        self.chores.iter().filter(move |c| c.cadence == cadence)
    }

    /// Chores due on `date`, in catalog order.
    pub fn instantiate_for(&self, date: NaiveDate, cadence: &CadenceConfig) -> Vec<ChoreInstance> {
        self.chores
            .iter()
            .filter(|c| is_due(c.cadence, date, cadence))
            .map(|c| c.instantiate(date))
            .collect()
    }
}

fn is_due(cadence: Cadence, date: NaiveDate, config: &CadenceConfig) -> bool {
    match cadence {
        Cadence::Daily => true,
        Cadence::Weekly => date.weekday() == config.weekly_day,
        Cadence::Monthly => date.day() == config.monthly_day.clamp(1, last_day_of_month(date)),
    }
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|first| first.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_catalog_is_valid() {
        let catalog = ChoreCatalog::household_default();
        assert_eq!(catalog.len(), 13);
        assert!(ChoreCatalog::new(catalog.chores().to_vec()).is_ok());
        assert_eq!(catalog.by_cadence(Cadence::Daily).count(), 4);
        assert_eq!(catalog.by_cadence(Cadence::Weekly).count(), 5);
        assert_eq!(catalog.by_cadence(Cadence::Monthly).count(), 4);
        assert_eq!(catalog.get("cooking_dinner").unwrap().category, "kitchen");
        assert!(catalog
            .chores()
            .iter()
            .all(|c| c.category != c.cadence.as_str()));
    }

    #[test]
    fn weekday_gets_only_daily_chores() {
        let catalog = ChoreCatalog::household_default();
        // 2026-10-14 is a Wednesday
        let chores = catalog.instantiate_for(date(2026, 10, 14), &CadenceConfig::default());
        assert_eq!(chores.len(), 4);
        assert!(chores.iter().all(|c| c.date == date(2026, 10, 14)));
        assert_eq!(chores[0].id, "cooking_breakfast@2026-10-14");
    }

    #[test]
    fn weekly_day_adds_weekly_chores() {
        let catalog = ChoreCatalog::household_default();
        // 2026-10-17 is a Saturday
        let chores = catalog.instantiate_for(date(2026, 10, 17), &CadenceConfig::default());
        assert_eq!(chores.len(), 9);
    }

    #[test]
    fn monthly_day_is_clamped_to_month_end() {
        let catalog = ChoreCatalog::household_default();
        let config = CadenceConfig {
            weekly_day: Weekday::Sun,
            monthly_day: 31,
        };
        // February 2027 has 28 days; 2027-02-28 is a Sunday
        let chores = catalog.instantiate_for(date(2027, 2, 28), &config);
        assert_eq!(chores.len(), 4 + 5 + 4);
        let chores = catalog.instantiate_for(date(2027, 2, 27), &config);
        assert_eq!(chores.len(), 4);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let catalog = ChoreCatalog::household_default();
        let mut chores = catalog.chores().to_vec();
        chores.push(chores[0].clone());
        assert!(ChoreCatalog::new(chores).is_err());
    }

    #[test]
    fn parses_toml_catalog() {
        let toml = r#"
            [[chore]]
            id = "plants"
            name = "Water plants"
            category = "garden"
            duration_minutes = 15
            difficulty = 1
            skill = "maintenance"
            cadence = "daily"
            time_slot = "morning"
        "#;
        let catalog = ChoreCatalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.len(), 1);
        let plants = catalog.get("plants").unwrap();
        assert_eq!(plants.time_slot, TimeSlot::Morning);
        assert_eq!(plants.skill, SkillCategory::Maintenance);
    }

    #[test]
    fn rejects_duration_longer_than_a_day() {
        let toml = r#"
            [[chore]]
            id = "marathon"
            name = "Marathon clean"
            category = "whole house"
            duration_minutes = 500000000
            difficulty = 10
            skill = "cleaning"
            cadence = "daily"
        "#;
        assert!(ChoreCatalog::from_toml_str(toml).is_err());
    }

    #[test]
    fn rejects_out_of_range_difficulty() {
        let toml = r#"
            [[chore]]
            id = "x"
            name = "X"
            category = "misc"
            duration_minutes = 15
            difficulty = 11
            skill = "cleaning"
            cadence = "daily"
        "#;
        assert!(ChoreCatalog::from_toml_str(toml).is_err());
    }
}
