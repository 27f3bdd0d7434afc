//! Household member commands.

use chrono::Local;
use clap::Subcommand;
use smartchore_core::intake::{normalize_member, MemberRecord};
use smartchore_core::{AvailabilityGrid, SqliteStore, Store, TimeSlot};
use std::collections::BTreeMap;

use super::CliResult;

#[derive(Subcommand)]
pub enum MemberAction {
    /// Add or update a member
    Add {
        /// Member ID
        id: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Skill rating as label=level, e.g. cooking=8 (repeatable)
        #[arg(long = "skill", value_parser = parse_skill)]
        skills: Vec<(String, i64)>,
        /// Closed slot as weekday:evening or weekend:morning (repeatable)
        #[arg(long = "unavailable", value_parser = parse_closed_slot)]
        unavailable: Vec<(bool, TimeSlot)>,
        /// Liked skill category (repeatable)
        #[arg(long = "like")]
        liked: Vec<String>,
        /// Disliked skill category (repeatable)
        #[arg(long = "dislike")]
        disliked: Vec<String>,
    },
    /// List members
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a member; their pending chores from today on become unassigned
    Remove {
        /// Member ID
        id: String,
    },
}

fn parse_skill(s: &str) -> Result<(String, i64), String> {
    let (label, level) = s
        .split_once('=')
        .ok_or_else(|| format!("expected label=level, got '{s}'"))?;
    let level = level
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid level in '{s}': {e}"))?;
    Ok((label.trim().to_string(), level))
}

/// `weekday:evening` → (is_weekend = false, Evening)
fn parse_closed_slot(s: &str) -> Result<(bool, TimeSlot), String> {
    let (day, slot) = s
        .split_once(':')
        .ok_or_else(|| format!("expected weekday:slot or weekend:slot, got '{s}'"))?;
    let weekend = match day.trim() {
        "weekday" => false,
        "weekend" => true,
        other => return Err(format!("unknown day type '{other}'")),
    };
    match TimeSlot::from_label(slot) {
        Some(TimeSlot::Anytime) | None => Err(format!("unknown slot '{slot}'")),
        Some(slot) => Ok((weekend, slot)),
    }
}

fn grid(closed: &[(bool, TimeSlot)]) -> AvailabilityGrid {
    let mut grid = AvailabilityGrid::default();
    for &(weekend, slot) in closed {
        let flags = if weekend { &mut grid.weekend } else { &mut grid.weekday };
        match slot {
            TimeSlot::Morning => flags.morning = false,
            TimeSlot::Afternoon => flags.afternoon = false,
            TimeSlot::Evening => flags.evening = false,
            TimeSlot::Anytime => {}
        }
    }
    grid
}

pub fn run(action: MemberAction) -> CliResult {
    let store = SqliteStore::open()?;

    match action {
        MemberAction::Add {
            id,
            name,
            skills,
            unavailable,
            liked,
            disliked,
        } => {
            let record = MemberRecord {
                id,
                name,
                skills: skills.into_iter().collect::<BTreeMap<_, _>>(),
                availability: (!unavailable.is_empty()).then(|| grid(&unavailable)),
                liked,
                disliked,
            };
            let normalized = normalize_member(record);
            for issue in &normalized.issues {
                eprintln!("warning: {issue}");
            }
            store.add_member(&normalized.value)?;
            println!("Member saved: {}", normalized.value.id);
        }
        MemberAction::List { json } => {
            let roster = store.load_roster()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&roster)?);
            } else if roster.is_empty() {
                println!("No members.");
            } else {
                for member in &roster {
                    let skills = member
                        .skills
                        .iter()
                        .map(|(skill, level)| format!("{skill}={level}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!("{:<12} {:<16} {}", member.id, member.name.as_str(), skills);
                }
            }
        }
        MemberAction::Remove { id } => {
            let today = Local::now().date_naive();
            let cleared = store.remove_member(&id, today)?;
            println!("Member removed: {id} ({cleared} pending chores unassigned)");
        }
    }
    Ok(())
}
