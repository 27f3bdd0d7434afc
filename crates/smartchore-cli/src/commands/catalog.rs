//! Chore catalog commands.

use chrono::NaiveDate;
use clap::Subcommand;
use smartchore_core::Config;

use super::{parse_date, CliResult};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List catalog chores, or only those due on a date
    List {
        /// Only chores due on this day
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: CatalogAction) -> CliResult {
    let config = Config::load()?;
    let catalog = config.catalog.load_catalog()?;

    match action {
        CatalogAction::List { date: Some(date), json } => {
            let due = catalog.instantiate_for(date, &config.catalog.cadence);
            if json {
                println!("{}", serde_json::to_string_pretty(&due)?);
            } else {
                for chore in &due {
                    println!(
                        "{:<28} {:<10} {:>4} min  difficulty {:<2} {}",
                        chore.id,
                        chore.skill.as_str(),
                        chore.duration_minutes,
                        chore.difficulty,
                        chore.time_slot.as_str()
                    );
                }
            }
        }
        CatalogAction::List { date: None, json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.chores())?);
            } else {
                for chore in catalog.chores() {
                    println!(
                        "{:<22} {:<8} {:<10} {:>4} min  difficulty {:<2} {}",
                        chore.id,
                        chore.cadence.as_str(),
                        chore.skill.as_str(),
                        chore.duration_minutes,
                        chore.difficulty,
                        chore.name
                    );
                }
            }
        }
    }
    Ok(())
}
