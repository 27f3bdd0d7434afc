//! Out-of-home event commands.

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Subcommand;
use smartchore_core::{OutOfHomeEvent, SqliteStore, Store};

use super::{parse_date, parse_datetime, CliResult};

#[derive(Subcommand)]
pub enum AwayAction {
    /// Record time a member is out of the house
    Add {
        /// Member ID
        member_id: String,
        /// Start, e.g. 2026-10-16T09:00
        #[arg(long, value_parser = parse_datetime)]
        from: NaiveDateTime,
        /// End, e.g. 2026-10-16T18:00
        #[arg(long, value_parser = parse_datetime)]
        to: NaiveDateTime,
        /// Short description
        #[arg(long, default_value = "Out")]
        title: String,
    },
    /// List events overlapping a day
    List {
        /// Day to show (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AwayAction) -> CliResult {
    let store = SqliteStore::open()?;

    match action {
        AwayAction::Add {
            member_id,
            from,
            to,
            title,
        } => {
            let event = OutOfHomeEvent::new(member_id, title, from, to)?;
            let id = store.add_event(&event)?;
            println!("Event recorded: {id}");
        }
        AwayAction::List { date, json } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let events = store.load_out_of_home(date)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else if events.is_empty() {
                println!("Nobody is away on {date}.");
            } else {
                for event in &events {
                    println!(
                        "{:<12} {} → {}  {}",
                        event.member_id,
                        event.start.format("%m-%d %H:%M"),
                        event.end.format("%m-%d %H:%M"),
                        event.title
                    );
                }
            }
        }
    }
    Ok(())
}
