//! Daily assignment commands.

use chrono::NaiveDate;
use clap::Args;
use smartchore_core::{AssignmentResult, Config, DailyPlanner, SqliteStore, SystemClock};

use super::{parse_date, CliResult};

#[derive(Args)]
pub struct AssignArgs {
    /// Day to plan (default: today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Output the full run as JSON
    #[arg(long)]
    json: bool,
    /// Skip the text advisor even if configured
    #[arg(long)]
    offline: bool,
}

pub fn run(args: AssignArgs) -> CliResult {
    tracing::debug!(date = ?args.date, offline = args.offline, "assign command");
    let config = Config::load()?;
    let store = SqliteStore::open()?;
    let mut planner = DailyPlanner::from_config(&config)?;
    if args.offline {
        planner = planner.offline();
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let run = runtime.block_on(planner.plan(&store, &SystemClock, args.date))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        print_result(&run.result);
        println!("\nRun: {}", run.run_id);
    }
    Ok(())
}

fn print_result(result: &AssignmentResult) {
    println!("Chores for {}", result.date);
    if result.is_empty() {
        println!("  (nothing due)");
    }
    for a in &result.assignments {
        let mut flags = String::new();
        if a.completed {
            flags.push_str(" [done]");
        }
        if a.repaired {
            flags.push_str(" [rebalanced]");
        }
        if let Some(previous) = &a.previous_assignee {
            flags.push_str(&format!(" [was {previous}]"));
        }
        println!(
            "  {:<9} {:<28} {:<14} {:>4} min  {}{}",
            a.time_slot.as_str(),
            a.chore_name,
            a.member_name.as_str(),
            a.duration_minutes,
            a.reason,
            flags
        );
    }

    println!("\nWorkload");
    for w in &result.workloads {
        println!(
            "  {:<14} {:>4} min  {:>2} chores",
            w.display_name.as_str(),
            w.total_minutes,
            w.task_count
        );
    }

    println!("\n{}", result.fairness.narrative);

    if !result.advisories.is_empty() {
        println!("\nAdvice");
        for advisory in &result.advisories {
            println!("  [{}] {}", advisory.severity, advisory.message);
        }
    }
}

/// Mark a stored chore instance completed.
pub fn complete(instance_id: &str) -> CliResult {
    let store = SqliteStore::open()?;
    if store.complete_instance(instance_id)? {
        println!("Completed: {instance_id}");
        Ok(())
    } else {
        Err(format!("unknown chore instance: {instance_id}").into())
    }
}
