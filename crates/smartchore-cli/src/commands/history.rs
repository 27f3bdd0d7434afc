//! Run history commands.

use clap::Args;
use smartchore_core::SqliteStore;

use super::CliResult;

#[derive(Args)]
pub struct HistoryArgs {
    /// Show one stored run in full
    #[arg(long)]
    run: Option<String>,
    /// Number of runs to list
    #[arg(long, default_value = "10")]
    limit: usize,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: HistoryArgs) -> CliResult {
    let store = SqliteStore::open()?;

    if let Some(run_id) = args.run {
        let record = store
            .load_run(&run_id)?
            .ok_or_else(|| format!("unknown run: {run_id}"))?;
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let runs = store.history(args.limit)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
    } else if runs.is_empty() {
        println!("No runs yet.");
    } else {
        for run in &runs {
            println!(
                "{}  {}  score {:.2}  {:>3} chores  {}",
                run.date,
                run.generated_at.format("%Y-%m-%d %H:%M"),
                run.score,
                run.assignment_count,
                run.run_id
            );
        }
    }
    Ok(())
}
