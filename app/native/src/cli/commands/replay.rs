//! Replay CLI command.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::cli::scenario::{ReplayOutcome, load_scenario, replay};
use crate::config;
use crate::error::AutotileError;
use crate::tiling::resolve_display;

/// Arguments of the `replay` command.
#[derive(Args, Debug)]
#[command(after_long_help = r#"Examples:
  autotile replay desk.jsonc           # Print final window frames
  autotile replay desk.jsonc --json    # Output as JSON
  autotile -vv replay desk.jsonc       # Trace every engine decision"#)]
pub struct ReplayArgs {
    /// Scenario file (JSONC).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded or replayed.
pub fn execute(args: &ReplayArgs) -> Result<(), AutotileError> {
    let scenario = load_scenario(&args.path)?;
    let config = config::get_config();

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let outcome = runtime.block_on(replay(scenario, config))?;

    if args.json {
        output::print_highlighted_json(&serde_json::to_value(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn print_outcome(outcome: &ReplayOutcome) {
    #[derive(Tabled)]
    struct WindowRow {
        #[tabled(rename = "ID")]
        id: u32,
        #[tabled(rename = "Frame")]
        frame: String,
        #[tabled(rename = "State")]
        state: String,
        #[tabled(rename = "Display")]
        display: String,
        #[tabled(rename = "Tracked")]
        tracked: String,
    }

    if outcome.windows.is_empty() {
        println!("{}", "No windows left open.".dimmed());
    } else {
        let rows: Vec<WindowRow> = outcome
            .windows
            .iter()
            .map(|w| WindowRow {
                id: w.id,
                frame: output::format_rect(&w.frame),
                state: format!("{:?}", w.state).to_lowercase(),
                display: resolve_display(&outcome.displays, w)
                    .map_or_else(|| "-".to_string(), |d| d.id.to_string()),
                tracked: output::format_bool(outcome.tracked.contains(w.id)),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::first()).with(Alignment::right()))
            .with(Modify::new(Columns::new(3..5)).with(Alignment::center()))
            .to_string();

        println!("{}", format!("Windows ({})", outcome.windows.len()).bold());
        println!("{table}");
    }

    println!(
        "{} {}  {} {}",
        "Moves:".dimmed(),
        outcome.moves,
        "Settled epoch:".dimmed(),
        outcome.settled_epoch
    );
}
