//! Layout CLI command.
//!
//! Prints the rectangles a tiling pass would assign on a display of a given
//! size, using the effective preferences with command-line overrides.

use clap::Args;
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config::{self, PreferenceKey, UserPreferences};
use crate::error::AutotileError;
use crate::tiling::{Display, Placement, PreferenceUpdate, Rect, TileRole, Window, plan_tiles};

/// Arguments of the `layout` command.
#[derive(Args, Debug)]
#[command(after_long_help = r#"Examples:
  autotile layout -n 4                           # Four windows on 1920x1080
  autotile layout -n 3 --master start --ratio 66%
  autotile layout --width 1080 --height 1920 -n 3 --padding none
  autotile layout -n 2 --json                    # Output as JSON"#)]
pub struct LayoutArgs {
    /// Work area width in pixels.
    #[arg(long, default_value_t = 1920)]
    pub width: i32,

    /// Work area height in pixels.
    #[arg(long, default_value_t = 1080)]
    pub height: i32,

    /// Work area left edge.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub left: i32,

    /// Work area top edge.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub top: i32,

    /// Number of windows to place.
    #[arg(long, short = 'n', default_value_t = 4)]
    pub windows: u32,

    /// Master anchor: start, end or none.
    #[arg(long, value_name = "ANCHOR")]
    pub master: Option<String>,

    /// Master ratio: 33%, 50% or 66%.
    #[arg(long, value_name = "RATIO")]
    pub ratio: Option<String>,

    /// Padding: none, 10, 20 or 30.
    #[arg(long, value_name = "PIXELS")]
    pub padding: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl LayoutArgs {
    /// Returns the configured preferences with the overrides applied.
    fn preferences(&self, base: UserPreferences) -> Result<UserPreferences, AutotileError> {
        let mut preferences = base;

        let overrides = [
            (PreferenceKey::MasterWindow, self.master.as_deref()),
            (PreferenceKey::MasterRatio, self.ratio.as_deref()),
            (PreferenceKey::Padding, self.padding.as_deref()),
        ];

        for (key, value) in overrides {
            if let Some(value) = value {
                PreferenceUpdate::parse(key.as_str(), value)
                    .map_err(|err| AutotileError::InvalidArguments(err.to_string()))?
                    .apply_to(&mut preferences);
            }
        }

        Ok(preferences)
    }

    fn display(&self) -> Result<Display, AutotileError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(AutotileError::InvalidArguments(format!(
                "work area must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        Ok(Display::new(1, Rect::new(self.left, self.top, self.width, self.height)))
    }
}

/// Computes the placements for the given arguments.
///
/// # Errors
///
/// Returns an error if the work area or a preference value is invalid.
pub fn compute(args: &LayoutArgs, base: UserPreferences) -> Result<Vec<Placement>, AutotileError> {
    let preferences = args.preferences(base)?;
    let display = args.display()?;
    let windows = (1..=args.windows).map(|id| Window::new(id, Rect::default())).collect();

    Ok(plan_tiles(&display, windows, &preferences))
}

/// Execute the layout command.
///
/// # Errors
///
/// Returns an error if the arguments are invalid.
pub fn execute(args: &LayoutArgs) -> Result<(), AutotileError> {
    #[derive(Tabled)]
    struct TileRow {
        #[tabled(rename = "Slot")]
        slot: u32,
        #[tabled(rename = "Role")]
        role: String,
        #[tabled(rename = "Position")]
        position: String,
        #[tabled(rename = "Size")]
        size: String,
    }

    let placements = compute(args, config::get_config().preferences)?;

    if args.json {
        let tiles: Vec<_> = placements
            .iter()
            .map(|p| {
                serde_json::json!({
                    "slot": p.window.id,
                    "role": role_name(p.role),
                    "rect": p.target,
                })
            })
            .collect();
        output::print_highlighted_json(&serde_json::Value::Array(tiles));
        return Ok(());
    }

    if placements.is_empty() {
        println!("{}", "No windows to place.".dimmed());
        return Ok(());
    }

    let rows: Vec<TileRow> = placements
        .iter()
        .map(|p| TileRow {
            slot: p.window.id,
            role: role_name(p.role).to_string(),
            position: format!("{}, {}", p.target.left, p.target.top),
            size: format!("{}x{}", p.target.width, p.target.height),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string();

    let (width, height, count) = (args.width, args.height, placements.len());
    println!("{}", format!("Layout on {width}x{height} ({count} windows)").bold());
    println!("{table}");

    Ok(())
}

const fn role_name(role: TileRole) -> &'static str {
    match role {
        TileRole::Master => "master",
        TileRole::Grid => "grid",
    }
}
