//! CLI command definitions using Clap.
//!
//! Commands are organized into submodules:
//!
//! - `config_cmd` - Configuration file commands
//! - `layout` - Offline layout calculation
//! - `replay` - Scenario replay against the in-memory host

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::AutotileError;
use crate::{config, schema};

pub mod config_cmd;
pub mod layout;
pub mod replay;

pub use config_cmd::ConfigCommands;
pub use layout::LayoutArgs;
pub use replay::ReplayArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Autotile CLI - automatic window tiling engine.
#[derive(Parser, Debug)]
#[command(name = "autotile")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace).
    ///
    /// Ignored when `RUST_LOG` is set.
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Compute tile rectangles for a display.
    ///
    /// Runs the grid and master calculators for a work area and window count
    /// without touching any window.
    Layout(LayoutArgs),

    /// Replay a scenario file.
    ///
    /// Runs the tiling orchestrator against an in-memory desktop described
    /// by a JSONC scenario and prints where every window ended up.
    Replay(ReplayArgs),

    /// Configuration file commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output a JSON Schema.
    ///
    /// Prints the schema of the configuration file, or of scenario files
    /// with `--scenario`. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema {
        /// Print the scenario file schema instead.
        #[arg(long)]
        scenario: bool,
    },

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    ///
    /// Usage:
    ///   eval "$(autotile completions --shell zsh)"
    ///   autotile completions --shell fish > ~/.config/fish/completions/autotile.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), AutotileError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(AutotileError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Layout(args) => layout::execute(args),
            Commands::Replay(args) => replay::execute(args),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema { scenario } => {
                let schema = if *scenario { schema::scenario_schema() } else { schema::config_schema() };
                println!("{}", schema::print_schema(&schema));
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "autotile", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // CLI parsing tests
    // ========================================================================

    #[test]
    fn test_cli_definition_is_valid() { Cli::command().debug_assert(); }

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["autotile", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema { scenario: false }));

        let cli = Cli::try_parse_from(["autotile", "schema", "--scenario"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema { scenario: true }));
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli =
            Cli::try_parse_from(["autotile", "-vv", "--config", "/tmp/a.jsonc", "schema"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config_path(), Some(PathBuf::from("/tmp/a.jsonc")));
    }

    #[test]
    fn test_cli_parses_layout() {
        let cli = Cli::try_parse_from([
            "autotile", "layout", "--width", "2560", "--height", "1440", "-n", "5", "--master",
            "start", "--ratio", "66%",
        ])
        .unwrap();

        let Commands::Layout(args) = cli.command else { panic!("expected layout command") };
        assert_eq!(args.width, 2560);
        assert_eq!(args.windows, 5);
        assert_eq!(args.master.as_deref(), Some("start"));
        assert_eq!(args.padding, None);
    }

    #[test]
    fn test_cli_parses_replay() {
        let cli = Cli::try_parse_from(["autotile", "replay", "scenario.jsonc", "--json"]).unwrap();

        let Commands::Replay(args) = cli.command else { panic!("expected replay command") };
        assert_eq!(args.path, PathBuf::from("scenario.jsonc"));
        assert!(args.json);
    }

    #[test]
    fn test_cli_parses_completions() {
        let cli = Cli::try_parse_from(["autotile", "completions", "--shell", "zsh"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Zsh }));
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["autotile", "wallpaper"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["autotile", "--config", "/nonexistent/autotile.jsonc", "schema"])
            .unwrap();
        assert!(matches!(cli.execute(), Err(AutotileError::ConfigError(_))));
    }
}
