//! Config CLI commands.

use clap::Subcommand;
use colored::Colorize;

use crate::cli::output;
use crate::config::{self, config_paths};
use crate::error::AutotileError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Show the configuration file search paths.
    ///
    /// Lists every location Autotile looks for a configuration file, in
    /// priority order, and marks the one in use.
    Path,

    /// Show the effective configuration.
    ///
    /// Prints the loaded configuration as JSON, with defaults filled in for
    /// every missing option.
    Show,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), AutotileError> {
    match cmd {
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
        ConfigCommands::Show => show_config(),
    }
}

fn show_config_path() {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;

    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)".green().to_string()
        } else if exists {
            " (exists)".dimmed().to_string()
        } else {
            String::new()
        };

        println!("  {}. {}{marker}", i + 1, path.display());
    }

    if !found_config {
        println!("\n{}", "No configuration file found, defaults are in use.".dimmed());
    }
}

fn show_config() -> Result<(), AutotileError> {
    let config = config::get_config();

    if let Some(path) = config::get_config_path() {
        println!("{} {}", "Loaded from".dimmed(), path.display());
    }

    output::print_highlighted_json(&serde_json::to_value(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_command_succeeds() {
        assert!(execute(&ConfigCommands::Path).is_ok());
    }

    #[test]
    fn test_show_command_succeeds() {
        assert!(execute(&ConfigCommands::Show).is_ok());
    }
}
