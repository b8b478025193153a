//! Autotile - automatic window tiling engine.
//!
//! Keeps application windows arranged in a non-overlapping grid on every
//! display, with an optional master window, reacting to window, display and
//! preference events from an embedding host.
//!
//! The host implements [`tiling::Host`]; [`tiling::Orchestrator::spawn`]
//! returns a handle that accepts its events. The library also backs the
//! `autotile` command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod schema;
pub mod tiling;
