//! CLI-specific functionality for isopod
//!
//! This module contains all CLI-related code including argument parsing,
//! configuration discovery and console rendering.

pub mod args;
pub mod config;
pub mod render;

pub use args::{
    Args, Commands, ContainerCommand, CreateArgs, ImageCommand, LogCommand, NetworkCommand,
    PodCommand, SystemCommand, VolumeCommand,
};
pub use config::ConfigDiscovery;
pub use render::{ConsoleTerminal, render_outcome, render_table};
