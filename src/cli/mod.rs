// Command-line interface for minim

pub mod commands;
pub mod output;

pub use output::{OutputFormat, OutputFormatter};
