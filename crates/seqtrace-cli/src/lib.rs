mod args;
mod commands;
pub mod config;
mod handlers;

pub use args::{AnalyzeArgs, Cli, Commands, TemplatesCommand};
pub use commands::run;
