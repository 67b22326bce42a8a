//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{GraphCommand, RenderCommand, RunCommand};
use std::ffi::OsString;

/// Source image build step
#[derive(Debug, Parser, Clone)]
#[command(name = "srcbuild")]
#[command(version = "0.1.0")]
#[command(about = "Builds a job's git checkout into the pipeline root image", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the build request as JSON
    Render(RenderCommand),

    /// Print the step's dependency links
    Graph(GraphCommand),

    /// Run the step without a platform
    Run(RunCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
