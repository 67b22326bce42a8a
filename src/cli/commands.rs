//! CLI command definitions

use clap::Args;

/// Print the build request the step would submit
#[derive(Debug, Args, Clone)]
pub struct RenderCommand {
    /// Path to source build YAML file
    #[arg(short, long)]
    pub file: String,

    /// Extra architectures to build for
    #[arg(long = "arch")]
    pub architectures: Vec<String>,
}

/// Show what the step requires and creates
#[derive(Debug, Args, Clone)]
pub struct GraphCommand {
    /// Path to source build YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the step against the dry-run delegate
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to source build YAML file
    #[arg(short, long)]
    pub file: String,

    /// Extra architectures to build for
    #[arg(long = "arch")]
    pub architectures: Vec<String>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}
