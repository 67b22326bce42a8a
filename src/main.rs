use anyhow::{Context, Result};
use srcbuild::build::{DryRunDelegate, InMemoryBuildClient, RecordingMetrics, RunContext};
use srcbuild::cli::commands::{GraphCommand, RenderCommand, RunCommand};
use srcbuild::cli::output::*;
use srcbuild::cli::{Cli, Command};
use srcbuild::core::SourceBuildConfig;
use srcbuild::step::{BuildCollaborators, GitSourceStep, MultiArchStep, Step};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Render(cmd) => render_spec(cmd)?,
        Command::Graph(cmd) => show_graph(cmd)?,
        Command::Run(cmd) => run_step(cmd).await?,
    }

    Ok(())
}

/// Load the config and construct the step with its seeded architectures
fn load_step(
    file: &str,
    extra_architectures: &[String],
    delegate: Arc<DryRunDelegate>,
    metrics: Arc<RecordingMetrics>,
) -> Result<GitSourceStep> {
    let config = SourceBuildConfig::from_file(file)
        .with_context(|| format!("Failed to load source build config from {}", file))?;

    let client = Arc::new(InMemoryBuildClient::new());
    let step = GitSourceStep::new(
        config.inputs,
        config.resources,
        Arc::new(config.job),
        config.clone_auth,
        config.pull_secret,
        BuildCollaborators {
            delegate,
            build_client: client.clone(),
            pod_client: client,
            metrics,
        },
    );
    step.add_architectures(&config.architectures);
    step.add_architectures(extra_architectures);
    Ok(step)
}

fn render_spec(cmd: &RenderCommand) -> Result<()> {
    let step = load_step(
        &cmd.file,
        &cmd.architectures,
        Arc::new(DryRunDelegate::new()),
        Arc::new(RecordingMetrics::new()),
    )?;

    let spec = step
        .build_spec()
        .with_context(|| format!("Failed to build spec for {}", step.name()))?;
    println!("{}", serde_json::to_string_pretty(&spec)?);
    Ok(())
}

fn show_graph(cmd: &GraphCommand) -> Result<()> {
    let step = load_step(
        &cmd.file,
        &[],
        Arc::new(DryRunDelegate::new()),
        Arc::new(RecordingMetrics::new()),
    )?;

    if cmd.json {
        let data = serde_json::json!({
            "name": step.name(),
            "description": step.description(),
            "requires": step.requires(),
            "creates": step.creates(),
            "inputs": step.inputs()?,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} {}", INFO, style(step.name()).bold());
    println!("  {}", style(step.description()).dim());
    println!("  Requires: {}", format_links(&step.requires()));
    println!("  Creates:  {}", format_links(&step.creates()));
    Ok(())
}

async fn run_step(cmd: &RunCommand) -> Result<()> {
    let delegate = Arc::new(DryRunDelegate::new());
    let metrics = Arc::new(RecordingMetrics::new());
    let step = load_step(&cmd.file, &cmd.architectures, delegate, metrics.clone())?;

    step.validate()?;

    let mut ctx = RunContext::new();
    if let Some(secs) = cmd.timeout_secs {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    let result = step.run(&ctx).await;

    for (name, outcome, duration) in metrics.records() {
        println!("{}", format_build_record(&name, outcome, duration));
    }

    match result {
        Ok(()) => {
            println!(
                "\n{} {} completed {}",
                CHECK,
                style(step.name()).bold(),
                style("successfully").green()
            );
            for object in step.objects() {
                println!("  {}/{} {}", object.namespace, object.kind, object.name);
            }
            Ok(())
        }
        Err(failure) => {
            println!(
                "\n{} {} {} ({})",
                CROSS,
                style(step.name()).bold(),
                style("failed").red(),
                failure.reason
            );
            std::process::exit(1);
        }
    }
}
