//! OSDI validation command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use osdi_validate::{Harness, HarnessConfig, SystemRunner};

#[derive(Parser)]
#[command(name = "osdi-validate")]
#[command(about = "Validate an OSDI device model against the simulator's built-in model")]
#[command(version)]
struct Cli {
    /// Netlist template carrying both backend activation markers
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// OSDI model source file to compile (e.g. diode_va.c)
    #[arg(short, long, value_name = "FILE")]
    model: PathBuf,

    /// Include path for the simulator's OSDI interface headers
    #[arg(short = 'I', long, value_name = "DIR")]
    include: PathBuf,

    /// Directory to create the per-backend workspaces under
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    workspace: PathBuf,

    /// Path to the ngspice executable
    #[arg(long, default_value = "ngspice")]
    simulator: PathBuf,

    /// Wall-clock timeout per external tool invocation, in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Emit the comparison reports as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = HarnessConfig::new(&cli.workspace, &cli.simulator, &cli.model, &cli.include)
        .with_timeout(Duration::from_secs(cli.timeout));

    let runner = SystemRunner::new(config.timeout);
    let harness = Harness::new(config, &runner);

    let outcome = harness
        .run_template_file(&cli.template)
        .with_context(|| format!("validation failed for {}", cli.template.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.reports)?);
    } else {
        for report in &outcome.reports {
            print!("{}", report.to_text());
        }
        println!("All comparisons passed.");
    }

    Ok(())
}
