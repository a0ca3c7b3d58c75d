// SPDX-License-Identifier: MIT OR Apache-2.0
//! `mcp-run`: supervise an arbitrary command with the launcher's exit-code
//! contract.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mlp_supervisor::{LaunchSpec, Supervisor, process_exit};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mcp-run",
    version,
    about = "Launch a command under the MCP process supervisor"
)]
struct Cli {
    /// Display name used in lifecycle notices. Defaults to the command.
    #[arg(long)]
    name: Option<String>,

    /// Environment overlay entries, KEY=VALUE. Repeatable.
    #[arg(long = "env", value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Working directory for the child.
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Verbose diagnostics.
    #[arg(long)]
    debug: bool,

    /// The command to launch, followed by its arguments.
    #[arg(required = true, trailing_var_arg = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command[0].clone();
    let display_name = cli.name.unwrap_or_else(|| command.clone());

    let mut spec = LaunchSpec::new(display_name, command).args(cli.command[1..].iter().cloned());
    for pair in &cli.env {
        match mlp_config::parse_key_value(pair) {
            Ok((key, value)) => spec = spec.env(key, value),
            Err(err) => {
                error!(target: "mlp.cli", "{err}");
                return ExitCode::from(1);
            }
        }
    }
    if let Some(dir) = cli.cwd {
        spec = spec.cwd(dir);
    }

    match Supervisor::new(spec).run().await {
        Ok(outcome) => process_exit(outcome.exit_code()),
        Err(err) => {
            error!(target: "mlp.cli", "{err}");
            process_exit(err.exit_code())
        }
    }
}
