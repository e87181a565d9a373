mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// saltsolo - masterless salt provisioner
#[derive(Parser)]
#[command(name = "saltsolo")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the sandbox that gets copied to the target node
  Sandbox {
    /// Path to the configuration file
    #[arg(default_value = ".kitchen.yml")]
    config: PathBuf,

    /// Directory to build into (a fresh temporary directory if omitted)
    #[arg(short, long)]
    sandbox: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Shorthand for `--output json`
    #[arg(long, conflicts_with = "output")]
    json: bool,
  },

  /// Print the command that installs salt on the target
  InstallCommand {
    /// Path to the configuration file
    #[arg(default_value = ".kitchen.yml")]
    config: PathBuf,
  },

  /// Print the command that runs the highstate on the target
  RunCommand {
    /// Path to the configuration file
    #[arg(default_value = ".kitchen.yml")]
    config: PathBuf,
  },

  /// Print the command that resets root_path on the target
  InitCommand {
    /// Path to the configuration file
    #[arg(default_value = ".kitchen.yml")]
    config: PathBuf,
  },

  /// Print the resolved configuration as JSON
  Config {
    /// Path to the configuration file
    #[arg(default_value = ".kitchen.yml")]
    config: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Sandbox {
      config,
      sandbox,
      output,
      json,
    } => {
      let format = if json { OutputFormat::Json } else { output };
      cmd::cmd_sandbox(&config, sandbox.as_deref(), format)
    }
    Commands::InstallCommand { config } => cmd::cmd_install(&config),
    Commands::RunCommand { config } => cmd::cmd_run(&config),
    Commands::InitCommand { config } => cmd::cmd_init(&config),
    Commands::Config { config } => cmd::cmd_config(&config),
  }
}
