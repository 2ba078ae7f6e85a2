//! tpux CLI - set up Cloud TPU VMs and TPU Pods
//!
//! This module contains the CLI implementation used by the `tpux` binary.

mod commands;
mod output;
mod wizard;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tpux_core::{BlockError, ExecError, get_version, get_version_long};
use tracing_subscriber::EnvFilter;

use commands::SetupOptions;
use wizard::YesNo;

/// Process exit status for any failure
pub const FAILURE_EXIT_CODE: i32 = 255;

/// Set up a Cloud TPU VM or TPU Pod
#[derive(Parser, Debug)]
#[command(name = "tpux")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Set up a Cloud TPU VM or TPU Pod", long_about = None)]
#[command(after_help = get_banner())]
struct Cli {
    /// Run on a TPU Pod (y) or a single TPU VM (n)
    #[arg(short = 'p', long, value_enum)]
    is_tpu_pod: Option<YesNo>,

    /// Install oh-my-zsh
    #[arg(short = 'z', long, value_enum)]
    install_zsh: Option<YesNo>,

    /// Add ~/.local/bin to PATH in the shell config
    #[arg(short = 's', long, value_enum)]
    add_path_to_shell_config: Option<YesNo>,

    /// Private IPv4 addresses of the other pod hosts, comma separated
    #[arg(short = 'i', long, value_name = "ADDRS")]
    priv_ipv4_addrs: Option<String>,

    /// Remove everything a previous setup configured
    #[arg(short = 'c', long)]
    clear: bool,

    /// Increase verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    /// Flags whose absence means an interactive prompt
    fn unanswered_flags(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.is_tpu_pod.is_none() {
            missing.push("--is-tpu-pod");
        }
        if self.clear {
            return missing;
        }
        if self.install_zsh.is_none() {
            missing.push("--install-zsh");
        }
        if self.add_path_to_shell_config.is_none() {
            missing.push("--add-path-to-shell-config");
        }
        if self.is_tpu_pod != Some(YesNo::No) && self.priv_ipv4_addrs.is_none() {
            missing.push("--priv-ipv4-addrs");
        }
        missing
    }

    fn setup_options(&self) -> SetupOptions {
        SetupOptions {
            install_zsh: self.install_zsh,
            add_path: self.add_path_to_shell_config,
            priv_ipv4_addrs: self.priv_ipv4_addrs.clone(),
            quiet: self.quiet,
        }
    }
}

/// Get the ASCII banner for help display
fn get_banner() -> &'static str {
    r#"
 _
| |_ _ __  _   ___  __
| __| '_ \| | | \ \/ /
| |_| |_) | |_| |>  <
 \__| .__/ \__,_/_/\_\
    |_|
"#
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_welcome() {
    println!(
        "{} {}",
        style("Welcome to tpux!").cyan().bold(),
        style(get_version()).dim()
    );
    println!("This tool will guide you through setting up the environment on a new Cloud TPU.");
    println!();
}

pub fn run() -> Result<()> {
    let cli = Cli::try_parse()?;

    init_tracing(cli.verbose);

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let config = tpux_core::init().context("Failed to load tpux configuration")?;
    tracing::info!("tpux {}", get_version_long());
    tracing::debug!("Loaded config: {config:?}");

    if !cli.quiet {
        print_welcome();
    }

    wizard::verify_tty(&cli.unanswered_flags())?;

    let is_pod = wizard::prompt_yes_no(
        "Are you running on a TPU Pod (instead of a single TPU host)?",
        cli.is_tpu_pod,
        None,
    )?;

    match (is_pod, cli.clear) {
        (false, false) => commands::cmd_setup_single_host(&cli.setup_options(), &config),
        (false, true) => commands::cmd_teardown_single_host(cli.quiet),
        (true, false) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_setup_pod(&cli.setup_options(), &config))
        }
        (true, true) => commands::cmd_teardown_pod(cli.quiet),
    }
}

/// Process exit status for an error returned by [`run`]
///
/// `--help` and `--version` surface as clap errors that are not failures.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<clap::Error>() {
        Some(usage) if !usage.use_stderr() => 0,
        _ => FAILURE_EXIT_CODE,
    }
}

/// Captured standard error of the command that caused `err`, if any
pub fn command_stderr(err: &anyhow::Error) -> Option<&str> {
    err.chain().find_map(|cause| {
        if let Some(exec) = cause.downcast_ref::<ExecError>() {
            return exec.stderr();
        }
        cause
            .downcast_ref::<BlockError>()
            .and_then(BlockError::command_stderr)
    })
}
