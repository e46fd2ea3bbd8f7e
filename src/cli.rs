// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `sshp`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sshp",
    version,
    about = "Parallel ssh with streaming output.",
    long_about = None
)]
pub struct CliArgs {
    /// Hide hostname prefixes on output lines.
    #[arg(short, long)]
    pub anonymous: bool,

    /// Colorize output (on, off, auto).
    #[arg(short, long, value_enum, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Print debug information (base command, hosts, timings).
    #[arg(short, long)]
    pub debug: bool,

    /// Print the exit code of each remote process.
    #[arg(short, long)]
    pub exit_codes: bool,

    /// File of hosts separated by newlines; defaults to stdin.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<String>,

    /// Group output together by host as it comes in, not line-by-line.
    #[arg(short, long, conflicts_with = "join")]
    pub group: bool,

    /// Join hosts together by unique output (aggregation mode).
    #[arg(short, long)]
    pub join: bool,

    /// Maximum number of jobs to run concurrently.
    #[arg(short, long, value_name = "N", default_value_t = 50)]
    pub max_jobs: usize,

    /// Maximum line length buffered in line-by-line mode.
    #[arg(long, value_name = "BYTES", default_value_t = 1024)]
    pub max_line_length: usize,

    /// Maximum output captured per host in join mode.
    #[arg(long, value_name = "BYTES", default_value_t = 8192)]
    pub max_output_length: usize,

    /// Print debug information without running any commands.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Silence all stdout and stderr from the remote hosts.
    #[arg(short, long)]
    pub silent: bool,

    /// Trim hostnames to their short name (remove everything after the
    /// first dot) for display.
    #[arg(short, long)]
    pub trim: bool,

    /// ssh identity file to use.
    #[arg(short, long, value_name = "FILE")]
    pub identity: Option<String>,

    /// The username to login as.
    #[arg(short, long, value_name = "USER")]
    pub login: Option<String>,

    /// The ssh port.
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<String>,

    /// Run ssh in quiet mode.
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable strict host key checking for ssh.
    #[arg(short = 'N', long)]
    pub no_strict: bool,

    /// Allocate a pseudo-tty for the ssh session.
    #[arg(short = 'y', long)]
    pub tty: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SSHP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command to run on each host.
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true)]
    pub command: Vec<String>,
}

/// Colorization choice as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    On,
    Off,
    Auto,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
