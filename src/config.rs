// src/config.rs

//! Runtime configuration consumed by the engine.
//!
//! The CLI layer (`cli.rs`) stays a thin argument mirror; this module turns
//! it into a validated [`Config`], resolving the `auto` color choice and
//! terminal-ness once at startup.

use crate::cli::{CliArgs, ColorChoice};
use crate::errors::{Result, SshpError};

/// Output discipline for host data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One complete line at a time, prefixed with the host name (default).
    Line,
    /// Raw chunks grouped under host headers as they arrive.
    Group,
    /// Capture everything, then aggregate hosts by identical output.
    Join,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub anonymous: bool,
    pub exit_codes: bool,
    pub silent: bool,
    pub trim: bool,
    pub max_jobs: usize,
    pub max_line_length: usize,
    pub max_output_length: usize,
    pub debug: bool,
    /// Resolved colorization (the `auto` choice is gone after startup).
    pub color: bool,
    /// Whether stdout is a terminal; gates the join-mode progress line.
    pub tty_stdout: bool,
}

impl Config {
    /// Build a validated `Config` from parsed CLI arguments.
    ///
    /// Terminal detection happens here, exactly once.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let tty_stdout = atty::is(atty::Stream::Stdout);
        Self::from_args_with_tty(args, tty_stdout)
    }

    /// Like [`Config::from_args`], but with terminal-ness injected. Used by
    /// tests that must not depend on the test harness's stdout.
    pub fn from_args_with_tty(args: &CliArgs, tty_stdout: bool) -> Result<Self> {
        validate_args(args)?;

        let mode = if args.join {
            Mode::Join
        } else if args.group {
            Mode::Group
        } else {
            Mode::Line
        };

        let color = match args.color {
            ColorChoice::On => true,
            ColorChoice::Off => false,
            ColorChoice::Auto => tty_stdout,
        };

        Ok(Self {
            mode,
            anonymous: args.anonymous,
            exit_codes: args.exit_codes,
            silent: args.silent,
            trim: args.trim,
            max_jobs: args.max_jobs,
            max_line_length: args.max_line_length,
            max_output_length: args.max_output_length,
            debug: args.debug,
            color,
            tty_stdout,
        })
    }
}

fn validate_args(args: &CliArgs) -> Result<()> {
    if args.max_jobs < 1 {
        return Err(SshpError::Config(format!(
            "invalid value for '--max-jobs': '{}' (must be >= 1)",
            args.max_jobs
        )));
    }
    if args.max_line_length < 1 {
        return Err(SshpError::Config(format!(
            "invalid value for '--max-line-length': '{}' (must be >= 1)",
            args.max_line_length
        )));
    }
    if args.max_output_length < 1 {
        return Err(SshpError::Config(format!(
            "invalid value for '--max-output-length': '{}' (must be >= 1)",
            args.max_output_length
        )));
    }
    if args.join && args.silent {
        return Err(SshpError::Config(
            "`--join` and `--silent` are mutually exclusive".to_string(),
        ));
    }
    if args.join && args.anonymous {
        return Err(SshpError::Config(
            "`--join` and `--anonymous` are mutually exclusive".to_string(),
        ));
    }
    if args.command.is_empty() {
        return Err(SshpError::Config("no command specified".to_string()));
    }
    Ok(())
}
