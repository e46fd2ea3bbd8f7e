// src/command.rs

//! Construction of the per-host child argument vector.
//!
//! The engine never interprets the argv it executes; this module is the
//! collaborator that assembles `base ssh command + host name + remote
//! command` once the CLI has been parsed.

use crate::cli::CliArgs;

/// The base remote-shell invocation plus the remote command.
#[derive(Debug, Clone)]
pub struct CommandLine {
    base: Vec<String>,
    remote: Vec<String>,
}

impl CommandLine {
    /// Assemble the base ssh command from the passthrough options.
    pub fn from_args(args: &CliArgs) -> Self {
        let mut base = vec!["ssh".to_string()];

        if let Some(ref identity) = args.identity {
            base.push("-i".to_string());
            base.push(identity.clone());
        }
        if let Some(ref login) = args.login {
            base.push("-l".to_string());
            base.push(login.clone());
        }
        if let Some(ref port) = args.port {
            base.push("-p".to_string());
            base.push(port.clone());
        }
        if args.quiet {
            base.push("-q".to_string());
        }
        if args.no_strict {
            base.push("-o".to_string());
            base.push("StrictHostKeyChecking=no".to_string());
        }
        if args.tty {
            base.push("-t".to_string());
        }

        Self {
            base,
            remote: args.command.clone(),
        }
    }

    /// Build a `CommandLine` directly from parts. Used by tests and callers
    /// that execute something other than ssh.
    pub fn from_parts(base: Vec<String>, remote: Vec<String>) -> Self {
        Self { base, remote }
    }

    /// The argument vector to execute for `host`:
    /// base command + host name + remote command.
    pub fn build_argv(&self, host: &str) -> Vec<String> {
        let mut argv =
            Vec::with_capacity(self.base.len() + 1 + self.remote.len());
        argv.extend(self.base.iter().cloned());
        argv.push(host.to_string());
        argv.extend(self.remote.iter().cloned());
        argv
    }

    pub fn base(&self) -> &[String] {
        &self.base
    }

    pub fn remote(&self) -> &[String] {
        &self.remote
    }
}
