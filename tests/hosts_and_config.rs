// tests/hosts_and_config.rs

//! Host-list parsing, config validation and argv construction.

mod common;
use crate::common::{cli_args, init_tracing};

use std::io::Cursor;
use std::io::Write;

use clap::Parser;

use sshp::cli::CliArgs;
use sshp::command::CommandLine;
use sshp::config::{Config, Mode};
use sshp::hosts::{load_hosts, parse_hosts};

#[test]
fn comments_blanks_and_indented_lines_are_skipped() {
    init_tracing();

    let input = "# fleet\nweb01\n\n  indented-ignored\ndb01\n# trailing\n";
    let hosts = parse_hosts(Cursor::new(input)).unwrap();

    let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["web01", "db01"]);
}

#[test]
fn an_empty_host_list_is_a_usage_error() {
    init_tracing();

    let err = parse_hosts(Cursor::new("# nothing here\n")).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn hosts_load_from_a_file_in_order() {
    init_tracing();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "one\ntwo\nthree").unwrap();

    let hosts = load_hosts(Some(file.path().to_str().unwrap())).unwrap();
    let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["one", "two", "three"]);
}

#[test]
fn a_missing_hosts_file_is_a_usage_error() {
    init_tracing();

    let err = load_hosts(Some("/nonexistent/sshp-hosts")).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn mode_flags_map_to_modes() {
    init_tracing();

    let cfg = |flags: &[&str]| {
        Config::from_args_with_tty(&cli_args(flags, &["uptime"]), false)
            .unwrap()
    };

    assert_eq!(cfg(&[]).mode, Mode::Line);
    assert_eq!(cfg(&["-g"]).mode, Mode::Group);
    assert_eq!(cfg(&["-j"]).mode, Mode::Join);
}

#[test]
fn join_is_mutually_exclusive_with_silent_and_anonymous() {
    init_tracing();

    for flags in [&["-j", "-s"][..], &["-j", "-a"][..]] {
        let args = cli_args(flags, &["uptime"]);
        let err = Config::from_args_with_tty(&args, false).unwrap_err();
        assert_eq!(err.exit_code(), 2, "flags {flags:?}");
    }
}

#[test]
fn group_and_join_conflict_at_the_flag_level() {
    init_tracing();

    let result =
        CliArgs::try_parse_from(["sshp", "-g", "-j", "uptime"]);
    assert!(result.is_err());
}

#[test]
fn zero_bounds_are_rejected() {
    init_tracing();

    for flags in [
        &["-m", "0"][..],
        &["--max-line-length", "0"][..],
        &["--max-output-length", "0"][..],
    ] {
        let args = cli_args(flags, &["uptime"]);
        let err = Config::from_args_with_tty(&args, false).unwrap_err();
        assert_eq!(err.exit_code(), 2, "flags {flags:?}");
    }
}

#[test]
fn color_auto_follows_terminal_ness() {
    init_tracing();

    let args = cli_args(&[], &["uptime"]);
    assert!(!Config::from_args_with_tty(&args, false).unwrap().color);
    assert!(Config::from_args_with_tty(&args, true).unwrap().color);

    let args = cli_args(&["-c", "on"], &["uptime"]);
    assert!(Config::from_args_with_tty(&args, false).unwrap().color);
}

#[test]
fn argv_is_base_plus_host_plus_remote_command() {
    init_tracing();

    let args = cli_args(
        &[
            "-i", "/home/op/.ssh/id_ed25519",
            "-l", "op",
            "-p", "2222",
            "-q",
            "-N",
            "-y",
        ],
        &["ps", "-ef"],
    );
    let command_line = CommandLine::from_args(&args);

    assert_eq!(
        command_line.build_argv("web01"),
        [
            "ssh",
            "-i", "/home/op/.ssh/id_ed25519",
            "-l", "op",
            "-p", "2222",
            "-q",
            "-o", "StrictHostKeyChecking=no",
            "-t",
            "web01",
            "ps", "-ef",
        ]
    );
}

#[test]
fn plain_argv_has_no_passthrough_options() {
    init_tracing();

    let args = cli_args(&[], &["uname", "-v"]);
    let command_line = CommandLine::from_args(&args);
    assert_eq!(
        command_line.build_argv("a"),
        ["ssh", "a", "uname", "-v"]
    );
}
