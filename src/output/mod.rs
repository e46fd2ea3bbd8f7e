// src/output/mod.rs

//! Presentation of host output: ANSI colors, the per-mode sink and the
//! join-mode aggregation report.

pub mod join;
pub mod sink;

pub use sink::OutputSink;

// ANSI color codes.
const COLOR_RED: &str = "\x1b[0;31m";
const COLOR_GREEN: &str = "\x1b[0;32m";
const COLOR_YELLOW: &str = "\x1b[0;33m";
const COLOR_MAGENTA: &str = "\x1b[0;35m";
const COLOR_CYAN: &str = "\x1b[0;36m";
const COLOR_RESET: &str = "\x1b[0m";

/// Colors used when printing, resolved once at startup. Every field is the
/// empty string when colorization is off, so call sites can interpolate
/// unconditionally.
#[derive(Debug, Clone, Copy)]
pub struct Colors {
    pub host: &'static str,
    pub important: &'static str,
    pub log_id: &'static str,
    pub reset: &'static str,
    pub stderr: &'static str,
    pub stdout: &'static str,
    pub value: &'static str,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                host: COLOR_YELLOW,
                important: COLOR_MAGENTA,
                log_id: COLOR_CYAN,
                reset: COLOR_RESET,
                stderr: COLOR_RED,
                stdout: COLOR_GREEN,
                value: COLOR_GREEN,
            }
        } else {
            Self {
                host: "",
                important: "",
                log_id: "",
                reset: "",
                stderr: "",
                stdout: "",
                value: "",
            }
        }
    }
}
