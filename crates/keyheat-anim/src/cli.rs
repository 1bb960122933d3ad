#![forbid(unsafe_code)]

//! Command-line argument parsing for the plugin binary.
//!
//! Parses args manually. The host passes exactly one mode flag; the log
//! filter can also come from the `KEYHEAT_LOG` environment variable.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when neither `--log` nor `KEYHEAT_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

const HELP_TEXT: &str = "\
keyheat-anim: key heat map animation for ckb-next

USAGE:
    keyheat-anim --ckb-info
    keyheat-anim --ckb-run [OPTIONS]

MODES:
    --ckb-info        Print plugin metadata and parameter declarations
    --ckb-run         Run the animation protocol on stdin/stdout

OPTIONS:
    --log=FILTER      Log filter directives for stderr (default: warn)
    --help, -h        Show this help message
    --version, -V     Show version

This program is normally started by ckb-next, not by hand.

ENVIRONMENT VARIABLES:
    KEYHEAT_LOG       Override the default log filter (e.g. keyheat_fx=debug)";

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Info,
    Run,
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub mode: Mode,
    /// `tracing_subscriber::EnvFilter` directives.
    pub log_filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    MissingMode,
    ConflictingMode(String),
    UnknownArg(String),
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Explicit flags override environment variables.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("keyheat-anim {VERSION}");
                process::exit(0);
            }
            Err(ParseError::MissingMode) => {
                eprintln!("This program must be run from within ckb-next.");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
            Err(ParseError::ConflictingMode(arg)) => {
                eprintln!("Conflicting mode: {arg}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut log_filter = DEFAULT_LOG_FILTER.to_string();
        if let Some(val) = get_env("KEYHEAT_LOG")
            && !val.trim().is_empty()
        {
            log_filter = val;
        }

        let mut mode = None;
        for arg in args {
            let arg = arg.as_ref();
            let next = match arg {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                "--ckb-info" => Mode::Info,
                "--ckb-run" => Mode::Run,
                other => {
                    if let Some(val) = other.strip_prefix("--log=") {
                        log_filter = val.to_string();
                        continue;
                    }
                    return Err(ParseError::UnknownArg(other.to_string()));
                }
            };
            if mode.is_some_and(|m| m != next) {
                return Err(ParseError::ConflictingMode(arg.to_string()));
            }
            mode = Some(next);
        }

        let mode = mode.ok_or(ParseError::MissingMode)?;
        Ok(Self { mode, log_filter })
    }
}
