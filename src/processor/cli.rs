// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::core::error::{CondError, CondErrorKind, RunError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str =
    "Conditional text-line processor with nested IF/ELSE/ENDIF directives.

Each input line is either a directive (IF <condition>, ELSE, ENDIF) or
plain text. Text lines are emitted while the current conditional context
is active and suppressed otherwise; directives nest to arbitrary depth.
Conditions are single boolean tokens (0/1/false/true/no/yes, any case).
The listing written for each input shows the line, its emitted output,
and a bracketed trace of the open conditional levels.";

#[derive(Parser, Debug)]
#[command(
    name = "linegate",
    version = VERSION,
    about = "Conditional text-line processor with nested IF/ELSE/ENDIF directives",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select global CLI output format. text is default; json emits one machine-readable object per listing line and per diagnostic."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress diagnostic output for successful runs. Errors are still reported unless --no-error is set."
    )]
    pub quiet: bool,
    #[arg(
        short = 'E',
        long = "error",
        value_name = "FILE",
        long_help = "Write diagnostics to FILE instead of stderr."
    )]
    pub error_file: Option<PathBuf>,
    #[arg(
        long = "error-append",
        action = ArgAction::SetTrue,
        requires = "error_file",
        long_help = "Append diagnostics to --error FILE instead of truncating it."
    )]
    pub error_append: bool,
    #[arg(
        long = "no-error",
        action = ArgAction::SetTrue,
        conflicts_with_all = ["error_file", "error_append"],
        long_help = "Disable all diagnostic output routing."
    )]
    pub no_error: bool,
    #[arg(
        short = 'w',
        long = "no-warn",
        action = ArgAction::SetTrue,
        conflicts_with = "warn_error",
        long_help = "Suppress warning diagnostics."
    )]
    pub no_warn: bool,
    #[arg(
        long = "Werror",
        action = ArgAction::SetTrue,
        conflicts_with = "no_warn",
        long_help = "Treat warnings as errors (non-zero exit status)."
    )]
    pub warn_error: bool,
    #[arg(
        short = 'l',
        long = "list",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Write the listing to FILE instead of stdout. FILE is optional; when omitted, the input base is used and a .lst extension is added."
    )]
    pub list_name: Option<String>,
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "BASE",
        requires = "list_name",
        long_help = "Output filename base when -l omits its filename. Defaults to the input base. With multiple inputs, BASE must be a directory."
    )]
    pub outfile: Option<String>,
    #[arg(
        long = "strict",
        action = ArgAction::SetTrue,
        long_help = "Stop at the first rejected directive instead of reporting and continuing."
    )]
    pub strict: bool,
    #[arg(
        long = "no-stack",
        action = ArgAction::SetTrue,
        long_help = "Omit the conditional-stack trace column from the listing."
    )]
    pub no_stack: bool,
    #[arg(value_name = "FILE", required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Global CLI output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where diagnostics are routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticsSinkConfig {
    Disabled,
    Stderr,
    File { path: PathBuf, append: bool },
}

/// Warning emission policy resolved from the CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningPolicy {
    pub emit_warnings: bool,
    pub warnings_as_errors: bool,
}

/// Listing destination resolved from -l/-o.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutput {
    /// Explicit -l FILE; only valid with a single input.
    Explicit(PathBuf),
    /// -l without a filename; derive <base>.lst per input.
    Derived { out_base: Option<PathBuf> },
}

/// Validated CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub input_paths: Vec<PathBuf>,
    pub output_format: OutputFormat,
    pub diagnostics_sink: DiagnosticsSinkConfig,
    pub warning_policy: WarningPolicy,
    pub quiet: bool,
    pub strict: bool,
    pub show_stack: bool,
    pub list_output: Option<ListOutput>,
}

fn cli_error(msg: &str, param: Option<&str>) -> RunError {
    RunError::new(
        CondError::new(CondErrorKind::Cli, msg, param),
        Vec::new(),
        Vec::new(),
    )
}

pub fn validate_cli(cli: &Cli) -> Result<CliConfig, RunError> {
    let diagnostics_sink = if cli.no_error {
        DiagnosticsSinkConfig::Disabled
    } else {
        match &cli.error_file {
            Some(path) => DiagnosticsSinkConfig::File {
                path: path.clone(),
                append: cli.error_append,
            },
            None => DiagnosticsSinkConfig::Stderr,
        }
    };

    let list_output = match cli.list_name.as_deref() {
        None => None,
        Some("") => {
            let out_base = cli.outfile.as_ref().map(PathBuf::from);
            if cli.inputs.len() > 1 {
                if let Some(base) = &out_base {
                    if !base.is_dir() {
                        return Err(cli_error(
                            "with multiple inputs, --outfile must be a directory",
                            Some(&base.display().to_string()),
                        ));
                    }
                }
            }
            Some(ListOutput::Derived { out_base })
        }
        Some(name) => {
            if cli.inputs.len() > 1 {
                return Err(cli_error(
                    "with multiple inputs, an explicit --list filename is not allowed",
                    Some(name),
                ));
            }
            Some(ListOutput::Explicit(PathBuf::from(name)))
        }
    };

    Ok(CliConfig {
        input_paths: cli.inputs.clone(),
        output_format: cli.format,
        diagnostics_sink,
        warning_policy: WarningPolicy {
            emit_warnings: !cli.no_warn,
            warnings_as_errors: cli.warn_error,
        },
        quiet: cli.quiet,
        strict: cli.strict,
        show_stack: !cli.no_stack,
        list_output,
    })
}

/// Resolve the listing path for one input under the configured policy.
pub fn list_path_for(input: &std::path::Path, list_output: &ListOutput) -> PathBuf {
    match list_output {
        ListOutput::Explicit(path) => path.clone(),
        ListOutput::Derived { out_base } => match out_base {
            Some(base) if base.is_dir() => {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "out".to_string());
                base.join(format!("{stem}.lst"))
            }
            Some(base) => base.with_extension("lst"),
            None => input.with_extension("lst"),
        },
    }
}
