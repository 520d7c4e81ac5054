// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for linegate.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use serde_json::json;

use linegate::core::error::{Diagnostic, LineStatus, RunError, RunReport, Severity};
use linegate::core::listing::{ListingLine, ListingWriter};
use linegate::processor::cli::{
    list_path_for, validate_cli, Cli, CliConfig, DiagnosticsSinkConfig, OutputFormat,
};

struct DiagnosticsSink {
    writer: Option<Box<dyn Write>>,
}

impl DiagnosticsSink {
    fn from_config(config: &DiagnosticsSinkConfig) -> io::Result<Self> {
        match config {
            DiagnosticsSinkConfig::Disabled => Ok(Self { writer: None }),
            DiagnosticsSinkConfig::Stderr => Ok(Self {
                writer: Some(Box::new(io::stderr())),
            }),
            DiagnosticsSinkConfig::File { path, append } => {
                let mut opts = OpenOptions::new();
                opts.create(true).write(true);
                if *append {
                    opts.append(true);
                } else {
                    opts.truncate(true);
                }
                let file = opts.open(path)?;
                Ok(Self {
                    writer: Some(Box::new(file)),
                })
            }
        }
    }

    fn emit_line(&mut self, line: &str) {
        if let Some(writer) = &mut self.writer {
            let _ = writeln!(writer, "{line}");
        }
    }

    fn emit_report_diagnostics(
        &mut self,
        report: &RunReport,
        diagnostics: &[Diagnostic],
        format: OutputFormat,
    ) {
        for diag in diagnostics {
            self.emit_line(&format_diagnostic_line(
                diag,
                Some(report.source_lines()),
                format,
            ));
        }
    }

    fn emit_error_diagnostics(
        &mut self,
        err: &RunError,
        diagnostics: &[Diagnostic],
        format: OutputFormat,
    ) {
        for diag in diagnostics {
            self.emit_line(&format_diagnostic_line(
                diag,
                Some(err.source_lines()),
                format,
            ));
        }
    }
}

fn severity_to_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

fn status_to_str(status: LineStatus) -> &'static str {
    match status {
        LineStatus::Ok => "ok",
        LineStatus::Skip => "skip",
        LineStatus::Warning => "warning",
        LineStatus::Error => "error",
    }
}

fn format_diagnostic_line(
    diag: &Diagnostic,
    source_lines: Option<&[String]>,
    format: OutputFormat,
) -> String {
    if format == OutputFormat::Json {
        json!({
            "code": diag.code(),
            "severity": severity_to_str(diag.severity()),
            "message": diag.message(),
            "file": diag.file(),
            "line": diag.line(),
            "related_spans": diagnostic_related_spans_json(diag),
            "notes": diag.notes(),
            "help": diag.help(),
        })
        .to_string()
    } else {
        diag.format_with_context(source_lines)
    }
}

fn diagnostic_related_spans_json(diag: &Diagnostic) -> Vec<serde_json::Value> {
    diag.related_spans()
        .iter()
        .map(|span| {
            json!({
                "file": span.file.clone(),
                "line": span.line,
                "label": span.label.clone(),
            })
        })
        .collect()
}

fn write_listing<W: Write>(
    out: W,
    input: &Path,
    report: &RunReport,
    config: &CliConfig,
) -> io::Result<()> {
    match config.output_format {
        OutputFormat::Text => {
            let mut writer = ListingWriter::new(out, config.show_stack);
            writer.header(&input.display().to_string())?;
            for record in report.records() {
                writer.write_line(ListingLine {
                    line_num: record.line_num,
                    source: &record.source,
                    emitted: record.emitted,
                    stack: &record.stack,
                })?;
            }
            writer.footer(&report.counts())
        }
        OutputFormat::Json => {
            let mut out = out;
            for record in report.records() {
                writeln!(
                    out,
                    "{}",
                    json!({
                        "line": record.line_num,
                        "source": record.source,
                        "emitted": record.emitted,
                        "status": status_to_str(record.status),
                        "stack": record.stack,
                    })
                )?;
            }
            let counts = report.counts();
            writeln!(
                out,
                "{}",
                json!({
                    "file": input.display().to_string(),
                    "lines": counts.lines,
                    "errors": counts.errors,
                    "warnings": counts.warnings,
                })
            )
        }
    }
}

fn emit_listing(input: &Path, report: &RunReport, config: &CliConfig) -> io::Result<()> {
    match &config.list_output {
        Some(policy) => {
            let path = list_path_for(input, policy);
            let file = File::create(&path)?;
            write_listing(file, input, report, config)
        }
        None => {
            let stdout = io::stdout();
            write_listing(stdout.lock(), input, report, config)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let cli_config = match validate_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut sink = match DiagnosticsSink::from_config(&cli_config.diagnostics_sink) {
        Ok(sink) => sink,
        Err(err) => {
            eprintln!("Failed to open diagnostics sink: {err}");
            std::process::exit(1);
        }
    };

    match linegate::processor::run_with_cli(&cli_config) {
        Ok(reports) => {
            let mut failed = false;
            for (input, report) in cli_config.input_paths.iter().zip(reports.iter()) {
                if let Err(err) = emit_listing(input, report, &cli_config) {
                    eprintln!("Failed to write listing: {err}");
                    std::process::exit(1);
                }
                if !cli_config.quiet {
                    let diagnostics: Vec<Diagnostic> = report
                        .diagnostics()
                        .iter()
                        .filter(|diag| {
                            cli_config.warning_policy.emit_warnings
                                || diag.severity() != Severity::Warning
                        })
                        .cloned()
                        .collect();
                    sink.emit_report_diagnostics(report, &diagnostics, cli_config.output_format);
                }
                if report.error_count() > 0
                    || (cli_config.warning_policy.warnings_as_errors
                        && report.warning_count() > 0)
                {
                    failed = true;
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
        Err(err) => {
            let diagnostics: Vec<Diagnostic> = err
                .diagnostics()
                .iter()
                .filter(|diag| {
                    cli_config.warning_policy.emit_warnings
                        || diag.severity() != Severity::Warning
                })
                .cloned()
                .collect();
            sink.emit_error_diagnostics(&err, &diagnostics, cli_config.output_format);
            if cli_config.output_format != OutputFormat::Json
                && !matches!(cli_config.diagnostics_sink, DiagnosticsSinkConfig::Disabled)
            {
                sink.emit_line(&err.to_string());
            }
            std::process::exit(1);
        }
    }
}
