// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types, diagnostics, and reporting for the line processor.

use std::fmt;
use std::sync::Arc;

/// Line processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LineStatus {
    Ok = 0,
    Skip = 1,
    Warning = 2,
    Error = 3,
}

/// Kind of conditional-stack error.
///
/// `ElseWithoutIf` covers both ELSE with no open block and ELSE repeated
/// within the same block; the two carry distinct diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackErrorKind {
    ElseWithoutIf,
    EndifWithoutIf,
}

/// Error returned by a rejected conditional-stack operation.
///
/// A rejected operation leaves the stack unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackError {
    kind: StackErrorKind,
    code: &'static str,
    message: &'static str,
}

impl StackError {
    pub(crate) fn else_without_if() -> Self {
        Self {
            kind: StackErrorKind::ElseWithoutIf,
            code: "cnd201",
            message: "ELSE found without matching IF",
        }
    }

    pub(crate) fn else_already_taken() -> Self {
        Self {
            kind: StackErrorKind::ElseWithoutIf,
            code: "cnd202",
            message: "ELSE cannot follow ELSE in the same block",
        }
    }

    pub(crate) fn endif_without_if() -> Self {
        Self {
            kind: StackErrorKind::EndifWithoutIf,
            code: "cnd203",
            message: "ENDIF found without matching IF",
        }
    }

    pub fn kind(&self) -> StackErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StackError {}

/// Categories of processor errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondErrorKind {
    Cli,
    Conditional,
    Directive,
    Io,
}

/// A processor error with a kind and message.
#[derive(Debug, Clone)]
pub struct CondError {
    kind: CondErrorKind,
    message: String,
}

impl CondError {
    pub fn new(kind: CondErrorKind, msg: &str, param: Option<&str>) -> Self {
        Self {
            kind,
            message: format_error(msg, param),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> CondErrorKind {
        self.kind
    }
}

impl fmt::Display for CondError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CondError {}

impl From<StackError> for CondError {
    fn from(err: StackError) -> Self {
        Self {
            kind: CondErrorKind::Conditional,
            message: err.message().to_string(),
        }
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A secondary source location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSpan {
    pub file: Option<String>,
    pub line: u32,
    pub label: Option<String>,
}

/// A diagnostic message with location and context.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    line: u32,
    code: String,
    severity: Severity,
    error: CondError,
    file: Option<String>,
    source: Option<String>,
    related_spans: Vec<LabeledSpan>,
    notes: Vec<String>,
    help: Vec<String>,
}

impl Diagnostic {
    pub fn new(line: u32, severity: Severity, error: CondError) -> Self {
        Self {
            line,
            code: default_diagnostic_code(error.kind()).to_string(),
            severity,
            error,
            file: None,
            source: None,
            related_spans: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file;
        self
    }

    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    pub fn with_related_span(mut self, span: LabeledSpan) -> Self {
        self.related_spans.push(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    pub fn format(&self) -> String {
        let sev = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        format!(
            "{}: {} [{}] - {}",
            self.line,
            sev,
            self.code,
            self.error.message()
        )
    }

    pub fn format_with_context(&self, lines: Option<&[String]>) -> String {
        let sev = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        let header = match &self.file {
            Some(file) => format!("{file}:{}: {sev} [{}]", self.line, self.code),
            None => format!("{}: {sev} [{}]", self.line, self.code),
        };

        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');

        for line in build_context_lines(self.line, lines, self.source.as_deref()) {
            out.push_str(&line);
            out.push('\n');
        }

        for related in &self.related_spans {
            for line in build_context_lines(related.line, lines, None) {
                out.push_str("      = ");
                out.push_str(line.trim_start());
                out.push('\n');
            }
            if let Some(label) = &related.label {
                out.push_str("      = note: ");
                out.push_str(label);
                out.push('\n');
            }
        }

        for note in &self.notes {
            out.push_str("note: ");
            out.push_str(note);
            out.push('\n');
        }

        for help in &self.help {
            out.push_str("help: ");
            out.push_str(help);
            out.push('\n');
        }

        out.push_str(&format!("{sev}: {}", self.error.message()));
        out
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn message(&self) -> &str {
        self.error.message()
    }

    pub fn related_spans(&self) -> &[LabeledSpan] {
        &self.related_spans
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn help(&self) -> &[String] {
        &self.help
    }
}

/// Per-run statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunCounts {
    pub lines: u32,
    pub errors: u32,
    pub warnings: u32,
}

impl RunCounts {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A processed line ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub line_num: u32,
    pub source: String,
    pub emitted: bool,
    pub stack: Vec<bool>,
    pub status: LineStatus,
}

/// Report from a completed processing run over one input.
#[derive(Debug)]
pub struct RunReport {
    records: Vec<LineRecord>,
    diagnostics: Vec<Diagnostic>,
    source_lines: Arc<Vec<String>>,
    counts: RunCounts,
}

impl RunReport {
    pub fn new(
        records: Vec<LineRecord>,
        diagnostics: Vec<Diagnostic>,
        source_lines: impl Into<Arc<Vec<String>>>,
        counts: RunCounts,
    ) -> Self {
        Self {
            records,
            diagnostics,
            source_lines: source_lines.into(),
            counts,
        }
    }

    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    pub fn counts(&self) -> RunCounts {
        self.counts
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

/// Error from a failed processing run.
#[derive(Debug)]
pub struct RunError {
    error: CondError,
    diagnostics: Vec<Diagnostic>,
    source_lines: Arc<Vec<String>>,
}

impl RunError {
    pub fn new(
        error: CondError,
        diagnostics: Vec<Diagnostic>,
        source_lines: impl Into<Arc<Vec<String>>>,
    ) -> Self {
        Self {
            error,
            diagnostics,
            source_lines: source_lines.into(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for RunError {}

/// Build context lines for error display.
pub fn build_context_lines(
    line_num: u32,
    lines: Option<&[String]>,
    source_override: Option<&str>,
) -> Vec<String> {
    let mut out = Vec::new();
    let line_idx = line_num.saturating_sub(1) as usize;

    if let Some(source) = source_override {
        out.push(format!("{:>5} | {}", line_num, source));
        return out;
    }

    let lines = match lines {
        Some(lines) if !lines.is_empty() => lines,
        _ => {
            out.push(format!("{:>5} | <source unavailable>", line_num));
            return out;
        }
    };

    if line_idx >= lines.len() {
        out.push(format!("{:>5} | <source unavailable>", line_num));
        return out;
    }

    out.push(format!("{:>5} | {}", line_num, lines[line_idx]));
    out
}

fn default_diagnostic_code(kind: CondErrorKind) -> &'static str {
    match kind {
        CondErrorKind::Cli => "cnd101",
        CondErrorKind::Conditional => "cnd201",
        CondErrorKind::Directive => "cnd301",
        CondErrorKind::Io => "cnd501",
    }
}

/// Format an error message with an optional parameter.
pub fn format_error(msg: &str, param: Option<&str>) -> String {
    match param {
        Some(p) => format!("{msg}: {p}"),
        None => msg.to_string(),
    }
}
