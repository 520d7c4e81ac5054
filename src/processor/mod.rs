// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Line processing driver.
//!
//! Classifies each input line as IF/ELSE/ENDIF/text, applies exactly one
//! conditional-stack operation per directive line, and records whether
//! each text line was emitted. Boolean resolution, diagnostics, and
//! rendering all live here; the stack itself never performs I/O.

pub mod cli;

use std::fs;

use crate::core::conditional::ConditionalStack;
use crate::core::error::{
    CondError, CondErrorKind, Diagnostic, LabeledSpan, LineRecord, LineStatus, RunCounts,
    RunError, RunReport, Severity,
};
use crate::scanner::{classify, parse_bool, LineKind};

use cli::CliConfig;

/// Per-document line processor owning one conditional stack.
pub struct LineProcessor {
    stack: ConditionalStack,
    open_lines: Vec<u32>,
    file: Option<String>,
    diagnostics: Vec<Diagnostic>,
    counts: RunCounts,
}

impl LineProcessor {
    pub fn new() -> Self {
        Self {
            stack: ConditionalStack::new(),
            open_lines: Vec::new(),
            file: None,
            diagnostics: Vec::new(),
            counts: RunCounts::new(),
        }
    }

    /// Return the processor to its initial state for the next document.
    pub fn reset(&mut self) {
        self.stack.reset();
        self.open_lines.clear();
        self.file = None;
        self.diagnostics.clear();
        self.counts = RunCounts::new();
    }

    pub fn set_file(&mut self, file: Option<String>) {
        self.file = file;
    }

    pub fn is_active(&self) -> bool {
        self.stack.is_active()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn counts(&self) -> RunCounts {
        self.counts
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Process one line and capture its record.
    ///
    /// Directive lines are never emitted. A rejected directive produces an
    /// `Error` status and a diagnostic, and leaves the stack untouched.
    pub fn process_line(&mut self, src: &str, line_num: u32) -> LineRecord {
        self.counts.lines += 1;
        let (status, emitted) = match classify(src) {
            LineKind::If(arg) => (self.handle_if(arg, line_num), false),
            LineKind::Else => (self.handle_else(line_num), false),
            LineKind::Endif => (self.handle_endif(line_num), false),
            LineKind::Text => {
                if self.stack.is_active() {
                    (LineStatus::Ok, true)
                } else {
                    (LineStatus::Skip, false)
                }
            }
        };
        match status {
            LineStatus::Error => self.counts.errors += 1,
            LineStatus::Warning => self.counts.warnings += 1,
            _ => {}
        }
        LineRecord {
            line_num,
            source: src.to_string(),
            emitted,
            stack: self.stack.snapshot(),
            status,
        }
    }

    /// Report every IF block still open at end of input.
    pub fn finish(&mut self) {
        for opened in std::mem::take(&mut self.open_lines) {
            self.counts.errors += 1;
            let error = CondError::new(CondErrorKind::Conditional, "unterminated IF block", None);
            let diag = Diagnostic::new(opened, Severity::Error, error)
                .with_code("cnd204")
                .with_file(self.file.clone())
                .with_help("add ENDIF after the block");
            self.diagnostics.push(diag);
        }
    }

    fn handle_if(&mut self, arg: Option<&str>, line_num: u32) -> LineStatus {
        let Some(arg) = arg else {
            let error =
                CondError::new(CondErrorKind::Directive, "expected condition after IF", None);
            self.diagnostics
                .push(Diagnostic::new(line_num, Severity::Error, error).with_file(self.file.clone()));
            return LineStatus::Error;
        };

        let (condition, status) = match parse_bool(arg) {
            Some(value) => (value, LineStatus::Ok),
            None => {
                // Anything not a known spelling counts as true.
                let error = CondError::new(
                    CondErrorKind::Directive,
                    "unrecognized condition, assuming true",
                    Some(arg),
                );
                self.diagnostics.push(
                    Diagnostic::new(line_num, Severity::Warning, error)
                        .with_code("cnd302")
                        .with_file(self.file.clone()),
                );
                (true, LineStatus::Warning)
            }
        };

        self.stack.push_if(condition);
        self.open_lines.push(line_num);
        status
    }

    fn handle_else(&mut self, line_num: u32) -> LineStatus {
        match self.stack.take_else() {
            Ok(()) => LineStatus::Ok,
            Err(err) => {
                let code = err.code();
                let mut diag = Diagnostic::new(line_num, Severity::Error, err.into())
                    .with_code(code)
                    .with_file(self.file.clone());
                if let Some(&opened) = self.open_lines.last() {
                    diag = diag.with_related_span(LabeledSpan {
                        file: self.file.clone(),
                        line: opened,
                        label: Some("block opened here".to_string()),
                    });
                }
                self.diagnostics.push(diag);
                LineStatus::Error
            }
        }
    }

    fn handle_endif(&mut self, line_num: u32) -> LineStatus {
        match self.stack.pop_endif() {
            Ok(()) => {
                self.open_lines.pop();
                LineStatus::Ok
            }
            Err(err) => {
                let code = err.code();
                let diag = Diagnostic::new(line_num, Severity::Error, err.into())
                    .with_code(code)
                    .with_file(self.file.clone());
                self.diagnostics.push(diag);
                LineStatus::Error
            }
        }
    }

    /// Process a whole document, including the end-of-input balance check.
    pub fn process_source(&mut self, lines: &[String]) -> Vec<LineRecord> {
        let mut records = Vec::with_capacity(lines.len());
        for (idx, src) in lines.iter().enumerate() {
            records.push(self.process_line(src, idx as u32 + 1));
        }
        self.finish();
        records
    }
}

impl Default for LineProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the processor over every configured input, one report per file.
pub fn run_with_cli(config: &CliConfig) -> Result<Vec<RunReport>, RunError> {
    let mut reports = Vec::with_capacity(config.input_paths.len());
    let mut processor = LineProcessor::new();

    for path in &config.input_paths {
        let text = fs::read_to_string(path).map_err(|err| {
            let error = CondError::new(
                CondErrorKind::Io,
                "failed to read input",
                Some(&format!("{}: {err}", path.display())),
            );
            RunError::new(error, Vec::new(), Vec::new())
        })?;
        let lines: Vec<String> = text.lines().map(str::to_string).collect();

        processor.reset();
        processor.set_file(Some(path.display().to_string()));

        let mut records = Vec::with_capacity(lines.len());
        let mut aborted = false;
        for (idx, src) in lines.iter().enumerate() {
            let record = processor.process_line(src, idx as u32 + 1);
            let failed = record.status == LineStatus::Error;
            records.push(record);
            if failed && config.strict {
                aborted = true;
                break;
            }
        }

        if aborted {
            let error = CondError::new(
                CondErrorKind::Conditional,
                "processing aborted on first error",
                Some(&path.display().to_string()),
            );
            return Err(RunError::new(error, processor.take_diagnostics(), lines));
        }

        processor.finish();
        let report = RunReport::new(
            records,
            processor.take_diagnostics(),
            lines,
            processor.counts(),
        );
        reports.push(report);
    }

    Ok(reports)
}
