// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Listing table generation.

use std::io::Write;

use super::error::RunCounts;

/// Data for a single listing line.
pub struct ListingLine<'a> {
    pub line_num: u32,
    pub source: &'a str,
    pub emitted: bool,
    pub stack: &'a [bool],
}

/// Writer for listing output.
pub struct ListingWriter<W: Write> {
    out: W,
    show_stack: bool,
}

impl<W: Write> ListingWriter<W> {
    pub fn new(out: W, show_stack: bool) -> Self {
        Self { out, show_stack }
    }

    pub fn header(&mut self, title: &str) -> std::io::Result<()> {
        writeln!(self.out, "{title}")?;
        if self.show_stack {
            writeln!(
                self.out,
                "LINE  SOURCE                                    OUTPUT                                    STACK"
            )?;
            writeln!(
                self.out,
                "----  ----------------------------------------  ----------------------------------------  -----"
            )?;
        } else {
            writeln!(
                self.out,
                "LINE  SOURCE                                    OUTPUT"
            )?;
            writeln!(
                self.out,
                "----  ----------------------------------------  ------"
            )?;
        }
        Ok(())
    }

    pub fn write_line(&mut self, line: ListingLine<'_>) -> std::io::Result<()> {
        let output = if line.emitted { line.source } else { "" };
        if self.show_stack {
            writeln!(
                self.out,
                "{:>4}  {:<40}  {:<40}  {}",
                line.line_num,
                line.source,
                output,
                format_stack(line.stack)
            )
        } else {
            writeln!(
                self.out,
                "{:>4}  {:<40}  {}",
                line.line_num, line.source, output
            )
        }
    }

    pub fn footer(&mut self, counts: &RunCounts) -> std::io::Result<()> {
        writeln!(
            self.out,
            "\nLines: {}  Errors: {}  Warnings: {}",
            counts.lines, counts.errors, counts.warnings
        )
    }
}

/// Format a stack snapshot for the listing, outermost level first.
pub fn format_stack(levels: &[bool]) -> String {
    let mut out = String::from("[");
    for (idx, level) in levels.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push(if *level { '1' } else { '0' });
    }
    out.push(']');
    out
}
