// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Nested conditional state management.
//!
//! The stack decides, after every IF/ELSE/ENDIF directive, whether the
//! current position in the input is active. Each open level stores the
//! cumulative activation of its whole ancestor chain, so closing a level
//! restores the enclosing state without rescanning the stack.

use super::error::StackError;

/// State of one open IF block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    raw_condition: bool,
    else_taken: bool,
    cumulative_active: bool,
}

impl Level {
    fn new(condition: bool, parent_active: bool) -> Self {
        Self {
            raw_condition: condition,
            else_taken: false,
            cumulative_active: condition && parent_active,
        }
    }

    /// The branch condition with any ELSE negation applied.
    pub fn effective_condition(&self) -> bool {
        self.raw_condition != self.else_taken
    }

    pub fn raw_condition(&self) -> bool {
        self.raw_condition
    }

    pub fn else_taken(&self) -> bool {
        self.else_taken
    }

    /// True iff this level and every enclosing level are selected.
    pub fn cumulative_active(&self) -> bool {
        self.cumulative_active
    }
}

/// Stack of open conditional levels, outermost first.
#[derive(Debug, Clone)]
pub struct ConditionalStack {
    levels: Vec<Level>,
}

impl ConditionalStack {
    pub fn new() -> Self {
        Self { levels: Vec::new() }
    }

    /// Discard all open levels; the stack reports active again.
    pub fn reset(&mut self) {
        self.levels.clear();
    }

    /// Current IF nesting depth.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn last(&self) -> Option<&Level> {
        self.levels.last()
    }

    /// Whether the current position is active. True outside any IF block.
    pub fn is_active(&self) -> bool {
        match self.levels.last() {
            Some(level) => level.cumulative_active,
            None => true,
        }
    }

    /// Open a new nesting level.
    ///
    /// Always valid, even inside an inactive branch: the level records the
    /// condition and inherits the enclosing cumulative state, so a child
    /// can never be active under an inactive ancestor.
    pub fn push_if(&mut self, condition: bool) {
        let parent_active = self.is_active();
        self.levels.push(Level::new(condition, parent_active));
    }

    /// Switch the top level into its ELSE branch.
    ///
    /// Rejected when no level is open or the top level already took its
    /// ELSE; the stack is left unmodified in both cases.
    pub fn take_else(&mut self) -> Result<(), StackError> {
        let depth = self.levels.len();
        if depth == 0 {
            return Err(StackError::else_without_if());
        }
        if self.levels[depth - 1].else_taken {
            return Err(StackError::else_already_taken());
        }

        let parent_active = if depth > 1 {
            self.levels[depth - 2].cumulative_active
        } else {
            true
        };
        let top = &mut self.levels[depth - 1];
        top.else_taken = true;
        top.cumulative_active = top.effective_condition() && parent_active;
        Ok(())
    }

    /// Close the top level, restoring the enclosing activation state.
    pub fn pop_endif(&mut self) -> Result<(), StackError> {
        match self.levels.pop() {
            Some(_) => Ok(()),
            None => Err(StackError::endif_without_if()),
        }
    }

    /// Effective condition of every open level, outermost first.
    pub fn snapshot(&self) -> Vec<bool> {
        self.levels.iter().map(Level::effective_condition).collect()
    }
}

impl Default for ConditionalStack {
    fn default() -> Self {
        Self::new()
    }
}
