// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Core components that are independent of the line-processing driver.
//!
//! - [`conditional`] - Nested conditional state machine
//! - [`listing`] - Listing table generation
//! - [`error`] - Error types and diagnostics

pub mod conditional;
pub mod error;
pub mod listing;
