// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tagshell: Core types, errors and bootstrap resolution shared across all crates.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use bootstrap::ResolvedUrl;
pub use config::ShellConfig;
pub use error::{DecodeError, ShellError};
pub use types::*;
