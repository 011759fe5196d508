// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for tagshell.

use thiserror::Error;

/// Why the embedded endpoint could not be turned into an entry URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("embedded endpoint is empty")]
    EmptyCiphertext,

    #[error("endpoint key is empty")]
    EmptyKey,

    #[error("decoded endpoint is not valid UTF-8")]
    InvalidUtf8,
}

/// Top-level error type for all tagshell operations.
#[derive(Debug, Error)]
pub enum ShellError {
    // -- Startup --
    #[error("bootstrap resolution failed: {0}")]
    Decode(#[from] DecodeError),

    // -- Host surface --
    #[error("page load failed ({code}) for {url}: {description}")]
    Load {
        code: i32,
        description: String,
        url: String,
    },

    // -- Tag dispatch --
    #[error("hardware protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("tag hardware not available on this device")]
    UnsupportedCapability,

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ShellError>;
