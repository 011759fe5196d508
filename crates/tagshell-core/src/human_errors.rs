// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Maps each error to the text a user would see and to whether it should be
// shown at all. Some failures (a tag arriving while disarmed, missing tag
// hardware) are deliberately silent.

use crate::error::ShellError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip or page failure; the user can refresh.
    Transient,
    /// The app cannot continue.
    Fatal,
    /// Nothing the user needs to know about.
    Silent,
}

/// A user-facing rendering of an error.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Text for the transient notification.
    pub message: String,
    pub severity: Severity,
}

impl HumanError {
    /// Whether this error should be surfaced as a notification.
    pub fn should_notify(&self) -> bool {
        self.severity != Severity::Silent
    }
}

/// Convert a `ShellError` into the message shown to the user.
pub fn humanize_error(err: &ShellError) -> HumanError {
    match err {
        ShellError::Load { description, .. } => HumanError {
            message: format!("Connection error: {description}"),
            severity: Severity::Transient,
        },

        ShellError::Decode(_) => HumanError {
            message: "The app could not start. Please reinstall it.".into(),
            severity: Severity::Fatal,
        },

        ShellError::ProtocolViolation(_) | ShellError::UnsupportedCapability => HumanError {
            message: String::new(),
            severity: Severity::Silent,
        },

        ShellError::Bridge(detail) => HumanError {
            message: format!("A device feature is not responding. ({detail})"),
            severity: Severity::Transient,
        },

        ShellError::Config(_) | ShellError::Io(_) | ShellError::Serialization(_) => HumanError {
            message: "Settings could not be loaded; defaults are in use.".into(),
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn load_error_shows_description() {
        let err = ShellError::Load {
            code: -2,
            description: "net::ERR_NAME_NOT_RESOLVED".into(),
            url: "https://bjj.powermental.online".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.message, "Connection error: net::ERR_NAME_NOT_RESOLVED");
        assert!(human.should_notify());
    }

    #[test]
    fn protocol_violation_is_silent() {
        let human = humanize_error(&ShellError::ProtocolViolation("tag while unarmed".into()));
        assert_eq!(human.severity, Severity::Silent);
        assert!(!human.should_notify());
    }

    #[test]
    fn missing_hardware_is_silent() {
        assert!(!humanize_error(&ShellError::UnsupportedCapability).should_notify());
    }

    #[test]
    fn decode_failure_is_fatal() {
        let human = humanize_error(&ShellError::Decode(DecodeError::EmptyCiphertext));
        assert_eq!(human.severity, Severity::Fatal);
    }
}
