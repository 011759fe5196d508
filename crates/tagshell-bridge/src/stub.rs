// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where the mobile APIs are unavailable.
//
// Notifications go to the log, vibration is a no-op, and there is no tag
// hardware. `SimulatedTagReader` stands in for the hardware when the desktop
// harness wants to exercise the dispatcher.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tagshell_core::error::{Result, ShellError};
use tagshell_core::types::{DiscoveryCategory, MessageDuration, SessionToken};

use crate::traits::*;

/// No-op bridge returned on non-mobile platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl TagReader for StubBridge {
    fn is_available(&self) -> bool {
        false
    }

    fn register(&self, _session: &SessionToken, _categories: &[DiscoveryCategory]) -> Result<()> {
        tracing::warn!("TagReader::register called on stub bridge");
        Err(ShellError::UnsupportedCapability)
    }

    fn unregister(&self) -> Result<()> {
        Err(ShellError::UnsupportedCapability)
    }
}

impl Notifier for StubBridge {
    fn show_message(&self, text: &str, duration: MessageDuration) -> Result<()> {
        tracing::info!(?duration, "notification: {text}");
        Ok(())
    }
}

impl Haptics for StubBridge {
    fn has_vibrator(&self) -> bool {
        false
    }

    fn vibrate(&self, duration: Duration) -> Result<()> {
        tracing::debug!(ms = duration.as_millis() as u64, "vibrate ignored on stub bridge");
        Ok(())
    }
}

/// Tag reader that accepts registration but never touches hardware.
///
/// Discoveries are injected by whoever owns the dispatcher.
#[derive(Debug, Default)]
pub struct SimulatedTagReader {
    registered: AtomicBool,
    registrations: AtomicUsize,
}

impl SimulatedTagReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a registration is currently active.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// Total number of `register` calls received.
    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }
}

impl TagReader for SimulatedTagReader {
    fn is_available(&self) -> bool {
        true
    }

    fn register(&self, session: &SessionToken, categories: &[DiscoveryCategory]) -> Result<()> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.registered.store(true, Ordering::SeqCst);
        tracing::info!(%session, ?categories, "simulated tag reader registered");
        Ok(())
    }

    fn unregister(&self) -> Result<()> {
        self.registered.store(false, Ordering::SeqCst);
        tracing::info!("simulated tag reader unregistered");
        Ok(())
    }
}
