// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! tagshell: Native platform bridge abstractions.
//!
//! Defines the traits for the collaborators the shell drives (browser surface,
//! tag hardware, notifications, haptics) and picks the implementation for the
//! target operating system.

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

pub mod stub;
pub mod tag_sink;

use tagshell_core::ShellConfig;

pub use traits::{
    Haptics, HostSurface, Notifier, PageBridge, Platform, PlatformBridge, SurfaceBinding,
    SurfaceEventSink, TagReader,
};

/// Build the platform capabilities for the target operating system.
pub fn platform_bridge(config: &ShellConfig) -> Platform {
    #[cfg(target_os = "android")]
    {
        // Android: JNI calls into the hosting Activity.
        let _ = config;
        Platform::from_bridge(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: log-only bridge, optionally with a simulated tag reader.
        let platform = Platform::from_bridge(stub::StubBridge);
        if config.simulate_tags {
            platform.with_tag_reader(std::sync::Arc::new(stub::SimulatedTagReader::new()))
        } else {
            platform
        }
    }
}
