// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the collaborators the shell drives:
// the embedded browser surface, the tag hardware, and the small set of
// device capabilities the hosted page can reach.

use std::sync::Arc;
use std::time::Duration;

use tagshell_core::config::SurfaceSettings;
use tagshell_core::error::Result;
use tagshell_core::types::{DiscoveryCategory, MessageDuration, SessionToken, SurfaceEvent};

/// The embedded browsing surface that renders the hosted web application.
///
/// Every method must be called from the surface's own foreground context.
/// Callbacks flow the other way through the [`SurfaceEventSink`] handed over
/// in [`HostSurface::attach`].
pub trait HostSurface: Send + Sync {
    /// Apply browser settings. Called once, before anything is loaded.
    fn apply_settings(&self, settings: &SurfaceSettings) -> Result<()>;

    /// Expose the call surface to hosted script and register the lifecycle
    /// callbacks. Called once, before the first load.
    fn attach(&self, binding: SurfaceBinding) -> Result<()>;

    /// Navigate to `url`.
    fn load_url(&self, url: &str) -> Result<()>;

    /// Reload the current page.
    fn reload(&self) -> Result<()>;

    /// Whether there is in-page history to go back to.
    fn can_go_back(&self) -> bool;

    /// Navigate one step back in page history.
    fn go_back(&self) -> Result<()>;

    /// Run a script statement in the page's context. Fire-and-forget.
    fn execute_script(&self, code: &str) -> Result<()>;
}

/// Everything a host surface receives at attach time.
pub struct SurfaceBinding {
    /// Name under which `bridge` is visible to hosted script.
    pub bridge_name: String,
    /// The call surface capability.
    pub bridge: Arc<dyn PageBridge>,
    /// Where the surface reports load lifecycle callbacks.
    pub events: Arc<dyn SurfaceEventSink>,
}

/// Native operations the hosted page may call synchronously.
///
/// Names and arities on the script side are `showMessage(text)`,
/// `hasTagCapability()` and `vibrate(durationMs)`. Implementations must return
/// without waiting on the host surface.
pub trait PageBridge: Send + Sync {
    fn show_message(&self, text: &str);
    fn has_tag_capability(&self) -> bool;
    fn vibrate(&self, duration_ms: i32);
}

/// Receiver for host surface lifecycle callbacks.
pub trait SurfaceEventSink: Send + Sync {
    fn emit(&self, event: SurfaceEvent);
}

/// Hardware proximity-tag reader.
///
/// Discoveries are delivered out-of-band by the platform glue straight to the
/// tag dispatcher; this trait only covers presence and registration.
pub trait TagReader: Send + Sync {
    /// Whether tag hardware exists on this device.
    fn is_available(&self) -> bool;

    /// Start foreground delivery of the given categories for `session`.
    fn register(&self, session: &SessionToken, categories: &[DiscoveryCategory]) -> Result<()>;

    /// Stop foreground delivery.
    fn unregister(&self) -> Result<()>;
}

/// Transient user-visible notifications (toasts).
pub trait Notifier: Send + Sync {
    fn show_message(&self, text: &str, duration: MessageDuration) -> Result<()>;
}

/// Haptic feedback.
pub trait Haptics: Send + Sync {
    fn has_vibrator(&self) -> bool;
    fn vibrate(&self, duration: Duration) -> Result<()>;
}

/// Unified bridge grouping all native capabilities of one platform.
pub trait PlatformBridge: TagReader + Notifier + Haptics {
    /// Human-readable platform name (e.g. "Android").
    fn platform_name(&self) -> &str;
}

/// A platform split into the capability handles each component needs.
#[derive(Clone)]
pub struct Platform {
    pub name: String,
    pub tags: Arc<dyn TagReader>,
    pub notifier: Arc<dyn Notifier>,
    pub haptics: Arc<dyn Haptics>,
}

impl Platform {
    /// Share one bridge implementation across all capability handles.
    pub fn from_bridge<B: PlatformBridge + 'static>(bridge: B) -> Self {
        let bridge = Arc::new(bridge);
        Self {
            name: bridge.platform_name().to_owned(),
            tags: bridge.clone(),
            notifier: bridge.clone(),
            haptics: bridge,
        }
    }

    /// Replace the tag reader, keeping the other capabilities.
    pub fn with_tag_reader(mut self, tags: Arc<dyn TagReader>) -> Self {
        self.tags = tags;
        self
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("name", &self.name)
            .field("tags_available", &self.tags.is_available())
            .finish()
    }
}
