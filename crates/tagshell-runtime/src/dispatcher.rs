// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tag discovery dispatcher.
//
// Two states, `Unarmed` (initial) and `Armed`:
//
//   on_foreground      Unarmed -> Armed     register with the hardware layer
//   on_background      Armed   -> Unarmed   unregister
//   on_tag_discovered  Armed   -> Armed     forward the id into the page
//
// Both transitions are idempotent. A discovery while `Unarmed` is a protocol
// violation from the hardware layer and is dropped. Without tag hardware every
// operation is a no-op.
//
// Discoveries arrive on the hardware notification thread, so the resulting
// script is posted to the foreground queue rather than run inline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use tagshell_bridge::TagReader;
use tagshell_core::error::{Result, ShellError};
use tagshell_core::types::{DiscoveryCategory, DispatcherState, SessionToken, TagEvent, TagId};

use crate::script::hook_invocation;
use crate::ui_queue::UiSender;

/// What happened to one discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A script invocation carrying this id was queued for the page.
    Forwarded(TagId),
    Ignored(IgnoreReason),
}

/// Why a discovery produced no script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Delivered while unarmed.
    Unarmed,
    /// The device has no tag hardware.
    Unsupported,
    /// The foreground queue has shut down.
    SurfaceClosed,
}

/// Arms tag discovery while foregrounded and forwards discoveries to the page.
pub struct TagDispatcher {
    reader: Arc<dyn TagReader>,
    ui: UiSender,
    hook: String,
    session: SessionToken,
    available: bool,
    /// Serialises arm/disarm, including the hardware call.
    transition: Mutex<DispatcherState>,
    /// Mirror of the committed state for the discovery path.
    armed: AtomicBool,
}

impl TagDispatcher {
    /// Hardware presence is sampled once here.
    pub fn new(reader: Arc<dyn TagReader>, ui: UiSender, hook: impl Into<String>) -> Self {
        let available = reader.is_available();
        if !available {
            info!("no tag hardware; dispatcher disabled");
        }
        Self {
            reader,
            ui,
            hook: hook.into(),
            session: SessionToken::new(),
            available,
            transition: Mutex::new(DispatcherState::Unarmed),
            armed: AtomicBool::new(false),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Never waits on an arm/disarm in progress.
    pub fn state(&self) -> DispatcherState {
        if self.armed.load(Ordering::Acquire) {
            DispatcherState::Armed
        } else {
            DispatcherState::Unarmed
        }
    }

    pub fn session(&self) -> SessionToken {
        self.session
    }

    /// Arm: register both discovery categories with the hardware layer.
    ///
    /// On a registration error the dispatcher stays `Unarmed`.
    pub fn on_foreground(&self) -> Result<()> {
        if !self.available {
            return Ok(());
        }
        // Held across registration so racing calls register once. Discoveries
        // read `armed` and never wait on it.
        let mut state = self.lock_state();
        if *state == DispatcherState::Armed {
            debug!("tag dispatcher already armed");
            return Ok(());
        }
        self.reader.register(&self.session, &DiscoveryCategory::ALL)?;
        *state = DispatcherState::Armed;
        self.armed.store(true, Ordering::Release);
        info!(session = %self.session, "tag dispatcher armed");
        Ok(())
    }

    /// Disarm: unregister from the hardware layer.
    ///
    /// The dispatcher is `Unarmed` afterwards even if unregistration fails;
    /// the error is still returned.
    pub fn on_background(&self) -> Result<()> {
        if !self.available {
            return Ok(());
        }
        let mut state = self.lock_state();
        if *state == DispatcherState::Unarmed {
            debug!("tag dispatcher already unarmed");
            return Ok(());
        }
        *state = DispatcherState::Unarmed;
        self.armed.store(false, Ordering::Release);
        info!("tag dispatcher disarmed");
        self.reader.unregister()
    }

    /// Forward one discovery into the page.
    ///
    /// Safe to call from the hardware notification thread.
    pub fn on_tag_discovered(&self, event: TagEvent) -> DispatchOutcome {
        if !self.available {
            debug!("tag event on device without tag hardware ignored");
            return DispatchOutcome::Ignored(IgnoreReason::Unsupported);
        }
        if self.state() == DispatcherState::Unarmed {
            let violation = ShellError::ProtocolViolation(format!(
                "{:?} tag delivered while unarmed",
                event.category
            ));
            warn!(error = %violation, "dropping tag event");
            return DispatchOutcome::Ignored(IgnoreReason::Unarmed);
        }

        let tag_id = event.tag_id();
        let script = hook_invocation(&self.hook, &tag_id);
        if !self.ui.execute_script(script) {
            return DispatchOutcome::Ignored(IgnoreReason::SurfaceClosed);
        }
        info!(
            tag_id = %tag_id,
            category = ?event.category,
            discovered_at = %event.discovered_at,
            "tag forwarded to page"
        );
        DispatchOutcome::Forwarded(tag_id)
    }

    fn lock_state(&self) -> MutexGuard<'_, DispatcherState> {
        self.transition.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TagDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagDispatcher")
            .field("hook", &self.hook)
            .field("session", &self.session)
            .field("available", &self.available)
            .field("state", &self.state())
            .finish()
    }
}
