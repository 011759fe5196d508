// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording doubles for the platform traits, shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use tagshell_bridge::{
    Haptics, HostSurface, Notifier, PageBridge, Platform, SurfaceBinding, SurfaceEventSink,
    TagReader,
};
use tagshell_core::config::SurfaceSettings;
use tagshell_core::error::{Result, ShellError};
use tagshell_core::types::{DiscoveryCategory, MessageDuration, SessionToken, SurfaceEvent};

// ---------------------------------------------------------------------------
// Tag reader
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingTagReader {
    available: bool,
    fail_register: bool,
    active: AtomicBool,
    registrations: AtomicUsize,
    unregistrations: AtomicUsize,
    double_registrations: AtomicUsize,
    last: Mutex<Option<(SessionToken, Vec<DiscoveryCategory>)>>,
}

impl RecordingTagReader {
    pub fn available() -> Self {
        Self {
            available: true,
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            available: true,
            fail_register: true,
            ..Default::default()
        }
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn unregistrations(&self) -> usize {
        self.unregistrations.load(Ordering::SeqCst)
    }

    /// Registrations received while a previous one was still active.
    pub fn double_registrations(&self) -> usize {
        self.double_registrations.load(Ordering::SeqCst)
    }

    pub fn is_registered(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn last_registration(&self) -> Option<(SessionToken, Vec<DiscoveryCategory>)> {
        self.last.lock().unwrap().clone()
    }
}

impl TagReader for RecordingTagReader {
    fn is_available(&self) -> bool {
        self.available
    }

    fn register(&self, session: &SessionToken, categories: &[DiscoveryCategory]) -> Result<()> {
        if self.fail_register {
            return Err(ShellError::Bridge("registration refused".into()));
        }
        if self.active.swap(true, Ordering::SeqCst) {
            self.double_registrations.fetch_add(1, Ordering::SeqCst);
        }
        self.registrations.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((*session, categories.to_vec()));
        Ok(())
    }

    fn unregister(&self) -> Result<()> {
        self.active.store(false, Ordering::SeqCst);
        self.unregistrations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Tag reader whose `register` parks until the test releases it.
pub struct GatedTagReader {
    entered: mpsc::Sender<()>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl GatedTagReader {
    /// The reader, a receiver signalled when `register` is entered, and the
    /// sender that lets it return.
    pub fn new() -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered, entered_rx) = mpsc::channel();
        let (release_tx, release) = mpsc::channel();
        let reader = Self {
            entered,
            release: Mutex::new(release),
        };
        (reader, entered_rx, release_tx)
    }
}

impl TagReader for GatedTagReader {
    fn is_available(&self) -> bool {
        true
    }

    fn register(&self, _session: &SessionToken, _categories: &[DiscoveryCategory]) -> Result<()> {
        let _ = self.entered.send(());
        self.release
            .lock()
            .unwrap()
            .recv()
            .map_err(|_| ShellError::Bridge("gate dropped".into()))
    }

    fn unregister(&self) -> Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Notifier / haptics
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_message(&self, text: &str, _duration: MessageDuration) -> Result<()> {
        self.messages.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingHaptics {
    no_vibrator: bool,
    pulses: Mutex<Vec<Duration>>,
}

impl RecordingHaptics {
    pub fn without_vibrator() -> Self {
        Self {
            no_vibrator: true,
            ..Default::default()
        }
    }

    pub fn pulses(&self) -> Vec<Duration> {
        self.pulses.lock().unwrap().clone()
    }
}

impl Haptics for RecordingHaptics {
    fn has_vibrator(&self) -> bool {
        !self.no_vibrator
    }

    fn vibrate(&self, duration: Duration) -> Result<()> {
        self.pulses.lock().unwrap().push(duration);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Host surface
// ---------------------------------------------------------------------------

/// Everything a recording host has been asked to do, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ApplySettings,
    Attach { bridge_name: String },
    LoadUrl(String),
    Reload,
    GoBack,
    ExecuteScript(String),
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    history: Mutex<Vec<String>>,
    bridge: Mutex<Option<Arc<dyn PageBridge>>>,
    events: Mutex<Option<Arc<dyn SurfaceEventSink>>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::ExecuteScript(code) => Some(code),
                _ => None,
            })
            .collect()
    }

    /// The call surface handed over at attach time.
    pub fn bridge(&self) -> Option<Arc<dyn PageBridge>> {
        self.bridge.lock().unwrap().clone()
    }

    /// Report a lifecycle callback the way a real surface would.
    pub fn emit(&self, event: SurfaceEvent) {
        if let Some(sink) = self.events.lock().unwrap().as_ref() {
            sink.emit(event);
        }
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl HostSurface for RecordingHost {
    fn apply_settings(&self, _settings: &SurfaceSettings) -> Result<()> {
        self.record(HostCall::ApplySettings);
        Ok(())
    }

    fn attach(&self, binding: SurfaceBinding) -> Result<()> {
        self.record(HostCall::Attach {
            bridge_name: binding.bridge_name,
        });
        *self.bridge.lock().unwrap() = Some(binding.bridge);
        *self.events.lock().unwrap() = Some(binding.events);
        Ok(())
    }

    fn load_url(&self, url: &str) -> Result<()> {
        self.record(HostCall::LoadUrl(url.to_owned()));
        self.history.lock().unwrap().push(url.to_owned());
        Ok(())
    }

    fn reload(&self) -> Result<()> {
        self.record(HostCall::Reload);
        Ok(())
    }

    fn can_go_back(&self) -> bool {
        self.history.lock().unwrap().len() > 1
    }

    fn go_back(&self) -> Result<()> {
        self.record(HostCall::GoBack);
        self.history.lock().unwrap().pop();
        Ok(())
    }

    fn execute_script(&self, code: &str) -> Result<()> {
        self.record(HostCall::ExecuteScript(code.to_owned()));
        Ok(())
    }
}

/// A platform assembled from recording doubles.
pub fn recording_platform(
    tags: Arc<RecordingTagReader>,
    notifier: Arc<RecordingNotifier>,
    haptics: Arc<RecordingHaptics>,
) -> Platform {
    Platform {
        name: "test".into(),
        tags,
        notifier,
        haptics,
    }
}
