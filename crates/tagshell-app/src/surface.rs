// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless host surface for the desktop harness.
//
// Keeps a navigation history instead of rendering anything. Navigation
// reports `LoadFinished` immediately through the attached event sink, and
// evaluated scripts are printed so the forwarded tag calls are visible.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use tagshell_bridge::{HostSurface, PageBridge, SurfaceBinding, SurfaceEventSink};
use tagshell_core::config::SurfaceSettings;
use tagshell_core::error::Result;
use tagshell_core::types::SurfaceEvent;

#[derive(Default)]
pub struct ConsoleSurface {
    history: Mutex<Vec<String>>,
    binding: Mutex<Option<Attached>>,
    scripts: Mutex<Vec<String>>,
}

struct Attached {
    name: String,
    bridge: Arc<dyn PageBridge>,
    events: Arc<dyn SurfaceEventSink>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL of the page currently shown, if any.
    pub fn current_url(&self) -> Option<String> {
        lock(&self.history).last().cloned()
    }

    /// Name under which the call surface was exposed.
    pub fn bridge_name(&self) -> Option<String> {
        lock(&self.binding).as_ref().map(|b| b.name.clone())
    }

    /// The attached call surface, as hosted script would see it.
    pub fn bridge(&self) -> Option<Arc<dyn PageBridge>> {
        lock(&self.binding).as_ref().map(|b| Arc::clone(&b.bridge))
    }

    /// Scripts evaluated so far, oldest first.
    #[cfg(test)]
    pub fn scripts(&self) -> Vec<String> {
        lock(&self.scripts).clone()
    }

    /// Report a host callback through the attached sink.
    pub fn emit(&self, event: SurfaceEvent) {
        let events = lock(&self.binding).as_ref().map(|b| Arc::clone(&b.events));
        match events {
            Some(sink) => sink.emit(event),
            None => debug!(?event, "surface event before attach dropped"),
        }
    }

    fn finished(&self, url: String) {
        self.emit(SurfaceEvent::LoadFinished { url });
    }
}

impl HostSurface for ConsoleSurface {
    fn apply_settings(&self, settings: &SurfaceSettings) -> Result<()> {
        debug!(?settings, "surface settings applied");
        Ok(())
    }

    fn attach(&self, binding: SurfaceBinding) -> Result<()> {
        info!(name = %binding.bridge_name, "call surface attached");
        *lock(&self.binding) = Some(Attached {
            name: binding.bridge_name,
            bridge: binding.bridge,
            events: binding.events,
        });
        Ok(())
    }

    fn load_url(&self, url: &str) -> Result<()> {
        lock(&self.history).push(url.to_owned());
        self.finished(url.to_owned());
        Ok(())
    }

    fn reload(&self) -> Result<()> {
        if let Some(url) = self.current_url() {
            self.finished(url);
        }
        Ok(())
    }

    fn can_go_back(&self) -> bool {
        lock(&self.history).len() > 1
    }

    fn go_back(&self) -> Result<()> {
        let previous = {
            let mut history = lock(&self.history);
            if history.len() > 1 {
                history.pop();
            }
            history.last().cloned()
        };
        if let Some(url) = previous {
            self.finished(url);
        }
        Ok(())
    }

    fn execute_script(&self, code: &str) -> Result<()> {
        info!(len = code.len(), "evaluating script");
        println!("[script] {code}");
        lock(&self.scripts).push(code.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sink(Mutex<Vec<SurfaceEvent>>);

    impl SurfaceEventSink for Sink {
        fn emit(&self, event: SurfaceEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    struct NullBridge;

    impl PageBridge for NullBridge {
        fn show_message(&self, _text: &str) {}
        fn has_tag_capability(&self) -> bool {
            false
        }
        fn vibrate(&self, _duration_ms: i32) {}
    }

    fn attached() -> (ConsoleSurface, Arc<Sink>) {
        let surface = ConsoleSurface::new();
        let sink = Arc::new(Sink::default());
        surface
            .attach(SurfaceBinding {
                bridge_name: "AndroidApp".into(),
                bridge: Arc::new(NullBridge),
                events: sink.clone(),
            })
            .unwrap();
        (surface, sink)
    }

    fn finished(url: &str) -> SurfaceEvent {
        SurfaceEvent::LoadFinished { url: url.into() }
    }

    #[test]
    fn navigation_reports_load_finished() {
        let (surface, sink) = attached();
        surface.load_url("https://a.example").unwrap();
        surface.reload().unwrap();
        assert_eq!(
            *sink.0.lock().unwrap(),
            vec![finished("https://a.example"), finished("https://a.example")]
        );
        assert_eq!(surface.bridge_name().as_deref(), Some("AndroidApp"));
    }

    #[test]
    fn back_walks_history() {
        let (surface, sink) = attached();
        assert!(!surface.can_go_back());
        surface.load_url("https://a.example").unwrap();
        surface.load_url("https://a.example/b").unwrap();
        assert!(surface.can_go_back());

        surface.go_back().unwrap();
        assert_eq!(surface.current_url().as_deref(), Some("https://a.example"));
        assert!(!surface.can_go_back());
        assert_eq!(sink.0.lock().unwrap().last(), Some(&finished("https://a.example")));
    }

    #[test]
    fn scripts_are_recorded() {
        let (surface, _sink) = attached();
        surface.execute_script("1 + 1").unwrap();
        assert_eq!(surface.scripts(), vec!["1 + 1".to_owned()]);
    }

    #[test]
    fn events_before_attach_are_dropped() {
        let surface = ConsoleSurface::new();
        surface.load_url("https://a.example").unwrap();
        assert_eq!(surface.current_url().as_deref(), Some("https://a.example"));
        assert!(surface.bridge().is_none());
    }
}
