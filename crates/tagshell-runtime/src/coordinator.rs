// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lifecycle coordinator.
//
// Owns the foreground side of the shell: resolves the entry URL, attaches the
// call surface to the host surface, keeps the tag dispatcher armed exactly
// while the app is visible, and applies everything other threads post to the
// foreground queue.
//
// Every method here must be called from the foreground context.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use tagshell_bridge::{HostSurface, Notifier, Platform, SurfaceBinding};
use tagshell_core::bootstrap::{self, EncodedEndpoint, ResolvedUrl};
use tagshell_core::error::{Result, ShellError};
use tagshell_core::human_errors::humanize_error;
use tagshell_core::types::{MessageDuration, SurfaceEvent};
use tagshell_core::ShellConfig;

use crate::call_surface::CallSurface;
use crate::dispatcher::TagDispatcher;
use crate::ui_queue::{ui_channel, UiCommand, UiReceiver, UiSender};

/// Loading chrome state for the presentation layer to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingIndicator {
    /// Progress bar visible.
    pub visible: bool,
    /// Progress in percent while visible.
    pub progress: u8,
    /// Pull-to-refresh spinner active.
    pub refreshing: bool,
}

/// Wires host surface lifecycle, visibility and back navigation into the
/// call surface and tag dispatcher.
pub struct LifecycleCoordinator {
    config: ShellConfig,
    host: Arc<dyn HostSurface>,
    notifier: Arc<dyn Notifier>,
    bridge: Arc<CallSurface>,
    dispatcher: Arc<TagDispatcher>,
    ui: UiSender,
    commands: UiReceiver,
    loading: LoadingIndicator,
    entry_url: Option<ResolvedUrl>,
}

impl LifecycleCoordinator {
    /// Build the coordinator and its components. Nothing is loaded yet.
    pub fn new(config: ShellConfig, platform: Platform, host: Arc<dyn HostSurface>) -> Result<Self> {
        config.validate()?;
        let (ui, commands) = ui_channel();
        let dispatcher = Arc::new(TagDispatcher::new(
            platform.tags,
            ui.clone(),
            config.tag_hook.clone(),
        ));
        let bridge = Arc::new(CallSurface::new(
            &config,
            ui.clone(),
            platform.haptics,
            dispatcher.is_available(),
        ));
        #[cfg(target_os = "android")]
        {
            let sink = Arc::clone(&dispatcher);
            let installed = tagshell_bridge::tag_sink::install_tag_sink(move |event| {
                sink.on_tag_discovered(event);
            });
            if !installed {
                warn!("tag sink already installed; keeping the first dispatcher");
            }
        }
        info!(platform = %platform.name, tags = dispatcher.is_available(), "coordinator created");
        Ok(Self {
            config,
            host,
            notifier: platform.notifier,
            bridge,
            dispatcher,
            ui,
            commands,
            loading: LoadingIndicator::default(),
            entry_url: None,
        })
    }

    /// Handle for the platform glue that receives hardware discoveries.
    pub fn dispatcher(&self) -> Arc<TagDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// The call surface attached to the host.
    pub fn call_surface(&self) -> Arc<CallSurface> {
        Arc::clone(&self.bridge)
    }

    /// Handle for posting work onto the foreground queue.
    pub fn ui_sender(&self) -> UiSender {
        self.ui.clone()
    }

    pub fn loading(&self) -> LoadingIndicator {
        self.loading
    }

    #[cfg(test)]
    pub fn entry_url(&self) -> Option<&ResolvedUrl> {
        self.entry_url.as_ref()
    }

    /// Resolve the shipped entry URL and load it.
    ///
    /// A decode failure is fatal and returned as is; there is no fallback URL.
    pub fn start(&mut self) -> Result<ResolvedUrl> {
        let url = bootstrap::resolve()?;
        self.launch(url)
    }

    /// Like [`start`](Self::start), with an explicit endpoint.
    pub fn start_from(&mut self, endpoint: &EncodedEndpoint<'_>) -> Result<ResolvedUrl> {
        let url = endpoint.resolve()?;
        self.launch(url)
    }

    fn launch(&mut self, url: ResolvedUrl) -> Result<ResolvedUrl> {
        if let Some(existing) = &self.entry_url {
            debug!("coordinator already started");
            return Ok(existing.clone());
        }
        if !bootstrap::verify(url.as_str()) {
            warn!(url_fingerprint = %url.fingerprint(), "entry URL failed sanity check");
        }

        self.host.apply_settings(&self.config.surface)?;
        self.host.attach(SurfaceBinding {
            bridge_name: self.config.bridge_name.clone(),
            bridge: self.bridge.clone(),
            events: Arc::new(self.ui.clone()),
        })?;

        self.loading = LoadingIndicator {
            visible: true,
            progress: 0,
            refreshing: false,
        };
        self.host.load_url(url.as_str())?;
        info!(url_fingerprint = %url.fingerprint(), "entry URL loading");
        self.entry_url = Some(url.clone());
        Ok(url)
    }

    // -- Visibility ----------------------------------------------------------

    /// The app became visible: arm tag discovery.
    pub fn on_foreground(&self) {
        if let Err(e) = self.dispatcher.on_foreground() {
            warn!(error = %e, "could not arm tag discovery");
        }
    }

    /// The app lost visibility: disarm tag discovery.
    pub fn on_background(&self) {
        if let Err(e) = self.dispatcher.on_background() {
            warn!(error = %e, "tag discovery unregistration failed");
        }
    }

    // -- Host surface callbacks ---------------------------------------------

    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::LoadFinished { url } => self.on_load_finished(&url),
            SurfaceEvent::LoadError {
                code,
                description,
                url,
            } => self.on_load_error(code, &description, &url),
            SurfaceEvent::Progress(percent) => self.on_progress(percent),
        }
    }

    pub fn on_load_finished(&mut self, url: &str) {
        debug!(url, "page load finished");
        self.loading.visible = false;
        self.loading.refreshing = false;
    }

    /// Show the failure to the user. No retry and no reload.
    pub fn on_load_error(&mut self, code: i32, description: &str, url: &str) {
        let err = ShellError::Load {
            code,
            description: description.to_owned(),
            url: url.to_owned(),
        };
        warn!(error = %err, "page load failed");
        let human = humanize_error(&err);
        if human.should_notify() {
            self.notify(&human.message, MessageDuration::Short);
        }
    }

    pub fn on_progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent < 100 {
            self.loading.visible = true;
            self.loading.progress = percent;
        } else {
            self.loading.visible = false;
        }
    }

    // -- User intents ---------------------------------------------------------

    /// Pull-to-refresh: reload the current page unconditionally.
    pub fn on_refresh(&mut self) -> Result<()> {
        self.loading.refreshing = true;
        self.host.reload()
    }

    /// Back navigation. Returns `true` when the intent was consumed by page
    /// history; `false` leaves it to the platform default.
    pub fn on_back_pressed(&self) -> bool {
        if !self.host.can_go_back() {
            return false;
        }
        match self.host.go_back() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "go back failed");
                false
            }
        }
    }

    // -- Foreground queue -----------------------------------------------------

    /// Apply every command currently queued. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(command) = self.commands.try_next() {
            self.apply(command);
            applied += 1;
        }
        applied
    }

    /// Wait for the next queued command.
    pub async fn next_command(&mut self) -> Option<UiCommand> {
        self.commands.next().await
    }

    /// Apply one foreground command.
    pub fn apply(&mut self, command: UiCommand) {
        match command {
            UiCommand::EvaluateScript(code) => {
                if let Err(e) = self.host.execute_script(&code) {
                    warn!(error = %e, "script execution failed");
                }
            }
            UiCommand::ShowMessage { text, duration } => self.notify(&text, duration),
            UiCommand::Surface(event) => self.handle_surface_event(event),
        }
    }

    fn notify(&self, text: &str, duration: MessageDuration) {
        if let Err(e) = self.notifier.show_message(text, duration) {
            error!(error = %e, "notification failed");
        }
    }
}
