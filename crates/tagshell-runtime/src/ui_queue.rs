// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Foreground command queue.
//
// The host surface may only be driven from its own foreground context, while
// tag discoveries and bridge calls arrive on other threads. Those threads post
// commands here; the lifecycle coordinator drains the queue on the foreground
// context and applies them in order.
//
// The channel is unbounded so posting never blocks the caller.

use tokio::sync::mpsc;
use tracing::debug;

use tagshell_bridge::SurfaceEventSink;
use tagshell_core::types::{MessageDuration, SurfaceEvent};

/// Work that must run on the foreground context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Run a script statement in the hosted page.
    EvaluateScript(String),
    /// Show a transient notification.
    ShowMessage {
        text: String,
        duration: MessageDuration,
    },
    /// A lifecycle callback reported by the host surface.
    Surface(SurfaceEvent),
}

/// Create a connected sender/receiver pair.
pub fn ui_channel() -> (UiSender, UiReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiSender { tx }, UiReceiver { rx })
}

/// Cloneable, thread-safe handle for posting foreground work.
#[derive(Debug, Clone)]
pub struct UiSender {
    tx: mpsc::UnboundedSender<UiCommand>,
}

impl UiSender {
    /// Post a command. Returns `false` if the foreground side has shut down.
    pub fn post(&self, command: UiCommand) -> bool {
        match self.tx.send(command) {
            Ok(()) => true,
            Err(mpsc::error::SendError(command)) => {
                debug!(?command, "foreground queue closed; command dropped");
                false
            }
        }
    }

    pub fn execute_script(&self, code: impl Into<String>) -> bool {
        self.post(UiCommand::EvaluateScript(code.into()))
    }

    pub fn show_message(&self, text: impl Into<String>, duration: MessageDuration) -> bool {
        self.post(UiCommand::ShowMessage {
            text: text.into(),
            duration,
        })
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl SurfaceEventSink for UiSender {
    fn emit(&self, event: SurfaceEvent) {
        self.post(UiCommand::Surface(event));
    }
}

/// Foreground end of the queue.
#[derive(Debug)]
pub struct UiReceiver {
    rx: mpsc::UnboundedReceiver<UiCommand>,
}

impl UiReceiver {
    /// Take the next pending command without waiting.
    pub fn try_next(&mut self) -> Option<UiCommand> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next command. `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<UiCommand> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_arrive_in_posting_order() {
        let (tx, mut rx) = ui_channel();
        assert!(tx.execute_script("a()"));
        assert!(tx.show_message("hi", MessageDuration::Short));
        tx.emit(SurfaceEvent::Progress(40));

        assert_eq!(rx.try_next(), Some(UiCommand::EvaluateScript("a()".into())));
        assert_eq!(
            rx.try_next(),
            Some(UiCommand::ShowMessage {
                text: "hi".into(),
                duration: MessageDuration::Short
            })
        );
        assert_eq!(rx.try_next(), Some(UiCommand::Surface(SurfaceEvent::Progress(40))));
        assert_eq!(rx.try_next(), None);
    }

    #[test]
    fn posting_after_receiver_drop_reports_closed() {
        let (tx, rx) = ui_channel();
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.execute_script("a()"));
    }

    #[test]
    fn posting_from_other_threads_never_blocks() {
        let (tx, mut rx) = ui_channel();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let tx = tx.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        tx.execute_script(format!("f({i},{j})"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let mut count = 0;
        while rx.try_next().is_some() {
            count += 1;
        }
        assert_eq!(count, 400);
    }

    #[tokio::test]
    async fn next_waits_for_a_command() {
        let (tx, mut rx) = ui_channel();
        tokio::spawn(async move {
            tx.execute_script("later()");
        });
        assert_eq!(rx.next().await, Some(UiCommand::EvaluateScript("later()".into())));
    }
}
