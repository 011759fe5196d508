// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide hand-off from platform entry points to the tag dispatcher.
//
// Tag discoveries reach native code through exported functions the platform
// calls directly (on Android, `nativeOnNewIntent`). Those have no handle to
// the running shell, so the shell installs a sink here once at startup.

use std::sync::OnceLock;

use tagshell_core::types::TagEvent;

type TagSink = Box<dyn Fn(TagEvent) + Send + Sync>;

static TAG_SINK: OnceLock<TagSink> = OnceLock::new();

/// Route platform tag discoveries to `sink`.
///
/// Returns `false` if a sink was already installed; the first one stays.
pub fn install_tag_sink(sink: impl Fn(TagEvent) + Send + Sync + 'static) -> bool {
    TAG_SINK.set(Box::new(sink)).is_ok()
}

/// Hand one discovery to the installed sink. Returns `false` when none is
/// installed yet and the event was dropped.
pub fn deliver_tag(event: TagEvent) -> bool {
    match TAG_SINK.get() {
        Some(sink) => {
            sink(event);
            true
        }
        None => {
            tracing::warn!("tag discovery before a sink was installed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static SEEN: Mutex<Vec<Vec<u8>>> = Mutex::new(Vec::new());

    // One test owns the process-wide sink.
    #[test]
    fn first_sink_receives_deliveries() {
        assert!(install_tag_sink(|event| SEEN.lock().unwrap().push(event.id)));
        assert!(!install_tag_sink(|_| {}));

        assert!(deliver_tag(TagEvent::new(vec![0x04, 0xA1])));
        assert!(deliver_tag(TagEvent::new(vec![0x01])));
        assert_eq!(*SEEN.lock().unwrap(), vec![vec![0x04, 0xA1], vec![0x01]]);
    }
}
