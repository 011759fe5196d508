// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The call surface exposed to hosted script.
//
// Three operations, fixed names and arities:
//
//   showMessage(text)        -> undefined
//   hasTagCapability()       -> boolean
//   vibrate(durationMs)      -> undefined
//
// Calls run synchronously on whatever thread the host surface uses for them.
// Nothing here waits on the host surface: notifications are posted to the
// foreground queue and the only shared state is read-only.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use tagshell_bridge::{Haptics, PageBridge};
use tagshell_core::error::{Result, ShellError};
use tagshell_core::types::MessageDuration;
use tagshell_core::ShellConfig;

use crate::ui_queue::UiSender;

/// The operations hosted script may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeMethod {
    ShowMessage,
    HasTagCapability,
    Vibrate,
}

impl BridgeMethod {
    pub const ALL: [BridgeMethod; 3] = [
        BridgeMethod::ShowMessage,
        BridgeMethod::HasTagCapability,
        BridgeMethod::Vibrate,
    ];

    /// Name as seen from script.
    pub fn name(self) -> &'static str {
        match self {
            BridgeMethod::ShowMessage => "showMessage",
            BridgeMethod::HasTagCapability => "hasTagCapability",
            BridgeMethod::Vibrate => "vibrate",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            BridgeMethod::ShowMessage | BridgeMethod::Vibrate => 1,
            BridgeMethod::HasTagCapability => 0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// A decoded call from hosted script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    ShowMessage { text: String },
    HasTagCapability,
    Vibrate { duration_ms: i32 },
}

/// Wire shape of a call: `{"name": "...", "args": [...]}`.
#[derive(Debug, Deserialize)]
struct RawCall {
    name: String,
    #[serde(default)]
    args: Vec<Value>,
}

impl BridgeCall {
    pub fn method(&self) -> BridgeMethod {
        match self {
            BridgeCall::ShowMessage { .. } => BridgeMethod::ShowMessage,
            BridgeCall::HasTagCapability => BridgeMethod::HasTagCapability,
            BridgeCall::Vibrate { .. } => BridgeMethod::Vibrate,
        }
    }

    /// Decode a JSON call message, checking name, arity and argument types.
    pub fn from_json(message: &str) -> Result<Self> {
        let raw: RawCall = serde_json::from_str(message)?;
        let method = BridgeMethod::from_name(&raw.name)
            .ok_or_else(|| ShellError::Bridge(format!("unknown bridge method {:?}", raw.name)))?;
        if raw.args.len() != method.arity() {
            return Err(ShellError::Bridge(format!(
                "{} expects {} argument(s), got {}",
                method.name(),
                method.arity(),
                raw.args.len()
            )));
        }

        match method {
            BridgeMethod::ShowMessage => match &raw.args[0] {
                Value::String(text) => Ok(BridgeCall::ShowMessage { text: text.clone() }),
                other => Err(type_error(method, "string", other)),
            },
            BridgeMethod::HasTagCapability => Ok(BridgeCall::HasTagCapability),
            BridgeMethod::Vibrate => {
                let arg = &raw.args[0];
                // Script numbers are doubles; truncate like a Java int parameter would.
                let duration_ms = arg
                    .as_i64()
                    .or_else(|| arg.as_f64().map(|f| f as i64))
                    .ok_or_else(|| type_error(method, "number", arg))?;
                Ok(BridgeCall::Vibrate {
                    duration_ms: duration_ms.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
                })
            }
        }
    }
}

fn type_error(method: BridgeMethod, expected: &str, got: &Value) -> ShellError {
    ShellError::Bridge(format!("{} expects a {expected}, got {got}", method.name()))
}

/// Value returned to script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BridgeValue {
    Unit,
    Bool(bool),
}

impl BridgeValue {
    /// JSON rendering for hosts that answer calls with a message.
    pub fn to_json(self) -> String {
        match self {
            BridgeValue::Unit => "null".to_owned(),
            BridgeValue::Bool(b) => b.to_string(),
        }
    }
}

/// Native capability object attached to the host surface.
pub struct CallSurface {
    ui: UiSender,
    haptics: Arc<dyn Haptics>,
    tag_capable: bool,
    message_duration: MessageDuration,
    max_vibration: Duration,
}

impl CallSurface {
    /// `tag_capable` is sampled once; it never changes for the process.
    pub fn new(
        config: &ShellConfig,
        ui: UiSender,
        haptics: Arc<dyn Haptics>,
        tag_capable: bool,
    ) -> Self {
        Self {
            ui,
            haptics,
            tag_capable,
            message_duration: config.message_duration,
            max_vibration: Duration::from_millis(config.max_vibration_ms),
        }
    }

    /// Dispatch a decoded call.
    pub fn invoke(&self, call: &BridgeCall) -> BridgeValue {
        debug!(method = call.method().name(), "bridge call");
        match call {
            BridgeCall::ShowMessage { text } => {
                PageBridge::show_message(self, text);
                BridgeValue::Unit
            }
            BridgeCall::HasTagCapability => BridgeValue::Bool(self.has_tag_capability()),
            BridgeCall::Vibrate { duration_ms } => {
                PageBridge::vibrate(self, *duration_ms);
                BridgeValue::Unit
            }
        }
    }

    /// Decode and dispatch a JSON call message.
    ///
    /// Bad messages are logged and answered with `Unit`; nothing is thrown
    /// back into the page.
    pub fn invoke_json(&self, message: &str) -> BridgeValue {
        match BridgeCall::from_json(message) {
            Ok(call) => self.invoke(&call),
            Err(e) => {
                warn!(error = %e, "rejected bridge call");
                BridgeValue::Unit
            }
        }
    }
}

impl PageBridge for CallSurface {
    fn show_message(&self, text: &str) {
        if !self.ui.show_message(text, self.message_duration) {
            debug!("showMessage after shutdown ignored");
        }
    }

    fn has_tag_capability(&self) -> bool {
        self.tag_capable
    }

    fn vibrate(&self, duration_ms: i32) {
        if duration_ms <= 0 {
            return;
        }
        if !self.haptics.has_vibrator() {
            debug!("vibrate on device without vibrator ignored");
            return;
        }
        let requested = Duration::from_millis(duration_ms as u64);
        let duration = requested.min(self.max_vibration);
        if let Err(e) = self.haptics.vibrate(duration) {
            warn!(error = %e, "vibrate failed");
        }
    }
}
