// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tagshell: Native-web bridge runtime: the call surface exposed to hosted
// script, the tag discovery dispatcher, and the lifecycle coordinator that
// drives both from the foreground context.

pub mod call_surface;
pub mod coordinator;
pub mod dispatcher;
pub mod script;
pub mod ui_queue;

#[cfg(test)]
mod test_support;

pub use call_surface::{BridgeCall, BridgeMethod, BridgeValue, CallSurface};
pub use coordinator::{LifecycleCoordinator, LoadingIndicator};
pub use dispatcher::{DispatchOutcome, IgnoreReason, TagDispatcher};
pub use ui_queue::{ui_channel, UiCommand, UiReceiver, UiSender};
