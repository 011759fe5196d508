// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Script statements injected into the hosted page.

use tagshell_core::types::TagId;

/// Build the statement that hands a tag id to the page's global hook.
///
/// The call is guarded so pages that never define the hook are unaffected.
/// `hook` must be a plain identifier (see `ShellConfig::validate`); the id is
/// emitted as a JSON string literal.
pub fn hook_invocation(hook: &str, tag_id: &TagId) -> String {
    let arg = serde_json::Value::String(tag_id.as_str().to_owned());
    format!("if (typeof window.{hook} === 'function') {{ window.{hook}({arg}); }}")
}
