// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell configuration.
//
// The entry URL is deliberately absent: it only ever comes from the bootstrap
// resolver.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError};
use crate::types::MessageDuration;

/// Default name of the call-surface object visible to hosted script.
pub const DEFAULT_BRIDGE_NAME: &str = "AndroidApp";

/// Default name of the global hook invoked on tag discovery.
pub const DEFAULT_TAG_HOOK: &str = "onNfcTag";

/// Settings for the shell and its call surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Name under which the call surface is exposed to hosted script.
    pub bridge_name: String,
    /// Global function the page may define to receive tag ids.
    pub tag_hook: String,
    /// How long `showMessage` notifications stay visible.
    pub message_duration: MessageDuration,
    /// Upper bound for a single `vibrate` request, in milliseconds.
    pub max_vibration_ms: u64,
    /// Browser surface settings applied once at startup.
    pub surface: SurfaceSettings,
    /// Use a simulated tag reader on platforms without tag hardware.
    pub simulate_tags: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            bridge_name: DEFAULT_BRIDGE_NAME.into(),
            tag_hook: DEFAULT_TAG_HOOK.into(),
            message_duration: MessageDuration::Short,
            max_vibration_ms: 5_000,
            surface: SurfaceSettings::default(),
            simulate_tags: false,
        }
    }
}

impl ShellConfig {
    /// Reject names that would not be safe to interpolate into script.
    pub fn validate(&self) -> Result<()> {
        if !is_js_identifier(&self.bridge_name) {
            return Err(ShellError::Config(format!(
                "bridge_name {:?} is not a plain script identifier",
                self.bridge_name
            )));
        }
        if !is_js_identifier(&self.tag_hook) {
            return Err(ShellError::Config(format!(
                "tag_hook {:?} is not a plain script identifier",
                self.tag_hook
            )));
        }
        Ok(())
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Cache policy of the browser surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    #[default]
    Default,
    NoCache,
    CacheElseNetwork,
}

/// Whether an https page may load http sub-resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedContentMode {
    #[default]
    AlwaysAllow,
    CompatibilityMode,
    NeverAllow,
}

/// Browser surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    pub javascript_enabled: bool,
    pub dom_storage_enabled: bool,
    pub load_with_overview_mode: bool,
    pub use_wide_viewport: bool,
    pub builtin_zoom_controls: bool,
    pub allow_file_access: bool,
    pub media_playback_requires_gesture: bool,
    pub cache_mode: CacheMode,
    pub mixed_content: MixedContentMode,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            javascript_enabled: true,
            dom_storage_enabled: true,
            load_with_overview_mode: true,
            use_wide_viewport: true,
            builtin_zoom_controls: false,
            allow_file_access: true,
            media_playback_requires_gesture: false,
            cache_mode: CacheMode::Default,
            mixed_content: MixedContentMode::AlwaysAllow,
        }
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_hosted_page_contract() {
        let config = ShellConfig::default();
        assert_eq!(config.bridge_name, "AndroidApp");
        assert_eq!(config.tag_hook, "onNfcTag");
        assert!(config.surface.javascript_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_hook_names_that_are_not_identifiers() {
        for bad in ["", "1abc", "on-tag", "x');alert(1);//", "a b"] {
            let config = ShellConfig {
                tag_hook: bad.into(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ShellError::Config(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_bridge_name() {
        let config = ShellConfig {
            bridge_name: "window.App".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = ShellConfig {
            tag_hook: "$onTag".into(),
            message_duration: MessageDuration::Long,
            simulate_tags: true,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ShellConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tag_hook": "handleTag" }"#).unwrap();
        let config = ShellConfig::load(&path).unwrap();
        assert_eq!(config.tag_hook, "handleTag");
        assert_eq!(config.bridge_name, DEFAULT_BRIDGE_NAME);
        assert_eq!(config.surface, SurfaceSettings::default());
    }

    #[test]
    fn invalid_file_contents_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tag_hook": "bad hook" }"#).unwrap();
        assert!(matches!(ShellConfig::load(&path), Err(ShellError::Config(_))));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(ShellConfig::load(&path), Err(ShellError::Serialization(_))));
    }
}
