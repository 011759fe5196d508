// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Loading of the persisted shell configuration.

use std::path::{Path, PathBuf};

use tagshell_core::human_errors::humanize_error;
use tagshell_core::ShellConfig;
use tracing::{info, warn};

/// File name of the JSON config inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Load the config from `dir`, or fall back to defaults.
///
/// A missing file is normal: the defaults are written out so there is a file
/// to edit. An unreadable or invalid one is logged and replaced by defaults
/// without being overwritten; it never stops the shell from starting.
pub fn load_config(dir: &Path) -> ShellConfig {
    let path = config_path(dir);
    if !path.exists() {
        let config = ShellConfig::default();
        match config.save(&path) {
            Ok(()) => info!(path = %path.display(), "no config file; wrote defaults"),
            Err(e) => warn!(path = %path.display(), error = %e, "no config file; defaults not written"),
        }
        return config;
    }
    match ShellConfig::load(&path) {
        Ok(config) => {
            info!(path = %path.display(), "config loaded");
            config
        }
        Err(e) => {
            let human = humanize_error(&e);
            warn!(path = %path.display(), error = %e, "{}", human.message);
            ShellConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults_and_writes_them() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(dir.path()), ShellConfig::default());
        let written = ShellConfig::load(&config_path(dir.path())).unwrap();
        assert_eq!(written, ShellConfig::default());
    }

    #[test]
    fn unwritable_dir_still_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-created");
        assert_eq!(load_config(&missing), ShellConfig::default());
        assert!(!config_path(&missing).exists());
    }

    #[test]
    fn saved_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShellConfig {
            simulate_tags: true,
            ..Default::default()
        };
        config.save(&config_path(dir.path())).unwrap();
        assert_eq!(load_config(dir.path()), config);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(config_path(dir.path()), "{ broken").unwrap();
        assert_eq!(load_config(dir.path()), ShellConfig::default());
        assert_eq!(
            std::fs::read_to_string(config_path(dir.path())).unwrap(),
            "{ broken"
        );
    }
}
