// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Where the harness keeps its config file.

use std::path::PathBuf;

use tracing::warn;

/// Explicit override for the data directory.
pub const DATA_DIR_ENV: &str = "TAGSHELL_DATA_DIR";

const APP_DIR: &str = "tagshell";

/// The harness data directory, created on first use.
///
/// Creation failures are logged; the config loader then simply finds no file.
pub fn data_dir() -> PathBuf {
    let dir = resolve(|key| std::env::var_os(key).map(PathBuf::from));
    if let Err(e) = std::fs::create_dir_all(&dir) {
        warn!(path = %dir.display(), error = %e, "could not create data directory");
    }
    dir
}

/// Pick the directory from the environment lookup `var`.
///
/// `TAGSHELL_DATA_DIR` wins as is. Otherwise `$XDG_DATA_HOME/tagshell`, then
/// `$HOME/.local/share/tagshell`, then the temp dir.
fn resolve(var: impl Fn(&str) -> Option<PathBuf>) -> PathBuf {
    if let Some(dir) = var(DATA_DIR_ENV).filter(|p| !p.as_os_str().is_empty()) {
        return dir;
    }
    let base = var("XDG_DATA_HOME")
        .filter(|p| p.is_absolute())
        .or_else(|| var("HOME").map(|home| home.join(".local").join("share")))
        .unwrap_or_else(std::env::temp_dir);
    base.join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<PathBuf> {
        let vars: HashMap<String, PathBuf> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), PathBuf::from(v)))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn explicit_override_wins() {
        let dir = resolve(lookup(&[
            (DATA_DIR_ENV, "/srv/shell"),
            ("XDG_DATA_HOME", "/xdg"),
        ]));
        assert_eq!(dir, PathBuf::from("/srv/shell"));
    }

    #[test]
    fn xdg_then_home() {
        assert_eq!(
            resolve(lookup(&[("XDG_DATA_HOME", "/xdg"), ("HOME", "/home/u")])),
            PathBuf::from("/xdg/tagshell")
        );
        assert_eq!(
            resolve(lookup(&[("HOME", "/home/u")])),
            PathBuf::from("/home/u/.local/share/tagshell")
        );
    }

    #[test]
    fn relative_xdg_is_ignored() {
        assert_eq!(
            resolve(lookup(&[("XDG_DATA_HOME", "rel"), ("HOME", "/home/u")])),
            PathBuf::from("/home/u/.local/share/tagshell")
        );
    }

    #[test]
    fn falls_back_to_temp_dir() {
        assert!(resolve(lookup(&[])).starts_with(std::env::temp_dir()));
    }
}
