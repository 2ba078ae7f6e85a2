//! XDG-style path resolution for tpux
//!
//! Everything tpux persists lives under one directory:
//! `$XDG_CONFIG_HOME/tpux/` when the variable is set and non-empty,
//! `~/.config/tpux/` otherwise.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "tpux";

/// Get the configuration directory path
pub fn get_config_dir() -> Option<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME");
    let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    resolve_config_dir(xdg.as_deref(), home.as_deref())
}

fn resolve_config_dir(xdg_config_home: Option<&OsStr>, home: Option<&Path>) -> Option<PathBuf> {
    match xdg_config_home.filter(|value| !value.is_empty()) {
        Some(base) => Some(PathBuf::from(base).join(APP_DIR)),
        None => home.map(|home| home.join(".config").join(APP_DIR)),
    }
}

/// Get the full path to the settings file
///
/// Returns: `{config_dir}/config.json`
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("config.json"))
}

/// Get the full path to the pod membership file
///
/// Returns: `{config_dir}/podips.txt`
pub fn get_pod_hosts_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("podips.txt"))
}
