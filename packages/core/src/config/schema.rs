//! Configuration schema for tpux
//!
//! Defines the structure and defaults for the config.json file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Main configuration structure for tpux
///
/// Serialized to/from `~/.config/tpux/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    pub version: u32,

    /// Network interface name prefix used to detect this host's private
    /// IPv4 address (default: "ens")
    #[serde(default = "default_interface_prefix")]
    pub interface_prefix: String,

    /// Directory exported over NFS to the pod (default: "/nfs_share")
    #[serde(default = "default_nfs_share_dir")]
    pub nfs_share_dir: String,

    /// Environment overrides applied to every command tpux runs,
    /// locally and on pod hosts
    #[serde(default = "default_command_env")]
    pub command_env: BTreeMap<String, String>,
}

fn default_interface_prefix() -> String {
    "ens".to_string()
}

fn default_nfs_share_dir() -> String {
    "/nfs_share".to_string()
}

fn default_command_env() -> BTreeMap<String, String> {
    BTreeMap::from([("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            interface_prefix: default_interface_prefix(),
            nfs_share_dir: default_nfs_share_dir(),
            command_env: default_command_env(),
        }
    }
}
