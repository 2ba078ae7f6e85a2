//! tpux-core - Core library for tpux
//!
//! Provides the pieces the `tpux` CLI composes into setup and teardown flows:
//! settings and path resolution, the marked-block config editor, local and
//! pod-wide command execution, pod membership storage, SSH trust, NFS exports
//! and host prechecks.

pub mod block;
pub mod config;
pub mod exec;
pub mod host;
pub mod nfs;
pub mod packages;
pub mod preflight;
pub mod shell;
pub mod version;

pub use block::{BLOCK_END, BLOCK_START, BlockError, BlockFile, WriteMode};
pub use config::{Config, init, load_config, save_config};
pub use exec::{CommandEnv, ExecError, LocalExecutor, PodExecutor};
pub use host::{
    HostError, LOCALHOST, parse_pod_addresses, load_pod_hosts, remove_pod_hosts, save_pod_hosts,
};
pub use preflight::PreflightError;
pub use shell::ShellError;
pub use version::{get_version, get_version_long};
