//! Host prechecks
//!
//! Conditions that must hold before tpux touches the machine, and
//! discovery of this host's private address.

use std::fs;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::Path;

use thiserror::Error;

/// Directory holding the TPU accelerator device nodes
pub const DEVICE_DIR: &str = "/dev";

const ACCEL_PREFIX: &str = "accel";

/// Errors from the prechecks
#[derive(Error, Debug)]
pub enum PreflightError {
    #[error("Please run this script as a normal user, not root.")]
    RunningAsRoot,

    #[error(
        "TPU chips not detected. Please check your TPU setup, create a new TPU VM or turn to the Cloud TPU documentation for further assistance."
    )]
    NoTpuDevices,

    #[error("Cannot detect the private IPv4 address: no IPv4 interface named {prefix}*")]
    NoPrivateAddress { prefix: String },

    #[error("Failed to list network interfaces: {0}")]
    InterfaceQuery(String),
}

/// Refuse to run with root privileges
pub fn check_not_root() -> Result<(), PreflightError> {
    if nix::unistd::geteuid().is_root() {
        return Err(PreflightError::RunningAsRoot);
    }
    Ok(())
}

/// Require at least one `accel*` device in `dev_dir`
///
/// Returns the number of devices found.
pub fn check_tpu_present(dev_dir: &Path) -> Result<usize, PreflightError> {
    let entries = fs::read_dir(dev_dir).map_err(|e| {
        tracing::debug!("Cannot list {}: {e}", dev_dir.display());
        PreflightError::NoTpuDevices
    })?;

    let count = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(ACCEL_PREFIX))
        .count();

    if count == 0 {
        return Err(PreflightError::NoTpuDevices);
    }

    tracing::debug!("Found {count} TPU devices in {}", dev_dir.display());
    Ok(count)
}

/// Detect this host's private IPv4 address
///
/// Takes the first IPv4 address of the first interface whose name starts
/// with `interface_prefix` (GCE VMs name theirs `ens4`).
pub fn detect_private_ipv4(interface_prefix: &str) -> Result<Ipv4Addr, PreflightError> {
    let interfaces = nix::ifaddrs::getifaddrs()
        .map_err(|e| PreflightError::InterfaceQuery(e.to_string()))?;

    let candidates = interfaces.filter_map(|ifaddr| {
        let addr = ifaddr.address.as_ref()?.as_sockaddr_in()?;
        Some((ifaddr.interface_name, *SocketAddrV4::from(*addr).ip()))
    });

    first_matching_ipv4(candidates, interface_prefix).ok_or_else(|| {
        PreflightError::NoPrivateAddress {
            prefix: interface_prefix.to_string(),
        }
    })
}

fn first_matching_ipv4<I>(candidates: I, interface_prefix: &str) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = (String, Ipv4Addr)>,
{
    candidates
        .into_iter()
        .find(|(name, _)| name.starts_with(interface_prefix))
        .map(|(_, addr)| addr)
}
