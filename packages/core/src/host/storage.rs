//! Pod membership storage
//!
//! Load and save podips.txt: one IPv4 address per line.

use std::fs;
use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::path::Path;

use super::error::HostError;

/// Load pod addresses from `path`
///
/// Blank lines are skipped. A missing file means the pod was never set up.
pub fn load_pod_hosts(path: &Path) -> Result<Vec<Ipv4Addr>, HostError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(HostError::NotConfigured(path.display().to_string()));
        }
        Err(e) => {
            return Err(HostError::LoadFailed(format!(
                "Failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let hosts = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<Ipv4Addr>()
                .map_err(|_| HostError::InvalidAddress(line.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!("Loaded {} pod hosts from {}", hosts.len(), path.display());
    Ok(hosts)
}

/// Save pod addresses to `path`, creating its directory if needed
pub fn save_pod_hosts(path: &Path, hosts: &[Ipv4Addr]) -> Result<(), HostError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| HostError::SaveFailed(format!("Failed to create directory: {e}")))?;
    }

    let contents: String = hosts.iter().map(|host| format!("{host}\n")).collect();
    fs::write(path, contents).map_err(|e| {
        HostError::SaveFailed(format!("Failed to write {}: {e}", path.display()))
    })?;

    tracing::debug!("Saved {} pod hosts to {}", hosts.len(), path.display());
    Ok(())
}

/// Delete the pod membership file
///
/// Returns whether a file was removed; a missing file is not an error.
pub fn remove_pod_hosts(path: &Path) -> Result<bool, HostError> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("Removed {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(HostError::SaveFailed(format!(
            "Failed to remove {}: {e}",
            path.display()
        ))),
    }
}
