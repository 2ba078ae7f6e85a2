//! SSH client configuration for pod members
//!
//! Writes the tpux block in ~/.ssh/config so that every pod member (and
//! localhost) is reached with the tpux key and without host key prompts.

use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use super::address::with_localhost;
use super::error::HostError;
use super::keys::KEY_FILE_NAME;
use crate::block::BlockFile;

/// Get the user's ~/.ssh directory
pub fn get_ssh_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh"))
}

/// Get the path to the user's SSH config file
pub fn get_ssh_config_path() -> Option<PathBuf> {
    get_ssh_dir().map(|dir| dir.join("config"))
}

/// Build the body of the tpux SSH block
///
/// One `Host` stanza covering 127.0.0.1 and every pod member.
pub fn render_ssh_block(pod_hosts: &[Ipv4Addr]) -> String {
    let hosts = with_localhost(pod_hosts)
        .iter()
        .map(|addr| addr.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "Host {hosts}\n    \
         StrictHostKeyChecking no\n    \
         UserKnownHostsFile /dev/null\n    \
         LogLevel ERROR\n    \
         IdentityFile ~/.ssh/{KEY_FILE_NAME}"
    )
}

/// Create `ssh_dir` with owner-only permissions if it doesn't exist
pub fn ensure_ssh_dir(ssh_dir: &Path) -> Result<(), HostError> {
    if ssh_dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(ssh_dir)
        .map_err(|e| HostError::SshConfigWrite(format!("Failed to create .ssh directory: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o700);
        fs::set_permissions(ssh_dir, perms)
            .map_err(|e| HostError::SshConfigWrite(format!("Failed to set .ssh permissions: {e}")))?;
    }

    Ok(())
}

/// Insert or replace the tpux block in the SSH config at `config_path`
///
/// Creates the file (mode 600) and its directory (mode 700) when missing.
/// Returns whether the file changed.
pub fn insert_ssh_config(config_path: &Path, pod_hosts: &[Ipv4Addr]) -> Result<bool, HostError> {
    if let Some(ssh_dir) = config_path.parent() {
        ensure_ssh_dir(ssh_dir)?;
    }

    let changed = BlockFile::secret(config_path).insert(&render_ssh_block(pod_hosts))?;
    Ok(changed)
}

/// Remove the tpux block from the SSH config at `config_path`
pub fn clear_ssh_config(config_path: &Path) -> Result<bool, HostError> {
    Ok(BlockFile::secret(config_path).clear()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BLOCK_END, BLOCK_START};

    #[test]
    fn test_render_ssh_block() {
        let body = render_ssh_block(&[Ipv4Addr::new(10, 0, 0, 2), Ipv4Addr::new(10, 0, 0, 3)]);
        assert_eq!(
            body,
            "Host 127.0.0.1 10.0.0.2 10.0.0.3\n    StrictHostKeyChecking no\n    UserKnownHostsFile /dev/null\n    LogLevel ERROR\n    IdentityFile ~/.ssh/id_ed25519_tpux"
        );
    }

    #[test]
    fn test_insert_into_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ssh").join("config");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();

        insert_ssh_config(&path, &[Ipv4Addr::new(10, 0, 0, 2)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                BLOCK_START,
                "Host 127.0.0.1 10.0.0.2",
                "    StrictHostKeyChecking no",
                "    UserKnownHostsFile /dev/null",
                "    LogLevel ERROR",
                "    IdentityFile ~/.ssh/id_ed25519_tpux",
                BLOCK_END,
            ]
        );
        assert!(content.ends_with(&format!("{BLOCK_END}\n")));
    }

    #[cfg(unix)]
    #[test]
    fn test_insert_creates_ssh_dir_and_config_privately() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let ssh_dir = dir.path().join(".ssh");
        let path = ssh_dir.join("config");

        assert!(insert_ssh_config(&path, &[Ipv4Addr::new(10, 0, 0, 2)]).unwrap());

        let dir_mode = fs::metadata(&ssh_dir).unwrap().permissions().mode();
        let file_mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);
        assert_eq!(file_mode & 0o777, 0o600);
    }

    #[test]
    fn test_reinsert_with_new_hosts_replaces_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "Host github.com\n    User git\n").unwrap();

        insert_ssh_config(&path, &[Ipv4Addr::new(10, 0, 0, 2)]).unwrap();
        insert_ssh_config(&path, &[Ipv4Addr::new(10, 0, 0, 4)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Host github.com\n    User git\n\n"));
        assert!(content.contains("Host 127.0.0.1 10.0.0.4\n"));
        assert!(!content.contains("10.0.0.2"));
        assert_eq!(content.matches(BLOCK_START).count(), 1);
    }

    #[test]
    fn test_clear_restores_user_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "Host github.com\n    User git\n").unwrap();

        insert_ssh_config(&path, &[Ipv4Addr::new(10, 0, 0, 2)]).unwrap();
        assert!(clear_ssh_config(&path).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Host github.com\n    User git\n"
        );
        assert!(!clear_ssh_config(&path).unwrap());
    }

    #[test]
    fn test_get_ssh_config_path() {
        let path = get_ssh_config_path().unwrap();
        assert!(path.ends_with(".ssh/config"));
    }
}
