//! Pod SSH key management
//!
//! tpux uses a dedicated ed25519 key pair, without passphrase, for SSH
//! between pod members. The public key is registered in the project's
//! metadata by the operator and propagated to every host's
//! authorized_keys by the platform.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::error::HostError;
use super::ssh_config::{ensure_ssh_dir, get_ssh_dir};

/// File name of the private key inside ~/.ssh
pub const KEY_FILE_NAME: &str = "id_ed25519_tpux";

/// Get the path to the tpux private key
pub fn get_private_key_path() -> Option<PathBuf> {
    get_ssh_dir().map(|dir| dir.join(KEY_FILE_NAME))
}

/// Get the path to the user's authorized_keys file
pub fn get_authorized_keys_path() -> Option<PathBuf> {
    get_ssh_dir().map(|dir| dir.join("authorized_keys"))
}

/// Public key path for a private key: `<private>.pub`
pub fn public_key_path(private_key: &Path) -> PathBuf {
    let mut name = private_key.as_os_str().to_os_string();
    name.push(".pub");
    PathBuf::from(name)
}

/// Generate the tpux key pair and return the public key
///
/// An existing complete pair is reused. A half-present pair is removed and
/// regenerated, since ssh-keygen would otherwise stop to ask about
/// overwriting.
pub fn generate_key_pair(private_key: &Path) -> Result<String, HostError> {
    let public_key = public_key_path(private_key);

    if private_key.exists() && public_key.exists() {
        tracing::info!("Reusing existing key {}", private_key.display());
        return read_public_key(private_key);
    }
    remove_key_pair(private_key)?;

    if let Some(ssh_dir) = private_key.parent() {
        ensure_ssh_dir(ssh_dir)?;
    }

    let output = Command::new("ssh-keygen")
        .args(["-q", "-t", "ed25519", "-N", "", "-C", "tpux", "-f"])
        .arg(private_key)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                HostError::KeyGen("ssh-keygen not found. Install OpenSSH client.".to_string())
            } else {
                HostError::KeyGen(e.to_string())
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HostError::KeyGen(stderr.trim().to_string()));
    }

    tracing::info!("Generated key {}", private_key.display());
    read_public_key(private_key)
}

/// Read the public key belonging to `private_key`, trimmed
pub fn read_public_key(private_key: &Path) -> Result<String, HostError> {
    let path = public_key_path(private_key);
    fs::read_to_string(&path)
        .map(|key| key.trim().to_string())
        .map_err(|e| HostError::KeyRead(format!("{}: {e}", path.display())))
}

/// Check whether `public_key` appears in the authorized_keys file
///
/// Keys are compared by type and key material, so a different comment or
/// leading options on the authorized line still count. A missing file
/// means nothing is authorized yet.
pub fn is_key_authorized(public_key: &str, authorized_keys: &Path) -> Result<bool, HostError> {
    let contents = match fs::read_to_string(authorized_keys) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(HostError::KeyRead(format!(
                "{}: {e}",
                authorized_keys.display()
            )));
        }
    };

    let material: Vec<&str> = public_key.split_whitespace().take(2).collect();
    if material.len() < 2 {
        return Err(HostError::KeyRead(format!(
            "malformed public key: {public_key}"
        )));
    }
    let needle = material.join(" ");

    Ok(contents.lines().any(|line| line.contains(&needle)))
}

/// Delete both halves of the key pair; missing files are fine
pub fn remove_key_pair(private_key: &Path) -> Result<(), HostError> {
    for path in [private_key.to_path_buf(), public_key_path(private_key)] {
        match fs::remove_file(&path) {
            Ok(()) => tracing::info!("Removed {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(HostError::KeyRemove(format!("{}: {e}", path.display())));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIBzv0w5E9hYd2tY3i9Xq tpux";

    #[test]
    fn test_public_key_path_appends_pub() {
        assert_eq!(
            public_key_path(Path::new("/home/u/.ssh/id_ed25519_tpux")),
            PathBuf::from("/home/u/.ssh/id_ed25519_tpux.pub")
        );
    }

    #[test]
    fn test_missing_authorized_keys_is_not_authorized() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_key_authorized(KEY, &dir.path().join("authorized_keys")).unwrap());
    }

    #[test]
    fn test_authorized_with_different_comment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authorized_keys");
        fs::write(
            &path,
            "ssh-rsa AAAAB3Nza other\nssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIBzv0w5E9hYd2tY3i9Xq alice@example\n",
        )
        .unwrap();

        assert!(is_key_authorized(KEY, &path).unwrap());
    }

    #[test]
    fn test_not_authorized_when_absent_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authorized_keys");
        fs::write(&path, "ssh-rsa AAAAB3Nza other\n").unwrap();

        assert!(!is_key_authorized(KEY, &path).unwrap());
    }

    #[test]
    fn test_malformed_public_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authorized_keys");
        fs::write(&path, "ssh-rsa AAAAB3Nza other\n").unwrap();

        assert!(is_key_authorized("ssh-ed25519", &path).is_err());
    }

    #[test]
    fn test_remove_key_pair_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let private_key = dir.path().join(KEY_FILE_NAME);
        fs::write(&private_key, "private").unwrap();

        remove_key_pair(&private_key).unwrap();
        assert!(!private_key.exists());
        remove_key_pair(&private_key).unwrap();
    }

    #[test]
    fn test_existing_pair_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let private_key = dir.path().join(KEY_FILE_NAME);
        fs::write(&private_key, "private").unwrap();
        fs::write(public_key_path(&private_key), format!("{KEY}\n")).unwrap();

        assert_eq!(generate_key_pair(&private_key).unwrap(), KEY);
        assert_eq!(fs::read_to_string(&private_key).unwrap(), "private");
    }
}
