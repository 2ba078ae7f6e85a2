//! Shell rc PATH configuration
//!
//! Adds `~/.local/bin` to PATH through a tpux block in the user's shell rc
//! file. zsh is preferred when both rc files exist.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::block::{BlockError, BlockFile};

/// Line placed inside the rc block
pub const PATH_EXPORT_LINE: &str = r#"export PATH="$HOME/.local/bin:$PATH""#;

const RC_CANDIDATES: [&str; 2] = [".zshrc", ".bashrc"];

/// Errors that can occur while editing shell configuration
#[derive(Error, Debug)]
pub enum ShellError {
    /// Neither ~/.zshrc nor ~/.bashrc exists
    #[error("Neither .zshrc nor .bashrc was found in {0}")]
    NoRcFile(String),

    /// The home directory could not be determined
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Editing the rc block failed
    #[error(transparent)]
    Block(#[from] BlockError),
}

/// Find the rc file to edit in `home`
pub fn find_shell_rc(home: &Path) -> Result<PathBuf, ShellError> {
    RC_CANDIDATES
        .iter()
        .map(|name| home.join(name))
        .find(|path| path.exists())
        .ok_or_else(|| ShellError::NoRcFile(home.display().to_string()))
}

/// Find the rc file in the current user's home directory
pub fn find_user_shell_rc() -> Result<PathBuf, ShellError> {
    let home = dirs::home_dir().ok_or(ShellError::NoHomeDir)?;
    find_shell_rc(&home)
}

/// Add the PATH block to `rc_file`
pub fn insert_path_block(rc_file: &Path) -> Result<bool, ShellError> {
    Ok(BlockFile::direct(rc_file).insert(PATH_EXPORT_LINE)?)
}

/// Remove the PATH block from `rc_file`
pub fn clear_path_block(rc_file: &Path) -> Result<bool, ShellError> {
    Ok(BlockFile::direct(rc_file).clear()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BLOCK_END, BLOCK_START};
    use std::fs;

    #[test]
    fn test_zshrc_preferred() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".bashrc"), "").unwrap();
        fs::write(dir.path().join(".zshrc"), "").unwrap();

        assert_eq!(find_shell_rc(dir.path()).unwrap(), dir.path().join(".zshrc"));
    }

    #[test]
    fn test_bashrc_fallback() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".bashrc"), "").unwrap();

        assert_eq!(find_shell_rc(dir.path()).unwrap(), dir.path().join(".bashrc"));
    }

    #[test]
    fn test_no_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_shell_rc(dir.path()),
            Err(ShellError::NoRcFile(_))
        ));
    }

    #[test]
    fn test_path_block_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".bashrc");
        let original = "# ~/.bashrc\nalias ll='ls -alF'\n";
        fs::write(&rc, original).unwrap();

        assert!(insert_path_block(&rc).unwrap());
        assert!(!insert_path_block(&rc).unwrap());
        assert_eq!(
            fs::read_to_string(&rc).unwrap(),
            format!("{original}\n{BLOCK_START}\n{PATH_EXPORT_LINE}\n{BLOCK_END}\n")
        );

        assert!(clear_path_block(&rc).unwrap());
        assert_eq!(fs::read_to_string(&rc).unwrap(), original);
    }
}
