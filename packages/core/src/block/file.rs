//! Applying marked-block edits to files on disk

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::editor::{clear_block, insert_block};
use super::error::BlockError;
use crate::exec::privileged_copy;

/// How a [`BlockFile`] writes its new content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Write the file directly. A file that does not exist yet is created
    /// with `create_mode` (Unix permission bits) when given.
    Direct { create_mode: Option<u32> },
    /// Stage the content in a temporary file and `sudo cp` it over the
    /// target, for files the current user cannot write (`/etc/exports`).
    Privileged,
}

/// A file whose tpux block can be inserted or cleared
#[derive(Debug, Clone)]
pub struct BlockFile {
    path: PathBuf,
    mode: WriteMode,
}

impl BlockFile {
    pub fn new(path: impl Into<PathBuf>, mode: WriteMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    /// A user-owned file written in place
    pub fn direct(path: impl Into<PathBuf>) -> Self {
        Self::new(path, WriteMode::Direct { create_mode: None })
    }

    /// A user-owned file holding secrets, created owner read/write only
    pub fn secret(path: impl Into<PathBuf>) -> Self {
        Self::new(
            path,
            WriteMode::Direct {
                create_mode: Some(0o600),
            },
        )
    }

    /// A system file replaced through `sudo cp`
    pub fn privileged(path: impl Into<PathBuf>) -> Self {
        Self::new(path, WriteMode::Privileged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current content, `None` when the file does not exist
    pub fn read(&self) -> Result<Option<String>, BlockError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlockError::Read(format!("{}: {e}", self.path.display()))),
        }
    }

    /// Insert or replace the block holding `body`
    ///
    /// Returns whether the file was written.
    pub fn insert(&self, body: &str) -> Result<bool, BlockError> {
        let existing = self.read()?;
        let current = existing.as_deref().unwrap_or("");
        let updated = insert_block(current, body).map_err(|e| self.annotate(e))?;

        if existing.as_deref() == Some(updated.as_str()) {
            tracing::debug!("Block in {} already up to date", self.path.display());
            return Ok(false);
        }

        self.write(&updated)?;
        tracing::info!("Wrote tpux block to {}", self.path.display());
        Ok(true)
    }

    /// Remove the block if present
    ///
    /// Missing files and files without a block are left alone. Returns
    /// whether the file was written.
    pub fn clear(&self) -> Result<bool, BlockError> {
        let Some(existing) = self.read()? else {
            tracing::debug!("{} does not exist, nothing to clear", self.path.display());
            return Ok(false);
        };

        let updated = clear_block(&existing).map_err(|e| self.annotate(e))?;
        if updated == existing {
            tracing::debug!("No tpux block in {}", self.path.display());
            return Ok(false);
        }

        self.write(&updated)?;
        tracing::info!("Removed tpux block from {}", self.path.display());
        Ok(true)
    }

    fn write(&self, content: &str) -> Result<(), BlockError> {
        match self.mode {
            WriteMode::Direct { create_mode } => self.write_direct(content, create_mode),
            WriteMode::Privileged => self.write_privileged(content),
        }
    }

    fn write_direct(&self, content: &str, create_mode: Option<u32>) -> Result<(), BlockError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        // Only takes effect when the file is created
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            if let Some(mode) = create_mode {
                options.mode(mode);
            }
        }
        #[cfg(not(unix))]
        let _ = create_mode;

        let mut file = options
            .open(&self.path)
            .map_err(|e| BlockError::Write(format!("{}: {e}", self.path.display())))?;
        file.write_all(content.as_bytes())
            .map_err(|e| BlockError::Write(format!("{}: {e}", self.path.display())))?;

        Ok(())
    }

    fn write_privileged(&self, content: &str) -> Result<(), BlockError> {
        let staging = tempfile::tempdir()
            .map_err(|e| BlockError::Write(format!("temporary directory: {e}")))?;
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "tpux-block".into());
        let staged = staging.path().join(file_name);

        fs::write(&staged, content)
            .map_err(|e| BlockError::Write(format!("{}: {e}", staged.display())))?;
        privileged_copy(&staged, &self.path)?;

        Ok(())
    }

    fn annotate(&self, err: BlockError) -> BlockError {
        BlockError::InFile {
            path: self.path.display().to_string(),
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BLOCK_END, BLOCK_START};

    #[test]
    fn test_insert_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = BlockFile::direct(dir.path().join("rc"));

        assert!(file.insert("export A=1").unwrap());
        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            format!("{BLOCK_START}\nexport A=1\n{BLOCK_END}\n")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_secret_file_created_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = BlockFile::secret(dir.path().join("config"));
        file.insert("Host 127.0.0.1").unwrap();

        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_file_permissions_kept() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "Host a\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        BlockFile::secret(&path).insert("Host b").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_second_insert_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let file = BlockFile::direct(dir.path().join("rc"));
        fs::write(file.path(), "alias ll='ls -l'\n").unwrap();

        assert!(file.insert("export A=1").unwrap());
        let once = fs::read_to_string(file.path()).unwrap();
        assert!(!file.insert("export A=1").unwrap());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), once);
    }

    #[test]
    fn test_clear_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let file = BlockFile::direct(dir.path().join("missing"));

        assert!(!file.clear().unwrap());
        assert!(!file.path().exists());
    }

    #[test]
    fn test_clear_without_block_leaves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let file = BlockFile::direct(dir.path().join("rc"));
        let original = "line one\n\n\nline two   \n\n";
        fs::write(file.path(), original).unwrap();

        assert!(!file.clear().unwrap());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), original);
    }

    #[test]
    fn test_insert_then_clear() {
        let dir = tempfile::tempdir().unwrap();
        let file = BlockFile::direct(dir.path().join("rc"));
        fs::write(file.path(), "alias ll='ls -l'\n").unwrap();

        file.insert("export A=1").unwrap();
        assert!(file.clear().unwrap());
        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            "alias ll='ls -l'\n"
        );
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = BlockFile::direct(dir.path().join("rc"));
        fs::write(file.path(), format!("{BLOCK_START}\nno end\n")).unwrap();

        let err = file.insert("x").unwrap_err();
        assert!(err.to_string().contains("rc: "));
        assert!(matches!(err, BlockError::InFile { .. }));
    }
}
