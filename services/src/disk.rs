//! Local upload directory.
//!
//! Gallery folders and photo files live under a single root (`uploads/` by
//! default). Every path handed to [`LocalDisk`] is relative to that root; a
//! leading `/` is ignored.

use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalDisk {
    root: PathBuf,
}

impl LocalDisk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps an upload-relative path onto the file system.
    ///
    /// Rejects paths that would resolve to the root itself.
    pub fn resolve(&self, relative: &str) -> io::Result<PathBuf> {
        let trimmed = relative.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must not point at the upload root",
            ));
        }
        Ok(self.root.join(trimmed))
    }

    /// Creates `folder` and any missing parents. Succeeds if it already exists.
    pub async fn ensure_folder(&self, folder: &str) -> io::Result<PathBuf> {
        let path = self.resolve(folder)?;
        tokio::fs::create_dir_all(&path).await?;
        Ok(path)
    }

    /// Recursively removes `folder`. A folder that is already gone is not an error.
    pub async fn remove_folder(&self, folder: &str) -> io::Result<()> {
        let path = self.resolve(folder)?;
        match tokio::fs::remove_dir_all(&path).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Writes `data` to `relative`, returning the number of bytes on disk.
    ///
    /// Bytes go to a hidden sibling first and are renamed into place, so a
    /// failed write never leaves a partial file at the destination.
    pub async fn write_file(&self, relative: &str, data: &[u8]) -> io::Result<u64> {
        let path = self.resolve(relative)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "missing file name"))?;
        let temp_path = path.with_file_name(format!(".{file_name}.part"));

        let written = async {
            tokio::fs::write(&temp_path, data).await?;
            tokio::fs::rename(&temp_path, &path).await?;
            tokio::fs::metadata(&path).await.map(|meta| meta.len())
        }
        .await;

        if written.is_err() {
            // The temp file may or may not exist depending on where it failed.
            let _ = tokio::fs::remove_file(&temp_path).await;
        }

        written
    }

    pub async fn remove_file(&self, relative: &str) -> io::Result<()> {
        let path = self.resolve(relative)?;
        tokio::fs::remove_file(&path).await
    }

    pub async fn exists(&self, relative: &str) -> bool {
        match self.resolve(relative) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_folder_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let disk = LocalDisk::new(tmp.path());

        let first = disk.ensure_folder("/photos/wedding-2024").await.unwrap();
        let second = disk.ensure_folder("/photos/wedding-2024").await.unwrap();

        assert_eq!(first, second);
        assert!(first.is_dir());
        assert!(first.starts_with(tmp.path()));
    }

    #[tokio::test]
    async fn test_write_file_round_trip() {
        let tmp = TempDir::new().unwrap();
        let disk = LocalDisk::new(tmp.path());
        disk.ensure_folder("/trip").await.unwrap();

        let written = disk.write_file("/trip/1-a.png", b"png bytes").await.unwrap();

        assert_eq!(written, 9);
        let on_disk = std::fs::read(tmp.path().join("trip/1-a.png")).unwrap();
        assert_eq!(on_disk, b"png bytes");
        assert!(!tmp.path().join("trip/.1-a.png.part").exists());
    }

    #[tokio::test]
    async fn test_write_file_into_missing_folder_leaves_nothing() {
        let tmp = TempDir::new().unwrap();
        let disk = LocalDisk::new(tmp.path());

        let result = disk.write_file("/missing/1-a.png", b"data").await;

        assert!(result.is_err());
        assert!(!disk.exists("/missing/1-a.png").await);
        assert!(!disk.exists("/missing/.1-a.png.part").await);
    }

    #[tokio::test]
    async fn test_remove_folder_missing_is_ok() {
        let tmp = TempDir::new().unwrap();
        let disk = LocalDisk::new(tmp.path());
        disk.remove_folder("/never-created").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_folder_recursive() {
        let tmp = TempDir::new().unwrap();
        let disk = LocalDisk::new(tmp.path());
        disk.ensure_folder("/g/nested").await.unwrap();
        disk.write_file("/g/nested/x.png", b"x").await.unwrap();

        disk.remove_folder("/g").await.unwrap();

        assert!(!tmp.path().join("g").exists());
    }

    #[test]
    fn test_resolve_rejects_root() {
        let disk = LocalDisk::new("uploads");
        assert!(disk.resolve("/").is_err());
        assert!(disk.resolve("").is_err());
        assert_eq!(
            disk.resolve("/a/b.png").unwrap(),
            Path::new("uploads").join("a/b.png")
        );
    }
}
