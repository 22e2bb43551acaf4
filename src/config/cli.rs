use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// Filesystem storage. Relative paths resolve against `base_path`,
/// absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        tracing::debug!("Writing {} bytes to {}", data.len(), full_path.display());
        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("nested/out.xlsx", b"bytes").await.unwrap();
        let data = storage.read_file("nested/out.xlsx").await.unwrap();

        assert_eq!(data, b"bytes");
    }

    #[tokio::test]
    async fn test_absolute_path_ignores_base() {
        let temp_dir = TempDir::new().unwrap();
        let absolute = temp_dir.path().join("firms.xlsx");
        std::fs::write(&absolute, b"abc").unwrap();

        let storage = LocalStorage::new("/does/not/matter");
        let data = storage.read_file(absolute.to_str().unwrap()).await.unwrap();

        assert_eq!(data, b"abc");
        assert!(Path::new(&absolute).exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let err = storage.read_file("missing.xlsx").await.unwrap_err();

        assert!(matches!(err, crate::utils::error::EtlError::IoError(_)));
    }
}
