//! Generated model files on local disk

use std::path::PathBuf;

use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::AssetError;

/// Flat directory of stored files, addressed by plain file name
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Storage rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Write `data` under `name`, replacing any previous file
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InvalidName`] for names that would leave the
    /// directory, or an I/O error.
    pub async fn save(&self, name: &str, data: &[u8]) -> Result<PathBuf, AssetError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.base_path).await?;

        let mut file = fs::File::create(&path).await?;
        file.write_all(data).await?;
        file.flush().await?;

        Ok(path)
    }

    /// Read the file stored under `name`
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::NotFound`] if nothing is stored under `name`.
    pub async fn read(&self, name: &str) -> Result<Bytes, AssetError> {
        let path = self.path_for(name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Remove the file stored under `name`; a missing file is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn delete(&self, name: &str) -> Result<(), AssetError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path).await {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, AssetError> {
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(AssetError::InvalidName(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }
}
