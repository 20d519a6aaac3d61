//! File system placer implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::debug;

use super::config::PlacerConfig;
use super::error::PlacerError;
use super::traits::Placer;
use super::types::{FilePlacement, PlacedFile};

/// File system based placer implementation.
pub struct FsPlacer {
    config: PlacerConfig,
}

impl FsPlacer {
    /// Creates a new file system placer with the given configuration.
    pub fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    /// Creates a placer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlacerConfig::default())
    }

    /// Attempts to move a file atomically (rename).
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, std::io::Error> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(true),
            Err(e) => {
                // EXDEV is 18 on Linux
                if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Sibling path used while a destination is being written.
    fn partial_path(destination: &Path) -> PathBuf {
        let mut name = destination
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".part");
        destination.with_file_name(name)
    }

    /// Copies `source` to a partial file next to `destination`, then renames it.
    async fn copy_into_place(&self, source: &Path, destination: &Path) -> Result<u64, PlacerError> {
        let partial = Self::partial_path(destination);
        let copy_err =
            |e: std::io::Error| PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e);

        let source_file = File::open(source).await.map_err(copy_err)?;
        let dest_file = File::create(&partial).await.map_err(copy_err)?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, dest_file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut total_bytes = 0u64;

        let result: Result<(), std::io::Error> = async {
            loop {
                let bytes_read = reader.read(&mut buffer).await?;
                if bytes_read == 0 {
                    break;
                }
                writer.write_all(&buffer[..bytes_read]).await?;
                total_bytes += bytes_read as u64;
            }
            writer.flush().await?;
            fs::rename(&partial, destination).await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&partial).await;
            return Err(copy_err(e));
        }

        fs::remove_file(source).await?;
        Ok(total_bytes)
    }

    /// Calculates the sha256 of a file.
    async fn checksum(&self, path: &Path) -> Result<String, PlacerError> {
        let file = File::open(path).await?;
        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut hasher = Sha256::new();
        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }

    async fn check_destination(&self, destination: &Path, overwrite: bool) -> Result<(), PlacerError> {
        if destination.exists() && !overwrite {
            return Err(PlacerError::DestinationExists {
                path: destination.to_path_buf(),
            });
        }
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| PlacerError::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Placer for FsPlacer {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn place(&self, placement: &FilePlacement) -> Result<PlacedFile, PlacerError> {
        if !placement.source.exists() {
            return Err(PlacerError::SourceNotFound {
                path: placement.source.clone(),
            });
        }
        self.check_destination(&placement.destination, placement.overwrite)
            .await?;

        let expected = if self.config.verify_checksum {
            Some(self.checksum(&placement.source).await?)
        } else {
            None
        };

        let size_bytes = if Self::try_atomic_move(&placement.source, &placement.destination)
            .await
            .map_err(|e| {
                PlacerError::move_failed(placement.source.clone(), placement.destination.clone(), e)
            })? {
            fs::metadata(&placement.destination).await?.len()
        } else {
            debug!(
                source = %placement.source.display(),
                "Rename crossed filesystems, copying instead"
            );
            self.copy_into_place(&placement.source, &placement.destination)
                .await?
        };

        let checksum = match expected {
            Some(expected) => {
                let actual = self.checksum(&placement.destination).await?;
                if actual != expected {
                    let _ = fs::remove_file(&placement.destination).await;
                    return Err(PlacerError::ChecksumMismatch {
                        path: placement.destination.clone(),
                        expected,
                        actual,
                    });
                }
                Some(actual)
            }
            None => None,
        };

        debug!(
            item_id = %placement.item_id,
            destination = %placement.destination.display(),
            size_bytes,
            "File placed"
        );

        Ok(PlacedFile {
            item_id: placement.item_id.clone(),
            destination: placement.destination.clone(),
            size_bytes,
            checksum,
        })
    }

    async fn place_bytes(
        &self,
        item_id: &str,
        bytes: &[u8],
        destination: &Path,
        overwrite: bool,
    ) -> Result<PlacedFile, PlacerError> {
        self.check_destination(destination, overwrite).await?;

        let partial = Self::partial_path(destination);
        if let Err(e) = fs::write(&partial, bytes).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }
        fs::rename(&partial, destination)
            .await
            .map_err(|e| PlacerError::move_failed(partial.clone(), destination.to_path_buf(), e))?;

        Ok(PlacedFile {
            item_id: item_id.to_string(),
            destination: destination.to_path_buf(),
            size_bytes: bytes.len() as u64,
            checksum: None,
        })
    }
}
