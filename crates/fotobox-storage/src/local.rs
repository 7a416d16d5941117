use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fotobox_core::models::{GalleryEntry, SavedFile};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::error::{StorageError, StorageResult};
use crate::namer;

/// Size of the buffer used when streaming an upload to disk.
const WRITE_CHUNK_SIZE: usize = 1024 * 1024;

/// Local filesystem photo store
#[derive(Clone, Debug)]
pub struct LocalStore {
    root: PathBuf,
    base_url: String,
    recognized_extensions: Vec<String>,
}

impl LocalStore {
    /// Create a new LocalStore instance
    ///
    /// # Arguments
    /// * `root` - Directory where photos are stored (created if missing)
    /// * `base_url` - URL prefix under which photos are served (e.g., "/photos")
    /// * `recognized_extensions` - Extensions (without dot) the gallery recognizes
    pub async fn new(
        root: impl Into<PathBuf>,
        base_url: String,
        recognized_extensions: Vec<String>,
    ) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalStore {
            root,
            base_url,
            recognized_extensions: recognized_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
        })
    }

    /// Generate public URL for a stored file
    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    fn is_recognized(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|e| self.recognized_extensions.contains(&e))
    }

    /// Resolve a bare file name against the storage root.
    ///
    /// Rejects anything that could escape the root: path separators and
    /// parent-directory segments are refused before the filesystem is touched.
    fn name_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty() {
            return Err(StorageError::InvalidName("File name is empty".to_string()));
        }

        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(StorageError::InvalidName(format!(
                "File name contains path components: {}",
                name
            )));
        }

        Ok(self.root.join(name))
    }

    /// Stream one upload to disk under a collision-free name.
    ///
    /// The destination is reserved via exclusive-create, then the source is
    /// copied through in fixed-size chunks until exhausted. On failure the
    /// partially written file is left in place; the handle is closed on every
    /// exit path.
    pub async fn persist<R>(&self, filename: &str, mut reader: R) -> StorageResult<SavedFile>
    where
        R: AsyncRead + Unpin,
    {
        self.name_to_path(filename)?;

        let start = std::time::Instant::now();
        let (name, path, mut file) = namer::create_unique(&self.root, filename).await?;

        let mut buf = vec![0u8; WRITE_CHUNK_SIZE];
        let mut written: u64 = 0;
        loop {
            let n = reader.read(&mut buf).await.map_err(|e| {
                StorageError::PersistFailed(format!(
                    "Failed to read upload stream for {}: {}",
                    path.display(),
                    e
                ))
            })?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).await.map_err(|e| {
                StorageError::PersistFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            written += n as u64;
        }

        file.sync_all().await.map_err(|e| {
            StorageError::PersistFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.url_for(&name);

        tracing::info!(
            path = %path.display(),
            name = %name,
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Photo persisted"
        );

        Ok(SavedFile {
            name,
            url,
            size: written,
        })
    }

    /// List all recognized photos in the store, newest first.
    ///
    /// Entries that vanish between enumeration and stat (concurrent delete)
    /// are skipped. Ties on modification time keep enumeration order.
    pub async fn list(&self) -> StorageResult<Vec<GalleryEntry>> {
        let start = std::time::Instant::now();

        let mut read_dir = fs::read_dir(&self.root).await.map_err(|e| {
            StorageError::ListFailed(format!(
                "Failed to read storage directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(|e| {
            StorageError::ListFailed(format!(
                "Failed to read directory entry in {}: {}",
                self.root.display(),
                e
            ))
        })? {
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };

            if !self.is_recognized(&name) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(name = %name, error = %e, "Entry vanished during scan");
                    continue;
                }
            };

            if !metadata.is_file() {
                continue;
            }

            let Ok(mtime) = metadata.modified() else {
                continue;
            };

            entries.push(GalleryEntry {
                url: self.url_for(&name),
                name,
                size: metadata.len(),
                modified: DateTime::<Utc>::from(mtime),
            });
        }

        entries.sort_by(|a, b| b.modified.cmp(&a.modified));

        tracing::debug!(
            count = entries.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Gallery listed"
        );

        Ok(entries)
    }

    /// Delete one stored file by name.
    pub async fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.name_to_path(name)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), name = %name, "Photo deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    async fn test_store(dir: &Path) -> LocalStore {
        LocalStore::new(
            dir,
            "/photos".to_string(),
            vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "heic".to_string(),
                "heif".to_string(),
            ],
        )
        .await
        .unwrap()
    }

    fn set_mtime(path: &Path, epoch_secs: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(epoch_secs))
            .unwrap();
    }

    #[tokio::test]
    async fn test_persist_round_trip() {
        let dir = tempdir().unwrap();
        let store = test_store(dir.path()).await;

        let data = b"jpeg bytes go here".to_vec();
        let saved = store
            .persist("photo.jpg", std::io::Cursor::new(data.clone()))
            .await
            .unwrap();

        assert_eq!(saved.name, "photo.jpg");
        assert_eq!(saved.url, "/photos/photo.jpg");
        assert_eq!(saved.size, data.len() as u64);

        let on_disk = std::fs::read(dir.path().join("photo.jpg")).unwrap();
        assert_eq!(on_disk, data);
    }

    #[tokio::test]
    async fn test_persist_duplicate_names_get_suffixes() {
        let dir = tempdir().unwrap();
        let store = test_store(dir.path()).await;

        let first = store
            .persist("photo.jpg", std::io::Cursor::new(b"first".to_vec()))
            .await
            .unwrap();
        let second = store
            .persist("photo.jpg", std::io::Cursor::new(b"second".to_vec()))
            .await
            .unwrap();

        assert_eq!(first.name, "photo.jpg");
        assert_eq!(second.name, "photo_1.jpg");
        assert_eq!(
            std::fs::read(dir.path().join("photo.jpg")).unwrap(),
            b"first"
        );
        assert_eq!(
            std::fs::read(dir.path().join("photo_1.jpg")).unwrap(),
            b"second"
        );
    }

    #[tokio::test]
    async fn test_persist_rejects_path_components() {
        let dir = tempdir().unwrap();
        let store = test_store(dir.path()).await;

        let result = store
            .persist("../escape.jpg", std::io::Cursor::new(b"x".to_vec()))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));

        let result = store
            .persist("nested/escape.jpg", std::io::Cursor::new(b"x".to_vec()))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_list_sorted_newest_first() {
        let dir = tempdir().unwrap();
        let store = test_store(dir.path()).await;

        for (name, mtime) in [("a.jpg", 1_000), ("b.jpg", 3_000), ("c.jpg", 2_000)] {
            std::fs::write(dir.path().join(name), b"data").unwrap();
            set_mtime(&dir.path().join(name), mtime);
        }

        let entries = store.list().await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.jpg", "c.jpg", "a.jpg"]);
    }

    #[tokio::test]
    async fn test_list_filters_unrecognized_extensions() {
        let dir = tempdir().unwrap();
        let store = test_store(dir.path()).await;

        std::fs::write(dir.path().join("photo.jpg"), b"keep").unwrap();
        std::fs::write(dir.path().join("photo.HEIC"), b"keep too").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip").unwrap();
        std::fs::write(dir.path().join("no_extension"), b"skip").unwrap();

        let entries = store.list().await.unwrap();
        let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["photo.HEIC", "photo.jpg"]);
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let dir = tempdir().unwrap();
        let store = test_store(dir.path()).await;
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_entry_fields() {
        let dir = tempdir().unwrap();
        let store = test_store(dir.path()).await;

        std::fs::write(dir.path().join("photo.jpg"), vec![0u8; 1234]).unwrap();
        set_mtime(&dir.path().join("photo.jpg"), 1_700_000_000);

        let entries = store.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "photo.jpg");
        assert_eq!(entries[0].url, "/photos/photo.jpg");
        assert_eq!(entries[0].size, 1234);
        assert_eq!(entries[0].modified.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_delete_existing_file() {
        let dir = tempdir().unwrap();
        let store = test_store(dir.path()).await;

        std::fs::write(dir.path().join("photo.jpg"), b"data").unwrap();
        store.delete("photo.jpg").await.unwrap();
        assert!(!dir.path().join("photo.jpg").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let store = test_store(dir.path()).await;

        let result = store.delete("missing.jpg").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_rejects_traversal_without_touching_disk() {
        let dir = tempdir().unwrap();
        let secret = dir.path().join("secret");
        std::fs::write(&secret, b"keep me").unwrap();

        let photos = dir.path().join("photos");
        let store = test_store(&photos).await;

        let result = store.delete("../secret").await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
        assert!(secret.exists());

        let result = store.delete("a/b.jpg").await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));

        let result = store.delete("").await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
    }
}
