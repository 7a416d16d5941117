//! Collision-free file naming.
//!
//! A destination name is reserved by opening it with exclusive-create
//! semantics: the open itself is the atomic claim, so two writers racing for
//! the same name can never both win. On `AlreadyExists` the next candidate
//! (`stem_1.ext`, `stem_2.ext`, ...) is tried.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};

use crate::error::{StorageError, StorageResult};

/// Upper bound on suffix attempts before giving up on a directory.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Candidate name for the given attempt: attempt 0 is the name as requested,
/// attempt N appends `_N` before the extension (`photo_2.jpg`).
pub fn candidate_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }

    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, attempt, ext),
        None => format!("{}_{}", stem, attempt),
    }
}

/// Reserve a fresh file in `dir` for the desired `filename`.
///
/// Returns the final basename, the full path, and the exclusively created
/// file handle. The returned path did not exist before this call; the open
/// handle is the reservation.
pub async fn create_unique(dir: &Path, filename: &str) -> StorageResult<(String, PathBuf, File)> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = candidate_name(filename, attempt);
        let path = dir.join(&name);

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((name, path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(StorageError::PersistFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    Err(StorageError::PersistFailed(format!(
        "No free name for {} after {} attempts",
        filename, MAX_NAME_ATTEMPTS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_candidate_name_first_attempt_is_verbatim() {
        assert_eq!(candidate_name("photo.jpg", 0), "photo.jpg");
    }

    #[test]
    fn test_candidate_name_suffix_before_extension() {
        assert_eq!(candidate_name("photo.jpg", 1), "photo_1.jpg");
        assert_eq!(candidate_name("photo.jpg", 12), "photo_12.jpg");
        assert_eq!(candidate_name("archive.tar.gz", 1), "archive.tar_1.gz");
    }

    #[test]
    fn test_candidate_name_without_extension() {
        assert_eq!(candidate_name("photo", 1), "photo_1");
    }

    #[tokio::test]
    async fn test_create_unique_prefers_requested_name() {
        let dir = tempdir().unwrap();
        let (name, path, _file) = create_unique(dir.path(), "photo.jpg").await.unwrap();
        assert_eq!(name, "photo.jpg");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_create_unique_yields_pairwise_distinct_names() {
        let dir = tempdir().unwrap();
        let mut names = Vec::new();
        for _ in 0..5 {
            let (name, _path, _file) = create_unique(dir.path(), "photo.jpg").await.unwrap();
            names.push(name);
        }
        assert_eq!(
            names,
            vec![
                "photo.jpg",
                "photo_1.jpg",
                "photo_2.jpg",
                "photo_3.jpg",
                "photo_4.jpg"
            ]
        );

        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[tokio::test]
    async fn test_create_unique_never_returns_occupied_path() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"taken").unwrap();
        std::fs::write(dir.path().join("photo_1.jpg"), b"also taken").unwrap();

        let (name, _path, _file) = create_unique(dir.path(), "photo.jpg").await.unwrap();
        assert_eq!(name, "photo_2.jpg");
        assert_eq!(
            std::fs::read(dir.path().join("photo.jpg")).unwrap(),
            b"taken"
        );
    }
}
