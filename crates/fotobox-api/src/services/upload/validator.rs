use std::path::Path;

use super::types::UploadCandidate;

/// Validation errors for an upload batch
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported format for {filename}: .{extension} (allowed: {allowed:?})")]
    UnsupportedFormat {
        filename: String,
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Missing file extension: {0}")]
    MissingExtension(String),

    #[error("File too large: {filename} ({size} bytes, max: {max} bytes)")]
    FileTooLarge {
        filename: String,
        size: usize,
        max: usize,
    },

    #[error("Empty file: {0}")]
    EmptyFile(String),

    #[error("Batch too large: {total} bytes (max: {max} bytes)")]
    BatchTooLarge { total: u64, max: u64 },

    #[error("Empty batch")]
    EmptyBatch,
}

/// Batch upload validator
///
/// Checks every candidate of a batch before any byte is written: extension
/// against the allow-list, size against the per-file cap, and the batch
/// total against the aggregate cap. All-or-nothing: the first violation
/// rejects the whole batch.
#[derive(Clone)]
pub struct BatchValidator {
    max_file_size: usize,
    max_batch_size: usize,
    allowed_extensions: Vec<String>,
}

impl BatchValidator {
    pub fn new(
        max_file_size: usize,
        max_batch_size: usize,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            max_batch_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    /// Validate a whole batch; returns the accepted total size in bytes.
    pub fn validate(&self, candidates: &[UploadCandidate]) -> Result<u64, ValidationError> {
        if candidates.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        let mut total: u64 = 0;
        for candidate in candidates {
            self.validate_extension(&candidate.filename)?;

            let size = candidate.bytes.len();
            if size == 0 {
                return Err(ValidationError::EmptyFile(candidate.filename.clone()));
            }
            if size > self.max_file_size {
                return Err(ValidationError::FileTooLarge {
                    filename: candidate.filename.clone(),
                    size,
                    max: self.max_file_size,
                });
            }

            total += size as u64;
        }

        if total > self.max_batch_size as u64 {
            return Err(ValidationError::BatchTooLarge {
                total,
                max: self.max_batch_size as u64,
            });
        }

        Ok(total)
    }

    /// Validate one candidate's extension (case-insensitive, text after the last dot).
    fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::UnsupportedFormat {
                filename: filename.to_string(),
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn test_validator() -> BatchValidator {
        BatchValidator::new(
            1024 * 1024,      // 1 MiB per file
            3 * 1024 * 1024,  // 3 MiB per batch
            vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
        )
    }

    fn candidate(filename: &str, size: usize) -> UploadCandidate {
        UploadCandidate {
            filename: filename.to_string(),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn test_validate_ok_returns_total() {
        let validator = test_validator();
        let batch = vec![candidate("a.jpg", 1000), candidate("b.png", 2000)];
        assert_eq!(validator.validate(&batch).unwrap(), 3000);
    }

    #[test]
    fn test_validate_extension_case_insensitive() {
        let validator = test_validator();
        let batch = vec![candidate("photo.JPG", 100)];
        assert!(validator.validate(&batch).is_ok());
    }

    #[test]
    fn test_validate_rejects_unsupported_extension() {
        let validator = test_validator();
        let batch = vec![candidate("a.jpg", 100), candidate("clip.gif", 100)];
        assert!(matches!(
            validator.validate(&batch),
            Err(ValidationError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_extension() {
        let validator = test_validator();
        let batch = vec![candidate("noextension", 100)];
        assert!(matches!(
            validator.validate(&batch),
            Err(ValidationError::MissingExtension(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_file() {
        let validator = test_validator();
        let batch = vec![candidate("big.jpg", 2 * 1024 * 1024)];
        assert!(matches!(
            validator.validate(&batch),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_file() {
        let validator = test_validator();
        let batch = vec![candidate("empty.jpg", 0)];
        assert!(matches!(
            validator.validate(&batch),
            Err(ValidationError::EmptyFile(_))
        ));
    }

    #[test]
    fn test_validate_rejects_batch_over_aggregate_cap() {
        // Four files each under the per-file cap, sum over the batch cap
        let validator = test_validator();
        let batch = vec![
            candidate("a.jpg", 1024 * 1024),
            candidate("b.jpg", 1024 * 1024),
            candidate("c.jpg", 1024 * 1024),
            candidate("d.jpg", 1024),
        ];
        assert!(matches!(
            validator.validate(&batch),
            Err(ValidationError::BatchTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_batch() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate(&[]),
            Err(ValidationError::EmptyBatch)
        ));
    }
}
