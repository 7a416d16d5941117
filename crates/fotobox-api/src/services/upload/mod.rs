//! Batch upload pipeline: validation followed by parallel persists on a
//! bounded worker pool.

mod service;
mod types;
mod validator;

pub use service::UploadService;
pub use types::{BatchOutcome, UploadCandidate};
pub use validator::{BatchValidator, ValidationError};
