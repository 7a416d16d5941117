//! Fotobox Storage Library
//!
//! Local filesystem storage for the photo service: collision-free file
//! naming, chunked streaming persistence, gallery listing, and validated
//! deletion. The storage directory is the single source of truth; no
//! in-memory index of files is kept across requests.
//!
//! # File names
//!
//! Files keep the client-supplied basename where possible. On collision the
//! namer appends a numeric suffix before the extension (`photo.jpg`,
//! `photo_1.jpg`, `photo_2.jpg`, ...). Reservation is atomic: a name is
//! claimed by an exclusive-create open, never by a separate existence check.
//! Names must not contain path separators or `..` segments.

pub mod error;
pub mod local;
pub mod namer;

pub use error::{StorageError, StorageResult};
pub use local::LocalStore;
