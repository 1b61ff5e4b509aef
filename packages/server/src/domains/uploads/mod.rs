//! Uploads domain - image storage via the object-storage collaborator.

pub mod actions;

pub use actions::{presign_upload, upload_image, PresignedUpload, Uploaded};
