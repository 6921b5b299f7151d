//! Commit pipeline: upload each staged file → record its metadata → issue a download link.

mod error;
mod orchestrator;
mod session;
mod tokens;

pub use error::UploadError;
pub use orchestrator::{UploadOrchestrator, UploadSettings};
pub use session::UploadSession;
pub use tokens::{RandomTokenGenerator, TokenGenerator};
