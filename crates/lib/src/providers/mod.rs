//! Clients for the external services behind the credential-hiding proxies.

pub mod ai;
pub mod archive;
pub mod http;
pub mod ocr;

pub use ai::{chat::ChatCompletionProvider, AiProvider};
pub use archive::{ArchiveUpload, ArchivedFile, DriveArchiver, PhotoArchiver};
pub use ocr::{OcrProvider, VisionProvider};
