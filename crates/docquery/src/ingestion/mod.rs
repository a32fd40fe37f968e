//! Document loading and chunking

pub mod chunker;
pub mod loader;
pub mod vision;

pub use chunker::TextChunker;
pub use loader::{DocumentLoader, PdfLoader};
pub use vision::VisionExtractor;
