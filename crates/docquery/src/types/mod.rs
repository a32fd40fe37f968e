//! Core data types

pub mod document;
pub mod request;
pub mod response;

pub use document::{Chunk, Document};
pub use request::{ChatRequest, SummaryRequest};
pub use response::{ChatResponse, ConvertResponse, ImageExtraction, UploadResponse};
