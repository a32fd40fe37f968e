//! Document ingestion and question-answering service
//!
//! Users upload documents or images, the service extracts text, indexes it
//! into a per-document vector namespace, and answers natural-language
//! questions grounded in the document content.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod orchestrator;
pub mod providers;
pub mod server;
pub mod storage;
pub mod types;

pub use config::DocQueryConfig;
pub use error::{Error, Result};
pub use orchestrator::QueryOrchestrator;
pub use server::DocQueryServer;
