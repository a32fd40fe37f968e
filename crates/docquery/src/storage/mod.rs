//! Persistent storage for document metadata

pub mod database;

pub use database::DocumentStore;
