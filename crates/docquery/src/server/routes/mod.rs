//! HTTP route handlers

pub mod chat;
pub mod convert;
pub mod files;
pub mod health;
