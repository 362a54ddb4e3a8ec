//! Infrastructure layer - Adapters for the host environment
//!
//! This layer contains:
//! - Config: Application configuration
//! - Document: In-memory host page and chat markup
//! - Persistence: Key/value stores and the configuration repository
//! - Presentation / Inputs: In-memory presentation root and settings widgets
//! - Workers and transcript replay

pub mod config;
pub mod document;
pub mod inputs;
pub mod persistence;
pub mod presentation;
pub mod settings_worker;
pub mod transcript;
