//! Core use-case services.
//!
//! # Responsibility
//! - Turn application intents into store requests.
//! - Keep views and FFI decoupled from the store implementation.

pub mod notes_service;
