//! UI host bindings for the notes core.

pub mod api;
