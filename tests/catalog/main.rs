//! Catalog integration tests.
//!
//! - Record store semantics against a real file
//! - Serialized writers under concurrent sessions
//! - Scripted sessions through the full menu protocol

mod support;
mod concurrency;
mod store;
