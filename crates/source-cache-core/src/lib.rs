//! # Source Cache Core
//!
//! Shared, I/O-free logic for Source Cache: URI classification, the
//! working-tree to history-tree path mapping, cache record models, and the
//! in-memory cache store.
//!
//! This crate contains no tokio, network, or filesystem I/O. Everything
//! that touches the disk or the network lives in the `source-cache` crate.

pub mod history;
pub mod models;
pub mod store;
pub mod uri;
