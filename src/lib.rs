//! # Source Cache
//!
//! Resolves logical sources to concrete content and tracks which files of a
//! directory source changed since they were last reviewed.
//!
//! A source is configured with a preferred `work_url` and a ranked list of
//! fallback URIs. Resolution walks those candidates in order and stops at
//! the first one that yields content. `file:` URIs are read straight from
//! disk; any other scheme, loopback hosts included, is fetched over HTTP
//! and persisted under the cache directory. Directory sources are scanned
//! against a parallel history tree to produce a change list.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌────────────┐
//! │   Config    │──▶│  Resolver   │──▶│ CacheStore │
//! │  [[sources]]│   │ file / http │   │ id→record  │
//! └─────────────┘   └──────┬──────┘   └────────────┘
//!                          │
//!                          ▼
//!                   ┌─────────────┐   ┌────────────┐
//!                   │   Scanner   │◀──│  History   │
//!                   │ walk + mtime│   │ reviewed/  │
//!                   └─────────────┘   └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! srcache sources                      # list configured sources
//! srcache refresh                      # resolve every source
//! srcache changes urn:src:notes        # files changed since review
//! srcache review ~/notes/todo.md       # mark one file as reviewed
//! srcache review-all urn:src:notes     # mark every change as reviewed
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`resolver`] | Ordered candidate resolution |
//! | [`fetch`] | HTTP fetching behind a trait |
//! | [`scanner`] | Directory change detection |
//! | [`history`] | Reviewed-copy lookup and recording |
//! | [`cache`] | Refresh operations over the store |
//! | [`error`] | Per-candidate failure reasons |
//! | [`logging`] | Tracing subscriber setup |

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod history;
pub mod logging;
pub mod refresh_cmd;
pub mod resolver;
pub mod scanner;
pub mod sources;

pub use source_cache_core::models;
