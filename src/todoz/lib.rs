//! # Todoz Architecture
//!
//! Todoz keeps a short todo list on the local machine. On the very first run
//! the list is seeded from a remote placeholder API; after that, the locally
//! persisted copy is the source of truth.
//!
//! This is a library that happens to have a command-line client, not the
//! other way around:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders the list, prints messages      │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the live list and the loading state                 │
//! │  - Saves after every real change                            │
//! │  - Adopts lists written by other instances                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure functions: current list in, next list out           │
//! └─────────────────────────────────────────────────────────────┘
//!               │                                │
//!               ▼                                ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │ persistence.rs + store/       │ │ seed.rs                   │
//! │ - Versioned envelope in one   │ │ - One-shot HTTP fetch     │
//! │   key-value slot              │ │ - Failure means "no seed" │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! Network and storage are the only fallible boundaries, and neither is
//! allowed to break the list. A failed fetch means starting without a seed; a
//! failed read or a corrupt slot means starting empty; a failed write keeps
//! the change for the session and leaves the stored copy as it was. All of
//! these are reported through `tracing` and [`commands::CmdMessage`]s, never as
//! errors.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade a binding talks to
//! - [`commands`]: Pure list operations (initialize, add, toggle, delete, list)
//! - [`model`]: `Record` and `RecordList`
//! - [`persistence`]: Envelope encoding and validation on load
//! - [`store`]: Key-value slot backends (filesystem, memory)
//! - [`seed`]: Remote seed source
//! - [`config`]: Configuration file and data directory
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod seed;
pub mod store;
