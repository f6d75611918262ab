//! # Dual-write Engine
//!
//! Read access to the relationship-based authorization engine.
//!
//! ## Overview
//!
//! The engine answers reads for `(namespace, object, relation)` one page at a
//! time. A response carries a continuation token; an empty token means there
//! are no more pages. Follow-up reads pass the previous token back.
//!
//! ```text
//! Caller                               Engine
//!   |-- Read(ns, obj, rel) ------------->|
//!   |<------------- tuples, token "2" ---|
//!   |-- Read(ns, obj, rel, token "2") -->|
//!   |<------------- tuples, token "" ----|
//! ```
//!
//! ## Key Types
//!
//! - [`AuthzClient`] - The read seam
//! - [`ReadRequest`] / [`ReadResponse`] - One page
//! - [`MemoryAuthzClient`] - In-memory engine for tests
//! - [`MirrorConfig`] - Paging knobs

pub mod client;
pub mod config;
pub mod error;

pub use client::{memory::MemoryAuthzClient, AuthzClient, ReadRequest, ReadResponse};
pub use config::MirrorConfig;
pub use error::{EngineError, Result};
