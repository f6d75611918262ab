//! # Dual-write
//!
//! Tuple collectors for migrating legacy relational permissions to a
//! relationship-based authorization engine.
//!
//! ## Overview
//!
//! During the dual-write phase both permission models are live. To check that
//! the engine holds a faithful copy of the legacy grants, an orchestrator
//! builds two comparable tuple sets:
//!
//! - **Desired**: legacy collectors read the relational store and translate
//!   rows into tuples ([`TeamMembershipCollector`], [`FolderTreeCollector`],
//!   [`ManagedPermissionsCollector`]).
//! - **Current**: the [`MirrorCollector`] pages through what the engine
//!   stores for an object.
//!
//! Both sides use the same canonical keys and the same folder-resource merge
//! rule, so the results can be diffed key by key. Diffing and writing are the
//! orchestrator's job.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dualwrite::{legacy_collectors, CollectorConfig, MirrorCollector};
//! use dualwrite::engine::MemoryAuthzClient;
//! use dualwrite::store::SqliteStore;
//!
//! async fn example() -> dualwrite::Result<()> {
//!     let store = SqliteStore::open("legacy.db")?;
//!     let config = CollectorConfig::default();
//!
//!     for collector in legacy_collectors(&config) {
//!         let desired = collector.collect(&store, 1).await?;
//!         println!("{}: {} objects", collector.name(), desired.len());
//!     }
//!
//!     let client = MemoryAuthzClient::new();
//!     let mirror = MirrorCollector::new(["parent"]).with_config(config.mirror.clone());
//!     let current = mirror.collect(&client, "folder:f1", "default").await?;
//!     println!("{} tuples stored", current.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `dualwrite::core` - Tuple model, keys, merge, translation
//! - `dualwrite::store` - Legacy store abstraction and SQLite
//! - `dualwrite::engine` - Authorization engine read client

pub mod collector;
pub mod config;
pub mod error;
pub mod folder;
pub mod managed;
pub mod mirror;
pub mod team;

pub use dualwrite_core as core;
pub use dualwrite_engine as engine;
pub use dualwrite_store as store;

pub use collector::{legacy_collectors, LegacyCollector};
pub use config::CollectorConfig;
pub use error::{CollectError, Result};
pub use folder::FolderTreeCollector;
pub use managed::ManagedPermissionsCollector;
pub use mirror::MirrorCollector;
pub use team::TeamMembershipCollector;

pub use dualwrite_core::{Condition, Entry, ObjectTuples, Tuple, TupleCollection};
