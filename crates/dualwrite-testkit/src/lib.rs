//! # Dual-write Testkit
//!
//! Testing utilities for the dual-write collectors.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: [`LegacyFixture`], an in-memory legacy database with insert
//!   helpers for users, teams, folders, and roles
//! - **Fakes**: [`FailingStore`], [`ScriptedClient`], and [`FailingClient`] for
//!   error paths and pagination
//! - **Generators**: Proptest strategies for entries and tuples
//!
//! ## Test Fixtures
//!
//! ```rust
//! use dualwrite_testkit::LegacyFixture;
//!
//! let fx = LegacyFixture::new();
//! let user = fx.add_user("u1");
//! let role = fx.add_role("managed:users:1:permissions");
//! fx.assign_user_role(role, user);
//! fx.add_permission(role, "folders:read", "folders", "f1");
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use dualwrite_testkit::generators::tuple;
//!
//! proptest! {
//!     #[test]
//!     fn key_parses_back(t in tuple()) {
//!         prop_assert_eq!(dualwrite_core::Tuple::parse(&t.key()).unwrap(), t);
//!     }
//! }
//! ```

pub mod fakes;
pub mod fixtures;
pub mod generators;

pub use fakes::{FailingClient, FailingStore, ScriptedClient};
pub use fixtures::LegacyFixture;
