//! # Dual-write Core
//!
//! Pure primitives for reconciling legacy permissions with relation tuples:
//! the tuple model, its canonical string encoding, the folder-resource merge
//! rule, and translation of legacy actions into tuples.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Tuple`] - A subject–relation–object grant with an optional [`Condition`]
//! - [`Entry`] - A `type:id[#relation]` subject or object reference
//! - [`ObjectTuples`] - Canonical key → tuple map for one object
//! - [`TupleCollection`] - Object → [`ObjectTuples`], the shape every collector returns
//! - [`Translator`] - Maps a legacy `(action, kind, identifier)` onto a tuple
//!
//! ## Canonical Encoding
//!
//! ```text
//! entry      type:id[#relation]
//! condition  name[value,value,...]
//! tuple      object#relation@subject[,condition]
//! ```
//!
//! The tuple string is the canonical key used for deduplication. Folder-resource
//! tuples are matched on their key *without* the condition so that grants which
//! only differ in resource group collapse into one tuple.

pub mod collection;
pub mod condition;
pub mod entry;
pub mod error;
pub mod translate;
pub mod tuple;

pub use collection::{ObjectTuples, TupleCollection};
pub use condition::{Condition, SUBRESOURCE_FILTER};
pub use entry::{relations, types, Entry};
pub use error::{Result, TupleError};
pub use translate::{ActionMapping, KindTranslation, ResourceTranslator, Translator};
pub use tuple::Tuple;
