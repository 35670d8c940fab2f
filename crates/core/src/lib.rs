//! Framework Hub domain logic.
//!
//! Pure building blocks shared by the storage and HTTP crates: identifier and
//! timestamp types, the domain error, retention arithmetic for bounded
//! collections, well-known build labels, and the job trigger gateway with
//! its subprocess runner. Nothing in this crate touches a database.

pub mod build_labels;
pub mod error;
pub mod retention;
pub mod scripting;
pub mod trigger;
pub mod types;
