//! Record models, request DTOs and the record ⇄ document mapping.
//!
//! Each record submodule contains:
//! - A `Serialize + Deserialize` record struct matching the stored document
//! - A `Deserialize + Validate` create DTO for inserts
//! - Query / update DTOs where the resource has them

pub mod build_log;
pub mod document;
pub mod generated_code;
pub mod stats;
