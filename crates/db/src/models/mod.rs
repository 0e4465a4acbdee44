//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and, where rows are inserted through the API or tests,
//! a `Deserialize` create DTO.

pub mod annotation;
pub mod job;
pub mod organization;
pub mod prediction;
pub mod project;
pub mod status;
pub mod task;
pub mod webhook;
