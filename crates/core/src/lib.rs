//! Domain logic for the labeling platform: bulk actions, annotation
//! construction, prediction conversion and the collaborator traits the
//! storage, webhook and job layers implement.

pub mod actions;
pub mod annotation;
pub mod conversion;
pub mod error;
pub mod forms;
pub mod jobs;
pub mod model_version;
pub mod permissions;
pub mod project;
pub mod roles;
pub mod selection;
pub mod summary;
pub mod types;
pub mod webhook_action;

#[cfg(test)]
mod testing;
