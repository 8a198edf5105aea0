//! `bizlens-core`: shared building blocks for the dashboard crates.
//!
//! Pure types only: identifiers, the domain error model and the `Entity`
//! trait used by record stores. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{RecordId, UserId};
