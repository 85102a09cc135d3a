//! `dashgate-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod metadata;

pub use entity::{Entity, EntityKind};
pub use error::{DomainError, DomainResult};
pub use metadata::{validate_name, Metadata};
