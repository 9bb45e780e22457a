//! `ecovision-core`: climate domain building blocks.
//!
//! This crate contains **pure domain** types (no database or HTTP concerns).

pub mod entity;
pub mod error;
pub mod filter;
pub mod model;
pub mod quality;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use filter::{ClimateFilter, Pagination};
pub use model::{ClimateReading, ClimateRecord, Location, Metric};
pub use quality::Quality;
