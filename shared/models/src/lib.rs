//! # Vivae Production Domain Models
//!
//! Core value types shared by the Vivae production services: item master data,
//! versioned bills of materials, and the request/result shapes of a BOM
//! explosion.
//!
//! ## Key Models
//!
//! - **ItemMeta**: item classification (manufactured, semi-finished, purchased, both)
//! - **Bom / BomLine**: a versioned recipe and its ordered component lines
//! - **ExplosionResult / ExplosionComponent**: flat and consolidated requirements
//! - **AvailabilityReport**: stock coverage for a consolidated requirement
//! - **TenantCatalog**: in-memory snapshot of one tenant's items, BOMs and stock
//!
//! ## Validation
//!
//! Models derive `validator::Validate`:
//! - quantity per parent unit must be positive
//! - scrap percentage must lie within 0..=100
//! - identifiers are length-bounded

pub mod item;
pub mod bom;
pub mod explosion;
pub mod catalog;

#[cfg(test)]
pub mod property_tests;

pub use item::*;
pub use bom::*;
pub use explosion::*;
pub use catalog::*;
