//! BOM (Bill of Materials) Explosion Module
//!
//! Recursively expands certified BOMs into flat and consolidated component
//! requirements, with cascading scrap, cycle detection and an optional stock
//! availability check.

pub mod availability;
pub mod catalog;
pub mod context;
pub mod engine;

pub use availability::AvailabilityChecker;
pub use catalog::{Catalog, InventoryLookup};
pub use context::ExplosionContext;
pub use engine::{explode, BomExplosionEngine};
