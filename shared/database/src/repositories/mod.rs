//! Repository module for database access
//!
//! Typed read repositories over the ERP tables used by BOM explosion.

pub mod catalog;

pub use catalog::CatalogRepository;
