//! BOM explosion request and result models.
//!
//! These are plain serializable values: an `ExplosionResult` is built once per
//! explosion, handed to the caller and discarded. Field names match the JSON
//! contract of the production API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::bom::ComponentKind;

/// Outcome classification of an explosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplosionStatus {
    Success,
    Warning,
}

/// One materialized requirement line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplosionComponent {
    pub item_no: String,
    pub description: String,
    pub uom_code: String,
    pub quantity_per: f64,
    pub total_quantity: f64,
    pub scrap_pct: f64,
    /// Direct children of the exploded item are level 1.
    pub level: u32,
    pub is_phantom: bool,
    pub position: Option<String>,
    /// Item numbers of the BOMs that contributed to this requirement.
    pub source_boms: Vec<String>,
    /// Resources (labour, machine time) are not stocked.
    #[serde(skip)]
    pub component_type: ComponentKind,
}

impl ExplosionComponent {
    pub fn is_stocked(&self) -> bool {
        self.component_type == ComponentKind::Item
    }
}

/// Full result of exploding one item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplosionResult {
    pub item_no: String,
    pub description: String,
    pub quantity: f64,
    pub status: ExplosionStatus,
    pub messages: Vec<String>,
    /// Every visited BOM line in encounter order; duplicates allowed.
    pub components: Vec<ExplosionComponent>,
    pub consolidated_components: BTreeMap<String, ExplosionComponent>,
    pub max_level: u32,
    pub has_cycles: bool,
    pub cycles_detected: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<BTreeMap<String, AvailabilityReport>>,
}

impl ExplosionResult {
    pub fn is_success(&self) -> bool {
        self.status == ExplosionStatus::Success
    }

    /// Consolidated requirement for one component.
    pub fn consolidated(&self, item_no: &str) -> Option<&ExplosionComponent> {
        self.consolidated_components.get(item_no)
    }

    /// Consolidated total quantity, zero when the item is not required.
    pub fn total_for(&self, item_no: &str) -> f64 {
        self.consolidated(item_no)
            .map(|c| c.total_quantity)
            .unwrap_or(0.0)
    }

    /// Components that cannot be covered from available stock.
    pub fn shortages(&self) -> Vec<(&str, &AvailabilityReport)> {
        self.availability
            .iter()
            .flatten()
            .filter(|(_, report)| !report.available)
            .map(|(item_no, report)| (item_no.as_str(), report))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityReason {
    #[serde(rename = "Sufficient stock")]
    SufficientStock,
    #[serde(rename = "Insufficient stock")]
    InsufficientStock,
    #[serde(rename = "Item not found")]
    ItemNotFound,
}

/// Stock coverage for one consolidated requirement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityReport {
    pub available: bool,
    pub reason: AvailabilityReason,
    pub on_hand: f64,
    pub safety_stock: f64,
    pub available_qty: f64,
    pub required: f64,
    pub shortage: f64,
}

impl AvailabilityReport {
    /// Stock above the safety level counts as available.
    pub fn evaluate(required: f64, on_hand: f64, safety_stock: f64) -> Self {
        let available_qty = (on_hand - safety_stock).max(0.0);
        let shortage = (required - available_qty).max(0.0);
        let available = shortage == 0.0;

        Self {
            available,
            reason: if available {
                AvailabilityReason::SufficientStock
            } else {
                AvailabilityReason::InsufficientStock
            },
            on_hand,
            safety_stock,
            available_qty,
            required,
            shortage,
        }
    }

    pub fn item_not_found(required: f64) -> Self {
        Self {
            available: false,
            reason: AvailabilityReason::ItemNotFound,
            on_hand: 0.0,
            safety_stock: 0.0,
            available_qty: 0.0,
            required,
            shortage: required,
        }
    }
}

/// Caller-side explosion request. Validated before the engine is invoked.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ExplosionRequest {
    #[validate(length(min = 1, max = 100, message = "Tenant is required"))]
    pub tenant_id: String,
    #[validate(length(min = 1, max = 50, message = "Item number is required"))]
    pub item_no: String,
    #[validate(range(min = 0.000001, message = "Quantity must be positive"))]
    pub quantity: f64,
    #[serde(default)]
    pub check_availability: bool,
}

impl ExplosionRequest {
    pub fn new(tenant_id: impl Into<String>, item_no: impl Into<String>, quantity: f64) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            item_no: item_no.into(),
            quantity,
            check_availability: false,
        }
    }

    pub fn with_availability(mut self) -> Self {
        self.check_availability = true;
        self
    }
}
