//! In-memory snapshot of one tenant's production catalog.
//!
//! Holds every item, every certified BOM and the on-hand totals for a tenant
//! so an explosion can run as a pure traversal without a lookup per node.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::bom::Bom;
use crate::item::{ItemMeta, StockLevel};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TenantCatalog {
    pub tenant_id: String,
    pub items: HashMap<String, ItemMeta>,
    /// Certified BOM per item number.
    pub boms: HashMap<String, Bom>,
    pub on_hand: HashMap<String, f64>,
}

impl TenantCatalog {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            ..Default::default()
        }
    }

    pub fn with_item(mut self, item: ItemMeta) -> Self {
        self.insert_item(item);
        self
    }

    pub fn with_bom(mut self, bom: Bom) -> Self {
        self.insert_bom(bom);
        self
    }

    pub fn with_stock(mut self, item_no: impl Into<String>, on_hand: f64) -> Self {
        self.on_hand.insert(item_no.into(), on_hand);
        self
    }

    pub fn insert_item(&mut self, item: ItemMeta) {
        self.items.insert(item.item_no.clone(), item);
    }

    /// Only certified BOMs are kept; returns whether the BOM was stored.
    pub fn insert_bom(&mut self, bom: Bom) -> bool {
        if !bom.is_certified() {
            return false;
        }
        self.boms.insert(bom.item_no.clone(), bom);
        true
    }

    pub fn insert_stock(&mut self, level: StockLevel) {
        self.on_hand.insert(level.item_no, level.on_hand);
    }

    pub fn item(&self, item_no: &str) -> Option<&ItemMeta> {
        self.items.get(item_no)
    }

    pub fn certified_bom(&self, item_no: &str) -> Option<&Bom> {
        self.boms.get(item_no)
    }

    /// Missing ledger entries mean nothing is on hand.
    pub fn stock(&self, item_no: &str) -> f64 {
        self.on_hand.get(item_no).copied().unwrap_or(0.0)
    }

    /// Whether this snapshot belongs to `tenant_id`.
    pub fn serves(&self, tenant_id: &str) -> bool {
        self.tenant_id == tenant_id
    }
}
