//! Item master data for the Vivae production module.
//!
//! Only the classification fields that drive BOM explosion and stock checks
//! are modelled here; pricing and posting data live with the ERP records.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// How an item is sourced. Produced kinds are expanded through their own BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Manufactured,
    SemiFinished,
    Purchased,
    Both,
}

impl ItemKind {
    /// Whether a component of this kind is a sub-assembly candidate.
    pub fn is_produced(&self) -> bool {
        matches!(self, Self::Manufactured | Self::SemiFinished | Self::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manufactured => "manufactured",
            Self::SemiFinished => "semi-finished",
            Self::Purchased => "purchased",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "manufactured" => Ok(Self::Manufactured),
            "semi-finished" | "semifinished" => Ok(Self::SemiFinished),
            "purchased" => Ok(Self::Purchased),
            "both" => Ok(Self::Both),
            _ => Err(ParseEnumError::new("item kind", s)),
        }
    }
}

/// Raised when a stored enum value does not match any known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Item classification metadata consumed by the explosion engine.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ItemMeta {
    #[validate(length(min = 1, max = 50, message = "Item number must be between 1 and 50 characters"))]
    pub item_no: String,
    #[validate(length(max = 200))]
    pub description: String,
    pub item_type: ItemKind,
    #[validate(length(min = 1, max = 20, message = "Base unit of measure is required"))]
    pub base_uom: String,
    /// Descriptive only; explosion records and recurses phantom items like any other.
    #[serde(default)]
    pub is_phantom: bool,
    #[validate(range(min = 0.0, message = "Safety stock cannot be negative"))]
    #[serde(default)]
    pub safety_stock_qty: f64,
}

impl ItemMeta {
    pub fn new(item_no: impl Into<String>, description: impl Into<String>, item_type: ItemKind) -> Self {
        Self {
            item_no: item_no.into(),
            description: description.into(),
            item_type,
            base_uom: "PCS".to_string(),
            is_phantom: false,
            safety_stock_qty: 0.0,
        }
    }

    pub fn with_base_uom(mut self, base_uom: impl Into<String>) -> Self {
        self.base_uom = base_uom.into();
        self
    }

    pub fn with_phantom(mut self, is_phantom: bool) -> Self {
        self.is_phantom = is_phantom;
        self
    }

    pub fn with_safety_stock(mut self, safety_stock_qty: f64) -> Self {
        self.safety_stock_qty = safety_stock_qty;
        self
    }
}

/// Aggregated on-hand quantity for one item, as read from the item ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct StockLevel {
    pub item_no: String,
    pub on_hand: f64,
}
