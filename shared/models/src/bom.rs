//! Bill of Materials models.
//!
//! A BOM is identified by `(tenant_id, item_no, version_code)` and owns an
//! ordered list of component lines. The certification workflow that moves a
//! BOM between statuses lives outside this crate; only the status value is
//! carried here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::item::ParseEnumError;

/// BOM lifecycle: New -> Under Development -> Certified -> Closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BomStatus {
    New,
    #[serde(rename = "Under Development")]
    UnderDevelopment,
    Certified,
    Closed,
}

impl BomStatus {
    /// Certified BOMs drive production; Under Development ones may be previewed.
    pub fn is_explodable(&self) -> bool {
        matches!(self, Self::Certified | Self::UnderDevelopment)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::UnderDevelopment => "Under Development",
            Self::Certified => "Certified",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for BomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BomStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "new" => Ok(Self::New),
            "under development" => Ok(Self::UnderDevelopment),
            "certified" => Ok(Self::Certified),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseEnumError::new("BOM status", s)),
        }
    }
}

/// What a BOM line consumes: a stocked item or a resource (labour, machine time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComponentKind {
    #[default]
    Item,
    Resource,
}

/// One component requirement within a BOM.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct BomLine {
    #[validate(range(min = 1, message = "Line number must be positive"))]
    pub line_no: u32,
    #[serde(default)]
    pub component_type: ComponentKind,
    #[validate(length(min = 1, max = 50, message = "Component item number is required"))]
    pub component_item_no: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub description: Option<String>,
    /// Units of the component per one unit of the parent.
    #[validate(range(min = 0.000001, message = "Quantity per must be positive"))]
    pub quantity_per: f64,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub uom_code: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "Scrap percentage must be between 0 and 100"))]
    #[serde(default)]
    pub scrap_pct: f64,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub position: Option<String>,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub routing_link_code: Option<String>,
}

impl BomLine {
    pub fn new(line_no: u32, component_item_no: impl Into<String>, quantity_per: f64) -> Self {
        Self {
            line_no,
            component_type: ComponentKind::Item,
            component_item_no: component_item_no.into(),
            description: None,
            quantity_per,
            uom_code: None,
            scrap_pct: 0.0,
            position: None,
            routing_link_code: None,
        }
    }

    pub fn with_scrap(mut self, scrap_pct: f64) -> Self {
        self.scrap_pct = scrap_pct;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_uom(mut self, uom_code: impl Into<String>) -> Self {
        self.uom_code = Some(uom_code.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn as_resource(mut self) -> Self {
        self.component_type = ComponentKind::Resource;
        self
    }

    /// `1 + scrap_pct / 100`
    pub fn scrap_multiplier(&self) -> f64 {
        1.0 + self.scrap_pct / 100.0
    }
}

/// A versioned bill of materials for one manufactured item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Bom {
    pub id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub tenant_id: String,
    #[validate(length(min = 1, max = 50, message = "Item number is required"))]
    pub item_no: String,
    #[validate(length(min = 1, max = 20))]
    pub version_code: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: BomStatus,
    #[serde(default)]
    pub base_uom: Option<String>,
    #[validate]
    #[serde(default)]
    pub lines: Vec<BomLine>,
    #[serde(default)]
    pub certified_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Bom {
    pub fn new(
        tenant_id: impl Into<String>,
        item_no: impl Into<String>,
        version_code: impl Into<String>,
        status: BomStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.into(),
            item_no: item_no.into(),
            version_code: version_code.into(),
            description: None,
            status,
            base_uom: None,
            lines: Vec::new(),
            certified_at: (status == BomStatus::Certified).then_some(now),
            updated_at: now,
        }
    }

    /// Shorthand for a certified `V1` BOM.
    pub fn certified(tenant_id: impl Into<String>, item_no: impl Into<String>) -> Self {
        Self::new(tenant_id, item_no, "V1", BomStatus::Certified)
    }

    pub fn with_line(mut self, line: BomLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn is_certified(&self) -> bool {
        self.status == BomStatus::Certified
    }

    /// Lines in stored line-number order. Equal numbers keep insertion order.
    pub fn sorted_lines(&self) -> Vec<&BomLine> {
        let mut lines: Vec<&BomLine> = self.lines.iter().collect();
        lines.sort_by_key(|line| line.line_no);
        lines
    }
}
