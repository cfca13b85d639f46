//! Catalog Repository
//!
//! Read access to the item master, BOM versions and item ledger totals that
//! BOM explosion runs against.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use vivae_models::{Bom, BomLine, BomStatus, ItemKind, ItemMeta, StockLevel, TenantCatalog};

pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the certified BOM of an item, if any
    pub async fn find_certified_bom(&self, tenant_id: &str, item_no: &str) -> Result<Option<Bom>> {
        let row: Option<BomRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, item_no, version_code, description, status,
                   base_uom, lines, certified_at, updated_at
            FROM boms
            WHERE tenant_id = $1 AND item_no = $2 AND status = 'Certified'
            "#,
        )
        .bind(tenant_id)
        .bind(item_no)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch certified BOM")?;

        row.map(Bom::try_from).transpose()
    }

    /// Find a BOM version by ID, whatever its status
    pub async fn find_bom_by_id(&self, tenant_id: &str, id: Uuid) -> Result<Option<Bom>> {
        let row: Option<BomRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, item_no, version_code, description, status,
                   base_uom, lines, certified_at, updated_at
            FROM boms
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch BOM by ID")?;

        row.map(Bom::try_from).transpose()
    }

    /// Find an item master record
    pub async fn find_item(&self, tenant_id: &str, item_no: &str) -> Result<Option<ItemMeta>> {
        let row: Option<ItemRow> = sqlx::query_as(
            r#"
            SELECT item_no, description, item_type, base_uom, is_phantom, safety_stock_qty
            FROM items
            WHERE tenant_id = $1 AND item_no = $2
            "#,
        )
        .bind(tenant_id)
        .bind(item_no)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch item")?;

        row.map(ItemMeta::try_from).transpose()
    }

    /// Net on-hand quantity from the item ledger; zero when nothing was posted
    pub async fn get_on_hand(&self, tenant_id: &str, item_no: &str) -> Result<f64> {
        let on_hand: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity), 0)::DOUBLE PRECISION
            FROM item_ledger_entries
            WHERE tenant_id = $1 AND item_no = $2
            "#,
        )
        .bind(tenant_id)
        .bind(item_no)
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum item ledger entries")?;

        Ok(on_hand)
    }

    /// Load everything an explosion needs for one tenant in three queries.
    pub async fn load_snapshot(&self, tenant_id: &str) -> Result<TenantCatalog> {
        let items: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT item_no, description, item_type, base_uom, is_phantom, safety_stock_qty
            FROM items
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch items")?;

        let boms: Vec<BomRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, item_no, version_code, description, status,
                   base_uom, lines, certified_at, updated_at
            FROM boms
            WHERE tenant_id = $1 AND status = 'Certified'
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch certified BOMs")?;

        let stock: Vec<StockLevel> = sqlx::query_as(
            r#"
            SELECT item_no, SUM(quantity)::DOUBLE PRECISION AS on_hand
            FROM item_ledger_entries
            WHERE tenant_id = $1
            GROUP BY item_no
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to aggregate item ledger")?;

        let mut catalog = TenantCatalog::new(tenant_id);
        for row in items {
            catalog.insert_item(row.try_into()?);
        }
        for row in boms {
            catalog.insert_bom(row.try_into()?);
        }
        for level in stock {
            catalog.insert_stock(level);
        }

        tracing::debug!(
            tenant_id,
            items = catalog.items.len(),
            boms = catalog.boms.len(),
            "Loaded tenant catalog snapshot"
        );
        Ok(catalog)
    }
}

#[derive(Debug, FromRow)]
struct BomRow {
    id: Uuid,
    tenant_id: String,
    item_no: String,
    version_code: String,
    description: Option<String>,
    status: String,
    base_uom: Option<String>,
    lines: serde_json::Value,
    certified_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BomRow> for Bom {
    type Error = anyhow::Error;

    fn try_from(row: BomRow) -> Result<Self> {
        let status = row.status.parse::<BomStatus>()?;
        let lines: Vec<BomLine> = serde_json::from_value(row.lines)
            .with_context(|| format!("Malformed lines in BOM {} {}", row.item_no, row.version_code))?;

        Ok(Self {
            id: row.id,
            tenant_id: row.tenant_id,
            item_no: row.item_no,
            version_code: row.version_code,
            description: row.description,
            status,
            base_uom: row.base_uom,
            lines,
            certified_at: row.certified_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    item_no: String,
    description: String,
    item_type: String,
    base_uom: String,
    is_phantom: bool,
    safety_stock_qty: f64,
}

impl TryFrom<ItemRow> for ItemMeta {
    type Error = anyhow::Error;

    fn try_from(row: ItemRow) -> Result<Self> {
        let item_type = row
            .item_type
            .parse::<ItemKind>()
            .with_context(|| format!("Item {} has an unknown type", row.item_no))?;

        Ok(Self {
            item_no: row.item_no,
            description: row.description,
            item_type,
            base_uom: row.base_uom,
            is_phantom: row.is_phantom,
            safety_stock_qty: row.safety_stock_qty,
        })
    }
}
