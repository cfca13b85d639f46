use anyhow::Result;
use sqlx::PgPool;

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<()> {
    tracing::info!("Running PostgreSQL migrations");

    // Item master
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            tenant_id VARCHAR(50) NOT NULL,
            item_no VARCHAR(50) NOT NULL,
            description VARCHAR(255) NOT NULL DEFAULT '',
            item_type VARCHAR(20) NOT NULL,
            base_uom VARCHAR(20) NOT NULL DEFAULT 'PCS',
            is_phantom BOOLEAN NOT NULL DEFAULT FALSE,
            safety_stock_qty DOUBLE PRECISION NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (tenant_id, item_no)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // BOM headers; lines are stored as a JSONB array of BomLine
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS boms (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tenant_id VARCHAR(50) NOT NULL,
            item_no VARCHAR(50) NOT NULL,
            version_code VARCHAR(20) NOT NULL,
            description VARCHAR(255),
            status VARCHAR(30) NOT NULL,
            base_uom VARCHAR(20),
            lines JSONB NOT NULL DEFAULT '[]',
            certified_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (tenant_id, item_no, version_code)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Inventory movements; on-hand is the signed sum of quantities
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS item_ledger_entries (
            id BIGSERIAL PRIMARY KEY,
            posting_id UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
            tenant_id VARCHAR(50) NOT NULL,
            item_no VARCHAR(50) NOT NULL,
            quantity DOUBLE PRECISION NOT NULL,
            uom_code VARCHAR(10) NOT NULL,
            entry_type VARCHAR(20) NOT NULL,
            posting_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one certified version per item
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS ux_boms_certified ON boms(tenant_id, item_no) WHERE status = 'Certified'",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS ix_boms_tenant_status ON boms(tenant_id, status)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS ix_ile_tenant_item ON item_ledger_entries(tenant_id, item_no)")
        .execute(pool)
        .await?;

    tracing::info!("PostgreSQL migrations completed successfully");
    Ok(())
}
