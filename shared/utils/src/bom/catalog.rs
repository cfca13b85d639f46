//! Catalog read contract consumed by the explosion engine.
//!
//! Lookups are synchronous. Absence is reported as `None`; an `Err` means the
//! catalog itself could not be read and is passed straight to the caller.

use vivae_models::{Bom, ItemMeta, TenantCatalog};

use crate::error::{ErpError, ErpResult};

/// Item and BOM master data, scoped by tenant.
pub trait Catalog {
    /// The active BOM for an item, `None` for purchased or undefined items.
    fn find_certified_bom(&self, tenant_id: &str, item_no: &str) -> ErpResult<Option<Bom>>;

    fn find_item(&self, tenant_id: &str, item_no: &str) -> ErpResult<Option<ItemMeta>>;
}

/// On-hand inventory, only consulted for availability checks.
pub trait InventoryLookup {
    fn get_on_hand(&self, tenant_id: &str, item_no: &str) -> ErpResult<f64>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn find_certified_bom(&self, tenant_id: &str, item_no: &str) -> ErpResult<Option<Bom>> {
        (**self).find_certified_bom(tenant_id, item_no)
    }

    fn find_item(&self, tenant_id: &str, item_no: &str) -> ErpResult<Option<ItemMeta>> {
        (**self).find_item(tenant_id, item_no)
    }
}

impl<I: InventoryLookup + ?Sized> InventoryLookup for &I {
    fn get_on_hand(&self, tenant_id: &str, item_no: &str) -> ErpResult<f64> {
        (**self).get_on_hand(tenant_id, item_no)
    }
}

/// A snapshot only answers for the tenant it was loaded for.
fn ensure_tenant(catalog: &TenantCatalog, tenant_id: &str, item_no: &str) -> ErpResult<()> {
    if catalog.serves(tenant_id) {
        Ok(())
    } else {
        Err(ErpError::catalog(
            item_no,
            format!(
                "catalog snapshot for tenant '{}' cannot answer for tenant '{}'",
                catalog.tenant_id, tenant_id
            ),
        ))
    }
}

impl Catalog for TenantCatalog {
    fn find_certified_bom(&self, tenant_id: &str, item_no: &str) -> ErpResult<Option<Bom>> {
        ensure_tenant(self, tenant_id, item_no)?;
        Ok(self.certified_bom(item_no).cloned())
    }

    fn find_item(&self, tenant_id: &str, item_no: &str) -> ErpResult<Option<ItemMeta>> {
        ensure_tenant(self, tenant_id, item_no)?;
        Ok(self.item(item_no).cloned())
    }
}

impl InventoryLookup for TenantCatalog {
    fn get_on_hand(&self, tenant_id: &str, item_no: &str) -> ErpResult<f64> {
        ensure_tenant(self, tenant_id, item_no)?;
        Ok(self.stock(item_no))
    }
}
