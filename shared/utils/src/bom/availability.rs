//! Stock coverage for exploded requirements.
//!
//! Read-only enrichment: compares each consolidated requirement with on-hand
//! stock above the item's safety level. Resource lines are not stocked and get
//! no report.

use std::collections::BTreeMap;

use vivae_models::{AvailabilityReport, ExplosionComponent};

use super::catalog::{Catalog, InventoryLookup};
use crate::error::ErpResult;

pub struct AvailabilityChecker<'a, I: ?Sized> {
    inventory: &'a I,
}

impl<'a, I> AvailabilityChecker<'a, I>
where
    I: Catalog + InventoryLookup + ?Sized,
{
    pub fn new(inventory: &'a I) -> Self {
        Self { inventory }
    }

    pub fn check<'c>(
        &self,
        tenant_id: &str,
        components: impl IntoIterator<Item = &'c ExplosionComponent>,
    ) -> ErpResult<BTreeMap<String, AvailabilityReport>> {
        let mut availability = BTreeMap::new();

        for component in components.into_iter().filter(|c| c.is_stocked()) {
            let report = match self.inventory.find_item(tenant_id, &component.item_no)? {
                Some(item) => {
                    let on_hand = self.inventory.get_on_hand(tenant_id, &component.item_no)?;
                    AvailabilityReport::evaluate(component.total_quantity, on_hand, item.safety_stock_qty)
                }
                None => AvailabilityReport::item_not_found(component.total_quantity),
            };

            if !report.available {
                tracing::debug!(
                    item_no = %component.item_no,
                    shortage = report.shortage,
                    "Component short"
                );
            }
            availability.insert(component.item_no.clone(), report);
        }

        Ok(availability)
    }
}
