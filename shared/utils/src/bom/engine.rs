//! Multi-level BOM explosion.
//!
//! Depth-first expansion of certified BOMs into flat and consolidated
//! component requirements. Scrap compounds from the root down: every line
//! multiplies the net requirement by its own scrap factor and by the factors
//! of all its ancestors. Cycles are pruned and reported, never followed.
//!
//! The engine holds only a catalog reference and immutable configuration, so a
//! single instance can serve concurrent callers; each call owns its
//! [`ExplosionContext`].

use tracing::{debug, info, instrument};
use vivae_models::{Bom, BomLine, ComponentKind, ExplosionComponent, ExplosionResult, ItemMeta};

use super::availability::AvailabilityChecker;
use super::catalog::{Catalog, InventoryLookup};
use super::context::ExplosionContext;
use crate::config::ExplosionConfig;
use crate::error::{ErpError, ErpResult};
use crate::{log_debug, log_warn};

/// Quantity state handed from a parent line to its children.
#[derive(Debug, Clone, Copy)]
struct LevelDemand {
    /// Net requirement of the parent, before any scrap.
    quantity: f64,
    /// Product of the scrap multipliers from the root down to the parent.
    scrap_multiplier: f64,
    /// Level of the parent; the root is 0.
    level: u32,
}

impl LevelDemand {
    fn root(quantity: f64) -> Self {
        Self {
            quantity,
            scrap_multiplier: 1.0,
            level: 0,
        }
    }

    fn child(&self, line: &BomLine) -> Self {
        Self {
            quantity: line.quantity_per * self.quantity,
            scrap_multiplier: line.scrap_multiplier() * self.scrap_multiplier,
            level: self.level + 1,
        }
    }

    /// Scrap-adjusted requirement for one line of this parent.
    fn requirement(&self, line: &BomLine) -> f64 {
        line.quantity_per * self.quantity * line.scrap_multiplier() * self.scrap_multiplier
    }
}

pub struct BomExplosionEngine<'a, C: ?Sized> {
    catalog: &'a C,
    config: ExplosionConfig,
}

impl<'a, C> BomExplosionEngine<'a, C>
where
    C: Catalog + InventoryLookup + ?Sized,
{
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            config: ExplosionConfig::default(),
        }
    }

    /// Rejects a configuration that would cut off the root's own lines.
    pub fn with_config(catalog: &'a C, config: ExplosionConfig) -> ErpResult<Self> {
        config.check()?;
        Ok(Self { catalog, config })
    }

    /// Explode the certified BOM of `item_no` for `quantity` units.
    ///
    /// `quantity` must already be validated as positive. Missing BOMs, missing
    /// item records and cycles end up in `messages`; only catalog failures are
    /// returned as errors.
    #[instrument(skip(self), fields(max_depth = self.config.max_depth))]
    pub fn explode(
        &self,
        tenant_id: &str,
        item_no: &str,
        quantity: f64,
        check_availability: bool,
    ) -> ErpResult<ExplosionResult> {
        info!("Starting BOM explosion");

        let mut ctx = ExplosionContext::new();
        self.expand_item(tenant_id, item_no, LevelDemand::root(quantity), &mut ctx)?;

        self.finish(tenant_id, item_no, quantity, ctx, check_availability)
    }

    /// Explode a specific BOM version, e.g. one still under development.
    ///
    /// Only the root comes from `bom`; sub-assemblies resolve to their
    /// certified BOMs as usual.
    #[instrument(skip(self, bom), fields(item_no = %bom.item_no, version = %bom.version_code))]
    pub fn explode_bom(
        &self,
        bom: &Bom,
        quantity: f64,
        check_availability: bool,
    ) -> ErpResult<ExplosionResult> {
        if !bom.status.is_explodable() {
            return Err(ErpError::invalid_bom_status(
                &bom.item_no,
                &bom.version_code,
                bom.status,
            ));
        }
        info!(status = %bom.status, "Starting BOM explosion from supplied version");

        let mut ctx = ExplosionContext::new();
        ctx.enter(&bom.item_no);
        self.expand_lines(&bom.tenant_id, bom, LevelDemand::root(quantity), &mut ctx)?;
        ctx.leave(&bom.item_no);

        self.finish(&bom.tenant_id, &bom.item_no, quantity, ctx, check_availability)
    }

    fn expand_item(
        &self,
        tenant_id: &str,
        item_no: &str,
        demand: LevelDemand,
        ctx: &mut ExplosionContext,
    ) -> ErpResult<()> {
        if ctx.is_on_path(item_no) {
            log_warn!("Cycle detected: {} appears in its own BOM tree", item_no);
            ctx.record_cycle(item_no);
            return Ok(());
        }

        ctx.enter(item_no);

        match self.catalog.find_certified_bom(tenant_id, item_no)? {
            Some(_) if demand.level >= self.config.max_depth => {
                log_warn!("BOM depth limit {} reached at {}", self.config.max_depth, item_no);
                ctx.record_truncation(item_no, self.config.max_depth);
            }
            Some(bom) => self.expand_lines(tenant_id, &bom, demand, ctx)?,
            None => {
                if demand.level > 0 && self.config.report_leaf_messages {
                    ctx.add_message(format!(
                        "No certified BOM found for {} (leaf component)",
                        item_no
                    ));
                }
            }
        }

        ctx.leave(item_no);
        Ok(())
    }

    fn expand_lines(
        &self,
        tenant_id: &str,
        bom: &Bom,
        demand: LevelDemand,
        ctx: &mut ExplosionContext,
    ) -> ErpResult<()> {
        debug!(
            bom = %bom.item_no,
            level = demand.level,
            lines = bom.lines.len(),
            "Expanding BOM level"
        );

        for line in bom.sorted_lines() {
            let item = self.component_item(tenant_id, line, ctx)?;
            let component = build_component(line, item.as_ref(), demand);
            ctx.record(component, &bom.item_no);

            if item.as_ref().is_some_and(|i| i.item_type.is_produced()) {
                self.expand_item(tenant_id, &line.component_item_no, demand.child(line), ctx)?;
            }
        }

        Ok(())
    }

    /// Item record for a line; resources are never looked up.
    fn component_item(
        &self,
        tenant_id: &str,
        line: &BomLine,
        ctx: &mut ExplosionContext,
    ) -> ErpResult<Option<ItemMeta>> {
        if line.component_type == ComponentKind::Resource {
            return Ok(None);
        }

        let item = self.catalog.find_item(tenant_id, &line.component_item_no)?;
        if item.is_none() && self.config.report_missing_items {
            ctx.add_message(format!(
                "Item metadata not found for {} (treated as leaf)",
                line.component_item_no
            ));
        }
        Ok(item)
    }

    fn finish(
        &self,
        tenant_id: &str,
        item_no: &str,
        quantity: f64,
        ctx: ExplosionContext,
        check_availability: bool,
    ) -> ErpResult<ExplosionResult> {
        let description = self
            .catalog
            .find_item(tenant_id, item_no)?
            .map(|item| item.description)
            .unwrap_or_else(|| item_no.to_string());

        log_debug!("Visited {} BOM nodes", ctx.visited_count());
        let mut result = ctx.into_result(item_no, description, quantity);

        if check_availability {
            let checker = AvailabilityChecker::new(self.catalog);
            let report = checker.check(tenant_id, result.consolidated_components.values())?;
            result.availability = Some(report);
        }

        info!(
            components = result.components.len(),
            consolidated = result.consolidated_components.len(),
            max_level = result.max_level,
            has_cycles = result.has_cycles,
            "BOM explosion complete"
        );

        Ok(result)
    }
}

fn build_component(line: &BomLine, item: Option<&ItemMeta>, demand: LevelDemand) -> ExplosionComponent {
    let description = line
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .or_else(|| item.map(|i| i.description.clone()))
        .unwrap_or_default();
    let uom_code = line
        .uom_code
        .clone()
        .filter(|u| !u.is_empty())
        .or_else(|| item.map(|i| i.base_uom.clone()))
        .unwrap_or_default();

    ExplosionComponent {
        item_no: line.component_item_no.clone(),
        description,
        uom_code,
        quantity_per: line.quantity_per,
        total_quantity: demand.requirement(line),
        scrap_pct: line.scrap_pct,
        level: demand.level + 1,
        is_phantom: item.is_some_and(|i| i.is_phantom),
        position: line.position.clone(),
        source_boms: Vec::new(),
        component_type: line.component_type,
    }
}

/// Explode with the default configuration.
pub fn explode<C>(
    catalog: &C,
    tenant_id: &str,
    item_no: &str,
    quantity: f64,
    check_availability: bool,
) -> ErpResult<ExplosionResult>
where
    C: Catalog + InventoryLookup + ?Sized,
{
    BomExplosionEngine::new(catalog).explode(tenant_id, item_no, quantity, check_availability)
}
