//! Per-explosion traversal state.
//!
//! A context is created for every `explode` call and consumed into the
//! result; it is never stored on the engine.

use std::collections::{BTreeMap, HashSet};

use vivae_models::{ExplosionComponent, ExplosionResult, ExplosionStatus};

#[derive(Debug, Default)]
pub struct ExplosionContext {
    /// Items whose BOM has been fully expanded at least once.
    visited: HashSet<String>,
    /// Ancestors of the node currently being expanded.
    active_path: HashSet<String>,
    components: Vec<ExplosionComponent>,
    consolidated: BTreeMap<String, ExplosionComponent>,
    messages: Vec<String>,
    cycles: Vec<String>,
    max_level: u32,
    truncated: bool,
}

impl ExplosionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on_path(&self, item_no: &str) -> bool {
        self.active_path.contains(item_no)
    }

    pub fn enter(&mut self, item_no: &str) {
        self.active_path.insert(item_no.to_string());
    }

    /// Backtrack: the item may reappear on a sibling branch.
    pub fn leave(&mut self, item_no: &str) {
        self.active_path.remove(item_no);
        self.visited.insert(item_no.to_string());
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn record_cycle(&mut self, item_no: &str) {
        self.add_message(format!(
            "Cycle detected: {} appears in its own BOM tree",
            item_no
        ));
        if !self.cycles.iter().any(|c| c == item_no) {
            self.cycles.push(item_no.to_string());
        }
    }

    pub fn record_truncation(&mut self, item_no: &str, max_depth: u32) {
        self.truncated = true;
        self.add_message(format!(
            "Maximum BOM depth {} reached at {}; deeper levels were not exploded",
            max_depth, item_no
        ));
    }

    /// Append to the flat list and merge into the consolidated requirement.
    pub fn record(&mut self, mut component: ExplosionComponent, source_bom: &str) {
        component.source_boms = vec![source_bom.to_string()];
        self.max_level = self.max_level.max(component.level);
        self.components.push(component.clone());

        match self.consolidated.get_mut(&component.item_no) {
            Some(existing) => {
                existing.total_quantity += component.total_quantity;
                if !existing.source_boms.iter().any(|b| b == source_bom) {
                    existing.source_boms.push(source_bom.to_string());
                }
            }
            None => {
                self.consolidated.insert(component.item_no.clone(), component);
            }
        }
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn into_result(self, item_no: &str, description: String, quantity: f64) -> ExplosionResult {
        let status = if self.has_cycles() || self.truncated {
            ExplosionStatus::Warning
        } else {
            ExplosionStatus::Success
        };

        ExplosionResult {
            item_no: item_no.to_string(),
            description,
            quantity,
            status,
            messages: self.messages,
            components: self.components,
            consolidated_components: self.consolidated,
            max_level: self.max_level,
            has_cycles: !self.cycles.is_empty(),
            cycles_detected: self.cycles,
            availability: None,
        }
    }
}
