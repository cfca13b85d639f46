//! BOM explosion scenarios
//!
//! End-to-end explosions over an in-memory tenant catalog:
//! 1. Simple 2-level BOM (FG -> raw materials)
//! 2. Multi-level BOM with a component shared by two sub-assemblies
//! 3. Circular reference between a finished good and its sub-assembly

use vivae_models::{Bom, BomLine, ExplosionStatus, ItemKind, ItemMeta, TenantCatalog};
use vivae_utils::{explode, BomExplosionEngine, ExplosionConfig};

const TENANT: &str = "lab-vivae";

fn item(item_no: &str, description: &str, kind: ItemKind) -> ItemMeta {
    ItemMeta::new(item_no, description, kind)
}

fn line(line_no: u32, component: &str, quantity_per: f64, scrap_pct: f64, position: &str) -> BomLine {
    BomLine::new(line_no, component, quantity_per)
        .with_scrap(scrap_pct)
        .with_uom("PCS")
        .with_position(position)
}

fn test_catalog() -> TenantCatalog {
    TenantCatalog::new(TENANT)
        // Simple
        .with_item(item("FG-TEST-001", "Simple Test FG", ItemKind::Manufactured))
        .with_item(item("RM-TEST-001", "Test RM 1", ItemKind::Purchased))
        .with_item(item("RM-TEST-002", "Test RM 2", ItemKind::Purchased))
        // Multi-level
        .with_item(item("FG-COMPLEX-001", "Complex Multi-Level FG", ItemKind::Manufactured))
        .with_item(item("SUB-FRAME-001", "Frame Sub-Assembly", ItemKind::Manufactured))
        .with_item(item("SUB-COVER-001", "Cover Sub-Assembly", ItemKind::Manufactured))
        .with_item(item("RM-WOOD-001", "Wood Plank", ItemKind::Purchased))
        .with_item(item("RM-FABRIC-001", "Fabric Roll", ItemKind::Purchased))
        .with_item(item("RM-SCREW-001", "Screw M6", ItemKind::Purchased))
        .with_item(item("RM-PAINT-001", "Paint Liter", ItemKind::Purchased))
        // Cycle
        .with_item(item("FG-CYCLE-001", "Cycle Test FG", ItemKind::Manufactured))
        .with_item(item("SUB-CYCLE-001", "Cycle Sub-Assembly", ItemKind::Manufactured))
        .with_bom(
            Bom::certified(TENANT, "FG-TEST-001")
                .with_line(line(10, "RM-TEST-001", 2.0, 5.0, "MAIN"))
                .with_line(line(20, "RM-TEST-002", 5.0, 10.0, "MAIN")),
        )
        .with_bom(
            Bom::certified(TENANT, "SUB-FRAME-001")
                .with_line(line(10, "RM-WOOD-001", 4.0, 3.0, "FRAME"))
                .with_line(line(20, "RM-SCREW-001", 12.0, 2.0, "FRAME")),
        )
        .with_bom(
            Bom::certified(TENANT, "SUB-COVER-001")
                .with_line(line(10, "RM-FABRIC-001", 1.5, 10.0, "COVER").with_uom("M"))
                .with_line(line(20, "RM-SCREW-001", 8.0, 2.0, "COVER")),
        )
        .with_bom(
            Bom::certified(TENANT, "FG-COMPLEX-001")
                .with_line(line(10, "SUB-FRAME-001", 1.0, 5.0, "ASSEMBLY"))
                .with_line(line(20, "SUB-COVER-001", 2.0, 8.0, "ASSEMBLY"))
                .with_line(line(30, "RM-PAINT-001", 0.5, 5.0, "FINISH").with_uom("L")),
        )
        .with_bom(
            Bom::certified(TENANT, "FG-CYCLE-001")
                .with_line(line(10, "SUB-CYCLE-001", 1.0, 0.0, "MAIN")),
        )
        .with_bom(
            Bom::certified(TENANT, "SUB-CYCLE-001")
                .with_line(line(10, "FG-CYCLE-001", 1.0, 0.0, "MAIN")),
        )
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_simple_explosion() {
    let catalog = test_catalog();
    let result = explode(&catalog, TENANT, "FG-TEST-001", 10.0, false).unwrap();

    assert_eq!(result.status, ExplosionStatus::Success);
    assert_eq!(result.description, "Simple Test FG");
    assert_eq!(result.consolidated_components.len(), 2);
    assert_close(result.total_for("RM-TEST-001"), 21.0);
    assert_close(result.total_for("RM-TEST-002"), 55.0);
    assert_eq!(result.max_level, 1);
    assert!(!result.has_cycles);
}

#[test]
fn test_multi_level_explosion_consolidates_shared_component() {
    let catalog = test_catalog();
    let result = explode(&catalog, TENANT, "FG-COMPLEX-001", 5.0, false).unwrap();

    assert_eq!(result.status, ExplosionStatus::Success);
    assert_eq!(result.max_level, 2);
    assert!(result.messages.is_empty());

    let flat: Vec<(&str, u32)> = result
        .components
        .iter()
        .map(|c| (c.item_no.as_str(), c.level))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("SUB-FRAME-001", 1),
            ("RM-WOOD-001", 2),
            ("RM-SCREW-001", 2),
            ("SUB-COVER-001", 1),
            ("RM-FABRIC-001", 2),
            ("RM-SCREW-001", 2),
            ("RM-PAINT-001", 1),
        ]
    );
    assert_eq!(result.consolidated_components.len(), 6);

    let screw = result.consolidated("RM-SCREW-001").unwrap();
    assert_close(screw.total_quantity, 152.388);
    assert_eq!(screw.source_boms, vec!["SUB-FRAME-001", "SUB-COVER-001"]);
    assert_eq!(screw.position.as_deref(), Some("FRAME"));

    assert_close(result.components[2].total_quantity, 64.26);
    assert_close(result.components[5].total_quantity, 88.128);
}

#[test]
fn test_scrap_cascades_through_levels() {
    let catalog = test_catalog();
    let result = explode(&catalog, TENANT, "FG-COMPLEX-001", 5.0, false).unwrap();

    assert_close(result.total_for("SUB-FRAME-001"), 5.25);
    assert_close(result.total_for("SUB-COVER-001"), 10.8);
    // 4.0 x 5 x 1.03 x 1.05
    assert_close(result.total_for("RM-WOOD-001"), 21.63);
    // 1.5 x 10 x 1.10 x 1.08
    assert_close(result.total_for("RM-FABRIC-001"), 17.82);
    assert_close(result.total_for("RM-PAINT-001"), 2.625);

    let fabric = result.consolidated("RM-FABRIC-001").unwrap();
    assert_eq!(fabric.uom_code, "M");
    assert_eq!(fabric.source_boms, vec!["SUB-COVER-001"]);
}

#[test]
fn test_scrap_compounds_across_three_levels() {
    let catalog = TenantCatalog::new(TENANT)
        .with_item(item("FG-IMPLANT-001", "Implant bridge", ItemKind::Manufactured))
        .with_item(item("SUB-FRAME-002", "Milled frame", ItemKind::Manufactured))
        .with_item(item("SUB-BLANK-002", "Sintered blank", ItemKind::SemiFinished))
        .with_item(item("RM-POWDER-001", "Zirconia powder", ItemKind::Purchased))
        .with_bom(Bom::certified(TENANT, "FG-IMPLANT-001").with_line(line(10, "SUB-FRAME-002", 2.0, 10.0, "FRAME")))
        .with_bom(Bom::certified(TENANT, "SUB-FRAME-002").with_line(line(10, "SUB-BLANK-002", 3.0, 20.0, "BLANK")))
        .with_bom(Bom::certified(TENANT, "SUB-BLANK-002").with_line(line(10, "RM-POWDER-001", 4.0, 50.0, "POWDER")));

    let result = explode(&catalog, TENANT, "FG-IMPLANT-001", 1.0, false).unwrap();

    assert_eq!(result.max_level, 3);
    // 2.0 x 1.10
    assert_close(result.total_for("SUB-FRAME-002"), 2.2);
    // 3.0 x 2.0 x 1.20 x 1.10
    assert_close(result.total_for("SUB-BLANK-002"), 7.92);
    // 4.0 x 6.0 x 1.50 x 1.20 x 1.10
    assert_close(result.total_for("RM-POWDER-001"), 47.52);
    assert!(result.is_success());
}

#[test]
fn test_cycle_detection() {
    let catalog = test_catalog();
    let result = explode(&catalog, TENANT, "FG-CYCLE-001", 1.0, false).unwrap();

    assert!(result.has_cycles);
    assert!(result.cycles_detected.contains(&"FG-CYCLE-001".to_string()));
    assert_eq!(result.status, ExplosionStatus::Warning);
    assert!(result.messages.iter().any(|m| m.contains("Cycle detected")));
    assert_eq!(result.components.len(), 2);
    assert_eq!(result.max_level, 2);
}

#[test]
fn test_cycle_entered_from_sub_assembly() {
    let catalog = test_catalog();
    let result = explode(&catalog, TENANT, "SUB-CYCLE-001", 1.0, false).unwrap();

    assert_eq!(result.cycles_detected, vec!["SUB-CYCLE-001"]);
    assert_eq!(result.status, ExplosionStatus::Warning);
}

#[test]
fn test_shared_sub_assembly_on_sibling_branches_is_not_a_cycle() {
    let catalog = TenantCatalog::new(TENANT)
        .with_item(item("FG-BRIDGE-001", "Bridge", ItemKind::Manufactured))
        .with_item(item("SUB-LEFT-001", "Left abutment", ItemKind::Manufactured))
        .with_item(item("SUB-RIGHT-001", "Right abutment", ItemKind::Manufactured))
        .with_item(item("SUB-POST-001", "Post", ItemKind::SemiFinished))
        .with_item(item("RM-TI-001", "Titanium blank", ItemKind::Purchased))
        .with_bom(
            Bom::certified(TENANT, "FG-BRIDGE-001")
                .with_line(line(10, "SUB-LEFT-001", 1.0, 0.0, "LEFT"))
                .with_line(line(20, "SUB-RIGHT-001", 1.0, 0.0, "RIGHT")),
        )
        .with_bom(Bom::certified(TENANT, "SUB-LEFT-001").with_line(line(10, "SUB-POST-001", 1.0, 0.0, "LEFT")))
        .with_bom(Bom::certified(TENANT, "SUB-RIGHT-001").with_line(line(10, "SUB-POST-001", 2.0, 0.0, "RIGHT")))
        .with_bom(Bom::certified(TENANT, "SUB-POST-001").with_line(line(10, "RM-TI-001", 0.5, 0.0, "POST")));

    let result = explode(&catalog, TENANT, "FG-BRIDGE-001", 2.0, false).unwrap();

    assert!(!result.has_cycles);
    assert!(result.is_success());
    assert_eq!(result.max_level, 3);
    assert_close(result.total_for("SUB-POST-001"), 6.0);
    assert_close(result.total_for("RM-TI-001"), 3.0);
    assert_eq!(
        result.consolidated("RM-TI-001").unwrap().source_boms,
        vec!["SUB-POST-001"]
    );
}

#[test]
fn test_explosion_is_idempotent() {
    let catalog = test_catalog();
    let engine = BomExplosionEngine::new(&catalog);

    let first = engine.explode(TENANT, "FG-COMPLEX-001", 5.0, true).unwrap();
    let second = engine.explode(TENANT, "FG-COMPLEX-001", 5.0, true).unwrap();
    assert_eq!(first, second);

    // A cyclic explosion in between must not leak state into the next call.
    engine.explode(TENANT, "FG-CYCLE-001", 1.0, false).unwrap();
    let third = engine.explode(TENANT, "FG-COMPLEX-001", 5.0, true).unwrap();
    assert_eq!(first, third);
}

#[test]
fn test_concurrent_explosions_share_one_engine() {
    let catalog = test_catalog();
    let engine = BomExplosionEngine::with_config(&catalog, ExplosionConfig::default()).unwrap();
    let expected = engine.explode(TENANT, "FG-COMPLEX-001", 5.0, false).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = &engine;
                scope.spawn(move || {
                    if i % 2 == 0 {
                        engine.explode(TENANT, "FG-COMPLEX-001", 5.0, false)
                    } else {
                        engine.explode(TENANT, "FG-CYCLE-001", 1.0, false)
                    }
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap().unwrap();
            if i % 2 == 0 {
                assert_eq!(result, expected);
            } else {
                assert!(result.has_cycles);
            }
        }
    });
}

#[test]
fn test_availability_is_attached_on_request() {
    let catalog = test_catalog()
        .with_item(item("RM-TEST-001", "Test RM 1", ItemKind::Purchased).with_safety_stock(5.0))
        .with_stock("RM-TEST-001", 30.0)
        .with_stock("RM-TEST-002", 10.0);

    let without = explode(&catalog, TENANT, "FG-TEST-001", 10.0, false).unwrap();
    assert!(without.availability.is_none());

    let result = explode(&catalog, TENANT, "FG-TEST-001", 10.0, true).unwrap();
    let availability = result.availability.as_ref().unwrap();

    assert!(availability["RM-TEST-001"].available);
    assert_close(availability["RM-TEST-001"].available_qty, 25.0);

    assert!(!availability["RM-TEST-002"].available);
    assert_close(availability["RM-TEST-002"].shortage, 45.0);

    let shortages = result.shortages();
    assert_eq!(shortages.len(), 1);
    assert_eq!(shortages[0].0, "RM-TEST-002");

    // Availability never changes the explosion itself.
    assert_eq!(result.components, without.components);
    assert_eq!(result.status, without.status);
}

#[test]
fn test_result_json_contract() {
    let catalog = test_catalog();
    let result = explode(&catalog, TENANT, "FG-COMPLEX-001", 5.0, false).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    for field in [
        "item_no", "description", "quantity", "status", "messages", "components",
        "consolidated_components", "max_level", "has_cycles", "cycles_detected",
    ] {
        assert!(json.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(json["status"], "success");
    assert_eq!(json["components"].as_array().unwrap().len(), 7);
    assert_eq!(
        json["consolidated_components"]["RM-SCREW-001"]["source_boms"],
        serde_json::json!(["SUB-FRAME-001", "SUB-COVER-001"])
    );
}
