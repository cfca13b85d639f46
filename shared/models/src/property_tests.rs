//! Property-based tests for the Vivae production models
//!
//! Covers the arithmetic invariants of availability reports and scrap
//! multipliers, plus JSON persistence of BOM documents.

use proptest::prelude::*;
use proptest::option;

use crate::{AvailabilityReason, AvailabilityReport, Bom, BomLine, BomStatus, ComponentKind};

prop_compose! {
    fn arb_item_no()(prefix in "(FG|SUB|RM)", number in 1..999u32) -> String {
        format!("{}-{:03}", prefix, number)
    }
}

prop_compose! {
    fn arb_bom_line()(
        line_no in 1..500u32,
        component in arb_item_no(),
        quantity_per in 0.001f64..1000.0,
        scrap_pct in 0.0f64..=100.0,
        resource in any::<bool>(),
        position in option::of("[A-Z]{3,10}"),
    ) -> BomLine {
        let mut line = BomLine::new(line_no * 10, component, quantity_per).with_scrap(scrap_pct);
        if let Some(position) = position {
            line = line.with_position(position);
        }
        if resource {
            line = line.as_resource();
        }
        line
    }
}

fn arb_status() -> impl Strategy<Value = BomStatus> {
    prop_oneof![
        Just(BomStatus::New),
        Just(BomStatus::UnderDevelopment),
        Just(BomStatus::Certified),
        Just(BomStatus::Closed),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_availability_never_negative(
        required in 0.0f64..10_000.0,
        on_hand in 0.0f64..10_000.0,
        safety_stock in 0.0f64..10_000.0,
    ) {
        let report = AvailabilityReport::evaluate(required, on_hand, safety_stock);

        prop_assert!(report.available_qty >= 0.0);
        prop_assert!(report.shortage >= 0.0);
        prop_assert!(report.shortage <= required);
        prop_assert_eq!(report.available, report.shortage == 0.0);
        prop_assert_eq!(
            report.reason == AvailabilityReason::SufficientStock,
            report.available
        );
    }

    #[test]
    fn prop_shortage_covers_gap(
        required in 0.0f64..10_000.0,
        on_hand in 0.0f64..10_000.0,
    ) {
        let report = AvailabilityReport::evaluate(required, on_hand, 0.0);
        if required > on_hand {
            prop_assert!((report.shortage - (required - on_hand)).abs() < 1e-9);
        } else {
            prop_assert!(report.available);
        }
    }

    #[test]
    fn prop_scrap_multiplier_bounds(line in arb_bom_line()) {
        let multiplier = line.scrap_multiplier();
        prop_assert!(multiplier >= 1.0);
        prop_assert!(multiplier <= 2.0);
    }

    #[test]
    fn prop_bom_document_survives_json(
        item_no in arb_item_no(),
        status in arb_status(),
        lines in prop::collection::vec(arb_bom_line(), 0..8),
    ) {
        let mut bom = Bom::new("lab-1", item_no, "V1", status);
        bom.lines = lines;

        let json = serde_json::to_string(&bom).unwrap();
        let decoded: Bom = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(decoded.lines.len(), bom.lines.len());
        prop_assert_eq!(decoded.status, bom.status);
        for (a, b) in decoded.lines.iter().zip(bom.lines.iter()) {
            prop_assert_eq!(&a.component_item_no, &b.component_item_no);
            prop_assert_eq!(a.component_type == ComponentKind::Resource, b.component_type == ComponentKind::Resource);
            prop_assert!((a.quantity_per - b.quantity_per).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_sorted_lines_are_ordered(lines in prop::collection::vec(arb_bom_line(), 0..12)) {
        let mut bom = Bom::certified("lab-1", "FG-001");
        bom.lines = lines;

        let sorted = bom.sorted_lines();
        prop_assert_eq!(sorted.len(), bom.lines.len());
        prop_assert!(sorted.windows(2).all(|pair| pair[0].line_no <= pair[1].line_no));
    }
}
