//! Property-based tests for the label rules and report summary.
//!
//! These tests use proptest to verify invariants across a wide range of inputs,
//! helping to catch edge cases that unit tests might miss.

use assert_matches::assert_matches;
use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use smart_inventory::{
    entities::{item, AlertSeverity, AlertStatus, AlertType},
    handlers::common::non_negative_integer,
    services::{
        labels::{compute_labels, ItemLabel},
        reports::{inventory_row, AlertReportRow, ReportSummary, UNASSIGNED_SUPPLIER},
    },
};

// Strategies for generating test data
fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z ]{3,30}",
        "[A-Za-z ]{0,10}(fragile|FRAGILE|Fragile)[A-Za-z ]{0,10}",
    ]
}

fn status_strategy() -> impl Strategy<Value = AlertStatus> {
    prop_oneof![
        Just(AlertStatus::Active),
        Just(AlertStatus::Resolved),
        Just(AlertStatus::Dismissed),
    ]
}

fn item_strategy() -> impl Strategy<Value = item::Model> {
    (1i32..10_000, name_strategy(), 0i32..500, 0i32..50, any::<bool>(), 0i64..10_000_000).prop_map(
        |(id, name, quantity, reorder_level, priority, cents)| item::Model {
            id,
            name,
            sku: format!("SKU-{id}"),
            description: None,
            quantity,
            price: Decimal::new(cents, 2),
            priority,
            reorder_level,
            supplier_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
    )
}

fn alert_row(id: i32, status: AlertStatus) -> AlertReportRow {
    AlertReportRow {
        id,
        item_name: "Widget".to_string(),
        message: "generated".to_string(),
        alert_type: AlertType::Info,
        severity: AlertSeverity::Low,
        status,
        created_at: Utc::now(),
    }
}

// Property: every label rule is evaluated on its own
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn labels_follow_their_rules(
        quantity in 0i32..1_000,
        reorder_level in 0i32..100,
        priority in any::<bool>(),
        name in name_strategy(),
    ) {
        let labels = compute_labels(quantity, reorder_level, priority, &name);

        prop_assert_eq!(labels.contains(&ItemLabel::LowStock), quantity <= reorder_level);
        prop_assert_eq!(labels.contains(&ItemLabel::OutOfStock), quantity == 0);
        prop_assert_eq!(labels.contains(&ItemLabel::HighPriority), priority);
        prop_assert_eq!(
            labels.contains(&ItemLabel::Fragile),
            name.to_lowercase().contains("fragile")
        );
    }

    #[test]
    fn out_of_stock_implies_low_stock(reorder_level in 0i32..100, name in name_strategy()) {
        let labels = compute_labels(0, reorder_level, false, &name);
        prop_assert!(labels.contains(&ItemLabel::OutOfStock));
        prop_assert!(labels.contains(&ItemLabel::LowStock));
    }

    #[test]
    fn labels_keep_a_fixed_order(
        quantity in 0i32..20,
        reorder_level in 0i32..20,
        priority in any::<bool>(),
        name in name_strategy(),
    ) {
        let labels = compute_labels(quantity, reorder_level, priority, &name);
        let order = [
            ItemLabel::LowStock,
            ItemLabel::OutOfStock,
            ItemLabel::HighPriority,
            ItemLabel::Fragile,
        ];
        let positions: Vec<usize> = labels
            .iter()
            .map(|l| order.iter().position(|o| o == l).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

// Property: the summary always agrees with the rows it was built from
proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn summary_matches_rows(
        items in prop::collection::vec(item_strategy(), 0..30),
        statuses in prop::collection::vec(status_strategy(), 0..30),
    ) {
        let expected_low = items.iter().filter(|m| m.quantity <= m.reorder_level).count();
        let rows: Vec<_> = items.into_iter().map(|m| inventory_row(m, None)).collect();
        let alerts: Vec<_> = statuses
            .into_iter()
            .enumerate()
            .map(|(i, s)| alert_row(i as i32, s))
            .collect();

        let summary = ReportSummary::from_rows(&rows, &[], &alerts);

        prop_assert_eq!(summary.total_items, rows.len());
        prop_assert_eq!(summary.total_suppliers, 0);
        prop_assert_eq!(
            summary.active_alerts,
            alerts.iter().filter(|a| a.status == AlertStatus::Active).count()
        );
        prop_assert_eq!(summary.low_stock_items, expected_low);
        prop_assert_eq!(
            summary.out_of_stock_items,
            rows.iter().filter(|r| r.quantity == 0).count()
        );
        prop_assert!(summary.out_of_stock_items <= summary.low_stock_items);
        prop_assert!(rows.iter().all(|r| r.supplier == UNASSIGNED_SUPPLIER));
        prop_assert!(rows.iter().all(|r| r.price.scale() == 2));
    }
}

// Property: only whole, non-negative numbers pass as quantities
proptest! {
    #[test]
    fn whole_non_negative_numbers_are_quantities(n in 0i64..=i32::MAX as i64) {
        let number = serde_json::Number::from(n);
        prop_assert_eq!(non_negative_integer(&number), Some(n as i32));
    }

    #[test]
    fn negative_numbers_are_rejected(n in i64::MIN..0) {
        let number = serde_json::Number::from(n);
        prop_assert_eq!(non_negative_integer(&number), None);
    }

    #[test]
    fn fractional_numbers_are_rejected(whole in 0u32..10_000, frac in 1u32..100) {
        let value = whole as f64 + frac as f64 / 100.0;
        let number = serde_json::Number::from_f64(value).unwrap();
        prop_assert_eq!(non_negative_integer(&number), None);
    }
}

#[test]
fn oversized_quantity_is_rejected() {
    let number = serde_json::Number::from(i64::from(i32::MAX) + 1);
    assert_matches!(non_negative_integer(&number), None);
}
