use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Derived, display-only tag attached to an item in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ItemLabel {
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "High Priority")]
    HighPriority,
    Fragile,
}

impl ItemLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemLabel::LowStock => "Low Stock",
            ItemLabel::OutOfStock => "Out of Stock",
            ItemLabel::HighPriority => "High Priority",
            ItemLabel::Fragile => "Fragile",
        }
    }
}

impl fmt::Display for ItemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluates each rule independently; the result is ordered
/// Low Stock, Out of Stock, High Priority, Fragile.
pub fn compute_labels(
    quantity: i32,
    reorder_level: i32,
    priority: bool,
    name: &str,
) -> Vec<ItemLabel> {
    let mut labels = Vec::with_capacity(4);

    if quantity <= reorder_level {
        labels.push(ItemLabel::LowStock);
    }
    if quantity == 0 {
        labels.push(ItemLabel::OutOfStock);
    }
    if priority {
        labels.push(ItemLabel::HighPriority);
    }
    if name.to_lowercase().contains("fragile") {
        labels.push(ItemLabel::Fragile);
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_reorder_level_is_low_stock_only() {
        assert_eq!(compute_labels(3, 5, false, "Laptop"), vec![ItemLabel::LowStock]);
    }

    #[test]
    fn at_reorder_level_counts_as_low_stock() {
        assert_eq!(compute_labels(5, 5, false, "Laptop"), vec![ItemLabel::LowStock]);
        assert!(compute_labels(6, 5, false, "Laptop").is_empty());
    }

    #[test]
    fn empty_stock_is_low_and_out() {
        assert_eq!(
            compute_labels(0, 5, false, "Laptop"),
            vec![ItemLabel::LowStock, ItemLabel::OutOfStock]
        );
    }

    #[test]
    fn zero_reorder_level_still_flags_empty_stock() {
        assert_eq!(
            compute_labels(0, 0, false, "Cable"),
            vec![ItemLabel::LowStock, ItemLabel::OutOfStock]
        );
    }

    #[test]
    fn all_labels_in_order() {
        assert_eq!(
            compute_labels(0, 5, true, "FRAGILE glass vase"),
            vec![
                ItemLabel::LowStock,
                ItemLabel::OutOfStock,
                ItemLabel::HighPriority,
                ItemLabel::Fragile
            ]
        );
    }

    #[test]
    fn fragile_match_is_case_insensitive_substring() {
        assert_eq!(
            compute_labels(50, 5, false, "Glass (Fragile)"),
            vec![ItemLabel::Fragile]
        );
        assert!(compute_labels(50, 5, false, "Frag ile").is_empty());
    }

    #[test]
    fn labels_serialize_as_display_text() {
        let json = serde_json::to_string(&vec![ItemLabel::OutOfStock, ItemLabel::Fragile]).unwrap();
        assert_eq!(json, r#"["Out of Stock","Fragile"]"#);
        assert_eq!(ItemLabel::HighPriority.to_string(), "High Priority");
    }
}
