//! # Dashboard Statistics
//!
//! Two fixed analytical queries over the payment collection: the admin
//! summary and the per-category order breakdown.

use crate::error::StoreResult;
use crate::menu::MenuItem;
use crate::payment::PaymentRecord;
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Approximate collection sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCounts {
    pub users: u64,
    pub menu_items: u64,
    pub payments: u64,
}

/// Response for `GET /admin-stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: u64,
    pub menu_items: u64,
    pub orders: u64,
    pub revenue: f64,
}

/// One row of `GET /order-stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    /// Number of menu-item references that matched this category
    pub quantity: u64,
    /// Sum of the matched menu items' prices
    pub revenue: f64,
}

/// Counts plus total revenue.
pub async fn admin_summary(store: &dyn Store) -> StoreResult<AdminStats> {
    let counts = store.estimated_counts().await?;
    let revenue = store.total_revenue().await?;

    Ok(AdminStats {
        users: counts.users,
        menu_items: counts.menu_items,
        orders: counts.payments,
        revenue,
    })
}

/// Expand each payment's menu item ids, join them to the menu and group by
/// category. References to unknown items are dropped. Rows are sorted by
/// category.
pub fn breakdown_by_category(payments: &[PaymentRecord], menu: &[MenuItem]) -> Vec<CategoryStats> {
    let by_id: HashMap<&str, &MenuItem> = menu
        .iter()
        .filter_map(|item| item.id.as_deref().map(|id| (id, item)))
        .collect();

    let mut groups: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
    for item in payments
        .iter()
        .flat_map(|payment| payment.menu_item_ids.iter())
        .filter_map(|id| by_id.get(id.as_str()))
    {
        let entry = groups.entry(item.category.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += item.price;
    }

    groups
        .into_iter()
        .map(|(category, (quantity, revenue))| CategoryStats {
            category: category.to_string(),
            quantity,
            revenue,
        })
        .collect()
}

/// Sum of `price` over all payments
pub fn total_revenue(payments: &[PaymentRecord]) -> f64 {
    payments.iter().map(|payment| payment.price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_item(id: &str, category: &str, price: f64) -> MenuItem {
        let mut item = MenuItem::new(id, category, price);
        item.id = Some(id.to_string());
        item
    }

    #[test]
    fn test_breakdown_groups_and_sums() {
        let menu = vec![
            menu_item("m1", "salad", 10.0),
            menu_item("m2", "pizza", 14.5),
            menu_item("m3", "salad", 8.0),
        ];

        let mut first = PaymentRecord::new("a@b.c", 32.0);
        first.menu_item_ids = vec!["m1".into(), "m2".into(), "m3".into()];
        let mut second = PaymentRecord::new("d@e.f", 10.0);
        second.menu_item_ids = vec!["m1".into(), "gone".into()];

        let rows = breakdown_by_category(&[first, second], &menu);

        assert_eq!(
            rows,
            vec![
                CategoryStats {
                    category: "pizza".into(),
                    quantity: 1,
                    revenue: 14.5
                },
                CategoryStats {
                    category: "salad".into(),
                    quantity: 3,
                    revenue: 28.0
                },
            ]
        );
    }

    #[test]
    fn test_total_revenue() {
        let payments = vec![
            PaymentRecord::new("a@b.c", 12.25),
            PaymentRecord::new("a@b.c", 7.75),
        ];
        assert_eq!(total_revenue(&payments), 20.0);
        assert_eq!(total_revenue(&[]), 0.0);
    }

    #[test]
    fn test_admin_stats_wire_names() {
        let json = serde_json::to_value(AdminStats {
            users: 3,
            menu_items: 10,
            orders: 2,
            revenue: 40.0,
        })
        .unwrap();
        assert_eq!(json["menuItems"], 10);
        assert_eq!(json["orders"], 2);
    }
}
