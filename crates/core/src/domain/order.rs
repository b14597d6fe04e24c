use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::domain::selection::{SelectedItem, SelectionStore};

/// Projection of the catalog and the selection store at one instant. Never
/// persisted; recomputed whenever either input changes. The amount is
/// priced at a flat per-yard rate, not per-product prices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub items: Vec<SelectedItem>,
    pub total_yards: u32,
    pub total_amount: Decimal,
}

impl OrderSummary {
    pub fn compute(
        products: &[Product],
        store: &SelectionStore,
        price_per_yard: Decimal,
    ) -> Self {
        let items = store.selected_items(products);
        let total_yards = store.total_yards(products);
        let total_amount = price_per_yard * Decimal::from(total_yards);

        Self { items, total_yards, total_amount }
    }

    /// An empty summary short-circuits every checkout flow.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::product::{Product, ProductId};
    use crate::domain::selection::SelectionStore;

    use super::OrderSummary;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: name.to_string(),
            price: Decimal::new(3500, 0),
            image: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_selection_produces_empty_summary() {
        let products = [product("a", "Fabric A"), product("b", "Fabric B")];
        let summary =
            OrderSummary::compute(&products, &SelectionStore::new(), Decimal::new(3500, 0));

        assert!(summary.is_empty());
        assert_eq!(summary.total_yards, 0);
        assert_eq!(summary.total_amount, Decimal::ZERO);
    }

    #[test]
    fn amount_is_total_yards_times_flat_rate() {
        let products = [product("a", "Fabric A"), product("b", "Fabric B")];
        let mut store = SelectionStore::new();
        store.set_selected(&products[0].id, true);
        store.set_quantity(&products[0].id, 5);
        store.set_selected(&products[1].id, true);
        store.set_quantity(&products[1].id, 2);

        let summary = OrderSummary::compute(&products, &store, Decimal::new(3500, 0));

        assert_eq!(summary.total_yards, 7);
        assert_eq!(summary.total_amount, Decimal::new(24_500, 0));
        assert_eq!(summary.items.len(), 2);
    }
}
