use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

/// Quantity a product starts at the first time a shopper touches it.
pub const DEFAULT_QUANTITY: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub selected: bool,
    pub quantity: u32,
}

impl Default for SelectionEntry {
    fn default() -> Self {
        Self { selected: false, quantity: DEFAULT_QUANTITY }
    }
}

/// A product chosen for checkout, carrying its current quantity in yards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
}

/// Session-scoped cart model: per product id, a selected flag and a yard
/// count. Entries are created lazily on first interaction and never
/// explicitly destroyed; an untouched id reads as
/// `{selected: false, quantity: DEFAULT_QUANTITY}`. Nothing here is
/// persisted and nothing here does I/O.
///
/// Quantities are not clamped by the store. Callers clamp decrements with
/// [`decremented`] before calling [`SelectionStore::set_quantity`], so a
/// stored quantity is always >= 1.
#[derive(Clone, Debug, Default)]
pub struct SelectionStore {
    entries: HashMap<ProductId, SelectionEntry>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the selected flag, initializing the quantity to the default if
    /// this is the first interaction with `id`. Idempotent.
    pub fn set_selected(&mut self, id: &ProductId, selected: bool) {
        let entry = self.entries.entry(id.clone()).or_default();
        entry.selected = selected;
    }

    /// Sets the quantity, initializing `selected` to false if this is the
    /// first interaction with `id`.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) {
        let entry = self.entries.entry(id.clone()).or_default();
        entry.quantity = quantity;
    }

    /// Current entry for `id`, or the implicit default for ids never
    /// touched. Pure read.
    pub fn selection(&self, id: &ProductId) -> SelectionEntry {
        self.entries.get(id).copied().unwrap_or_default()
    }

    /// Products from `products` currently selected, in input order, each
    /// carrying its current quantity. Products absent from the input never
    /// appear, even if an orphaned entry for them exists.
    pub fn selected_items(&self, products: &[Product]) -> Vec<SelectedItem> {
        products
            .iter()
            .filter(|product| self.selection(&product.id).selected)
            .map(|product| SelectedItem {
                id: product.id.clone(),
                name: product.name.clone(),
                quantity: self.selection(&product.id).quantity,
            })
            .collect()
    }

    /// Sum of quantities over the selected subset of `products`. Zero when
    /// nothing is selected.
    pub fn total_yards(&self, products: &[Product]) -> u32 {
        products
            .iter()
            .map(|product| self.selection(&product.id))
            .filter(|entry| entry.selected)
            .map(|entry| entry.quantity)
            .sum()
    }
}

/// The decrement rule shared by every quantity stepper: one step down,
/// never below a single yard.
pub fn decremented(current: u32) -> u32 {
    current.saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::product::{Product, ProductId};

    use super::{decremented, SelectionStore, DEFAULT_QUANTITY};

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: name.to_string(),
            price: Decimal::new(3500, 0),
            image: format!("/uploads/{id}.png"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn untouched_ids_read_as_unselected_default_quantity() {
        let store = SelectionStore::new();
        let entry = store.selection(&ProductId("never-touched".to_string()));

        assert!(!entry.selected);
        assert_eq!(entry.quantity, DEFAULT_QUANTITY);
    }

    #[test]
    fn selecting_initializes_quantity_to_default() {
        let mut store = SelectionStore::new();
        let id = ProductId("a".to_string());

        store.set_selected(&id, true);

        let entry = store.selection(&id);
        assert!(entry.selected);
        assert_eq!(entry.quantity, DEFAULT_QUANTITY);
    }

    #[test]
    fn set_selected_is_idempotent() {
        let mut store = SelectionStore::new();
        let id = ProductId("a".to_string());

        store.set_selected(&id, true);
        let first = store.selection(&id);
        store.set_selected(&id, true);

        assert_eq!(store.selection(&id), first);
    }

    #[test]
    fn set_quantity_on_fresh_id_leaves_it_unselected() {
        let mut store = SelectionStore::new();
        let id = ProductId("b".to_string());

        store.set_quantity(&id, 2);

        let entry = store.selection(&id);
        assert!(!entry.selected);
        assert_eq!(entry.quantity, 2);
    }

    #[test]
    fn quantity_round_trips_exactly() {
        let mut store = SelectionStore::new();
        let id = ProductId("a".to_string());

        for quantity in [1, 2, 7, 4096] {
            store.set_quantity(&id, quantity);
            assert_eq!(store.selection(&id).quantity, quantity);
        }
    }

    #[test]
    fn repeated_decrements_never_go_below_one() {
        let mut quantity = DEFAULT_QUANTITY;
        for _ in 0..20 {
            quantity = decremented(quantity);
        }
        assert_eq!(quantity, 1);
    }

    #[test]
    fn deselecting_removes_quantity_from_total_but_keeps_it_stored() {
        let products = [product("a", "Fabric A"), product("b", "Fabric B")];
        let mut store = SelectionStore::new();
        let a = products[0].id.clone();

        store.set_selected(&a, true);
        store.set_quantity(&a, 9);
        assert_eq!(store.total_yards(&products), 9);

        store.set_selected(&a, false);
        assert_eq!(store.total_yards(&products), 0);
        assert_eq!(store.selection(&a).quantity, 9);

        store.set_selected(&a, true);
        assert_eq!(store.total_yards(&products), 9);
    }

    #[test]
    fn nothing_selected_yields_empty_items_and_zero_total() {
        let products = [product("a", "Fabric A"), product("b", "Fabric B")];
        let store = SelectionStore::new();

        assert!(store.selected_items(&products).is_empty());
        assert_eq!(store.total_yards(&products), 0);
    }

    #[test]
    fn selected_items_preserve_input_order() {
        let products = [
            product("a", "Fabric A"),
            product("b", "Fabric B"),
            product("c", "Fabric C"),
        ];
        let mut store = SelectionStore::new();

        // Select in reverse order; output must still follow the input list.
        store.set_selected(&products[2].id, true);
        store.set_selected(&products[0].id, true);

        let items = store.selected_items(&products);
        let ids: Vec<&str> = items.iter().map(|item| item.id.0.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn selected_items_ignore_orphaned_entries() {
        let products = [product("a", "Fabric A")];
        let mut store = SelectionStore::new();

        store.set_selected(&products[0].id, true);
        store.set_selected(&ProductId("removed".to_string()), true);

        let items = store.selected_items(&products);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.0, "a");
    }

    #[test]
    fn increment_and_explicit_quantity_combine_in_totals() {
        let products = [product("a", "Fabric A"), product("b", "Fabric B")];
        let mut store = SelectionStore::new();
        let (a, b) = (products[0].id.clone(), products[1].id.clone());

        store.set_selected(&a, true);
        store.set_quantity(&a, store.selection(&a).quantity + 1);
        store.set_selected(&b, true);
        store.set_quantity(&b, 2);

        let items = store.selected_items(&products);
        assert_eq!(items[0].quantity, 5);
        assert_eq!(items[1].quantity, 2);
        assert_eq!(store.total_yards(&products), 7);
    }
}
