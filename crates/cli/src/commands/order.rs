use serde_json::json;

use crate::commands::CommandResult;
use yardage_core::config::{AppConfig, LoadOptions};
use yardage_core::domain::order::OrderSummary;
use yardage_core::domain::product::ProductId;
use yardage_core::domain::selection::{SelectionStore, DEFAULT_QUANTITY};
use yardage_core::message_handoff;
use yardage_db::open_backend;
use yardage_db::repositories::ProductStore;

/// Builds the order preview for `--select id[:yards]` flags: loads the
/// catalog from the configured backend, replays the selection through
/// the session store, and renders the messaging handoff.
pub fn run(selections: &[String], address: Option<&str>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "order",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let parsed = match parse_selections(selections) {
        Ok(parsed) => parsed,
        Err(message) => return CommandResult::failure("order", "selection_parse", message, 2),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "order",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let handles = open_backend(&config)
            .await
            .map_err(|error| ("backend", error.to_string(), 4u8))?;

        let products = handles
            .products
            .list_all()
            .await
            .map_err(|error| ("catalog_load", error.to_string(), 5u8))?;

        if let Some(pool) = handles.db_pool {
            pool.close().await;
        }
        Ok::<_, (&'static str, String, u8)>(products)
    });

    let products = match result {
        Ok(products) => products,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("order", error_class, message, exit_code);
        }
    };

    let mut store = SelectionStore::new();
    for (id, yards) in &parsed {
        if !products.iter().any(|product| &product.id == id) {
            return CommandResult::failure(
                "order",
                "unknown_product",
                format!("product `{}` is not in the catalog", id.0),
                6,
            );
        }
        store.set_selected(id, true);
        store.set_quantity(id, (*yards).max(1));
    }

    let summary = OrderSummary::compute(&products, &store, config.checkout.price_per_yard);

    match message_handoff(&summary, address, &config.checkout.messaging) {
        Ok(handoff) => CommandResult::success_with_details(
            "order",
            format!(
                "order preview for {} {}",
                summary.total_yards,
                if summary.total_yards == 1 { "yard" } else { "yards" }
            ),
            Some(json!({
                "message": handoff.message,
                "url": handoff.url,
                "total_yards": summary.total_yards,
                "total_amount": summary.total_amount.to_string(),
            })),
        ),
        Err(error) => CommandResult::failure("order", "handoff", error.to_string(), 7),
    }
}

/// `id` or `id:yards`. Yards must parse as a positive integer; the
/// default matches the store's first-touch quantity.
fn parse_selections(selections: &[String]) -> Result<Vec<(ProductId, u32)>, String> {
    if selections.is_empty() {
        return Err("at least one --select is required".to_string());
    }

    selections
        .iter()
        .map(|raw| match raw.split_once(':') {
            None => Ok((ProductId(raw.trim().to_string()), DEFAULT_QUANTITY)),
            Some((id, yards)) => {
                let yards = yards.trim().parse::<u32>().map_err(|_| {
                    format!("invalid yard count `{yards}` in `--select {raw}`")
                })?;
                if yards == 0 {
                    return Err(format!("yard count must be at least 1 in `--select {raw}`"));
                }
                Ok((ProductId(id.trim().to_string()), yards))
            }
        })
        .collect()
}
