use chrono::Utc;
use serde_json::json;

use crate::commands::CommandResult;
use yardage_core::config::{AppConfig, LoadOptions};
use yardage_db::{open_backend, seed_if_empty};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "seed",
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

        let report =
            seed_if_empty(handles.products.as_ref(), handles.hero_images.as_ref(), Utc::now())
                .await
                .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        if let Some(pool) = handles.db_pool {
            pool.close().await;
        }
        Ok::<_, (&'static str, String, u8)>(report)
    });

    match result {
        Ok(report) => CommandResult::success_with_details(
            "seed",
            "starter catalog loaded into empty collections",
            Some(json!({
                "products_inserted": report.products_inserted,
                "hero_images_inserted": report.hero_images_inserted,
            })),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}
