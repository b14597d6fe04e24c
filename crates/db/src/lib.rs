pub mod backend;
pub mod catalog;
pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use backend::{open_backend, BackendError, BackendHandles};
pub use catalog::CatalogService;
pub use connection::{connect, connect_from_config, connect_with_settings, DbPool};
pub use fixtures::{default_hero_images, default_products, seed_if_empty, SeedReport};
