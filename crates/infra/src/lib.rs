//! Infrastructure layer: MySQL, configuration, seeding.

pub mod config;
pub mod filters;
pub mod schema;
pub mod seed;
pub mod store;

pub use config::{AppConfig, DatabaseConfig, StoreKind, load_dotenv};
pub use seed::{SeedDataset, SeedReport, SAMPLE_DATA};
pub use store::{ClimatePage, ClimateStore, InMemoryClimateStore, MySqlClimateStore, StoreError};
