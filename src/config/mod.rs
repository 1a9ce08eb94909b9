//! Configuration subsystem: schema, loading, and startup validation.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use validation::{validate_config, ValidationError};
