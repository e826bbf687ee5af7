//! Settings management, schema validation and .env handling

pub mod parser;
pub mod validation;
pub mod env;

// Re-export main functionality
pub use parser::{SettingsParser, load_settings, display_settings_summary};
pub use validation::{SchemaValidator, ValidationLevel, ValidationWarning, validate_schema};
pub use env::EnvManager;

// Re-export from models for convenience
pub use crate::models::Settings;

// Additional comprehensive tests in separate module
#[cfg(test)]
mod comprehensive_tests;
