//! .env file handling and example generation

use crate::binding::{ConfigSchema, EnvVarNaming, NamingPolicy};
use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Environment file manager
pub struct EnvManager;

impl EnvManager {
    /// Read a .env file into a map without touching the process environment
    ///
    /// The first assignment of a repeated key wins, as when loading into the process.
    pub fn load_env_file(path: &Path) -> Result<BTreeMap<String, String>> {
        File::open(path)
            .map_err(|e| ConfigError::config(format!("Failed to load {}: {}", path.display(), e)))?;
        #[allow(deprecated)]
        let iter = dotenv::from_path_iter(path)
            .map_err(|e| ConfigError::config(format!("Failed to load {}: {}", path.display(), e)))?;

        let mut vars = BTreeMap::new();
        for entry in iter {
            let (key, value) =
                entry.map_err(|e| ConfigError::config(format!("Failed to parse {}: {}", path.display(), e)))?;
            vars.entry(key).or_insert(value);
        }
        Ok(vars)
    }

    /// Example .env content for a schema, one entry per field
    pub fn create_example_env_content(schema: &ConfigSchema, prefix: Option<&str>) -> String {
        let mut content = format!("# {} configuration\n#\n", schema.type_name());
        content.push_str("# Lists and sets are comma-separated; map entries are KEY:VALUE pairs.\n");
        content.push_str("# Variables set in the environment take precedence over this file.\n");

        for field in schema.fields() {
            let env_var = EnvVarNaming.env_var_name(prefix, field);
            content.push('\n');
            content.push_str(&format!("# {} ({})", field.name(), field.descriptor()));
            if field.is_secret() {
                content.push_str(" [secret]");
            }
            content.push('\n');

            match field.default() {
                Some(default) if !field.is_secret() => content.push_str(&format!("# {}={}\n", env_var, default)),
                _ => content.push_str(&format!("{}=\n", env_var)),
            }
        }

        content
    }
}
