//! Settings parsing from CLI arguments and environment variables

use crate::{
    binding::ConfigSource,
    cli::Cli,
    error::Result,
    logging::LogLevel,
    models::Settings,
};
use std::str::FromStr;

/// Settings parser that layers CLI arguments over environment variables
pub struct SettingsParser {
    cli: Cli,
}

impl SettingsParser {
    /// Create a new settings parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build settings from the process environment and the CLI
    pub fn parse(&self) -> Result<Settings> {
        let mut settings = Settings::default();
        settings.merge_from_env()?;
        self.finish(settings)
    }

    /// Build settings from `source` instead of the process environment
    pub fn parse_from_source<S: ConfigSource + ?Sized>(&self, source: &S) -> Result<Settings> {
        let mut settings = Settings::default();
        settings.merge_from_source(source)?;
        self.finish(settings)
    }

    fn finish(&self, mut settings: Settings) -> Result<Settings> {
        self.apply_cli_overrides(&mut settings)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&self, settings: &mut Settings) -> Result<()> {
        if let Some(level) = &self.cli.log_level {
            settings.log_level = LogLevel::from_str(level)?;
        }

        if self.cli.no_color {
            settings.enable_color = false;
        } else if self.cli.color {
            settings.enable_color = true;
        }

        if let Some(prefix) = &self.cli.prefix {
            settings.prefix = Some(prefix.clone());
        }

        if let Some(path) = &self.cli.env_file {
            settings.env_file = Some(path.clone());
        }

        settings.debug = self.cli.debug;
        if settings.debug {
            settings.log_level = settings.log_level.min(LogLevel::Debug);
            println!("Applied CLI overrides to settings");
            println!("{}", display_settings_summary(settings));
        }

        Ok(())
    }
}

/// Convenience function to load settings from CLI arguments
pub fn load_settings(cli: Cli) -> Result<Settings> {
    SettingsParser::new(cli).parse()
}

/// Display settings summary for debug purposes
pub fn display_settings_summary(settings: &Settings) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Log Level: {}", settings.log_level.as_str()));
    summary.push(format!("Log Format: {:?}", settings.log_format));
    summary.push(format!("Color Output: {}", settings.enable_color));
    summary.push(format!("Mask Secrets: {}", settings.mask_secrets));
    summary.push(format!("Prefix: {}", settings.prefix.as_deref().unwrap_or("(none)")));
    summary.push(format!(
        "Env File: {}",
        settings
            .env_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    ));
    summary.push(format!("Debug: {}", settings.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use clap::Parser;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_settings_parser_defaults() {
        let cli = Cli::parse_from(["envcheck", "-f", "a=i32"]);
        let settings = SettingsParser::new(cli).parse_from_source(&source(&[])).unwrap();

        assert_eq!(settings.log_level, crate::defaults::DEFAULT_LOG_LEVEL);
        assert_eq!(settings.enable_color, crate::defaults::DEFAULT_ENABLE_COLOR);
        assert_eq!(settings.prefix, None);
        assert!(!settings.debug);
    }

    #[test]
    fn test_cli_overrides_env_vars() {
        let env = source(&[
            ("ENVCONFIG_LOG_LEVEL", "error"),
            ("ENVCONFIG_PREFIX", "FROM_ENV"),
            ("ENVCONFIG_LOG_FORMAT", "compact"),
        ]);
        let cli = Cli::parse_from([
            "envcheck", "-f", "a=i32", "--log-level", "info", "--prefix", "FROM_CLI", "--no-color",
        ]);
        let settings = SettingsParser::new(cli).parse_from_source(&env).unwrap();

        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.prefix.as_deref(), Some("FROM_CLI"));
        assert_eq!(settings.log_format, LogFormat::Compact);
        assert!(!settings.enable_color);
    }

    #[test]
    fn test_env_file_and_color_overrides() {
        let env = source(&[("ENVCONFIG_COLOR", "false")]);
        let cli = Cli::parse_from(["envcheck", "-f", "a=i32", "--color", "--env-file", "app.env"]);
        let settings = SettingsParser::new(cli).parse_from_source(&env).unwrap();

        assert!(settings.enable_color);
        assert_eq!(settings.env_file, Some(PathBuf::from("app.env")));
    }

    #[test]
    fn test_invalid_overrides_fail_validation() {
        let cli = Cli::parse_from(["envcheck", "-f", "a=i32", "--log-level", "chatty"]);
        assert!(SettingsParser::new(cli).parse_from_source(&source(&[])).is_err());

        let cli = Cli::parse_from(["envcheck", "-f", "a=i32", "--prefix", "MY-APP"]);
        assert!(SettingsParser::new(cli).parse_from_source(&source(&[])).is_err());
    }

    #[test]
    fn test_settings_summary() {
        let mut settings = Settings::default();
        settings.prefix = Some("MYAPP".to_string());
        let summary = display_settings_summary(&settings);

        assert!(summary.contains("Log Level:"));
        assert!(summary.contains("Prefix: MYAPP"));
        assert!(summary.contains("Env File: (none)"));
    }
}
