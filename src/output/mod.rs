//! Output formatting and display system
//!
//! Renders binding reports, failures and type listings as plain text,
//! colored terminal output or JSON.

mod colored;
mod formatter;
mod json;

pub use colored::{ColorScheme, ColoredFormatter, OriginStyle};
pub use formatter::{Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat};
pub use json::JsonFormatter;

use crate::models::Settings;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, json: bool) -> Box<dyn OutputFormatter> {
        Self::with_options(
            FormattingOptions {
                enable_color,
                ..Default::default()
            },
            json,
        )
    }

    /// Create a formatter honoring color and masking settings
    pub fn from_settings(settings: &Settings, json: bool) -> Box<dyn OutputFormatter> {
        Self::with_options(
            FormattingOptions {
                enable_color: settings.enable_color,
                mask_secrets: settings.mask_secrets,
                ..Default::default()
            },
            json,
        )
    }

    fn with_options(options: FormattingOptions, json: bool) -> Box<dyn OutputFormatter> {
        if json {
            Box::new(JsonFormatter::new(options))
        } else if options.enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_formatter() {
        let json = OutputFormatterFactory::create_formatter(true, true);
        assert!(json.format_success("done").unwrap().starts_with('{'));

        let plain = OutputFormatterFactory::create_plain_formatter();
        assert_eq!(plain.format_success("done").unwrap(), "OK: done");

        let mut settings = Settings::default();
        settings.enable_color = false;
        let from_settings = OutputFormatterFactory::from_settings(&settings, false);
        assert_eq!(from_settings.format_error("bad").unwrap(), "ERROR: bad");
    }
}
