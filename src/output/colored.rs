//! Colored formatter implementation with terminal color support

use super::formatter::{
    align_text, failure_reason, failure_value, Alignment, FormattingOptions, OutputFormatter, PlainFormatter,
};
use crate::{
    binding::{BoundConfig, ValueOrigin},
    config::ValidationWarning,
    error::{ConfigError, Result},
};
use colored::*;
use std::fmt::Write as _;

/// Color coding for where a field's value came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OriginStyle {
    Source,
    Default,
    Absent,
}

impl OriginStyle {
    pub fn from_origin(origin: ValueOrigin) -> Self {
        match origin {
            ValueOrigin::Source => Self::Source,
            ValueOrigin::Default => Self::Default,
            ValueOrigin::Absent => Self::Absent,
        }
    }

    /// Get color for this origin
    pub fn color(&self) -> Color {
        match self {
            Self::Source => Color::Green,
            Self::Default => Color::Cyan,
            Self::Absent => Color::BrightBlack,
        }
    }

    /// Marker shown before the field name
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Source => "●",
            Self::Default => "○",
            Self::Absent => "·",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub secret: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            secret: Color::Magenta,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

const FIELD_WIDTH: usize = 24;
const VAR_WIDTH: usize = 32;
const ORIGIN_WIDTH: usize = 8;

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn rule(&self, width: usize) -> ColoredString {
        self.colorize(&"─".repeat(width), self.color_scheme.border)
    }

    fn pad(&self, text: &str, width: usize) -> String {
        align_text(text, width, &Alignment::Left)
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let title = if self.options.enable_color {
            title.bold().color(self.color_scheme.header).to_string()
        } else {
            title.to_string()
        };
        Ok(format!("▶ {}", title))
    }

    fn format_report(&self, config: &BoundConfig) -> Result<String> {
        let width = FIELD_WIDTH + VAR_WIDTH + ORIGIN_WIDTH + self.options.max_value_width + 8;
        let mut output = String::new();
        let err = |e: std::fmt::Error| ConfigError::io(format!("Failed to format report: {}", e));

        writeln!(output, "{}", self.format_header(&format!("{} ({} fields)", config.type_name(), config.len()))?)
            .map_err(err)?;
        if let Some(prefix) = config.prefix() {
            writeln!(output, "  prefix: {}", self.colorize(prefix, self.color_scheme.info)).map_err(err)?;
        }
        writeln!(output, "{}", self.rule(width)).map_err(err)?;

        let header = format!(
            "  {} {} {} {}",
            self.pad("Field", FIELD_WIDTH),
            self.pad("Variable", VAR_WIDTH),
            self.pad("Origin", ORIGIN_WIDTH),
            "Value"
        );
        writeln!(output, "{}", self.bold(&header)).map_err(err)?;
        writeln!(output, "{}", self.rule(width)).map_err(err)?;

        for field in config.fields() {
            let style = OriginStyle::from_origin(field.origin);
            let value = self.options.display_value(field);
            let value = align_text(&value, self.options.max_value_width, &Alignment::Left);
            let value = if field.secret && self.options.mask_secrets {
                self.colorize(value.trim_end(), self.color_scheme.secret)
            } else {
                self.colorize(value.trim_end(), style.color())
            };

            writeln!(
                output,
                "{} {} {} {} {}",
                self.colorize(style.symbol(), style.color()),
                self.bold(&self.pad(&field.name, FIELD_WIDTH)),
                self.pad(&field.env_var, VAR_WIDTH),
                self.colorize(&self.pad(field.origin.as_str(), ORIGIN_WIDTH), style.color()),
                value
            )
            .map_err(err)?;
        }

        write!(output, "{}", self.rule(width)).map_err(err)?;
        Ok(output)
    }

    fn format_failures(&self, error: &ConfigError) -> Result<String> {
        let ConfigError::Binding { config, failures } = error else {
            return self.format_error(&error.to_string());
        };

        let err = |e: std::fmt::Error| ConfigError::io(format!("Failed to format failures: {}", e));
        let mut output = String::new();
        writeln!(
            output,
            "{} {}",
            self.colorize("✗", self.color_scheme.error),
            self.bold(&format!("Failed to bind {}: {} field(s) invalid", config, failures.len()))
        )
        .map_err(err)?;

        for failure in failures {
            writeln!(
                output,
                "  {} {} = {}",
                self.colorize(&self.pad(&failure.field, FIELD_WIDTH), self.color_scheme.error),
                failure.env_var,
                self.colorize(failure_value(failure), self.color_scheme.muted)
            )
            .map_err(err)?;
            writeln!(output, "      {}", failure_reason(failure)).map_err(err)?;
        }

        Ok(output.trim_end().to_string())
    }

    fn format_warnings(&self, warnings: &[ValidationWarning]) -> Result<String> {
        Ok(warnings
            .iter()
            .map(|w| w.format(self.options.enable_color))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn format_type_list(&self, types: &[&str]) -> Result<String> {
        if !self.options.enable_color {
            return self.plain_formatter.format_type_list(types);
        }

        let mut output = format!("{}\n", self.format_header(&format!("Registered types ({})", types.len()))?);
        for name in types {
            writeln!(output, "  {}", name.color(self.color_scheme.info))
                .map_err(|e| ConfigError::io(format!("Failed to format type list: {}", e)))?;
        }
        Ok(output.trim_end().to_string())
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✗", self.color_scheme.error), self.colorize(error, self.color_scheme.error)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✓", self.color_scheme.success), message))
    }
}
