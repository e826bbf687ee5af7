//! Core formatting traits and the plain text implementation
//!
//! Reports render a bound configuration as a table of field, variable,
//! origin and value. Secret values are masked unless masking is disabled.

use crate::{
    binding::{BoundConfig, BoundField},
    config::ValidationWarning,
    error::{ConfigError, FieldFailure, Result},
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format every bound field of a successful binding pass
    fn format_report(&self, config: &BoundConfig) -> Result<String>;

    /// Format a failed binding pass, one row per failing field
    fn format_failures(&self, error: &ConfigError) -> Result<String>;

    /// Format schema validation warnings
    fn format_warnings(&self, warnings: &[ValidationWarning]) -> Result<String>;

    /// Format the list of registered type names
    fn format_type_list(&self, types: &[&str]) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Replace secret values with a mask
    pub mask_secrets: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum width of the value column
    pub max_value_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            mask_secrets: crate::defaults::DEFAULT_MASK_SECRETS,
            table_borders: true,
            max_value_width: 60,
        }
    }
}

impl FormattingOptions {
    /// Value of a bound field as it should be shown
    pub fn display_value(&self, field: &BoundField) -> String {
        if field.secret && self.mask_secrets {
            crate::defaults::SECRET_MASK.to_string()
        } else {
            field.value.to_string()
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Maximum width
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment: Alignment::Left,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Shown in place of a value for a variable that was not set
pub(crate) const UNSET: &str = "(unset)";

/// Raw value of a failing field as it should be shown
pub(crate) fn failure_value(failure: &FieldFailure) -> &str {
    failure.raw.as_deref().unwrap_or(UNSET)
}

/// Cause of a field failure without the surrounding target text
pub(crate) fn failure_reason(failure: &FieldFailure) -> String {
    match &failure.error {
        ConfigError::MalformedValue { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_borders {
            output.push_str(&create_horizontal_border(&column_widths));
            output.push('\n');
        }

        let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
        output.push_str(&create_row(&headers, &column_widths, format));
        output.push('\n');

        if format.show_borders {
            output.push_str(&create_horizontal_border(&column_widths));
            output.push('\n');
        }

        for row in rows {
            output.push_str(&create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&create_horizontal_border(&column_widths));
        }

        output
    }

    fn report_format(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("Field", 32),
                Column::new("Variable", 40),
                Column::new("Origin", 8),
                Column::new("Value", self.options.max_value_width),
            ],
            show_borders: self.options.table_borders,
        }
    }

    fn failure_format(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("Field", 32),
                Column::new("Variable", 40),
                Column::new("Value", self.options.max_value_width),
                Column::new("Error", 80),
            ],
            show_borders: self.options.table_borders,
        }
    }
}

/// Calculate column widths from headers and content
fn calculate_column_widths(format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
    format
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let content = rows
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            content.max(column.header.len()).min(column.max_width)
        })
        .collect()
}

/// Create a table row
fn create_row(data: &[String], widths: &[usize], format: &TableFormat) -> String {
    let mut row = String::new();

    if format.show_borders {
        row.push('|');
    }

    for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
        let alignment = format.columns.get(idx).map_or(&Alignment::Left, |c| &c.alignment);

        if format.show_borders {
            row.push(' ');
        }
        row.push_str(&align_text(cell, width, alignment));
        if format.show_borders {
            row.push_str(" |");
        } else {
            row.push_str("  ");
        }
    }

    row.trim_end().to_string()
}

/// Create horizontal border for table
fn create_horizontal_border(widths: &[usize]) -> String {
    let mut border = String::from("+");
    for &width in widths {
        border.push_str(&"-".repeat(width + 2));
        border.push('+');
    }
    border
}

/// Align text within specified width, truncating with an ellipsis
pub(crate) fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = text.chars().count();
    if len > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        return format!("{}...", kept);
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(title.len() + 4);
        Ok(format!("{}\n  {}\n{}", border, title, border))
    }

    fn format_report(&self, config: &BoundConfig) -> Result<String> {
        let mut output = self.format_header(&format!("{} ({} fields)", config.type_name(), config.len()))?;
        output.push_str("\n\n");

        if config.is_empty() {
            output.push_str("No fields declared.");
            return Ok(output);
        }

        let rows: Vec<RowData> = config
            .fields()
            .iter()
            .map(|field| {
                vec![
                    field.name.clone(),
                    field.env_var.clone(),
                    field.origin.to_string(),
                    self.options.display_value(field),
                ]
            })
            .collect();
        output.push_str(&self.create_table(&self.report_format(), &rows));
        Ok(output)
    }

    fn format_failures(&self, error: &ConfigError) -> Result<String> {
        let ConfigError::Binding { config, failures } = error else {
            return self.format_error(&error.to_string());
        };

        let mut output = String::new();
        writeln!(output, "Failed to bind {}: {} field(s) invalid", config, failures.len())
            .map_err(|e| ConfigError::io(format!("Failed to format failures: {}", e)))?;
        writeln!(output).map_err(|e| ConfigError::io(format!("Failed to format failures: {}", e)))?;

        let rows: Vec<RowData> = failures
            .iter()
            .map(|failure| {
                vec![
                    failure.field.clone(),
                    failure.env_var.clone(),
                    failure_value(failure).to_string(),
                    failure_reason(failure),
                ]
            })
            .collect();
        output.push_str(&self.create_table(&self.failure_format(), &rows));
        Ok(output)
    }

    fn format_warnings(&self, warnings: &[ValidationWarning]) -> Result<String> {
        Ok(warnings
            .iter()
            .map(|w| w.format(false))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn format_type_list(&self, types: &[&str]) -> Result<String> {
        let mut output = format!("Registered types ({}):\n", types.len());
        for name in types {
            writeln!(output, "  {}", name)
                .map_err(|e| ConfigError::io(format!("Failed to format type list: {}", e)))?;
        }
        Ok(output.trim_end().to_string())
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("OK: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Binder, ConfigSchema, FieldSpec};
    use crate::types::TypeDescriptor;
    use std::collections::HashMap;

    fn plain() -> PlainFormatter {
        PlainFormatter::new(FormattingOptions {
            enable_color: false,
            ..Default::default()
        })
    }

    fn schema() -> ConfigSchema {
        ConfigSchema::new("AppConfig")
            .field(FieldSpec::new("port", TypeDescriptor::simple("u16")).default_value("8080"))
            .field(FieldSpec::new("token", TypeDescriptor::simple("string")).secret(true))
            .field(FieldSpec::new("label", TypeDescriptor::optional(TypeDescriptor::simple("string"))))
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_report_table() {
        let bound = Binder::new(schema()).bind(&env(&[("TOKEN", "hunter2")])).unwrap();
        let output = plain().format_report(&bound).unwrap();

        assert!(output.contains("AppConfig (3 fields)"));
        assert!(output.contains("| Field"));
        assert!(output.contains("| port"));
        assert!(output.contains("default"));
        assert!(output.contains("8080"));
        assert!(output.contains(crate::defaults::SECRET_MASK));
        assert!(!output.contains("hunter2"));
    }

    #[test]
    fn test_unmasked_report() {
        let bound = Binder::new(schema()).bind(&env(&[("TOKEN", "hunter2")])).unwrap();
        let formatter = PlainFormatter::new(FormattingOptions {
            enable_color: false,
            mask_secrets: false,
            ..Default::default()
        });
        assert!(formatter.format_report(&bound).unwrap().contains("hunter2"));
    }

    #[test]
    fn test_failure_table() {
        let error = Binder::new(schema()).bind(&env(&[("PORT", "http")])).unwrap_err();
        let output = plain().format_failures(&error).unwrap();

        assert!(output.starts_with("Failed to bind AppConfig: 2 field(s) invalid"));
        assert!(output.contains("http"));
        assert!(output.contains(UNSET));
    }

    #[test]
    fn test_non_binding_error_falls_back() {
        let output = plain().format_failures(&ConfigError::config("broken")).unwrap();
        assert_eq!(output, "ERROR: Configuration error: broken");
    }

    #[test]
    fn test_align_text() {
        assert_eq!(align_text("ab", 4, &Alignment::Left), "ab  ");
        assert_eq!(align_text("ab", 4, &Alignment::Right), "  ab");
        assert_eq!(align_text("abcdefgh", 6, &Alignment::Left), "abc...");
        assert_eq!(align_text("élan", 4, &Alignment::Left), "élan");
    }

    #[test]
    fn test_type_list() {
        let output = plain().format_type_list(&["bool", "i32"]).unwrap();
        assert_eq!(output, "Registered types (2):\n  bool\n  i32");
    }
}
