//! Main application orchestration and execution

use crate::{
    binding::{Binder, ConfigSource, EnvSource},
    cli::Cli,
    config::{display_settings_summary, load_settings, validate_schema, EnvManager},
    error::{ConfigError, Result},
    models::Settings,
    output::{OutputFormatter, OutputFormatterFactory},
    registry::ParserRegistry,
};

/// Rendered outcome of one `envcheck` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Text to show the user
    pub output: String,
    /// Process exit code; 0 when every field bound
    pub exit_code: i32,
}

impl Report {
    fn success(output: String) -> Self {
        Self { output, exit_code: 0 }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
    settings: Settings,
}

impl App {
    /// Create a new application instance, loading settings from the environment
    pub fn new(cli: Cli) -> Result<Self> {
        let settings = load_settings(cli.clone())?;
        Ok(Self::with_settings(cli, settings))
    }

    /// Create an application instance with already resolved settings
    pub fn with_settings(cli: Cli, settings: Settings) -> Self {
        Self { cli, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn formatter(&self) -> Box<dyn OutputFormatter> {
        OutputFormatterFactory::from_settings(&self.settings, self.cli.json_output())
    }

    /// Snapshot of the process environment with the configured .env overlay
    pub fn environment(&self) -> Result<EnvSource> {
        let source = EnvSource::capture();
        match &self.settings.env_file {
            Some(path) => source.with_env_file(path),
            None => Ok(source),
        }
    }

    /// Run against the process environment
    pub fn run(&self) -> Result<Report> {
        if self.settings.debug {
            let commit = crate::GIT_COMMIT.map(|c| format!(", commit {}", c)).unwrap_or_default();
            println!("{} v{} (built {}{})", crate::PKG_NAME, crate::VERSION, crate::BUILD_TIME, commit);
            println!("{}", display_settings_summary(&self.settings));
            println!();
        }

        if self.cli.list_types {
            return self.run_with_source(&EnvSource::default());
        }
        let source = self.environment()?;
        self.run_with_source(&source)
    }

    /// Run against an explicit source
    pub fn run_with_source<S: ConfigSource + ?Sized>(&self, source: &S) -> Result<Report> {
        let formatter = self.formatter();

        if self.cli.list_types {
            let registry = ParserRegistry::new();
            return Ok(Report::success(formatter.format_type_list(&registry.registered_types())?));
        }

        let schema = self.cli.schema();
        let warnings = validate_schema(&schema)?;

        if self.cli.example_env {
            return Ok(Report::success(EnvManager::create_example_env_content(
                &schema,
                self.settings.prefix.as_deref(),
            )));
        }

        let binder = Binder::new(schema).settings(&self.settings);
        match binder.bind(source) {
            Ok(bound) => {
                let mut output = String::new();
                if !warnings.is_empty() && !self.cli.json_output() {
                    output.push_str(&formatter.format_warnings(&warnings)?);
                    output.push_str("\n\n");
                }
                output.push_str(&formatter.format_report(&bound)?);
                Ok(Report::success(output))
            }
            Err(error @ ConfigError::Binding { .. }) => Ok(Report {
                output: formatter.format_failures(&error)?,
                exit_code: error.exit_code(),
            }),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use clap::Parser;
    use std::collections::HashMap;

    fn app(args: &[&str]) -> App {
        let mut argv = vec!["envcheck"];
        argv.extend_from_slice(args);
        let settings = Settings {
            enable_color: false,
            log_level: LogLevel::Fatal,
            ..Settings::default()
        };
        App::with_settings(Cli::parse_from(argv), settings)
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_successful_report() {
        let report = app(&["-f", "port=u16=8080", "-f", "hosts=list<string>"])
            .run_with_source(&env(&[("HOSTS", "a,b")]))
            .unwrap();

        assert!(report.is_success());
        assert!(report.output.contains("Environment (2 fields)"));
        assert!(report.output.contains("8080"));
        assert!(report.output.contains("a,b"));
    }

    #[test]
    fn test_failures_become_a_report() {
        let report = app(&["-f", "port=u16", "-f", "debug=bool"])
            .run_with_source(&env(&[("PORT", "99999"), ("DEBUG", "yes")]))
            .unwrap();

        assert_eq!(report.exit_code, 1);
        assert!(report.output.contains("2 field(s) invalid"));
        assert!(report.output.contains("99999"));
    }

    #[test]
    fn test_declaration_errors_also_reported_per_field() {
        let report = app(&["-f", "amount=Money"]).run_with_source(&env(&[("AMOUNT", "1")])).unwrap();
        assert_eq!(report.exit_code, 1);
        assert!(report.output.contains("No parser registered for: Money"));
    }

    #[test]
    fn test_list_types() {
        let report = app(&["--list-types"]).run_with_source(&env(&[])).unwrap();
        assert!(report.output.contains("local_date_time"));
        assert!(report.output.contains("integer"));
    }

    #[test]
    fn test_example_env_uses_prefix() {
        let mut app = app(&["-f", "maxConn=i32=10", "--example-env"]);
        app.settings.prefix = Some("SVC".to_string());
        let report = app.run_with_source(&env(&[])).unwrap();
        assert!(report.output.contains("# SVC_MAX_CONN=10"));
    }

    #[test]
    fn test_json_report() {
        let report = app(&["-f", "token=string", "--secret", "token", "--format", "json"])
            .run_with_source(&env(&[("TOKEN", "abc")]))
            .unwrap();
        let document: serde_json::Value = serde_json::from_str(&report.output).unwrap();
        assert_eq!(document["fields"][0]["value"], crate::defaults::SECRET_MASK);
    }

    #[test]
    fn test_warnings_precede_text_report() {
        let report = app(&["-f", "label=option<string>=x"])
            .run_with_source(&env(&[]))
            .unwrap();
        assert!(report.output.starts_with("[INFO]"));
    }
}
