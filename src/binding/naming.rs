//! Deriving source keys from field names

use super::schema::FieldSpec;
use crate::defaults::NAME_SEPARATOR;
use once_cell::sync::Lazy;
use regex::Regex;

static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid word boundary regex"));

/// Maps a declared field to the key it is read from
pub trait NamingPolicy: Send + Sync {
    fn env_var_name(&self, prefix: Option<&str>, field: &FieldSpec) -> String;
}

/// `dbPoolSize` with prefix `myapp` becomes `MYAPP_DB_POOL_SIZE`
///
/// An explicit variable name on the field is used verbatim and ignores the prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvVarNaming;

impl NamingPolicy for EnvVarNaming {
    fn env_var_name(&self, prefix: Option<&str>, field: &FieldSpec) -> String {
        if let Some(explicit) = field.explicit_env_var() {
            return explicit.to_string();
        }

        let name = if field.splits_words() {
            let replacement = format!("${{1}}{}${{2}}", NAME_SEPARATOR);
            WORD_BOUNDARY.replace_all(field.name(), replacement.as_str()).into_owned()
        } else {
            field.name().to_string()
        };

        match prefix.filter(|p| !p.is_empty()) {
            Some(prefix) => format!("{}{}{}", prefix, NAME_SEPARATOR, name).to_uppercase(),
            None => name.to_uppercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptor;

    fn field(name: &str) -> FieldSpec {
        FieldSpec::new(name, TypeDescriptor::simple("string"))
    }

    #[test]
    fn test_camel_case_is_split() {
        assert_eq!(EnvVarNaming.env_var_name(None, &field("dbPoolSize")), "DB_POOL_SIZE");
        assert_eq!(EnvVarNaming.env_var_name(Some("myapp"), &field("dbJdbcUrl")), "MYAPP_DB_JDBC_URL");
        assert_eq!(EnvVarNaming.env_var_name(None, &field("port")), "PORT");
    }

    #[test]
    fn test_acronyms_stay_together() {
        assert_eq!(EnvVarNaming.env_var_name(None, &field("serverURL")), "SERVER_URL");
        assert_eq!(EnvVarNaming.env_var_name(None, &field("HTTPPort")), "HTTPPORT");
    }

    #[test]
    fn test_split_words_disabled() {
        let spec = field("dbPoolSize").split_words(false);
        assert_eq!(EnvVarNaming.env_var_name(Some("app"), &spec), "APP_DBPOOLSIZE");
    }

    #[test]
    fn test_explicit_name_wins() {
        let spec = field("home").env_var("HOME");
        assert_eq!(EnvVarNaming.env_var_name(Some("myapp"), &spec), "HOME");
    }

    #[test]
    fn test_empty_prefix_is_ignored() {
        assert_eq!(EnvVarNaming.env_var_name(Some(""), &field("logLevel")), "LOG_LEVEL");
    }
}
