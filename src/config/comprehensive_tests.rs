//! Additional comprehensive tests across validation, binding and .env handling

use super::{EnvManager, SchemaValidator, ValidationLevel};
use crate::{
    binding::{Binder, ConfigSchema, EnvSource, FieldSpec},
    convert::{Converter, TypeConverter},
    error::{ConfigError, ValueErrorKind},
    models::Value,
    registry::{ParserRegistration, ParserRegistry},
    types::TypeDescriptor,
};
use std::collections::{BTreeSet, HashMap};

fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn descriptor(text: &str) -> TypeDescriptor {
    text.parse().unwrap()
}

/// Edge cases where validation and binding meet
mod schema_edge_cases {
    use super::*;

    #[test]
    fn test_generic_array_fails_only_its_field() {
        let schema = ConfigSchema::new("Mixed")
            .field(FieldSpec::new("items", descriptor("[list<i32>]")))
            .field(FieldSpec::new("count", descriptor("i32")));

        let error = Binder::new(schema).bind(&source(&[("ITEMS", "1"), ("COUNT", "2")])).unwrap_err();
        let ConfigError::Binding { failures, .. } = error else {
            panic!("expected a binding error");
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "items");
        assert!(matches!(failures[0].error, ConfigError::UnsupportedDescriptor(_)));
    }

    #[test]
    fn test_enum_without_constants_is_rejected_before_conversion() {
        let field = FieldSpec::new("mode", TypeDescriptor::enumeration("Mode", Vec::<String>::new()));
        assert!(SchemaValidator::check_field(&field).is_err());
    }

    #[test]
    fn test_warnings_do_not_block_binding() {
        let schema = ConfigSchema::new("Warned")
            .field(FieldSpec::new("port", descriptor("option<u16>")).default_value("80"))
            .field(FieldSpec::new("home", descriptor("string")).env_var("home_dir"));

        let warnings = SchemaValidator::validate_schema(&schema).unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.level == ValidationLevel::Info));
        assert!(warnings.iter().any(|w| w.level == ValidationLevel::Warning));

        let bound = Binder::new(schema).bind(&source(&[("home_dir", "/root")])).unwrap();
        assert_eq!(bound.get::<Option<u16>>("port").unwrap(), Some(80));
        assert_eq!(bound.get::<String>("home").unwrap(), "/root");
    }

    #[test]
    fn test_explicit_name_ignores_prefix() {
        let schema = ConfigSchema::new("Named")
            .field(FieldSpec::new("home", descriptor("string")).env_var("HOME_DIR"))
            .field(FieldSpec::new("userName", descriptor("string")));

        let bound = Binder::new(schema)
            .prefix("app")
            .bind(&source(&[("HOME_DIR", "/srv"), ("APP_USER_NAME", "ops")]))
            .unwrap();
        assert_eq!(bound.env_var("home").unwrap(), "HOME_DIR");
        assert_eq!(bound.env_var("userName").unwrap(), "APP_USER_NAME");
    }

    #[test]
    fn test_unsplit_field_name() {
        let schema = ConfigSchema::new("Flat")
            .field(FieldSpec::new("maxConn", descriptor("i32")).split_words(false));
        let bound = Binder::new(schema).bind(&source(&[("MAXCONN", "4")])).unwrap();
        assert_eq!(bound.get::<i32>("maxConn").unwrap(), 4);
    }
}

/// Registry behavior observed through conversion
mod registry_edge_cases {
    use super::*;

    #[test]
    fn test_alias_registration_overrides_both_names() {
        let mut registry = ParserRegistry::new();
        registry
            .register_fn(TypeDescriptor::simple("integer"), |_, _, _| Ok(Value::I32(42)))
            .unwrap();

        let converter = TypeConverter::new(&registry);
        assert_eq!(converter.convert(&descriptor("i32"), "1").unwrap(), Value::I32(42));
        assert_eq!(converter.convert(&descriptor("integer"), "1").unwrap(), Value::I32(42));
        assert_eq!(converter.convert(&descriptor("list<i32>"), "1,2").unwrap().to_string(), "42,42");
    }

    #[test]
    fn test_exact_container_entry_wins() {
        let schema = ConfigSchema::new("Exact")
            .custom_parser(ParserRegistration::with_descriptor(
                descriptor("list<i32>"),
                |raw: &str, _: &dyn Converter, _: &[TypeDescriptor]| Ok(Value::from(raw.len() as i64)),
            ))
            .field(FieldSpec::new("counts", descriptor("list<i32>")))
            .field(FieldSpec::new("other", descriptor("list<i64>")));

        let bound = Binder::new(schema)
            .bind(&source(&[("COUNTS", "1,2,3"), ("OTHER", "1,2,3")]))
            .unwrap();
        assert_eq!(bound.value("counts").unwrap(), &Value::I64(5));
        assert_eq!(bound.get::<Vec<i64>>("other").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_custom_parsers_stay_local_to_their_schema() {
        let schema = ConfigSchema::new("Local")
            .custom_parser(ParserRegistration::with_descriptor(
                TypeDescriptor::simple("string"),
                |raw: &str, _: &dyn Converter, _: &[TypeDescriptor]| Ok(Value::from(raw.to_uppercase())),
            ))
            .field(FieldSpec::new("name", descriptor("string")));
        let bound = Binder::new(schema).bind(&source(&[("NAME", "svc")])).unwrap();
        assert_eq!(bound.get::<String>("name").unwrap(), "SVC");

        let registry = ParserRegistry::new();
        let plain = TypeConverter::new(&registry).convert(&descriptor("string"), "svc").unwrap();
        assert_eq!(plain, Value::from("svc"));
    }

    #[test]
    fn test_container_failure_keeps_inner_kind() {
        let registry = ParserRegistry::new();
        let error = TypeConverter::new(&registry)
            .convert(&descriptor("map<string,bool>"), "a:true,b:maybe")
            .unwrap_err();
        assert_eq!(error.value_kind(), Some(ValueErrorKind::InvalidBoolean));
        assert!(error.to_string().contains("maybe"));
    }
}

/// .env files feeding a binding pass
mod env_file_cases {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_file_values_bind_and_process_values_win() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "APP_PORT=9000").unwrap();
        writeln!(file, "APP_HOSTS=a,b").unwrap();

        let env = EnvSource::from_pairs([("APP_PORT", "7000")])
            .with_env_file(file.path())
            .unwrap();
        let schema = ConfigSchema::new("App")
            .field(FieldSpec::new("port", descriptor("u16")))
            .field(FieldSpec::new("hosts", descriptor("set<string>")));

        let bound = Binder::new(schema).prefix("APP").bind(&env).unwrap();
        assert_eq!(bound.get::<u16>("port").unwrap(), 7000);
        assert_eq!(bound.get::<BTreeSet<String>>("hosts").unwrap().len(), 2);
    }

    #[test]
    fn test_filled_in_example_file_binds() {
        let schema = ConfigSchema::new("App")
            .field(FieldSpec::new("port", descriptor("u16")).default_value("8080"))
            .field(FieldSpec::new("name", descriptor("string")));

        let content = EnvManager::create_example_env_content(&schema, Some("app")).replace("APP_NAME=", "APP_NAME=svc");
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let vars = EnvManager::load_env_file(file.path()).unwrap();
        let bound = Binder::new(schema).prefix("app").bind(&vars).unwrap();
        assert_eq!(bound.get::<u16>("port").unwrap(), 8080);
        assert_eq!(bound.get::<String>("name").unwrap(), "svc");
    }
}
