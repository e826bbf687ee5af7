//! Declarative configuration types

/// Declare a configuration struct and its schema in one place
///
/// Each field is read from the upper-cased field name (plus prefix). A field
/// may carry a default written as a literal.
///
/// ```
/// use std::collections::HashMap;
/// use typed_envconfig::{env_config, EnvConfig};
///
/// env_config! {
///     pub struct ServerConfig {
///         pub host: String,
///         pub port: u16 = 8080,
///         pub tags: Vec<String> = "web,api",
///     }
/// }
///
/// let mut env = HashMap::new();
/// env.insert("SRV_HOST".to_string(), "localhost".to_string());
///
/// let config = ServerConfig::from_source_with_prefix(&env, "srv").unwrap();
/// assert_eq!(config.host, "localhost");
/// assert_eq!(config.port, 8080);
/// assert_eq!(config.tags, vec!["web", "api"]);
/// ```
#[macro_export]
macro_rules! env_config {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(= $default:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::binding::EnvConfig for $name {
            fn schema() -> $crate::binding::ConfigSchema {
                $crate::binding::ConfigSchema::new(stringify!($name))
                    $(
                        .field(
                            $crate::binding::FieldSpec::new(
                                stringify!($field),
                                <$ty as $crate::types::Describe>::descriptor(),
                            )
                            $(.default_value(concat!($default)))?
                        )
                    )*
            }

            fn from_bound(bound: &$crate::binding::BoundConfig) -> $crate::error::Result<Self> {
                Ok(Self {
                    $(
                        $field: bound.get::<$ty>(stringify!($field))?,
                    )*
                })
            }
        }
    };
}

/// Declare a fieldless enum that binds from its constant names
///
/// Variants map to themselves by default; `Variant = "NAME"` binds from an
/// explicit constant. Matching is exact and case-sensitive.
///
/// ```
/// use typed_envconfig::{env_enum, TypeDescriptor, Describe};
///
/// env_enum! {
///     pub enum TimeUnit {
///         Days = "DAYS",
///         Hours = "HOURS",
///     }
/// }
///
/// assert_eq!(TimeUnit::from_constant("DAYS"), Some(TimeUnit::Days));
/// assert_eq!(TimeUnit::Hours.constant(), "HOURS");
/// assert_eq!(TimeUnit::descriptor().to_string(), "TimeUnit{DAYS|HOURS}");
/// ```
#[macro_export]
macro_rules! env_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(= $constant:literal)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Constant names in declaration order
            pub const CONSTANTS: &'static [&'static str] = &[
                $($crate::env_enum!(@constant $variant $($constant)?)),+
            ];

            /// Constant name this variant binds from
            pub fn constant(&self) -> &'static str {
                match self {
                    $(Self::$variant => $crate::env_enum!(@constant $variant $($constant)?),)+
                }
            }

            /// Variant bound from `name`, matched exactly
            pub fn from_constant(name: &str) -> Option<Self> {
                $(
                    if name == $crate::env_enum!(@constant $variant $($constant)?) {
                        return Some(Self::$variant);
                    }
                )+
                None
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.constant())
            }
        }

        impl $crate::types::Describe for $name {
            fn descriptor() -> $crate::types::TypeDescriptor {
                $crate::types::TypeDescriptor::enumeration(stringify!($name), Self::CONSTANTS.iter().copied())
            }
        }

        impl $crate::models::FromValue for $name {
            fn from_value(value: &$crate::models::Value) -> Option<Self> {
                match value {
                    $crate::models::Value::Enum(constant) if constant.enum_name() == stringify!($name) => {
                        Self::from_constant(constant.name())
                    }
                    _ => None,
                }
            }
        }

        impl From<$name> for $crate::models::Value {
            fn from(value: $name) -> Self {
                $crate::models::Value::Enum($crate::models::EnumConstant::new(stringify!($name), value.constant()))
            }
        }
    };
    (@constant $variant:ident) => {
        stringify!($variant)
    };
    (@constant $variant:ident $constant:literal) => {
        $constant
    };
}
