//! Data models: converted values, temporal types and settings

pub mod config;
pub mod temporal;
pub mod uri;
pub mod value;

// Re-export main model types
pub use config::Settings;
pub use temporal::{IsoDuration, MonthDay, OffsetTime, Period, Year, YearMonth, ZoneId, ZoneOffset, ZonedDateTime};
pub use uri::Uri;
pub use value::{EnumConstant, F32Value, F64Value, FromValue, Value};
