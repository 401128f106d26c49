//! JSON rendering for skill responses.
//!
//! The response payload has no date or time fields today. Any that get added
//! must go out as ISO-8601 strings; annotate them with
//! `#[serde(with = "crate::json::iso8601")]` (or `iso8601::option`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone};
use serde::Serialize;

/// Serialize a response body. Non-ASCII text is written as UTF-8, not escaped.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Date/time types that have an ISO-8601 rendering.
pub trait IsoFormat {
    fn iso_format(&self) -> String;
}

impl<Tz: TimeZone> IsoFormat for DateTime<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    fn iso_format(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

impl IsoFormat for NaiveDateTime {
    fn iso_format(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

impl IsoFormat for NaiveDate {
    fn iso_format(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl IsoFormat for NaiveTime {
    fn iso_format(&self) -> String {
        self.format("%H:%M:%S%.f").to_string()
    }
}

pub mod iso8601 {
    use serde::Serializer;

    use super::IsoFormat;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: IsoFormat,
        S: Serializer,
    {
        serializer.serialize_str(&value.iso_format())
    }

    pub mod option {
        use serde::Serializer;

        use super::IsoFormat;

        pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
        where
            T: IsoFormat,
            S: Serializer,
        {
            match value {
                Some(v) => serializer.serialize_str(&v.iso_format()),
                None => serializer.serialize_none(),
            }
        }
    }
}
