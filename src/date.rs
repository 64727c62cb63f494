//! Parses CMS publication timestamps and formats them for display. See
//! [`DateFormatter::format`].

use chrono::{DateTime, Locale, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// The display pattern for publication dates: two-digit day, abbreviated month
/// name, four-digit year (e.g., `10 mar 2021` in `pt_BR`).
pub const DATE_PATTERN: &str = "%d %b %Y";

/// The timestamp layout the CMS uses for `first_publication_date`. Unlike RFC
/// 3339, the offset has no colon (`2021-03-10T19:25:28+0000`).
const CMS_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Formats publication timestamps as [`DATE_PATTERN`] using a fixed locale's
/// month names, in a fixed display time zone.
#[derive(Clone, Copy, Debug)]
pub struct DateFormatter {
    locale: Locale,
    time_zone: Tz,
}

impl Default for DateFormatter {
    /// Brazilian Portuguese month names, displayed in UTC.
    fn default() -> Self {
        DateFormatter::new(Locale::pt_BR, Tz::UTC)
    }
}

impl DateFormatter {
    pub fn new(locale: Locale, time_zone: Tz) -> DateFormatter {
        DateFormatter { locale, time_zone }
    }

    /// Constructs a [`DateFormatter`] from a POSIX locale name (e.g.,
    /// `pt_BR`) and an IANA time zone name (e.g., `America/Sao_Paulo`).
    pub fn from_names(locale: &str, time_zone: &str) -> Result<DateFormatter> {
        Ok(DateFormatter {
            locale: Locale::try_from(locale)
                .map_err(|_| Error::UnknownLocale(locale.to_owned()))?,
            time_zone: time_zone
                .parse::<Tz>()
                .map_err(|_| Error::UnknownTimeZone(time_zone.to_owned()))?,
        })
    }

    /// Formats an optional timestamp. A missing timestamp is reported as
    /// [`Error::MissingTimestamp`] so the caller can decide whether to fail or
    /// substitute a placeholder.
    pub fn format(&self, timestamp: Option<&str>) -> Result<String> {
        let timestamp = timestamp.ok_or(Error::MissingTimestamp)?;
        Ok(self.format_datetime(&parse_timestamp(timestamp)?))
    }

    pub fn format_datetime(&self, datetime: &DateTime<Utc>) -> String {
        datetime
            .with_timezone(&self.time_zone)
            .format_localized(DATE_PATTERN, self.locale)
            .to_string()
    }
}

/// Parses a publication timestamp. Accepts RFC 3339, the CMS's colon-less
/// offset form, and bare `YYYY-MM-DD` dates (taken as midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.with_timezone(&Utc));
    }
    if let Ok(datetime) = DateTime::parse_from_str(value, CMS_TIMESTAMP) {
        return Ok(datetime.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| Error::InvalidTimestamp(value.to_owned()))
}

/// The result of a fallible date operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem parsing or formatting a publication date.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The record has no publication timestamp.
    #[error("missing publication timestamp")]
    MissingTimestamp,

    /// The publication timestamp couldn't be parsed.
    #[error("invalid publication timestamp `{0}`")]
    InvalidTimestamp(String),

    #[error("unknown locale `{0}`")]
    UnknownLocale(String),

    #[error("unknown time zone `{0}`")]
    UnknownTimeZone(String),
}
