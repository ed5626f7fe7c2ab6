//! Shared date and timestamp formats used by the Capture API.
//!
//! Capture renders attribute values of date/time type with two textual
//! formats: a date-only form and a full timestamp with sub-second precision
//! and a numeric UTC offset. Both round-trip exactly through
//! [`parse_timestamp`]/[`timestamp`] and [`parse_date`]/[`datestamp`].

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

/// Format for full timestamps, e.g. `2013-05-21 16:02:41.000123 -0700`.
///
/// The fractional-second part is printed only when non-zero and parsed
/// whether present or not.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// Format for date-only values, e.g. `2013-05-21`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders a timestamp in [`TIME_FORMAT`].
pub fn timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    t.format(TIME_FORMAT).to_string()
}

/// Parses a timestamp in [`TIME_FORMAT`].
///
/// # Errors
///
/// Returns a [`chrono::ParseError`] if the input does not match the format.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(s, TIME_FORMAT)
}

/// Renders a date in [`DATE_FORMAT`].
#[must_use]
pub fn datestamp(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Parses a date in [`DATE_FORMAT`].
///
/// # Errors
///
/// Returns a [`chrono::ParseError`] if the input does not match the format.
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}
