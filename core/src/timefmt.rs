//! Timestamp formatting for run directories and report display times.

use anyhow::{Context, Result};
use time::format_description::well_known::Rfc3339;
use time::macros::{format_description, offset};
use time::OffsetDateTime;

/// Current timestamp in `YYYYMMDD_HHMMSS` form, used for run-directory names.
pub fn timestamp_string() -> String {
    let compact = format_description!("[year][month][day]_[hour][minute][second]");
    OffsetDateTime::now_utc()
        .format(compact)
        .unwrap_or_else(|_| String::new())
}

/// Convert an RFC 3339 UTC timestamp (as emitted in scanner reports, with or
/// without fractional seconds) to the JST (UTC+9) display form
/// `YYYY/MM/DD HH:MM:SS`.
pub fn utc_to_jst(utc: &str) -> Result<String> {
    let display = format_description!("[year]/[month]/[day] [hour]:[minute]:[second]");
    let parsed = OffsetDateTime::parse(utc, &Rfc3339)
        .with_context(|| format!("unparseable report timestamp: {utc}"))?;
    let jst = parsed.to_offset(offset!(+9));
    jst.format(display).context("format display timestamp")
}
