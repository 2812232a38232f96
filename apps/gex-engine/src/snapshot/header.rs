//! Header extraction: spot price and snapshot date.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use super::error::SnapshotError;

/// Label preceding the spot price on the quote header line.
pub const SPOT_LABEL: &str = "Last:";

/// 1-based line holding the spot price.
pub const SPOT_LINE: usize = 2;

/// 1-based line whose first field holds the snapshot date.
pub const DATE_LINE: usize = 5;

/// Header lines preceding the table section.
pub const HEADER_LINES: usize = 4;

/// Date format used by the snapshot date and every expiration, e.g. `Fri Jun 02 2023`.
pub const DATE_FORMAT: &str = "%a %b %d %Y";

/// Hours after midnight at which a contract expires (end-of-day cutoff).
pub const EXPIRATION_CUTOFF_HOURS: i64 = 16;

/// Split one line into trimmed comma-separated fields, honoring quotes.
pub(crate) fn split_fields(line: &str) -> Result<Vec<String>, SnapshotError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

/// Extract the spot price from the quote header line.
///
/// The label may carry the number in the same field (`Last: 4282.37`) or in
/// the following one (`Last:,4000.00`).
pub fn parse_spot_price(line: &str, line_no: usize) -> Result<f64, SnapshotError> {
    let fields = split_fields(line)?;

    let (index, field) = fields
        .iter()
        .enumerate()
        .find(|(_, f)| f.contains(SPOT_LABEL))
        .ok_or(SnapshotError::MissingSpotLabel {
            line: line_no,
            label: SPOT_LABEL,
        })?;

    let after_label = field
        .split_once(SPOT_LABEL)
        .map_or("", |(_, rest)| rest)
        .trim();
    let literal = if after_label.is_empty() {
        fields.get(index + 1).map_or("", |f| f.trim())
    } else {
        after_label
    };

    match literal.parse::<f64>() {
        Ok(spot) if spot.is_finite() && spot > 0.0 => Ok(spot),
        _ => Err(SnapshotError::InvalidSpotPrice {
            line: line_no,
            value: literal.to_string(),
        }),
    }
}

/// Parse a `Www Mmm DD YYYY` date.
pub fn parse_chain_date(
    text: &str,
    line_no: usize,
    column: &'static str,
) -> Result<NaiveDate, SnapshotError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|source| SnapshotError::InvalidDate {
        line: line_no,
        column,
        value: text.to_string(),
        source,
    })
}

/// Extract the snapshot date from the first field of its header line.
pub fn parse_snapshot_date(line: &str, line_no: usize) -> Result<NaiveDate, SnapshotError> {
    let fields = split_fields(line)?;
    let first = fields.first().map_or("", String::as_str);
    parse_chain_date(first, line_no, "SnapshotDate")
}

/// Move an expiration date to its end-of-day cutoff.
#[must_use]
pub fn expiration_cutoff(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + TimeDelta::hours(EXPIRATION_CUTOFF_HOURS)
}
