//! Snapshot parser: raw chain export text to [`Snapshot`].

use std::time::Instant;

use chrono::NaiveDateTime;
use csv::StringRecord;

use super::error::SnapshotError;
use super::header::{
    DATE_LINE, HEADER_LINES, SPOT_LINE, expiration_cutoff, parse_chain_date,
    parse_snapshot_date, parse_spot_price,
};
use super::schema::{
    CALL_COLUMNS, COLUMN_COUNT, ColumnKind, PUT_COLUMNS, QuoteColumns, SCHEMA,
};
use super::types::{ContractRow, OptionQuote, Snapshot, SnapshotMetadata};
use crate::observability::{record_snapshot_error, record_snapshot_parse};

/// Parse a complete snapshot.
///
/// Header fields are validated before any table row is read, so a malformed
/// header fails without touching the rows.
pub fn parse_snapshot(raw: &str) -> Result<Snapshot, SnapshotError> {
    let started = Instant::now();
    let result = parse_inner(raw);

    match &result {
        Ok(snapshot) => {
            record_snapshot_parse(snapshot.len(), started.elapsed().as_secs_f64());
            tracing::debug!(
                rows = snapshot.len(),
                spot = snapshot.metadata.spot_price,
                date = %snapshot.metadata.snapshot_date,
                "Parsed snapshot"
            );
        }
        Err(e) => {
            record_snapshot_error(e.kind().as_str());
            tracing::warn!(error = %e, kind = e.kind().as_str(), "Snapshot rejected");
        }
    }

    result
}

fn parse_inner(raw: &str) -> Result<Snapshot, SnapshotError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let header: Vec<&str> = raw.lines().take(DATE_LINE).collect();
    if header.len() < DATE_LINE {
        return Err(SnapshotError::MissingLine {
            expected: DATE_LINE,
            found: header.len(),
        });
    }

    let spot_price = parse_spot_price(header[SPOT_LINE - 1], SPOT_LINE)?;
    let snapshot_date = parse_snapshot_date(header[DATE_LINE - 1], DATE_LINE)?;
    let metadata = SnapshotMetadata::new(spot_price, snapshot_date);

    let rows = parse_table(table_section(raw))?;

    Ok(Snapshot { metadata, rows })
}

/// Text after the header lines.
fn table_section(raw: &str) -> &str {
    let offset: usize = raw
        .split_inclusive('\n')
        .take(HEADER_LINES)
        .map(str::len)
        .sum();
    &raw[offset..]
}

fn parse_table(table: &str) -> Result<Vec<ContractRow>, SnapshotError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(table.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record
            .position()
            .map_or(HEADER_LINES + rows.len() + 1, |p| HEADER_LINES + p.line() as usize);
        rows.push(RowDecoder::new(&record, line)?.decode()?);
    }

    Ok(rows)
}

/// Schema-driven decoder for a single table row.
struct RowDecoder<'a> {
    record: &'a StringRecord,
    line: usize,
}

impl<'a> RowDecoder<'a> {
    fn new(record: &'a StringRecord, line: usize) -> Result<Self, SnapshotError> {
        if record.len() != COLUMN_COUNT {
            return Err(SnapshotError::FieldCount {
                line,
                expected: COLUMN_COUNT,
                found: record.len(),
            });
        }
        Ok(Self { record, line })
    }

    fn decode(&self) -> Result<ContractRow, SnapshotError> {
        let mut numbers: [Option<f64>; COLUMN_COUNT] = [None; COLUMN_COUNT];
        let mut expiration: Option<NaiveDateTime> = None;
        let mut strike: Option<f64> = None;

        for (index, spec) in SCHEMA.iter().enumerate() {
            let text = self.record.get(index).unwrap_or("");
            match spec.kind {
                ColumnKind::Expiration => {
                    let date = parse_chain_date(text, self.line, spec.name)?;
                    expiration = Some(expiration_cutoff(date));
                }
                ColumnKind::Text => {}
                ColumnKind::Number => numbers[index] = self.optional_number(text, spec.name)?,
                ColumnKind::Strike => strike = Some(self.strike(text)?),
            }
        }

        let (Some(expiration), Some(strike)) = (expiration, strike) else {
            return Err(SnapshotError::FieldCount {
                line: self.line,
                expected: COLUMN_COUNT,
                found: self.record.len(),
            });
        };

        Ok(ContractRow {
            expiration,
            strike,
            call: quote(&numbers, CALL_COLUMNS),
            put: quote(&numbers, PUT_COLUMNS),
        })
    }

    /// Blank is `None`; anything else must parse.
    fn optional_number(
        &self,
        text: &str,
        column: &'static str,
    ) -> Result<Option<f64>, SnapshotError> {
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<f64>()
            .map(Some)
            .map_err(|_| SnapshotError::InvalidNumber {
                line: self.line,
                column,
                value: text.to_string(),
            })
    }

    fn strike(&self, text: &str) -> Result<f64, SnapshotError> {
        if text.is_empty() {
            return Err(SnapshotError::MissingStrike { line: self.line });
        }
        match text.parse::<f64>() {
            Ok(strike) if strike.is_finite() && strike > 0.0 => Ok(strike),
            _ => Err(SnapshotError::InvalidStrike {
                line: self.line,
                value: text.to_string(),
            }),
        }
    }
}

/// Blank volatility and open interest contribute nothing; blank gamma is kept.
fn quote(numbers: &[Option<f64>; COLUMN_COUNT], columns: QuoteColumns) -> OptionQuote {
    OptionQuote {
        implied_vol: numbers[columns.implied_vol.index()].unwrap_or(0.0),
        gamma: numbers[columns.gamma.index()],
        open_interest: numbers[columns.open_interest.index()].unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::snapshot::error::SnapshotErrorKind;

    const HEADER: &str = "S&P 500 INDEX,SPX\n\
        SPX Options,Last:,4000.00,Change:,12.5\n\
        \"Date: June 2, 2023 at 4:15 PM EDT\",Bid:,3999.5,Ask:,4000.5\n\
        Expiration Date,Calls,Last Sale,Net,Bid,Ask,Vol,IV,Delta,Gamma,Open Int,Strike,Puts,Last Sale,Net,Bid,Ask,Vol,IV,Delta,Gamma,Open Int\n";

    fn row(expiration: &str, strike: &str, call: [&str; 3], put: [&str; 3]) -> String {
        format!(
            "{expiration},SPXC,1.0,0.1,0.9,1.1,10,{},0.5,{},{},{strike},SPXP,1.0,-0.1,0.9,1.1,12,{},-0.5,{},{}",
            call[0], call[1], call[2], put[0], put[1], put[2]
        )
    }

    fn snapshot_text(rows: &[String]) -> String {
        let mut text = HEADER.to_string();
        for r in rows {
            text.push_str(r);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_header_and_rows() {
        let text = snapshot_text(&[
            row("Fri Jun 02 2023", "4000", ["0.15", "0.002", "500"], ["0.16", "0.001", "300"]),
            row("Fri Jun 09 2023", "4050", ["0.14", "0.0015", "200"], ["", "", ""]),
        ]);

        let snapshot = parse_snapshot(&text).unwrap();

        assert_eq!(snapshot.metadata.spot_price, 4000.0);
        assert_eq!(
            snapshot.metadata.snapshot_date,
            NaiveDate::from_ymd_opt(2023, 6, 2).unwrap()
        );
        assert_eq!(snapshot.len(), 2);

        let first = snapshot.rows[0];
        assert_eq!(first.strike, 4000.0);
        assert_eq!(first.call, OptionQuote::new(0.15, 0.002, 500.0));
        assert_eq!(first.put, OptionQuote::new(0.16, 0.001, 300.0));
        assert_eq!(
            first.expiration,
            NaiveDate::from_ymd_opt(2023, 6, 2)
                .unwrap()
                .and_hms_opt(16, 0, 0)
                .unwrap()
        );

        let second = snapshot.rows[1];
        assert_eq!(second.put, OptionQuote::default());
    }

    #[test]
    fn test_blank_optional_fields_are_not_errors() {
        let text = snapshot_text(&[row(
            "Fri Jun 02 2023",
            "4000",
            ["", "", "500"],
            ["0.2", "0.001", ""],
        )]);

        let snapshot = parse_snapshot(&text).unwrap();
        let r = snapshot.rows[0];

        assert_eq!(r.call.implied_vol, 0.0);
        assert_eq!(r.call.gamma, None);
        assert_eq!(r.call.gamma_or_zero(), 0.0);
        assert_eq!(r.call.open_interest, 500.0);
        assert_eq!(r.put.open_interest, 0.0);
    }

    #[test]
    fn test_missing_spot_label_fails_before_rows() {
        // The row is also malformed; the header error must win.
        let text = "S&P 500 INDEX,SPX\n\
            SPX Options,Close:,4000.00\n\
            line three\n\
            line four\n\
            Fri Jun 02 2023,too,few,fields\n";

        let err = parse_snapshot(text).unwrap_err();
        assert!(matches!(err, SnapshotError::MissingSpotLabel { line: 2, .. }));
        assert_eq!(err.kind(), SnapshotErrorKind::Format);
    }

    #[test]
    fn test_too_few_lines() {
        let err = parse_snapshot("a\nb,Last:,1\nc\n").unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::MissingLine {
                expected: 5,
                found: 3
            }
        ));
    }

    #[test]
    fn test_wrong_field_count_reports_line() {
        let mut text = snapshot_text(&[row(
            "Fri Jun 02 2023",
            "4000",
            ["0.1", "0.002", "1"],
            ["0.1", "0.002", "1"],
        )]);
        text.push_str("Fri Jun 02 2023,SPXC,1.0\n");

        let err = parse_snapshot(&text).unwrap_err();
        match err {
            SnapshotError::FieldCount {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 6);
                assert_eq!(expected, 22);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_gamma_names_column() {
        let text = snapshot_text(&[row(
            "Fri Jun 02 2023",
            "4000",
            ["0.1", "abc", "1"],
            ["0.1", "0.002", "1"],
        )]);

        let err = parse_snapshot(&text).unwrap_err();
        match err {
            SnapshotError::InvalidNumber {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 5);
                assert_eq!(column, "CallGamma");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_strike_is_numeric_coercion_error() {
        let text = snapshot_text(&[row(
            "Fri Jun 02 2023",
            "",
            ["0.1", "0.002", "1"],
            ["0.1", "0.002", "1"],
        )]);

        let err = parse_snapshot(&text).unwrap_err();
        assert!(matches!(err, SnapshotError::MissingStrike { line: 5 }));
        assert_eq!(err.kind(), SnapshotErrorKind::NumericCoercion);
    }

    #[test]
    fn test_published_zero_gamma_is_not_blank() {
        let text = snapshot_text(&[row(
            "Fri Jun 02 2023",
            "4000",
            ["0.2", "0", "1000"],
            ["0.2", "", "1000"],
        )]);

        let snapshot = parse_snapshot(&text).unwrap();
        let r = snapshot.rows[0];

        assert_eq!(r.call.gamma, Some(0.0));
        assert_eq!(r.put.gamma, None);
    }

    #[test]
    fn test_non_numeric_strike_is_numeric_coercion_error() {
        for strike in ["abc", "NaN", "inf"] {
            let text = snapshot_text(&[row(
                "Fri Jun 02 2023",
                strike,
                ["0.1", "0.002", "1"],
                ["0.1", "0.002", "1"],
            )]);

            let err = parse_snapshot(&text).unwrap_err();
            match &err {
                SnapshotError::InvalidStrike { line, value } => {
                    assert_eq!(*line, 5);
                    assert_eq!(value, strike);
                }
                other => panic!("unexpected error for {strike}: {other}"),
            }
            assert_eq!(err.kind(), SnapshotErrorKind::NumericCoercion);
        }
    }

    #[test]
    fn test_non_positive_strike_rejected() {
        let text = snapshot_text(&[row(
            "Fri Jun 02 2023",
            "-5",
            ["0.1", "0.002", "1"],
            ["0.1", "0.002", "1"],
        )]);

        let err = parse_snapshot(&text).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidStrike { line: 5, .. }));
    }

    #[test]
    fn test_bad_expiration_date() {
        let text = snapshot_text(&[
            row("Fri Jun 02 2023", "4000", ["", "", ""], ["", "", ""]),
            row("2023-06-09", "4000", ["", "", ""], ["", "", ""]),
        ]);

        let err = parse_snapshot(&text).unwrap_err();
        match err {
            SnapshotError::InvalidDate { line, column, .. } => {
                assert_eq!(line, 6);
                assert_eq!(column, "ExpirationDate");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_crlf_and_trailing_blank_lines() {
        let text = snapshot_text(&[row(
            "Fri Jun 02 2023",
            "4000",
            ["0.1", "0.002", "1"],
            ["0.1", "0.002", "1"],
        )])
        .replace('\n', "\r\n")
            + "\r\n\r\n";

        let snapshot = parse_snapshot(&text).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.metadata.spot_price, 4000.0);
    }

    #[test]
    fn test_rows_keep_source_order() {
        let text = snapshot_text(&[
            row("Fri Jun 09 2023", "4100", ["", "", ""], ["", "", ""]),
            row("Fri Jun 02 2023", "3900", ["", "", ""], ["", "", ""]),
            row("Fri Jun 02 2023", "4000", ["", "", ""], ["", "", ""]),
        ]);

        let snapshot = parse_snapshot(&text).unwrap();
        let strikes: Vec<f64> = snapshot.rows.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![4100.0, 3900.0, 4000.0]);
    }
}
