//! Column schema of the chain snapshot table.
//!
//! The table section has a fixed 22-column layout with paired call and put
//! fields around the strike. Decoding is driven by [`SCHEMA`]: each column's
//! [`ColumnKind`] decides how its text is validated and coerced.

/// How a column's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Expiration date in `Www Mmm DD YYYY` format.
    Expiration,
    /// Free text (contract symbols), never validated.
    Text,
    /// Optional number; blank is absent (zero for IV and open interest).
    Number,
    /// Required, strictly positive strike price.
    Strike,
}

/// Name and kind of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name as used in error messages.
    pub name: &'static str,
    /// Decoding rule.
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { name, kind }
}

/// Number of fields every table row must have.
pub const COLUMN_COUNT: usize = 22;

/// The table schema, indexed by field position.
pub const SCHEMA: [ColumnSpec; COLUMN_COUNT] = [
    col("ExpirationDate", ColumnKind::Expiration),
    col("Calls", ColumnKind::Text),
    col("CallLastSale", ColumnKind::Number),
    col("CallNet", ColumnKind::Number),
    col("CallBid", ColumnKind::Number),
    col("CallAsk", ColumnKind::Number),
    col("CallVol", ColumnKind::Number),
    col("CallIV", ColumnKind::Number),
    col("CallDelta", ColumnKind::Number),
    col("CallGamma", ColumnKind::Number),
    col("CallOpenInt", ColumnKind::Number),
    col("StrikePrice", ColumnKind::Strike),
    col("Puts", ColumnKind::Text),
    col("PutLastSale", ColumnKind::Number),
    col("PutNet", ColumnKind::Number),
    col("PutBid", ColumnKind::Number),
    col("PutAsk", ColumnKind::Number),
    col("PutVol", ColumnKind::Number),
    col("PutIV", ColumnKind::Number),
    col("PutDelta", ColumnKind::Number),
    col("PutGamma", ColumnKind::Number),
    col("PutOpenInt", ColumnKind::Number),
];

/// Columns the exposure pipeline reads, by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Column {
    /// Expiration date.
    ExpirationDate = 0,
    /// Call implied volatility.
    CallIv = 7,
    /// Call gamma.
    CallGamma = 9,
    /// Call open interest.
    CallOpenInt = 10,
    /// Strike price.
    StrikePrice = 11,
    /// Put implied volatility.
    PutIv = 18,
    /// Put gamma.
    PutGamma = 20,
    /// Put open interest.
    PutOpenInt = 21,
}

impl Column {
    /// Field position.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Schema entry for this column.
    #[must_use]
    pub const fn spec(self) -> ColumnSpec {
        SCHEMA[self.index()]
    }

    /// Column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.spec().name
    }
}

/// The three columns making up one side of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteColumns {
    /// Implied volatility column.
    pub implied_vol: Column,
    /// Gamma column.
    pub gamma: Column,
    /// Open interest column.
    pub open_interest: Column,
}

/// Call side columns.
pub const CALL_COLUMNS: QuoteColumns = QuoteColumns {
    implied_vol: Column::CallIv,
    gamma: Column::CallGamma,
    open_interest: Column::CallOpenInt,
};

/// Put side columns.
pub const PUT_COLUMNS: QuoteColumns = QuoteColumns {
    implied_vol: Column::PutIv,
    gamma: Column::PutGamma,
    open_interest: Column::PutOpenInt,
};
