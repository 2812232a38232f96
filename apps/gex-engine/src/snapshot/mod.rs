//! Options-chain snapshot parsing.
//!
//! A snapshot is a chain export for a single underlying:
//!
//! - Line 2 carries the spot price after the `Last:` label.
//! - Line 5's first field carries the snapshot date (`Fri Jun 02 2023`).
//! - Lines 1-4 are headers; line 5 onward is a 22-column table with paired
//!   call/put fields around the strike.
//!
//! # Example
//!
//! ```ignore
//! use gex_engine::snapshot::parse_snapshot;
//!
//! let raw = std::fs::read_to_string("spx_quotedata.csv")?;
//! let snapshot = parse_snapshot(&raw)?;
//! println!("spot {} on {}", snapshot.metadata.spot_price, snapshot.metadata.snapshot_date);
//! ```

mod error;
mod header;
mod parser;
pub mod schema;
mod types;

pub use error::{SnapshotError, SnapshotErrorKind};
pub use header::{DATE_FORMAT, EXPIRATION_CUTOFF_HOURS, SPOT_LABEL, expiration_cutoff};
pub use parser::parse_snapshot;
pub use types::{ContractRow, OptionQuote, Snapshot, SnapshotMetadata};
