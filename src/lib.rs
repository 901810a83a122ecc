//! # finboard
//!
//! The data core of a spreadsheet-backed accounts-payable /
//! accounts-receivable dashboard: fetches CSV exports over HTTP, normalizes
//! Brazilian-formatted currency and date columns, filters records against an
//! immutable [`FilterSpec`], and aggregates amounts for metric cards,
//! breakdown charts and trend lines. Rendering is the consumer's job.
//!
//! ## Core Concepts
//!
//! - **Ledger**: one of the two record collections (payable / receivable),
//!   each a CSV tab of a spreadsheet.
//! - **Normalization**: currency cells like `"R$ 1.234,56"` and day-first
//!   dates like `"15/03/2025"` become plain numbers and calendar dates at
//!   load time; malformed cells resolve to sentinels, never crashes.
//! - **FilterSpec**: the user's active constraints as an immutable value
//!   object, rebuilt each interaction and threaded as a plain argument.
//! - **Aggregation**: deterministic totals, means, grouped sums and monthly
//!   series over the filtered set.
//!
//! ## Example
//!
//! ```rust,ignore
//! use finboard::*;
//!
//! let config = DashboardConfig {
//!     sources: vec![
//!         SourceConfig::google_sheet(
//!             LedgerKind::Payable,
//!             "1hxeG2XDXR3yVrKNCB9wdgUtY0oX22IjmnDi3iitPboc",
//!             "Contas a pagar",
//!             ColumnSchema::payable_default(),
//!         ),
//!         SourceConfig::google_sheet(
//!             LedgerKind::Receivable,
//!             "1hxeG2XDXR3yVrKNCB9wdgUtY0oX22IjmnDi3iitPboc",
//!             "Contas a receber",
//!             ColumnSchema::receivable_default(),
//!         ),
//!     ],
//!     ..Default::default()
//! };
//!
//! let client = LedgerClient::new(config)?;
//! let ledgers = client.load_all()?;
//!
//! let spec = FilterSpec::default()
//!     .with_category(Selection::subset(["Fixo"]))
//!     .with_date_range(ledgers.payable.default_date_range(DateBasis::Issue));
//! let filtered = filter::apply(&ledgers.payable, &spec);
//!
//! let summary = aggregate::cashflow_summary(&filtered, &ledgers.receivable);
//! let by_cost_center = aggregate::sum_by(&filtered, GroupField::CostCenter);
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod record;
pub mod source;

pub use aggregate::{CashflowSummary, GroupBreakdown, GroupTotal, Summary};
pub use cache::LoadCache;
pub use config::{AmountPolicy, ColumnSchema, DashboardConfig, SourceConfig};
pub use error::{LedgerError, Result};
pub use filter::{DateRange, EmptySelectionPolicy, FilterSpec, Selection};
pub use loader::{parse_records, LedgerClient, LedgerPair};
pub use normalize::{parse_amount, parse_date};
pub use record::{DateBasis, GroupField, LedgerKind, Record, RecordSet};
pub use source::{HttpSource, RecordSource};
