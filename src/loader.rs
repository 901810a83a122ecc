//! Loads ledgers: fetches raw CSV through a [`RecordSource`], resolves the
//! configured column schema against the (trimmed) headers, normalizes the
//! designated cells and hands back an immutable [`RecordSet`].

use crate::cache::LoadCache;
use crate::config::{AmountPolicy, ColumnSchema, DashboardConfig};
use crate::error::{LedgerError, Result};
use crate::normalize::{parse_amount, parse_date};
use crate::record::{LedgerKind, Record, RecordSet};
use crate::source::{HttpSource, RecordSource};
use chrono::NaiveDate;
use csv::StringRecord;
use log::{debug, info, warn};
use std::sync::Arc;

struct ColumnIndices {
    amount: usize,
    issue_date: Option<usize>,
    due_date: Option<usize>,
    payment_date: Option<usize>,
    category: Option<usize>,
    cost_center: Option<usize>,
    status: Option<usize>,
    payment_method: Option<usize>,
    subtype: Option<usize>,
    vendor: Option<usize>,
    entry_type: Option<usize>,
    product: Option<usize>,
    objective: Option<usize>,
    notes: Option<usize>,
    invoice: Option<usize>,
}

impl ColumnIndices {
    /// Headers are matched exactly after whitespace trimming. Every column
    /// the schema names must be present before a single row parses.
    fn resolve(headers: &StringRecord, schema: &ColumnSchema, ledger: LedgerKind) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|header| header.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| LedgerError::MissingColumn {
                column: name.to_string(),
                ledger,
            })
        };
        let optional = |name: &Option<String>| match name {
            Some(name) => require(name).map(Some),
            None => Ok(None),
        };

        Ok(Self {
            amount: require(&schema.amount)?,
            issue_date: optional(&schema.issue_date)?,
            due_date: optional(&schema.due_date)?,
            payment_date: optional(&schema.payment_date)?,
            category: optional(&schema.category)?,
            cost_center: optional(&schema.cost_center)?,
            status: optional(&schema.status)?,
            payment_method: optional(&schema.payment_method)?,
            subtype: optional(&schema.subtype)?,
            vendor: optional(&schema.vendor)?,
            entry_type: optional(&schema.entry_type)?,
            product: optional(&schema.product)?,
            objective: optional(&schema.objective)?,
            notes: optional(&schema.notes)?,
            invoice: optional(&schema.invoice)?,
        })
    }
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}

fn optional_cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .map(|i| cell(record, i))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn required_cell(record: &StringRecord, index: Option<usize>) -> String {
    index.map(|i| cell(record, i).to_string()).unwrap_or_default()
}

fn date_cell(record: &StringRecord, index: Option<usize>) -> Option<NaiveDate> {
    index.and_then(|i| parse_date(cell(record, i)))
}

/// Parses raw CSV text into a [`RecordSet`] under the given schema and
/// amount policy. Per-cell date failures load as `None`; amount failures
/// follow the policy; schema violations abort before any set exists.
pub fn parse_records(
    csv_text: &str,
    kind: LedgerKind,
    schema: &ColumnSchema,
    policy: AmountPolicy,
) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());
    let headers = reader.headers()?.clone();
    let columns = ColumnIndices::resolve(&headers, schema, kind)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let raw = result?;
        let line = row as u64 + 2; // header occupies line 1

        let raw_amount = cell(&raw, columns.amount);
        let amount = match parse_amount(raw_amount) {
            Some(value) => value,
            None => match policy {
                AmountPolicy::Zero => {
                    warn!("Unparseable amount '{raw_amount}' at line {line}, loading as 0.0");
                    0.0
                }
                AmountPolicy::Drop => {
                    warn!("Unparseable amount '{raw_amount}' at line {line}, dropping record");
                    continue;
                }
                AmountPolicy::Reject => {
                    return Err(LedgerError::BadAmount {
                        line,
                        raw: raw_amount.to_string(),
                    })
                }
            },
        };

        records.push(Record {
            issue_date: date_cell(&raw, columns.issue_date),
            due_date: date_cell(&raw, columns.due_date),
            payment_date: date_cell(&raw, columns.payment_date),
            amount,
            category: required_cell(&raw, columns.category),
            cost_center: required_cell(&raw, columns.cost_center),
            status: required_cell(&raw, columns.status),
            payment_method: optional_cell(&raw, columns.payment_method),
            subtype: optional_cell(&raw, columns.subtype),
            vendor: optional_cell(&raw, columns.vendor),
            entry_type: optional_cell(&raw, columns.entry_type),
            product: optional_cell(&raw, columns.product),
            objective: optional_cell(&raw, columns.objective),
            notes: optional_cell(&raw, columns.notes),
            invoice: optional_cell(&raw, columns.invoice),
        });
    }

    Ok(RecordSet::new(kind, records))
}

/// Both ledgers of the dashboard, loaded and shared.
pub struct LedgerPair {
    pub payable: Arc<RecordSet>,
    pub receivable: Arc<RecordSet>,
}

/// Orchestrates configuration, transport and the load cache. One client is
/// meant to be shared across the interactions of a session (or the requests
/// of a wrapping service); loads of the same source within the TTL reuse
/// the cached set.
pub struct LedgerClient {
    config: DashboardConfig,
    source: Arc<dyn RecordSource>,
    cache: LoadCache,
}

impl LedgerClient {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let source = Arc::new(HttpSource::new(config.fetch_timeout())?);
        Ok(Self::with_source(config, source))
    }

    /// Builds a client over a custom transport; tests and demos pass
    /// in-memory sources here.
    pub fn with_source(config: DashboardConfig, source: Arc<dyn RecordSource>) -> Self {
        let cache = LoadCache::new(config.cache_ttl());
        Self {
            config,
            source,
            cache,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Loads one ledger, reusing the cached set when fresh.
    pub fn load(&self, kind: LedgerKind) -> Result<Arc<RecordSet>> {
        let source_config = self.config.source_for(kind).ok_or_else(|| {
            LedgerError::InvalidConfig(format!("no source configured for {kind} ledger"))
        })?;
        let policy = self.config.amount_policy;
        let transport = Arc::clone(&self.source);

        self.cache.get_or_load(&source_config.url, || {
            info!("Fetching {kind} ledger from {}", source_config.url);
            let body = transport.fetch(&source_config.url)?;
            let set = parse_records(&body, kind, &source_config.columns, policy)?;
            debug!("Loaded {} {kind} records", set.len());
            Ok(set)
        })
    }

    /// Bypasses the cache and repopulates it with a fresh load.
    pub fn reload(&self, kind: LedgerKind) -> Result<Arc<RecordSet>> {
        if let Some(source_config) = self.config.source_for(kind) {
            self.cache.invalidate(&source_config.url);
        }
        self.load(kind)
    }

    pub fn load_all(&self) -> Result<LedgerPair> {
        Ok(LedgerPair {
            payable: self.load(LedgerKind::Payable)?,
            receivable: self.load(LedgerKind::Receivable)?,
        })
    }
}
