use crate::filter::DateRange;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which of the two ledgers a record set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum LedgerKind {
    Payable,
    Receivable,
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payable => write!(f, "payable"),
            Self::Receivable => write!(f, "receivable"),
        }
    }
}

/// Which date column a date-range filter or trend series applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum DateBasis {
    Issue,
    Due,
    Payment,
}

impl Default for DateBasis {
    fn default() -> Self {
        Self::Issue
    }
}

/// Categorical fields a record set can be grouped or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum GroupField {
    Category,
    CostCenter,
    Status,
    PaymentMethod,
    Subtype,
    Vendor,
}

/// One normalized row of a financial ledger. Immutable after load: filtering
/// derives new collections and never mutates records in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    /// Always a well-defined number after normalization; unparseable raw
    /// values are resolved by the configured [`AmountPolicy`] at load time.
    ///
    /// [`AmountPolicy`]: crate::config::AmountPolicy
    pub amount: f64,
    /// Commonly "Fixo" / "Variável"; empty when the cell is blank.
    pub category: String,
    pub cost_center: String,
    /// e.g. "Pago" / "Em Aberto".
    pub status: String,
    pub payment_method: Option<String>,
    /// Finer classification, e.g. "Cartão de Crédito".
    pub subtype: Option<String>,
    pub vendor: Option<String>,
    pub entry_type: Option<String>,
    pub product: Option<String>,
    pub objective: Option<String>,
    pub notes: Option<String>,
    pub invoice: Option<String>,
}

impl Record {
    pub fn date(&self, basis: DateBasis) -> Option<NaiveDate> {
        match basis {
            DateBasis::Issue => self.issue_date,
            DateBasis::Due => self.due_date,
            DateBasis::Payment => self.payment_date,
        }
    }

    /// The value of a categorical field. Required-string fields always
    /// return `Some` (possibly empty); optional fields return `None` when
    /// absent.
    pub fn categorical(&self, field: GroupField) -> Option<&str> {
        match field {
            GroupField::Category => Some(self.category.as_str()),
            GroupField::CostCenter => Some(self.cost_center.as_str()),
            GroupField::Status => Some(self.status.as_str()),
            GroupField::PaymentMethod => self.payment_method.as_deref(),
            GroupField::Subtype => self.subtype.as_deref(),
            GroupField::Vendor => self.vendor.as_deref(),
        }
    }
}

/// An ordered collection of records sharing one ledger schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    kind: LedgerKind,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(kind: LedgerKind, records: Vec<Record>) -> Self {
        Self { kind, records }
    }

    pub fn empty(kind: LedgerKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Minimum and maximum of the chosen date column, skipping records where
    /// the column is unparseable. `None` when no record has a usable date.
    pub fn date_bounds(&self, basis: DateBasis) -> Option<(NaiveDate, NaiveDate)> {
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for date in self.iter().filter_map(|record| record.date(basis)) {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(date), max.max(date)),
                None => (date, date),
            });
        }
        bounds
    }

    /// Default date-range selection for a UI: the column's actual bounds, or
    /// a fixed wide window when every value in the column is unparseable so
    /// downstream range defaults never inherit the failure.
    pub fn default_date_range(&self, basis: DateBasis) -> DateRange {
        self.date_bounds(basis)
            .map(|(start, end)| DateRange::new(start, end))
            .unwrap_or_else(DateRange::sentinel)
    }

    /// Sorted unique non-empty values of a categorical field, for populating
    /// UI multiselects.
    pub fn distinct_values(&self, field: GroupField) -> Vec<String> {
        let values: BTreeSet<&str> = self
            .iter()
            .filter_map(|record| record.categorical(field))
            .filter(|value| !value.is_empty())
            .collect();
        values.into_iter().map(str::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
