//! Aggregations over a (usually filtered) record set: totals, means, grouped
//! sums with an optional fixed-vs-variable split, monthly trend series and
//! the dashboard's metric-card summary.
//!
//! Everything here is deterministic: identical inputs produce bit-identical
//! results, with `BTreeMap` accumulation and explicit sort rules everywhere
//! ordering could leak.

use crate::record::{DateBasis, GroupField, RecordSet};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Total, mean and count of a record set's amounts. The mean of an empty
/// set is `None`: a dashboard must distinguish "no records" from "records
/// averaging zero".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: f64,
    pub mean: Option<f64>,
    pub count: usize,
}

/// One group's summed amount, e.g. a cost center's total spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

/// A group's total plus its per-category split, for fixed-vs-variable
/// drill-downs within a cost center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBreakdown {
    pub key: String,
    pub total: f64,
    pub by_category: Vec<GroupTotal>,
}

/// The four metric-card numbers of the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowSummary {
    pub total_payable: f64,
    pub mean_payable: Option<f64>,
    pub total_receivable: f64,
    /// Receivable total minus payable total ("saldo líquido").
    pub net_balance: f64,
}

pub fn total(set: &RecordSet) -> f64 {
    set.iter().map(|record| record.amount).sum()
}

pub fn summarize(set: &RecordSet) -> Summary {
    let count = set.len();
    let total = total(set);
    let mean = if count == 0 {
        None
    } else {
        Some(total / count as f64)
    };
    Summary { total, mean, count }
}

/// Sums amounts partitioned by a categorical field, sorted by descending
/// total with ascending-key tie-breaks. Records whose optional grouping
/// field is absent are skipped; required-string fields always partition
/// fully (the empty string is a key).
pub fn sum_by(set: &RecordSet, field: GroupField) -> Vec<GroupTotal> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for record in set {
        if let Some(key) = record.categorical(field) {
            *totals.entry(key.to_string()).or_insert(0.0) += record.amount;
        }
    }

    let mut groups: Vec<GroupTotal> = totals
        .into_iter()
        .map(|(key, total)| GroupTotal { key, total })
        .collect();
    sort_groups(&mut groups);
    groups
}

/// Like [`sum_by`], with each group further split by `category`.
pub fn sum_by_with_category_split(set: &RecordSet, field: GroupField) -> Vec<GroupBreakdown> {
    let mut groups: BTreeMap<String, (f64, BTreeMap<String, f64>)> = BTreeMap::new();
    for record in set {
        if let Some(key) = record.categorical(field) {
            let entry = groups.entry(key.to_string()).or_default();
            entry.0 += record.amount;
            *entry.1.entry(record.category.clone()).or_insert(0.0) += record.amount;
        }
    }

    let mut breakdowns: Vec<GroupBreakdown> = groups
        .into_iter()
        .map(|(key, (total, categories))| {
            let mut by_category: Vec<GroupTotal> = categories
                .into_iter()
                .map(|(key, total)| GroupTotal { key, total })
                .collect();
            sort_groups(&mut by_category);
            GroupBreakdown {
                key,
                total,
                by_category,
            }
        })
        .collect();
    breakdowns.sort_by(|a, b| descending_total(a.total, b.total, &a.key, &b.key));
    breakdowns
}

/// Sums amounts into calendar-month buckets of the chosen date basis, keyed
/// by the first of the month. Dateless records are skipped. Feeds the
/// "spending over time" trend chart.
pub fn monthly_totals(set: &RecordSet, basis: DateBasis) -> BTreeMap<NaiveDate, f64> {
    let mut months: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in set {
        let Some(date) = record.date(basis) else {
            continue;
        };
        let Some(month) = NaiveDate::from_ymd_opt(date.year(), date.month(), 1) else {
            continue;
        };
        *months.entry(month).or_insert(0.0) += record.amount;
    }
    months
}

/// The dashboard's header metrics over the two (filtered) ledgers.
pub fn cashflow_summary(payable: &RecordSet, receivable: &RecordSet) -> CashflowSummary {
    let payable_summary = summarize(payable);
    let total_receivable = total(receivable);
    CashflowSummary {
        net_balance: total_receivable - payable_summary.total,
        total_payable: payable_summary.total,
        mean_payable: payable_summary.mean,
        total_receivable,
    }
}

fn sort_groups(groups: &mut [GroupTotal]) {
    groups.sort_by(|a, b| descending_total(a.total, b.total, &a.key, &b.key));
}

fn descending_total(a_total: f64, b_total: f64, a_key: &str, b_key: &str) -> Ordering {
    b_total
        .partial_cmp(&a_total)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_key.cmp(b_key))
}
