//! The filter engine: an immutable [`FilterSpec`] value object applied to a
//! [`RecordSet`], producing a new set. Records survive when they satisfy ALL
//! active predicates (AND across fields, OR within one field's selection),
//! and the relative order of survivors is the source order.

use crate::record::{DateBasis, Record, RecordSet};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How an empty multiselect in the UI resolves. The source dashboards were
/// split between treating it as "Todas" and as "nothing selected"; the
/// policy is a configuration default, resolved once at
/// [`Selection::from_choices`] time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum EmptySelectionPolicy {
    #[schemars(description = "An empty choice list means no constraint (the 'Todas' behavior)")]
    MatchAll,

    #[schemars(description = "An empty choice list matches no record at all")]
    MatchNone,
}

impl Default for EmptySelectionPolicy {
    fn default() -> Self {
        Self::MatchAll
    }
}

/// The active choice for one categorical field: either unconstrained or an
/// explicit set of admitted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Selection {
    All,
    Subset(BTreeSet<String>),
}

impl Selection {
    pub fn subset<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Subset(values.into_iter().map(Into::into).collect())
    }

    /// Builds a selection from a UI choice list, resolving the
    /// empty-list ambiguity against the given policy.
    pub fn from_choices<I, S>(choices: I, policy: EmptySelectionPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = choices.into_iter().map(Into::into).collect();
        if values.is_empty() {
            match policy {
                EmptySelectionPolicy::MatchAll => Self::All,
                EmptySelectionPolicy::MatchNone => Self::Subset(values),
            }
        } else {
            Self::Subset(values)
        }
    }

    /// `All` admits every record, including those with a missing field
    /// value. A `Subset` admits only present values contained in the set;
    /// values absent from the record set's domain simply match nothing.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Subset(values) => value.is_some_and(|v| values.contains(v)),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::All
    }
}

/// An inclusive calendar date range: both boundaries admit records dated
/// exactly on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The wide fallback window used when a date column has no parseable
    /// values at all.
    pub fn sentinel() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2099, 12, 31).unwrap(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// The full set of active constraints for one filtering pass. Constructed by
/// the UI layer from user input each interaction and threaded as a plain
/// argument; never shared mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Which date column the range applies to (the "Filtrar por:" radio).
    pub date_basis: DateBasis,
    pub date_range: Option<DateRange>,
    pub category: Selection,
    pub cost_center: Selection,
    pub status: Selection,
    pub payment_method: Selection,
    pub subtype: Selection,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            date_basis: DateBasis::Issue,
            date_range: None,
            category: Selection::All,
            cost_center: Selection::All,
            status: Selection::All,
            payment_method: Selection::All,
            subtype: Selection::All,
        }
    }
}

impl FilterSpec {
    pub fn with_date_basis(mut self, basis: DateBasis) -> Self {
        self.date_basis = basis;
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_category(mut self, selection: Selection) -> Self {
        self.category = selection;
        self
    }

    pub fn with_cost_center(mut self, selection: Selection) -> Self {
        self.cost_center = selection;
        self
    }

    pub fn with_status(mut self, selection: Selection) -> Self {
        self.status = selection;
        self
    }

    pub fn with_payment_method(mut self, selection: Selection) -> Self {
        self.payment_method = selection;
        self
    }

    pub fn with_subtype(mut self, selection: Selection) -> Self {
        self.subtype = selection;
        self
    }

    /// Whether one record satisfies every active predicate. A record whose
    /// chosen date column is unparseable fails any active date-range
    /// predicate.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(range) = &self.date_range {
            match record.date(self.date_basis) {
                Some(date) if range.contains(date) => {}
                _ => return false,
            }
        }

        self.category.matches(Some(record.category.as_str()))
            && self.cost_center.matches(Some(record.cost_center.as_str()))
            && self.status.matches(Some(record.status.as_str()))
            && self.payment_method.matches(record.payment_method.as_deref())
            && self.subtype.matches(record.subtype.as_deref())
    }
}

/// Applies a filter spec to a record set, producing a new set with the
/// survivors in source order.
pub fn apply(set: &RecordSet, spec: &FilterSpec) -> RecordSet {
    RecordSet::new(
        set.kind(),
        set.iter()
            .filter(|record| spec.matches(record))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LedgerKind;

    fn sample_set() -> RecordSet {
        let records = vec![
            Record {
                issue_date: NaiveDate::from_ymd_opt(2025, 1, 10),
                amount: 100.0,
                category: "Fixo".to_string(),
                cost_center: "A".to_string(),
                status: "Pago".to_string(),
                payment_method: Some("Pix".to_string()),
                ..Default::default()
            },
            Record {
                issue_date: NaiveDate::from_ymd_opt(2025, 2, 20),
                amount: 50.0,
                category: "Variável".to_string(),
                cost_center: "B".to_string(),
                status: "Em Aberto".to_string(),
                ..Default::default()
            },
            Record {
                issue_date: None,
                amount: 25.0,
                category: "Fixo".to_string(),
                cost_center: "A".to_string(),
                status: "Pago".to_string(),
                ..Default::default()
            },
        ];
        RecordSet::new(LedgerKind::Payable, records)
    }

    #[test]
    fn test_from_choices_empty_list_respects_policy() {
        let choices: Vec<String> = Vec::new();
        assert_eq!(
            Selection::from_choices(choices.clone(), EmptySelectionPolicy::MatchAll),
            Selection::All
        );

        let none = Selection::from_choices(choices, EmptySelectionPolicy::MatchNone);
        assert!(!none.matches(Some("Fixo")));
        assert!(!none.matches(None));
    }

    #[test]
    fn test_subset_excludes_missing_and_unknown_values() {
        let selection = Selection::subset(["Pix"]);
        assert!(selection.matches(Some("Pix")));
        assert!(!selection.matches(Some("Boleto")));
        assert!(!selection.matches(None));

        // A subset naming values outside the record set's domain is not an
        // error; it just matches nothing.
        let spec = FilterSpec::default().with_category(Selection::subset(["Inexistente"]));
        assert!(apply(&sample_set(), &spec).is_empty());
    }

    #[test]
    fn test_all_admits_missing_values() {
        let spec = FilterSpec::default().with_payment_method(Selection::All);
        assert_eq!(apply(&sample_set(), &spec).len(), 3);
    }

    #[test]
    fn test_date_range_is_inclusive_on_both_ends() {
        let set = sample_set();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
        );
        let spec = FilterSpec::default().with_date_range(range);

        let filtered = apply(&set, &spec);
        // Both boundary records survive; the dateless record does not.
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.issue_date.is_some()));
    }

    #[test]
    fn test_filter_is_stable_and_idempotent() {
        let set = sample_set();
        let spec = FilterSpec::default().with_category(Selection::subset(["Fixo"]));

        let once = apply(&set, &spec);
        assert_eq!(once.len(), 2);
        assert_eq!(once.records()[0].amount, 100.0);
        assert_eq!(once.records()[1].amount, 25.0);

        let twice = apply(&once, &spec);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_predicate_order_does_not_matter() {
        let set = sample_set();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        );

        let date_first = apply(
            &apply(&set, &FilterSpec::default().with_date_range(range)),
            &FilterSpec::default().with_category(Selection::subset(["Fixo"])),
        );
        let category_first = apply(
            &apply(
                &set,
                &FilterSpec::default().with_category(Selection::subset(["Fixo"])),
            ),
            &FilterSpec::default().with_date_range(range),
        );

        assert_eq!(date_first, category_first);
    }

    #[test]
    fn test_default_spec_matches_everything() {
        let set = sample_set();
        assert_eq!(apply(&set, &FilterSpec::default()), set);
    }
}
