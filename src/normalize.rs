//! Cell-level normalizers for Brazilian-formatted spreadsheet exports.
//!
//! Both functions resolve malformed input to `None` rather than erroring:
//! a bad cell must never take down a whole load.

use chrono::NaiveDate;

const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d"];

/// Parses a currency cell like `"R$ 1.234,56"` or `"-R$ 50,00"` into its
/// numeric value. The `R$` prefix is optional and the minus sign may appear
/// on either side of it. Thousands separators (`.`) are removed and the
/// decimal comma becomes a period.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (mut negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix("R$").map(str::trim_start).unwrap_or(rest);
    let rest = match rest.strip_prefix('-') {
        Some(rest) => {
            negative = !negative;
            rest.trim_start()
        }
        None => rest,
    };

    let normalized = rest.replace('.', "").replace(',', ".");
    let value: f64 = normalized.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(if negative { -value } else { value })
}

/// Parses a day-first textual date (`DD/MM/YYYY`, `DD/MM/YY`, or ISO
/// `YYYY-MM-DD` as some sheet exports produce). Invalid calendar dates such
/// as `31/02/2025` resolve to `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
