// Period labels (`2010Q1`) and the calendar fields derived from them.
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Quarter;

static PERIOD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}Q[1-4]$").expect("valid period regex"));

/// Month used when the quarter token is not `Q1..Q4`.
const FALLBACK_MONTH: u32 = 12;

pub fn is_period_label(label: &str) -> bool {
    PERIOD_RE.is_match(label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodStamp {
    pub year: i32,
    pub quarter: Option<Quarter>,
    pub date: NaiveDate,
}

/// Year from the first four characters, quarter from the last two, date on
/// the first day of the quarter's last month. An unknown quarter token falls
/// back to December instead of failing.
pub fn parse_period(label: &str) -> Option<PeriodStamp> {
    let year: i32 = label.get(..4)?.parse().ok()?;
    let quarter = label
        .len()
        .checked_sub(2)
        .and_then(|start| label.get(start..))
        .and_then(Quarter::from_token);
    let month = quarter.map(Quarter::end_month).unwrap_or(FALLBACK_MONTH);
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(PeriodStamp { year, quarter, date })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_only_exact_period_labels() {
        assert!(is_period_label("2010Q1"));
        assert!(is_period_label("2025Q4"));
        assert!(!is_period_label("2010Q5"));
        assert!(!is_period_label("2010 Q1"));
        assert!(!is_period_label("x2010Q1"));
        assert!(!is_period_label("2010Q1 "));
        assert!(!is_period_label("Country"));
    }

    #[test]
    fn quarter_maps_to_last_month() {
        let s = parse_period("2011Q2").unwrap();
        assert_eq!(s.year, 2011);
        assert_eq!(s.quarter, Some(Quarter::Q2));
        assert_eq!(s.date, NaiveDate::from_ymd_opt(2011, 6, 1).unwrap());
        assert_eq!(parse_period("2010Q1").unwrap().date, NaiveDate::from_ymd_opt(2010, 3, 1).unwrap());
        assert_eq!(parse_period("2010Q3").unwrap().date, NaiveDate::from_ymd_opt(2010, 9, 1).unwrap());
    }

    #[test]
    fn malformed_quarter_falls_back_to_december() {
        let s = parse_period("2015Q9").unwrap();
        assert_eq!(s.quarter, None);
        assert_eq!(s.date, NaiveDate::from_ymd_opt(2015, 12, 1).unwrap());
    }

    #[test]
    fn unparseable_year_yields_none() {
        assert!(parse_period("abcdQ1").is_none());
        assert!(parse_period("20").is_none());
    }
}
