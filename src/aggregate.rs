// Grouped sums and top-N selection.
//
// Grouping keys are whatever the caller projects out of a record: a single
// dimension (`r.date`) or a tuple of them (`(r.date, r.industry.clone())`).
// Results come back ordered by key, which is also the tie-break order for
// rankings because the descending sort below is stable.
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::EmissionRecord;

pub const TOTAL_PREFIX: &str = "total";

pub fn sum_by<'a, I, K, F>(records: I, key: F) -> BTreeMap<K, f64>
where
    I: IntoIterator<Item = &'a EmissionRecord>,
    K: Ord,
    F: Fn(&EmissionRecord) -> K,
{
    let mut sums: BTreeMap<K, f64> = BTreeMap::new();
    for r in records {
        *sums.entry(key(r)).or_insert(0.0) += r.emissions;
    }
    sums
}

/// Sort descending by value and keep the first `n`; `None` keeps everything.
pub fn top_n<K>(sums: BTreeMap<K, f64>, n: Option<usize>) -> Vec<(K, f64)> {
    let mut ranked: Vec<(K, f64)> = sums.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    if let Some(n) = n {
        ranked.truncate(n);
    }
    ranked
}

/// Keys of the top `n` groups, in rank order.
pub fn top_keys<K>(sums: BTreeMap<K, f64>, n: usize) -> Vec<K> {
    top_n(sums, Some(n)).into_iter().map(|(k, _)| k).collect()
}

pub fn is_total_industry(industry: &str) -> bool {
    industry.to_lowercase().starts_with(TOTAL_PREFIX)
}
