use std::collections::BTreeMap;

use super::model::{Dimension, FieldValue, MemberRecord, SchemaError};

// ---------------------------------------------------------------------------
// Distribution of one dimension over a filtered subset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionEntry {
    pub value: FieldValue,
    pub count: usize,
    /// Share of the non-missing rows, in percent, rounded to one decimal.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub dimension: Dimension,
    /// Rows with a non-missing value for `dimension`.
    pub total: usize,
    /// Descending count, ties broken by value ascending.
    pub entries: Vec<DistributionEntry>,
}

impl Distribution {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.value.to_string()).collect()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

/// Count rows per value of `dimension`. Rows missing the value are left out
/// of both the groups and the percentage base.
pub fn summarize<'a, I>(rows: I, dimension: Dimension) -> Distribution
where
    I: IntoIterator<Item = &'a MemberRecord>,
{
    let mut counts: BTreeMap<FieldValue, usize> = BTreeMap::new();
    for rec in rows {
        if let Some(value) = rec.value(dimension) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let total: usize = counts.values().sum();
    let mut entries: Vec<DistributionEntry> = counts
        .into_iter()
        .map(|(value, count)| DistributionEntry {
            value,
            count,
            percentage: round1(count as f64 / total as f64 * 100.0),
        })
        .collect();
    // BTreeMap iteration already sorted by value; a stable sort keeps that
    // order among equal counts.
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Distribution {
        dimension,
        total,
        entries,
    }
}

/// [`summarize`] with the dimension given by its column name.
pub fn summarize_named<'a, I>(rows: I, dimension: &str) -> Result<Distribution, SchemaError>
where
    I: IntoIterator<Item = &'a MemberRecord>,
{
    let dimension: Dimension = dimension.parse()?;
    Ok(summarize(rows, dimension))
}
