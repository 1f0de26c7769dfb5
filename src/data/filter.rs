use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dimension, FieldValue, MemberRecord, MemberTable, SchemaError};

// ---------------------------------------------------------------------------
// Filter selection: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection state: maps dimension → set of selected values.
/// If a dimension is absent or its set is empty, it imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeMap<Dimension, BTreeSet<FieldValue>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from dimension names as they appear in the dataset
    /// header. Fails on the first name the schema does not know.
    pub fn from_named<I, N, V>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: IntoIterator<Item = FieldValue>,
    {
        let mut selection = Self::new();
        for (name, values) in entries {
            let dimension: Dimension = name.as_ref().parse()?;
            selection.set(dimension, values);
        }
        Ok(selection)
    }

    /// Builder-style variant of [`FilterSelection::set`].
    pub fn with<V>(mut self, dimension: Dimension, values: V) -> Self
    where
        V: IntoIterator,
        V::Item: Into<FieldValue>,
    {
        self.set(dimension, values.into_iter().map(Into::into));
        self
    }

    /// Replace the selected set of a dimension.
    pub fn set<V>(&mut self, dimension: Dimension, values: V)
    where
        V: IntoIterator<Item = FieldValue>,
    {
        let set: BTreeSet<FieldValue> = values.into_iter().collect();
        if set.is_empty() {
            self.selected.remove(&dimension);
        } else {
            self.selected.insert(dimension, set);
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle(&mut self, dimension: Dimension, value: &FieldValue) {
        let set = self.selected.entry(dimension).or_default();
        if !set.remove(value) {
            set.insert(value.clone());
        }
        if set.is_empty() {
            self.selected.remove(&dimension);
        }
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.selected.remove(&dimension);
    }

    /// Drop selected values of `dimension` that are not in `allowed`.
    /// Returns `true` when something was removed.
    pub fn retain_within(&mut self, dimension: Dimension, allowed: &[FieldValue]) -> bool {
        let Some(set) = self.selected.get_mut(&dimension) else {
            return false;
        };
        let before = set.len();
        set.retain(|v| allowed.contains(v));
        let changed = set.len() != before;
        if set.is_empty() {
            self.selected.remove(&dimension);
        }
        changed
    }

    /// Selected values for a dimension; `None` when unconstrained.
    pub fn values(&self, dimension: Dimension) -> Option<&BTreeSet<FieldValue>> {
        self.selected.get(&dimension)
    }

    pub fn contains(&self, dimension: Dimension, value: &FieldValue) -> bool {
        self.selected
            .get(&dimension)
            .is_some_and(|set| set.contains(value))
    }

    pub fn is_active(&self, dimension: Dimension) -> bool {
        self.selected.get(&dimension).is_some_and(|s| !s.is_empty())
    }

    /// Iterate the constrained dimensions with their selected values.
    pub fn active(&self) -> impl Iterator<Item = (Dimension, &BTreeSet<FieldValue>)> {
        self.selected
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(d, set)| (*d, set))
    }

    /// Does the record satisfy every active constraint?
    ///
    /// A record passes a dimension constraint when its value for that
    /// dimension is one of the selected values. A missing value never passes
    /// a constraint.
    pub fn matches(&self, record: &MemberRecord) -> bool {
        self.active().all(|(dimension, selected)| {
            selected
                .iter()
                .any(|value| record.matches_value(dimension, value))
        })
    }
}

// ---------------------------------------------------------------------------
// Applying a selection
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active filters, in table order.
pub fn filtered_indices(table: &MemberTable, selection: &FilterSelection) -> Vec<usize> {
    table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Return the subset of `table` passing all active filters, preserving order.
pub fn apply_filters(table: &MemberTable, selection: &FilterSelection) -> MemberTable {
    table
        .records()
        .iter()
        .filter(|rec| selection.matches(rec))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Option enumeration (sorted, missing excluded)
// ---------------------------------------------------------------------------

fn distinct_values<'a, I>(rows: I, dimension: Dimension) -> Vec<FieldValue>
where
    I: IntoIterator<Item = &'a MemberRecord>,
{
    rows.into_iter()
        .filter_map(|rec| rec.value(dimension))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct values of `dimension` over the whole table.
pub fn dimension_options(table: &MemberTable, dimension: Dimension) -> Vec<FieldValue> {
    distinct_values(table.records(), dimension)
}

/// Regions occurring among rows whose continent is selected, or among all
/// rows when no continent is selected.
pub fn region_options(table: &MemberTable, continents: &BTreeSet<FieldValue>) -> Vec<FieldValue> {
    let scope = FilterSelection::new().with(Dimension::Continent, continents.iter().cloned());
    distinct_values(
        table.records().iter().filter(|rec| scope.matches(rec)),
        Dimension::Region,
    )
}

/// Countries occurring among rows matching the selected regions; falls back
/// to the selected continents when no region is selected, then to all rows.
pub fn country_options(
    table: &MemberTable,
    regions: &BTreeSet<FieldValue>,
    continents: &BTreeSet<FieldValue>,
) -> Vec<FieldValue> {
    let scope = if !regions.is_empty() {
        FilterSelection::new().with(Dimension::Region, regions.iter().cloned())
    } else {
        FilterSelection::new().with(Dimension::Continent, continents.iter().cloned())
    };
    distinct_values(
        table.records().iter().filter(|rec| scope.matches(rec)),
        Dimension::Country,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(continent: &str, region: &str, country: &str, status: Option<&str>) -> MemberRecord {
        MemberRecord {
            continent: Some(continent.into()),
            region: Some(region.into()),
            country: Some(country.into()),
            status: status.map(Into::into),
            ..Default::default()
        }
    }

    /// 6 European rows and 4 Asian rows, interleaved.
    fn sample_table() -> MemberTable {
        MemberTable::new(vec![
            member("Europe", "Southern Europe", "Portugal", Some("Student")),
            member("Asia", "Eastern Asia", "Japan", Some("Professor")),
            member("Europe", "Southern Europe", "Italy", Some("Researcher")),
            member("Europe", "Western Europe", "France", None),
            member("Asia", "Southern Asia", "India", Some("Student")),
            member("Europe", "Southern Europe", "Italy", Some("Student")),
            member("Asia", "Eastern Asia", "China", Some("Researcher")),
            member("Europe", "Northern Europe", "Sweden", Some("Professor")),
            member("Asia", "Eastern Asia", "Japan", None),
            member("Europe", "Western Europe", "Germany", Some("Student")),
        ])
    }

    fn texts(values: &[FieldValue]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn set(values: &[&str]) -> BTreeSet<FieldValue> {
        values.iter().map(|v| FieldValue::from(*v)).collect()
    }

    #[test]
    fn continent_filter_keeps_european_rows_in_order() {
        let table = sample_table();
        let selection = FilterSelection::new().with(Dimension::Continent, ["Europe"]);

        assert_eq!(filtered_indices(&table, &selection), vec![0, 2, 3, 5, 7, 9]);

        let subset = apply_filters(&table, &selection);
        assert_eq!(subset.len(), 6);
        let expected: Vec<_> = [0, 2, 3, 5, 7, 9]
            .iter()
            .map(|&i| table.records()[i].clone())
            .collect();
        assert_eq!(subset.records(), expected.as_slice());
    }

    #[test]
    fn empty_selection_keeps_everything() {
        let table = sample_table();
        let mut selection = FilterSelection::new();
        selection.set(Dimension::Gender, Vec::new());
        assert_eq!(apply_filters(&table, &selection).len(), table.len());
        assert!(!selection.is_active(Dimension::Gender));
    }

    #[test]
    fn values_within_a_dimension_are_ored() {
        let table = sample_table();
        let selection = FilterSelection::new().with(Dimension::Country, ["Japan", "Italy"]);
        assert_eq!(filtered_indices(&table, &selection), vec![1, 2, 5, 8]);
    }

    #[test]
    fn dimensions_are_anded_and_missing_never_matches() {
        let table = sample_table();
        let selection = FilterSelection::new()
            .with(Dimension::Continent, ["Asia"])
            .with(Dimension::Status, ["Student", "Researcher"]);
        assert_eq!(filtered_indices(&table, &selection), vec![4, 6]);
    }

    #[test]
    fn adding_constraints_never_grows_the_result() {
        let table = sample_table();
        let steps = [
            FilterSelection::new(),
            FilterSelection::new().with(Dimension::Continent, ["Europe", "Asia"]),
            FilterSelection::new()
                .with(Dimension::Continent, ["Europe", "Asia"])
                .with(Dimension::Region, ["Southern Europe", "Eastern Asia"]),
            FilterSelection::new()
                .with(Dimension::Continent, ["Europe", "Asia"])
                .with(Dimension::Region, ["Southern Europe", "Eastern Asia"])
                .with(Dimension::Status, ["Student"]),
        ];
        let sizes: Vec<usize> = steps.iter().map(|s| apply_filters(&table, s).len()).collect();
        assert_eq!(sizes, vec![10, 10, 6, 2]);
        assert!(sizes.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn filtering_twice_is_the_same_as_once() {
        let table = sample_table();
        let selection = FilterSelection::new()
            .with(Dimension::Region, ["Southern Europe", "Eastern Asia"])
            .with(Dimension::Status, ["Student", "Professor"]);
        let once = apply_filters(&table, &selection);
        let twice = apply_filters(&once, &selection);
        assert_eq!(once.records(), twice.records());
    }

    #[test]
    fn year_constraint_matches_derived_year() {
        let table = MemberTable::new(vec![
            MemberRecord { admission_year: Some(2020), ..Default::default() },
            MemberRecord { admission_year: None, ..Default::default() },
            MemberRecord { admission_year: Some(2021), ..Default::default() },
        ]);
        let selection = FilterSelection::new().with(Dimension::AdmissionYear, [2021]);
        assert_eq!(filtered_indices(&table, &selection), vec![2]);
    }

    #[test]
    fn from_named_rejects_unknown_dimensions() {
        let ok = FilterSelection::from_named([("Continent", vec![FieldValue::from("Asia")])]);
        assert!(ok.is_ok_and(|s| s.is_active(Dimension::Continent)));

        let err = FilterSelection::from_named([("Planet", vec![FieldValue::from("Mars")])]);
        assert_eq!(err, Err(SchemaError::UnknownDimension("Planet".into())));
    }

    #[test]
    fn region_options_follow_continent_selection() {
        let table = sample_table();
        let europe = region_options(&table, &set(&["Europe"]));
        assert_eq!(
            texts(&europe),
            vec!["Northern Europe", "Southern Europe", "Western Europe"]
        );
        for region in &europe {
            assert!(table
                .records()
                .iter()
                .filter(|r| r.matches_value(Dimension::Region, region))
                .all(|r| r.continent.as_deref() == Some("Europe")));
        }

        let all = region_options(&table, &BTreeSet::new());
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn country_options_prefer_regions_then_continents() {
        let table = sample_table();
        let by_region = country_options(&table, &set(&["Eastern Asia"]), &set(&["Europe"]));
        assert_eq!(texts(&by_region), vec!["China", "Japan"]);

        let by_continent = country_options(&table, &BTreeSet::new(), &set(&["Asia"]));
        assert_eq!(texts(&by_continent), vec!["China", "India", "Japan"]);

        let everything = country_options(&table, &BTreeSet::new(), &BTreeSet::new());
        assert_eq!(everything.len(), 8);
    }

    #[test]
    fn options_skip_missing_values() {
        let table = sample_table();
        let statuses = dimension_options(&table, Dimension::Status);
        assert_eq!(texts(&statuses), vec!["Professor", "Researcher", "Student"]);
        assert!(dimension_options(&table, Dimension::AdmissionYear).is_empty());
    }

    #[test]
    fn empty_table_yields_empty_outputs() {
        let table = MemberTable::default();
        let selection = FilterSelection::new().with(Dimension::Continent, ["Europe"]);
        assert!(apply_filters(&table, &selection).is_empty());
        assert!(filtered_indices(&table, &FilterSelection::new()).is_empty());
        assert!(region_options(&table, &set(&["Europe"])).is_empty());
        assert!(country_options(&table, &BTreeSet::new(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn retain_within_drops_stale_values() {
        let mut selection = FilterSelection::new().with(Dimension::Region, ["Eastern Asia", "Southern Europe"]);
        let changed = selection.retain_within(Dimension::Region, &[FieldValue::from("Eastern Asia")]);
        assert!(changed);
        assert_eq!(selection.values(Dimension::Region), Some(&set(&["Eastern Asia"])));

        assert!(selection.retain_within(Dimension::Region, &[]));
        assert!(!selection.is_active(Dimension::Region));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = FilterSelection::new();
        let asia = FieldValue::from("Asia");
        selection.toggle(Dimension::Continent, &asia);
        assert!(selection.contains(Dimension::Continent, &asia));
        selection.toggle(Dimension::Continent, &asia);
        assert!(!selection.is_active(Dimension::Continent));
    }
}
