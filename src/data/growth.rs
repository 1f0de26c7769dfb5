use std::fmt;
use std::str::FromStr;

use super::model::{MemberRecord, MemberTable, SchemaError};

/// Reported as the percent change when the start year has no members.
pub const EMPTY_BASELINE_PERCENT: f64 = 100.0;

// ---------------------------------------------------------------------------
// Named sub-population predicates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemberPredicate {
    #[default]
    AllMembers,
    Doctoral,
    Female,
    Male,
    Student,
    Researcher,
    Professor,
    Paid,
}

impl MemberPredicate {
    pub const ALL: [MemberPredicate; 8] = [
        MemberPredicate::AllMembers,
        MemberPredicate::Doctoral,
        MemberPredicate::Female,
        MemberPredicate::Male,
        MemberPredicate::Student,
        MemberPredicate::Researcher,
        MemberPredicate::Professor,
        MemberPredicate::Paid,
    ];

    /// Label shown on the metrics tab.
    pub fn label(self) -> &'static str {
        match self {
            MemberPredicate::AllMembers => "All Members",
            MemberPredicate::Doctoral => "Doctoral (PhDs)",
            MemberPredicate::Female => "Female Members",
            MemberPredicate::Male => "Male Members",
            MemberPredicate::Student => "Students",
            MemberPredicate::Researcher => "Researchers",
            MemberPredicate::Professor => "Professors",
            MemberPredicate::Paid => "Paid Members",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            MemberPredicate::AllMembers => "All",
            MemberPredicate::Doctoral => "Doctoral",
            MemberPredicate::Female => "Female",
            MemberPredicate::Male => "Male",
            MemberPredicate::Student => "Student",
            MemberPredicate::Researcher => "Researcher",
            MemberPredicate::Professor => "Professor",
            MemberPredicate::Paid => "Paid",
        }
    }

    pub fn matches(self, record: &MemberRecord) -> bool {
        fn is(field: &Option<String>, expected: &str) -> bool {
            field.as_deref() == Some(expected)
        }
        match self {
            MemberPredicate::AllMembers => true,
            MemberPredicate::Doctoral => is(&record.academic_degree, "Doctoral"),
            MemberPredicate::Female => is(&record.gender, "Female"),
            MemberPredicate::Male => is(&record.gender, "Male"),
            MemberPredicate::Student => is(&record.status, "Student"),
            MemberPredicate::Researcher => is(&record.status, "Researcher"),
            MemberPredicate::Professor => is(&record.status, "Professor"),
            MemberPredicate::Paid => is(&record.membership_status, "Paid"),
        }
    }
}

impl fmt::Display for MemberPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the metrics-tab label or the short name, case-insensitive.
impl FromStr for MemberPredicate {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MemberPredicate::ALL
            .into_iter()
            .find(|p| {
                p.label().eq_ignore_ascii_case(wanted) || p.short_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| SchemaError::UnknownPredicate(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Growth between two admission years
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthResult {
    pub count_start: usize,
    pub count_end: usize,
    pub difference: i64,
    pub percent_change: f64,
}

impl GrowthResult {
    /// True when `percent_change` is the fixed [`EMPTY_BASELINE_PERCENT`]
    /// rather than a ratio.
    pub fn baseline_empty(&self) -> bool {
        self.count_start == 0
    }

    /// `"<difference> (<percent>%)"`, as shown under the metric value.
    pub fn delta_label(&self) -> String {
        format!("{} ({:.1}%)", self.difference, self.percent_change)
    }
}

/// Members admitted in `year` that satisfy `predicate` (all of them when `None`).
pub fn count_at(table: &MemberTable, year: i32, predicate: Option<MemberPredicate>) -> usize {
    let predicate = predicate.unwrap_or_default();
    table
        .records()
        .iter()
        .filter(|rec| rec.admission_year == Some(year) && predicate.matches(rec))
        .count()
}

/// Compare the member counts of two admission years. Years in between are
/// not looked at.
pub fn growth(
    table: &MemberTable,
    start_year: i32,
    end_year: i32,
    predicate: Option<MemberPredicate>,
) -> GrowthResult {
    let count_start = count_at(table, start_year, predicate);
    let count_end = count_at(table, end_year, predicate);
    let difference = count_end as i64 - count_start as i64;
    let percent_change = if count_start > 0 {
        difference as f64 / count_start as f64 * 100.0
    } else {
        log::debug!(
            "no members in {start_year} for {}; reporting {EMPTY_BASELINE_PERCENT}% change",
            predicate.unwrap_or_default()
        );
        EMPTY_BASELINE_PERCENT
    };

    GrowthResult {
        count_start,
        count_end,
        difference,
        percent_change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admitted(year: i32, degree: &str) -> MemberRecord {
        MemberRecord {
            admission_year: Some(year),
            academic_degree: Some(degree.into()),
            ..Default::default()
        }
    }

    fn table_with(counts: &[(i32, usize, &str)]) -> MemberTable {
        counts
            .iter()
            .flat_map(|&(year, n, degree)| (0..n).map(move |_| admitted(year, degree)))
            .collect()
    }

    #[test]
    fn ordinary_growth() {
        let table = table_with(&[(2019, 10, "Master"), (2020, 15, "Master"), (2018, 4, "Master")]);
        let result = growth(&table, 2019, 2020, None);
        assert_eq!(
            (result.count_start, result.count_end, result.difference, result.percent_change),
            (10, 15, 5, 50.0)
        );
        assert!(!result.baseline_empty());
        assert_eq!(result.delta_label(), "5 (50.0%)");
    }

    #[test]
    fn shrinking_population_is_negative() {
        let table = table_with(&[(2020, 8, "Master"), (2021, 6, "Master")]);
        let result = growth(&table, 2020, 2021, None);
        assert_eq!(result.difference, -2);
        assert_eq!(result.percent_change, -25.0);
    }

    #[test]
    fn empty_start_year_reports_sentinel() {
        let table = table_with(&[(2020, 5, "Master")]);
        let result = growth(&table, 2019, 2020, None);
        assert_eq!(
            (result.count_start, result.count_end, result.difference, result.percent_change),
            (0, 5, 5, 100.0)
        );
        assert!(result.baseline_empty());

        // Both years empty still reports the sentinel.
        let none = growth(&table, 2000, 2001, None);
        assert_eq!(none.percent_change, EMPTY_BASELINE_PERCENT);
        assert_eq!(none.difference, 0);
    }

    #[test]
    fn predicate_restricts_both_years() {
        let table = table_with(&[
            (2020, 4, "Doctoral"),
            (2020, 7, "Master"),
            (2021, 6, "Doctoral"),
            (2021, 1, "Bachelor"),
        ]);
        let result = growth(&table, 2020, 2021, Some(MemberPredicate::Doctoral));
        assert_eq!((result.count_start, result.count_end), (4, 6));
        assert_eq!(result.percent_change, 50.0);

        let all = growth(&table, 2020, 2021, Some(MemberPredicate::AllMembers));
        assert_eq!(all, growth(&table, 2020, 2021, None));
        assert_eq!((all.count_start, all.count_end), (11, 7));
    }

    #[test]
    fn rows_without_year_are_never_counted() {
        let mut records = vec![admitted(2020, "Master")];
        records.push(MemberRecord {
            academic_degree: Some("Master".into()),
            ..Default::default()
        });
        let table = MemberTable::new(records);
        assert_eq!(count_at(&table, 2020, None), 1);
    }

    #[test]
    fn predicates_check_their_field() {
        let rec = MemberRecord {
            gender: Some("Female".into()),
            status: Some("Professor".into()),
            membership_status: Some("Paid".into()),
            ..Default::default()
        };
        let matched: Vec<_> = MemberPredicate::ALL
            .into_iter()
            .filter(|p| p.matches(&rec))
            .collect();
        assert_eq!(
            matched,
            vec![
                MemberPredicate::AllMembers,
                MemberPredicate::Female,
                MemberPredicate::Professor,
                MemberPredicate::Paid
            ]
        );
    }

    #[test]
    fn predicate_lookup_by_name() {
        assert_eq!("Doctoral".parse::<MemberPredicate>(), Ok(MemberPredicate::Doctoral));
        assert_eq!("Paid Members".parse::<MemberPredicate>(), Ok(MemberPredicate::Paid));
        assert_eq!("all members".parse::<MemberPredicate>(), Ok(MemberPredicate::AllMembers));
        assert_eq!(
            "Retired".parse::<MemberPredicate>(),
            Err(SchemaError::UnknownPredicate("Retired".into()))
        );
    }
}
