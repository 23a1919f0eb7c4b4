use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::UnknownMetric;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub mod columns {
    pub const UNIVERSITY: &str = "University";
    pub const PROVINCE: &str = "Province";
    pub const YEAR: &str = "Year";
    pub const EMPLOYMENT_RATE_6_MONTHS: &str = "EmploymentRate6Months";
    pub const GRAD_SATISFACTION: &str = "GradSatisfaction";
    pub const EMPLOYER_SATISFACTION: &str = "EmployerSatisfaction";
    pub const GRADUATION_RATE: &str = "GraduationRate";

    pub const REQUIRED: [&str; 7] = [
        UNIVERSITY,
        PROVINCE,
        YEAR,
        EMPLOYMENT_RATE_6_MONTHS,
        GRAD_SATISFACTION,
        EMPLOYER_SATISFACTION,
        GRADUATION_RATE,
    ];
}

// ---------------------------------------------------------------------------
// KpiRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// One university's metrics for one year.
///
/// Names are kept byte-for-byte. Numeric cells tolerate surrounding spaces,
/// and metric cells left blank load as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KpiRecord {
    #[serde(rename = "University")]
    pub university: String,
    #[serde(rename = "Province")]
    pub province: String,
    #[serde(rename = "Year", deserialize_with = "padded_year")]
    pub year: i32,
    #[serde(rename = "EmploymentRate6Months", deserialize_with = "padded_metric")]
    pub employment_rate_6_months: Option<f64>,
    #[serde(rename = "GradSatisfaction", deserialize_with = "padded_metric")]
    pub grad_satisfaction: Option<f64>,
    #[serde(rename = "EmployerSatisfaction", deserialize_with = "padded_metric")]
    pub employer_satisfaction: Option<f64>,
    #[serde(rename = "GraduationRate", deserialize_with = "padded_metric")]
    pub graduation_rate: Option<f64>,
}

fn padded_year<'de, D: Deserializer<'de>>(de: D) -> Result<i32, D::Error> {
    let raw = String::deserialize(de)?;
    raw.trim()
        .parse()
        .map_err(|_| D::Error::custom(format!("year '{raw}' is not an integer")))
}

fn padded_metric<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    let raw = String::deserialize(de)?;
    let cell = raw.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse()
        .map(Some)
        .map_err(|_| D::Error::custom(format!("metric '{raw}' is not a number")))
}

// ---------------------------------------------------------------------------
// Metric – the four plottable KPI columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    EmploymentRate6Months,
    GradSatisfaction,
    EmployerSatisfaction,
    GraduationRate,
}

impl Default for Metric {
    fn default() -> Self {
        Metric::ALL[0]
    }
}

impl Metric {
    /// All metrics in the order the selector lists them.
    pub const ALL: [Metric; 4] = [
        Metric::EmploymentRate6Months,
        Metric::GradSatisfaction,
        Metric::EmployerSatisfaction,
        Metric::GraduationRate,
    ];

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::EmploymentRate6Months => "Employment at 6 Months",
            Metric::GradSatisfaction => "Graduate Satisfaction",
            Metric::EmployerSatisfaction => "Employer Satisfaction",
            Metric::GraduationRate => "Graduation Rate",
        }
    }

    /// Backing CSV column.
    pub fn column(self) -> &'static str {
        match self {
            Metric::EmploymentRate6Months => columns::EMPLOYMENT_RATE_6_MONTHS,
            Metric::GradSatisfaction => columns::GRAD_SATISFACTION,
            Metric::EmployerSatisfaction => columns::EMPLOYER_SATISFACTION,
            Metric::GraduationRate => columns::GRADUATION_RATE,
        }
    }

    pub fn value(self, record: &KpiRecord) -> Option<f64> {
        match self {
            Metric::EmploymentRate6Months => record.employment_rate_6_months,
            Metric::GradSatisfaction => record.grad_satisfaction,
            Metric::EmployerSatisfaction => record.employer_satisfaction,
            Metric::GraduationRate => record.graduation_rate,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the label or the column name.
impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s) || m.column().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// YearRange
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` year bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        YearRange { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All records in file order, with the distinct values the filters offer.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<KpiRecord>,
    pub universities: BTreeSet<String>,
    pub provinces: BTreeSet<String>,
    /// Observed year bounds; `None` when there are no records.
    pub years: Option<YearRange>,
}

impl Dataset {
    pub fn from_records(records: Vec<KpiRecord>) -> Self {
        let mut universities = BTreeSet::new();
        let mut provinces = BTreeSet::new();
        let mut years: Option<YearRange> = None;

        for rec in &records {
            universities.insert(rec.university.clone());
            provinces.insert(rec.province.clone());
            years = Some(match years {
                None => YearRange::new(rec.year, rec.year),
                Some(r) => YearRange::new(r.min.min(rec.year), r.max.max(rec.year)),
            });
        }

        Dataset {
            records,
            universities,
            provinces,
            years,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(university: &str, province: &str, year: i32, base: f64) -> KpiRecord {
    KpiRecord {
        university: university.to_string(),
        province: province.to_string(),
        year,
        employment_rate_6_months: Some(base),
        grad_satisfaction: Some(base + 1.0),
        employer_satisfaction: Some(base + 2.0),
        graduation_rate: Some(base + 3.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_mapping_is_total_and_distinct() {
        let cols: BTreeSet<_> = Metric::ALL.iter().map(|m| m.column()).collect();
        let labels: BTreeSet<_> = Metric::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(cols.len(), 4);
        assert_eq!(labels.len(), 4);
        for m in Metric::ALL {
            assert!(columns::REQUIRED.contains(&m.column()));
        }
    }

    #[test]
    fn metric_parses_label_or_column() {
        assert_eq!("Graduation Rate".parse::<Metric>(), Ok(Metric::GraduationRate));
        assert_eq!("GradSatisfaction".parse::<Metric>(), Ok(Metric::GradSatisfaction));
        assert_eq!(
            "Tuition".parse::<Metric>(),
            Err(UnknownMetric("Tuition".to_string()))
        );
    }

    #[test]
    fn metric_value_reads_matching_field() {
        let r = record("McGill", "QC", 2020, 80.0);
        assert_eq!(Metric::EmploymentRate6Months.value(&r), Some(80.0));
        assert_eq!(Metric::GradSatisfaction.value(&r), Some(81.0));
        assert_eq!(Metric::EmployerSatisfaction.value(&r), Some(82.0));
        assert_eq!(Metric::GraduationRate.value(&r), Some(83.0));
    }

    #[test]
    fn default_metric_is_first_listed() {
        assert_eq!(Metric::default(), Metric::EmploymentRate6Months);
    }

    #[test]
    fn dataset_indexes_distinct_values() {
        let ds = Dataset::from_records(vec![
            record("U of A", "AB", 2021, 70.0),
            record("McGill", "QC", 2019, 70.0),
            record("U of A", "AB", 2019, 70.0),
        ]);
        assert_eq!(
            ds.universities.iter().collect::<Vec<_>>(),
            ["McGill", "U of A"]
        );
        assert_eq!(ds.provinces.len(), 2);
        assert_eq!(ds.years, Some(YearRange::new(2019, 2021)));
    }

    #[test]
    fn empty_dataset_has_no_year_range() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.years, None);
    }
}
