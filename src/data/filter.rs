use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, KpiRecord, Metric, YearRange};

// ---------------------------------------------------------------------------
// Selection: what the user has picked in the sidebar
// ---------------------------------------------------------------------------

/// One interaction's filter choices.
///
/// The two set filters treat "empty" differently: no universities selected
/// matches nothing, while no provinces selected applies no province filter.
/// Users may find this surprising but it is the dashboard's behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub universities: BTreeSet<String>,
    pub provinces: BTreeSet<String>,
    pub year_range: YearRange,
    pub metric: Metric,
}

/// Universities pre-selected when a dataset is first shown.
const DEFAULT_UNIVERSITY_COUNT: usize = 2;

impl Selection {
    /// Sidebar defaults: first two universities in sorted order, no province
    /// filter, the full observed year range and the first metric.
    pub fn initial(dataset: &Dataset) -> Self {
        Selection {
            universities: dataset
                .universities
                .iter()
                .take(DEFAULT_UNIVERSITY_COUNT)
                .cloned()
                .collect(),
            provinces: BTreeSet::new(),
            year_range: dataset.years.unwrap_or(YearRange::new(0, 0)),
            metric: Metric::default(),
        }
    }

    /// Whether `record` passes every active filter.
    pub fn matches(&self, record: &KpiRecord) -> bool {
        self.universities.contains(&record.university)
            && self.year_range.contains(record.year)
            && (self.provinces.is_empty() || self.provinces.contains(&record.province))
    }
}

// ---------------------------------------------------------------------------
// FilteredView: pipeline output
// ---------------------------------------------------------------------------

/// Indices of surviving records, in dataset order, plus the metric to plot.
///
/// All columns of each record stay reachable; the metric only decides what
/// the chart draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredView {
    pub indices: Vec<usize>,
    pub metric: Metric,
}

/// One university's points for the chart, ordered by year.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<'a> {
    pub university: &'a str,
    pub rows: Vec<&'a KpiRecord>,
}

/// Run the pipeline. Pure: the same inputs always give the same view.
pub fn filter(dataset: &Dataset, selection: &Selection) -> FilteredView {
    let indices: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "{} of {} rows match ({} universities, {} provinces, {}..={}, {})",
        indices.len(),
        dataset.len(),
        selection.universities.len(),
        selection.provinces.len(),
        selection.year_range.min,
        selection.year_range.max,
        selection.metric.column()
    );

    FilteredView {
        indices,
        metric: selection.metric,
    }
}

impl FilteredView {
    /// Nothing matched: show the advisory instead of a chart or table.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn rows<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a KpiRecord> + 'a {
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    /// Group rows per university (sorted by name), each sorted by year.
    pub fn series<'a>(&self, dataset: &'a Dataset) -> Vec<Series<'a>> {
        let mut grouped: BTreeMap<&'a str, Vec<&'a KpiRecord>> = BTreeMap::new();
        for &i in &self.indices {
            let rec = &dataset.records[i];
            grouped.entry(rec.university.as_str()).or_default().push(rec);
        }
        grouped
            .into_iter()
            .map(|(university, mut rows)| {
                rows.sort_by_key(|r| r.year);
                Series { university, rows }
            })
            .collect()
    }

    /// Raw-data table order: University then Year, ascending, stable.
    pub fn display_order(&self, dataset: &Dataset) -> Vec<usize> {
        RawDataSort::default().apply(dataset, &self.indices)
    }
}

// ---------------------------------------------------------------------------
// Raw data table sorting
// ---------------------------------------------------------------------------

/// A column of the raw-data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    University,
    Province,
    Year,
    Metric(Metric),
}

impl TableColumn {
    pub const ALL: [TableColumn; 7] = [
        TableColumn::University,
        TableColumn::Province,
        TableColumn::Year,
        TableColumn::Metric(Metric::EmploymentRate6Months),
        TableColumn::Metric(Metric::GradSatisfaction),
        TableColumn::Metric(Metric::EmployerSatisfaction),
        TableColumn::Metric(Metric::GraduationRate),
    ];

    pub fn header(self) -> &'static str {
        match self {
            TableColumn::University => super::model::columns::UNIVERSITY,
            TableColumn::Province => super::model::columns::PROVINCE,
            TableColumn::Year => super::model::columns::YEAR,
            TableColumn::Metric(m) => m.column(),
        }
    }

    pub fn cell(self, record: &KpiRecord) -> String {
        match self {
            TableColumn::University => record.university.clone(),
            TableColumn::Province => record.province.clone(),
            TableColumn::Year => record.year.to_string(),
            TableColumn::Metric(m) => m.value(record).map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    fn compare(self, a: &KpiRecord, b: &KpiRecord) -> Ordering {
        match self {
            TableColumn::University => a.university.cmp(&b.university),
            TableColumn::Province => a.province.cmp(&b.province),
            TableColumn::Year => a.year.cmp(&b.year),
            // Missing values sort first.
            TableColumn::Metric(m) => match (m.value(a), m.value(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Table sort state. `None` column means the default University, Year order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawDataSort {
    pub column: Option<TableColumn>,
    pub descending: bool,
}

impl RawDataSort {
    /// Clicking a header sorts by it; clicking it again flips direction.
    pub fn clicked(&mut self, column: TableColumn) {
        if self.column == Some(column) {
            self.descending = !self.descending;
        } else {
            self.column = Some(column);
            self.descending = false;
        }
    }

    /// Stable sort of `indices`; ties keep their dataset order.
    pub fn apply(&self, dataset: &Dataset, indices: &[usize]) -> Vec<usize> {
        let mut sorted = indices.to_vec();
        sorted.sort_by(|&i, &j| {
            let (a, b) = (&dataset.records[i], &dataset.records[j]);
            let ord = match self.column {
                Some(col) => col.compare(a, b),
                None => TableColumn::University
                    .compare(a, b)
                    .then_with(|| TableColumn::Year.compare(a, b)),
            };
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });
        sorted
    }
}
