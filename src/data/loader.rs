use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::DataUnavailable;

use super::model::{columns, Dataset, KpiRecord};

/// Location of the KPI table, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "combined_kpi_data.csv";

// ---------------------------------------------------------------------------
// Process-wide cache
// ---------------------------------------------------------------------------

/// The last successfully loaded dataset and the path it came from.
/// Failures never replace it.
static CACHE: Mutex<Option<(PathBuf, Arc<Dataset>)>> = Mutex::new(None);

/// Serialises tests that depend on the contents of [`CACHE`].
#[cfg(test)]
pub(crate) static CACHE_TEST_LOCK: Mutex<()> = Mutex::new(());

/// Memoised [`load_file`]. The lock is held while reading so two callers
/// never parse the same file concurrently.
pub fn load_cached(path: &Path) -> Result<Arc<Dataset>, DataUnavailable> {
    let mut cache = CACHE.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some((cached_path, dataset)) = cache.as_ref() {
        if cached_path == path {
            log::debug!("KPI cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }
    }

    let dataset = Arc::new(load_file(path)?);
    *cache = Some((path.to_path_buf(), Arc::clone(&dataset)));
    Ok(dataset)
}

/// Drop the cached dataset; the next [`load_cached`] reads from disk again.
pub fn clear_cache() {
    let mut cache = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    if cache.take().is_some() {
        log::info!("KPI cache cleared");
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read and validate a KPI CSV without touching the cache.
pub fn load_file(path: &Path) -> Result<Dataset, DataUnavailable> {
    let reader = csv_builder()
        .from_path(path)
        .map_err(|source| DataUnavailable::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let dataset = read_records(reader, path)?;
    if dataset.is_empty() {
        log::warn!("{} has a header but no data rows", path.display());
    }
    log::info!(
        "Loaded {} KPI rows for {} universities from {}",
        dataset.len(),
        dataset.universities.len(),
        path.display()
    );
    Ok(dataset)
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).trim(csv::Trim::Headers);
    builder
}

/// CSV layout: header row naming at least the seven KPI columns, in any
/// order. `Year` must be an integer; metric cells are floats or blank.
fn read_records<R: Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
) -> Result<Dataset, DataUnavailable> {
    let headers = reader
        .headers()
        .map_err(|source| DataUnavailable::Open {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    if let Some(missing) = columns::REQUIRED
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(DataUnavailable::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }

    let mut records = Vec::new();

    // Row numbers are 1-based data rows, header excluded.
    for (row_no, result) in reader.deserialize::<KpiRecord>().enumerate() {
        let row = row_no + 1;
        let record = result.map_err(|source| DataUnavailable::Malformed {
            path: path.to_path_buf(),
            row,
            source,
        })?;

        let empty = if record.university.is_empty() {
            Some(columns::UNIVERSITY)
        } else if record.province.is_empty() {
            Some(columns::PROVINCE)
        } else {
            None
        };
        if let Some(column) = empty {
            return Err(DataUnavailable::EmptyField {
                path: path.to_path_buf(),
                row,
                column,
            });
        }

        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "University,Province,Year,EmploymentRate6Months,GradSatisfaction,EmployerSatisfaction,GraduationRate\n";

    fn csv_with(rows: &str) -> String {
        format!("{HEADER}{rows}")
    }

    fn read_dataset(source: &[u8]) -> Result<Dataset, DataUnavailable> {
        read_records(csv_builder().from_reader(source), Path::new("<memory>"))
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_typed_rows_in_file_order() {
        let text = csv_with("U of A,AB,2019,90.1,88,92.5,70\nMcGill,QC,2019,91,89.5,93,80.2\n");
        let ds = read_dataset(text.as_bytes()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].university, "U of A");
        assert_eq!(ds.records[0].year, 2019);
        assert_eq!(ds.records[0].employer_satisfaction, Some(92.5));
        assert_eq!(ds.records[1].graduation_rate, Some(80.2));
    }

    #[test]
    fn accepts_reordered_and_extra_columns() {
        let text = "Year,University,Notes,Province,GraduationRate,GradSatisfaction,EmployerSatisfaction,EmploymentRate6Months\n\
                    2020,McGill,x,QC,81,82,83,84\n";
        let ds = read_dataset(text.as_bytes()).unwrap();
        assert_eq!(ds.records[0].employment_rate_6_months, Some(84.0));
        assert_eq!(ds.records[0].graduation_rate, Some(81.0));
    }

    #[test]
    fn blank_metric_cell_is_missing() {
        let text = csv_with("McGill,QC,2020,,89,93,80\n");
        let ds = read_dataset(text.as_bytes()).unwrap();
        assert_eq!(ds.records[0].employment_rate_6_months, None);
        assert_eq!(ds.records[0].grad_satisfaction, Some(89.0));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let text = "University,Province,Year,EmploymentRate6Months,GradSatisfaction,EmployerSatisfaction\n";
        let err = read_dataset(text.as_bytes()).unwrap_err();
        match err {
            DataUnavailable::MissingColumn { column, .. } => assert_eq!(column, "GraduationRate"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_integer_year_fails_the_load() {
        let text = csv_with("McGill,QC,2020,90,89,93,80\nMcGill,QC,twenty,90,89,93,80\n");
        let err = read_dataset(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataUnavailable::Malformed { row: 2, .. }));
    }

    #[test]
    fn non_numeric_metric_fails_the_load() {
        let text = csv_with("McGill,QC,2020,high,89,93,80\n");
        let err = read_dataset(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataUnavailable::Malformed { row: 1, .. }));
    }

    #[test]
    fn empty_university_fails_the_load() {
        let text = csv_with(",QC,2020,90,89,93,80\n");
        let err = read_dataset(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataUnavailable::EmptyField { column: "University", .. }
        ));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataUnavailable::Open { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    fn cache_guard() -> std::sync::MutexGuard<'static, ()> {
        CACHE_TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn padded_names_stay_distinct() {
        let text = csv_with(" McGill ,QC,2020,90,89,93,80\nMcGill,QC,2020,91,89,93,80\nMcGill, QC,2021,92,89,93,80\n");
        let ds = read_dataset(text.as_bytes()).unwrap();

        assert_eq!(ds.records[0].university, " McGill ");
        assert_eq!(
            ds.universities.iter().collect::<Vec<_>>(),
            [" McGill ", "McGill"]
        );
        assert_eq!(ds.provinces.iter().collect::<Vec<_>>(), [" QC", "QC"]);
    }

    #[test]
    fn padded_numbers_still_parse() {
        let header = "University , Province,Year,EmploymentRate6Months,GradSatisfaction,EmployerSatisfaction,GraduationRate\n";
        let text = format!("{header}McGill,QC, 2020 , 90.5 ,  ,93,80\n");
        let ds = read_dataset(text.as_bytes()).unwrap();

        assert_eq!(ds.records[0].year, 2020);
        assert_eq!(ds.records[0].employment_rate_6_months, Some(90.5));
        assert_eq!(ds.records[0].grad_satisfaction, None);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let _guard = cache_guard();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");

        assert!(load_cached(&path).is_err());

        std::fs::write(&path, csv_with("McGill,QC,2020,90,89,93,80\n")).unwrap();
        assert_eq!(load_cached(&path).unwrap().len(), 1);

        clear_cache();
    }

    #[test]
    fn poisoned_cache_lock_is_recovered() {
        let _guard = cache_guard();
        let file = write_temp(&csv_with("McGill,QC,2020,90,89,93,80\n"));

        let poisoner = std::thread::spawn(|| {
            let _held = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
            panic!("panic while holding the KPI cache");
        });
        assert!(poisoner.join().is_err());
        assert!(CACHE.is_poisoned());

        assert_eq!(load_cached(file.path()).unwrap().len(), 1);
        clear_cache();
    }

    #[test]
    fn cache_returns_shared_dataset_until_cleared() {
        let _guard = cache_guard();
        let file = write_temp(&csv_with("McGill,QC,2020,90,89,93,80\n"));

        let first = load_cached(file.path()).unwrap();
        let second = load_cached(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        std::fs::write(
            file.path(),
            csv_with("McGill,QC,2020,90,89,93,80\nMcGill,QC,2021,91,89,93,80\n"),
        )
        .unwrap();
        assert_eq!(load_cached(file.path()).unwrap().len(), 1);

        clear_cache();
        let reloaded = load_cached(file.path()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(!Arc::ptr_eq(&first, &reloaded));

        clear_cache();
    }
}
