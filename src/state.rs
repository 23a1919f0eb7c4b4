use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::filter::{filter, FilteredView, RawDataSort, Selection, TableColumn};
use crate::data::loader;
use crate::data::model::{Dataset, Metric};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub data_path: PathBuf,

    /// Loaded dataset (None when loading failed).
    pub dataset: Option<Arc<Dataset>>,

    /// Current sidebar choices.
    pub selection: Selection,

    /// Pipeline output for `selection` (cached until the next change).
    pub view: FilteredView,

    /// Colour per university.
    pub color_map: ColorMap,

    /// Raw-data table order.
    pub table_sort: RawDataSort,

    /// Blocking error shown instead of the dashboard.
    pub load_error: Option<String>,
}

impl AppState {
    /// Load the configured dataset and apply the sidebar defaults.
    pub fn new(config: &AppConfig) -> Self {
        let mut state = Self {
            data_path: config.data_path.clone(),
            dataset: None,
            selection: Selection::initial(&Dataset::default()),
            view: FilteredView::default(),
            color_map: ColorMap::default(),
            table_sort: RawDataSort::default(),
            load_error: None,
        };
        state.load();
        state.set_metric(config.initial_metric);
        state
    }

    fn load(&mut self) {
        match loader::load_cached(&self.data_path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load KPI data: {e}");
                self.dataset = None;
                self.view = FilteredView::default();
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Drop the cached dataset and read the file again.
    pub fn reload(&mut self) {
        loader::clear_cache();
        let metric = self.selection.metric;
        self.load();
        self.set_metric(metric);
    }

    /// Ingest a dataset, reset filters to their defaults and refilter.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = Selection::initial(&dataset);
        self.color_map = ColorMap::new(&dataset.universities);
        self.table_sort = RawDataSort::default();
        self.dataset = Some(dataset);
        self.load_error = None;
        self.refilter();
    }

    /// Recompute `view` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.view = filter(ds, &self.selection);
            if self.view.is_empty() {
                log::warn!("No rows match the current selection");
            }
        }
    }

    pub fn toggle_university(&mut self, university: &str) {
        toggle(&mut self.selection.universities, university);
        self.refilter();
    }

    pub fn toggle_province(&mut self, province: &str) {
        toggle(&mut self.selection.provinces, province);
        self.refilter();
    }

    pub fn select_all_universities(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.universities = ds.universities.clone();
            self.refilter();
        }
    }

    pub fn select_no_universities(&mut self) {
        self.selection.universities.clear();
        self.refilter();
    }

    pub fn select_all_provinces(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.provinces = ds.provinces.clone();
            self.refilter();
        }
    }

    /// Clearing provinces removes the province filter altogether.
    pub fn select_no_provinces(&mut self) {
        self.selection.provinces.clear();
        self.refilter();
    }

    /// Move the lower bound, clamped to the data and never past `max`.
    pub fn set_min_year(&mut self, year: i32) {
        let Some(bounds) = self.dataset.as_ref().and_then(|ds| ds.years) else {
            return;
        };
        let range = &mut self.selection.year_range;
        range.min = year.clamp(bounds.min, bounds.max);
        range.max = range.max.max(range.min);
        self.refilter();
    }

    /// Move the upper bound, clamped to the data and never below `min`.
    pub fn set_max_year(&mut self, year: i32) {
        let Some(bounds) = self.dataset.as_ref().and_then(|ds| ds.years) else {
            return;
        };
        let range = &mut self.selection.year_range;
        range.max = year.clamp(bounds.min, bounds.max);
        range.min = range.min.min(range.max);
        self.refilter();
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.selection.metric = metric;
        self.refilter();
    }

    pub fn sort_table_by(&mut self, column: TableColumn) {
        self.table_sort.clicked(column);
    }

    /// Row indices for the raw-data table in the current sort order.
    pub fn table_rows(&self) -> Vec<usize> {
        match (&self.dataset, self.table_sort.column) {
            (Some(ds), None) => self.view.display_order(ds),
            (Some(ds), Some(_)) => self.table_sort.apply(ds, &self.view.indices),
            (None, _) => Vec::new(),
        }
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}
