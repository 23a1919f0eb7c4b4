use std::path::PathBuf;

use crate::data::loader::DEFAULT_DATA_PATH;
use crate::data::model::Metric;

/// Overrides the CSV location.
pub const DATA_PATH_ENV: &str = "EDUINSIGHT_DATA";
/// Pre-selects a metric by label or column name.
pub const METRIC_ENV: &str = "EDUINSIGHT_METRIC";

pub const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [600.0, 400.0];

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub initial_metric: Metric,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            initial_metric: Metric::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(DATA_PATH_ENV).ok(),
            std::env::var(METRIC_ENV).ok(),
        )
    }

    fn from_vars(data_path: Option<String>, metric: Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = data_path.filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }

        if let Some(raw) = metric {
            match raw.parse::<Metric>() {
                Ok(m) => config.initial_metric = m,
                Err(e) => log::warn!("Ignoring {METRIC_ENV}: {e}"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let config = AppConfig::from_vars(None, None);
        assert_eq!(config.data_path, PathBuf::from("combined_kpi_data.csv"));
        assert_eq!(config.initial_metric, Metric::EmploymentRate6Months);
    }

    #[test]
    fn overrides_path_and_metric() {
        let config = AppConfig::from_vars(
            Some("/srv/kpi.csv".into()),
            Some("Employer Satisfaction".into()),
        );
        assert_eq!(config.data_path, PathBuf::from("/srv/kpi.csv"));
        assert_eq!(config.initial_metric, Metric::EmployerSatisfaction);
    }

    #[test]
    fn unknown_metric_and_blank_path_are_ignored() {
        let config = AppConfig::from_vars(Some("  ".into()), Some("Tuition".into()));
        assert_eq!(config, AppConfig::default());
    }
}
