use std::path::PathBuf;

use thiserror::Error;

/// The KPI dataset could not be produced. Fatal to the current interaction.
#[derive(Error, Debug)]
pub enum DataUnavailable {
    #[error("cannot read {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}: malformed row {row}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("{}: row {row} has an empty '{column}'", path.display())]
    EmptyField {
        path: PathBuf,
        row: usize,
        column: &'static str,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown metric: {0}")]
pub struct UnknownMetric(pub String);
