//! Doctor Datasets
//!
//! CSV parsing, filtering and clustering for the map views and the
//! `stats`/`clusters` commands.
//!
//! ## Pipeline
//!
//! ```text
//! text ──► skip header ──► FieldTokenizer ──► CsvSchema ──► drop bad coords ──► Dataset<T>
//! ```

mod cluster;
mod filter;
mod schema;
mod tokenizer;

pub use cluster::{cluster_points, Cluster, ClusterRadius, ClusterTier, TIERS};
pub use filter::{distinct_sorted, rank_by_frequency, selection, DoctorFilter, ALL};
pub use schema::{
    CsvSchema, DirectoryRecord, DoctorRecord, Listing, ProfileRecord, WEEKDAYS,
};
pub use tokenizer::FieldTokenizer;

use thiserror::Error;

/// Dataset loading errors
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to fetch dataset {path}: {reason}")]
    Fetch { path: String, reason: String },
}

/// Parsed rows with valid coordinates
#[derive(Debug, Clone)]
pub struct Dataset<T> {
    pub records: Vec<T>,
    /// Rows dropped for missing or invalid coordinates
    pub dropped: usize,
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            dropped: 0,
        }
    }
}

impl<T> Dataset<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse CSV text. The first line is a header and is ignored, as are blank
/// lines. Rows without usable coordinates are counted and dropped.
pub fn parse_csv<T>(text: &str) -> Result<Dataset<T>, DatasetError>
where
    T: CsvSchema + DoctorRecord,
{
    let tokenizer = FieldTokenizer::new()?;
    let mut dataset = Dataset::default();

    for line in text.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let record = T::from_fields(&tokenizer.split(line));
        if record.listing().has_valid_coordinates() {
            dataset.records.push(record);
        } else {
            dataset.dropped += 1;
        }
    }

    if dataset.dropped > 0 {
        tracing::warn!(
            dataset = T::NAME,
            dropped = dataset.dropped,
            "Dropped rows without valid coordinates"
        );
    }
    tracing::info!(dataset = T::NAME, records = dataset.len(), "Loaded dataset");

    Ok(dataset)
}
