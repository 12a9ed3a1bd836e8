// 📊 Dataset - Radiative forcing contributions
// Loaded once at startup, immutable afterwards, shared by reference.

use crate::error::{DatasetError, DatasetResult};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

pub const SOURCE_COLUMN: &str = "Source";
pub const MEASURE_COLUMN: &str = "Measure";
pub const CONTRIBUTION_COLUMN: &str = "Contribution";

// ============================================================================
// CORE TYPES
// ============================================================================

/// Measure - how a waterfall bar is drawn
///
/// `Relative` bars are deltas stacked on the running sum, `Total` bars
/// show the running sum itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Relative,
    Total,
}

impl Measure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Measure::Relative => "relative",
            Measure::Total => "total",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Measure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relative" => Ok(Measure::Relative),
            "total" => Ok(Measure::Total),
            _ => Err(s.to_string()),
        }
    }
}

/// One row of the input table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionRecord {
    #[serde(rename = "Source")]
    pub source: String,

    #[serde(rename = "Measure")]
    pub measure: Measure,

    /// Signed forcing in W/m²
    #[serde(rename = "Contribution")]
    pub contribution: f64,
}

impl ContributionRecord {
    pub fn new(source: &str, measure: Measure, contribution: f64) -> Self {
        ContributionRecord {
            source: source.to_string(),
            measure,
            contribution,
        }
    }
}

// ============================================================================
// DATASET
// ============================================================================

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<ContributionRecord>,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn from_records(records: Vec<ContributionRecord>) -> Self {
        Dataset {
            records,
            loaded_at: Utc::now(),
        }
    }

    /// Load the dataset from a CSV file on disk
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_reader(file).map_err(|e| DatasetError::InFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        log::info!(
            "Loaded {} contribution records from {}",
            dataset.len(),
            path.display()
        );
        if dataset.is_empty() {
            log::warn!("{} has a header but no rows", path.display());
        }

        Ok(dataset)
    }

    /// Parse CSV from any reader
    ///
    /// Columns are located by header name, so extra columns and any column
    /// order are accepted. Missing columns, empty sources, unknown measures
    /// and non-numeric contributions abort the load.
    pub fn from_reader<R: Read>(reader: R) -> DatasetResult<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let source_idx = column_index(&headers, SOURCE_COLUMN)?;
        let measure_idx = column_index(&headers, MEASURE_COLUMN)?;
        let contribution_idx = column_index(&headers, CONTRIBUTION_COLUMN)?;

        let mut records = Vec::new();

        for result in rdr.records() {
            let row = result?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            let source = row.get(source_idx).unwrap_or("").to_string();
            if source.is_empty() {
                return Err(DatasetError::EmptySource { line });
            }

            let raw_measure = row.get(measure_idx).unwrap_or("");
            let measure = raw_measure
                .parse::<Measure>()
                .map_err(|value| DatasetError::InvalidMeasure { line, value })?;

            let raw_contribution = row.get(contribution_idx).unwrap_or("");
            let contribution = raw_contribution
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DatasetError::InvalidContribution {
                    line,
                    value: raw_contribution.to_string(),
                })?;

            records.push(ContributionRecord {
                source,
                measure,
                contribution,
            });
        }

        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[ContributionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Distinct Source values in first-appearance order
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.source.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn contains_source(&self, source: &str) -> bool {
        self.records.iter().any(|r| r.source == source)
    }

    /// SHA-256 over the record content, independent of load time
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for r in &self.records {
            hasher.update(format!(
                "{}\u{1f}{}\u{1f}{}\n",
                r.source, r.measure, r.contribution
            ));
        }
        format!("{:x}", hasher.finalize())
    }
}

fn column_index(headers: &StringRecord, name: &'static str) -> DatasetResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(DatasetError::MissingColumn(name))
}

// ============================================================================
// TESTS
// ============================================================================
