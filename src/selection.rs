// ☑️ Selection Set - which forcing agents the user wants on the chart
// Owned by the client; the server only ever sees a copy per request.

use crate::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Checklist values ticked on first load
pub const DEFAULT_SOURCES: [&str; 5] = [
    "Carbon Dioxide",
    "Methane",
    "Albedo (Land use)",
    "Solar irradiance",
    "Net total",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet(BTreeSet<String>);

impl SelectionSet {
    pub fn new() -> Self {
        SelectionSet(BTreeSet::new())
    }

    /// The default subset, restricted to sources the dataset actually has
    pub fn default_for(dataset: &Dataset) -> Self {
        DEFAULT_SOURCES
            .iter()
            .filter(|s| dataset.contains_source(s))
            .copied()
            .collect()
    }

    /// Every distinct source in the dataset
    pub fn all(dataset: &Dataset) -> Self {
        dataset.sources().into_iter().collect()
    }

    pub fn contains(&self, source: &str) -> bool {
        self.0.contains(source)
    }

    pub fn insert(&mut self, source: impl Into<String>) -> bool {
        self.0.insert(source.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Values that cannot match any record
    pub fn unknown_in<'a>(&'a self, dataset: &Dataset) -> Vec<&'a str> {
        self.iter().filter(|s| !dataset.contains_source(s)).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SelectionSet(iter.into_iter().map(Into::into).collect())
    }
}
