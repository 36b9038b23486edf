//! Fixed driver code table for the categorical `Abbreviation` input

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Driver code -> integer label.
///
/// Persisted next to the model so the encoding seen at inference matches the
/// one used in training, whatever order drivers arrive in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverEncoder {
    codes: BTreeMap<String, u32>,
}

impl DriverEncoder {
    /// Label codes by sorted position, the way a label encoder fitted on
    /// the same driver set numbers its classes
    pub fn fit<I, S>(drivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<String> = drivers.into_iter().map(|d| d.as_ref().to_string()).collect();
        sorted.sort();
        sorted.dedup();

        let codes = sorted
            .into_iter()
            .enumerate()
            .map(|(i, code)| (code, i as u32))
            .collect();
        Self { codes }
    }

    pub fn encode(&self, driver: &str) -> Option<u32> {
        self.codes.get(driver).copied()
    }

    pub fn contains(&self, driver: &str) -> bool {
        self.codes.contains_key(driver)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
