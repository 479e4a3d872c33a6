//! Observation value objects carried between conversion components.

use serde::{Deserialize, Serialize};

use super::attributes::AttributeMap;

/// One data point within a series.
///
/// The value and time period are kept as the raw strings read from the
/// source format; interpretation is left to the conversion components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub value: Option<String>,
    pub time_period: Option<String>,
    pub attributes: AttributeMap,
}

impl Observation {
    /// Create an observation holding only a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            time_period: None,
            attributes: AttributeMap::new(),
        }
    }

    /// Create an observation for a specific time period.
    pub fn at(value: impl Into<String>, time_period: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            time_period: Some(time_period.into()),
            attributes: AttributeMap::new(),
        }
    }

    /// Check whether the observation carries a value.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}
