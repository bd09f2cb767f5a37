//! The `Content` interchange unit shared by the aggregator and the report.
//!
//! Serialises to the JSON shape
//! `{"metadata": {"name", "datatype", "time"}, "data": [{"id", "description", "timeseries", "total"}]}`.

use serde::{Deserialize, Serialize};

/// Whether a content's values are percent returns or prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Return,
    Price,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub name: String,
    pub datatype: DataKind,
    pub time: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSeries {
    pub id: String,
    pub description: String,
    pub timeseries: Vec<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub metadata: ContentMetadata,
    pub data: Vec<AssetSeries>,
}

impl Content {
    pub fn new(name: impl Into<String>, datatype: DataKind, time: Vec<String>) -> Self {
        Self {
            metadata: ContentMetadata {
                name: name.into(),
                datatype,
                time,
            },
            data: Vec::new(),
        }
    }

    pub fn kind(&self) -> DataKind {
        self.metadata.datatype
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
