use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};

use super::object::CanvasObject;
use crate::error::DeserializationError;

/// Serialized form of a whole canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSnapshot {
    /// Version of the application that wrote the snapshot
    pub version: String,
    pub background: String,
    pub objects: Vec<CanvasObject>,
}

impl CanvasSnapshot {
    pub fn new(background: &str, objects: Vec<CanvasObject>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            background: background.to_owned(),
            objects,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse and validate a snapshot without touching any canvas
    pub fn parse(json: &str) -> Result<Self, DeserializationError> {
        let snapshot: Self = serde_json::from_str(json)?;

        if snapshot.version != env!("CARGO_PKG_VERSION") {
            warn!(
                "Snapshot version {} differs from current version {}",
                snapshot.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        let mut seen = HashSet::new();
        for object in &snapshot.objects {
            if !seen.insert(object.id.as_str()) {
                return Err(DeserializationError::DuplicateId(object.id.clone()));
            }
        }

        Ok(snapshot)
    }
}
