//! Camera pose documents exported from photogrammetry tools.
//!
//! The document is a JSON object with a `cameras` array:
//!
//! ```json
//! { "cameras": [
//!     { "label": "IMG_0001.JPG",
//!       "center": [0.1, 1.2, -0.4],
//!       "rotation": [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
//!       "translation": [0.0, 0.0, 0.0] }
//! ] }
//! ```
//!
//! Every field is optional. Rotation and center are kept as raw JSON so one
//! malformed record cannot fail the whole document.

use std::path::Path;

use glam::Vec3;
use pointtour_core::{Result, TourError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parsed pose document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseDocument {
    /// Camera records in file order.
    #[serde(default)]
    pub cameras: Vec<PoseRecord>,
}

/// One camera entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseRecord {
    /// Camera label, usually the photograph's file name.
    #[serde(default)]
    pub label: Option<String>,

    /// Camera center in scene space.
    #[serde(default)]
    pub center: Option<Value>,

    /// Row-major 3x3 rotation matrix.
    #[serde(default)]
    pub rotation: Option<Value>,

    /// Translation vector (carried along, not used for placement).
    #[serde(default)]
    pub translation: Option<Value>,

    /// Photograph associated with the camera.
    #[serde(default, alias = "filename", alias = "path")]
    pub image: Option<String>,
}

impl PoseDocument {
    /// Parses a pose document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a pose document from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading cameras: {}", path.display());
        let json = std::fs::read_to_string(path)?;
        let document = Self::from_json_str(&json)?;
        log::info!("loaded {} camera entries", document.cameras.len());
        Ok(document)
    }
}

fn number(value: &Value) -> Option<f32> {
    value.as_f64().map(|v| v as f32)
}

/// Reads a 3-vector from a JSON array of three numbers.
pub fn parse_vec3(value: &Value) -> Result<Vec3> {
    let items = value
        .as_array()
        .filter(|items| items.len() == 3)
        .ok_or_else(|| TourError::InvalidPose(format!("expected [x, y, z], got {value}")))?;
    let mut out = [0.0f32; 3];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = number(item)
            .ok_or_else(|| TourError::InvalidPose(format!("non-numeric component {item}")))?;
    }
    Ok(Vec3::from_array(out))
}

/// Reads the rows of a rotation matrix.
///
/// Accepts nested rows (`[[a, b, c], [d, e, f], [g, h, i]]`) or a flat
/// row-major array of nine numbers.
pub fn parse_rotation_rows(value: &Value) -> Result<[[f32; 3]; 3]> {
    let items = value
        .as_array()
        .ok_or_else(|| TourError::InvalidRotation(format!("expected an array, got {value}")))?;

    let flat: Vec<&Value> = if items.len() == 3 && items.iter().all(Value::is_array) {
        let mut flat = Vec::with_capacity(9);
        for row in items {
            let row = row.as_array().map_or(&[][..], Vec::as_slice);
            if row.len() != 3 {
                return Err(TourError::InvalidRotation(format!(
                    "row has {} entries, expected 3",
                    row.len()
                )));
            }
            flat.extend(row);
        }
        flat
    } else if items.len() == 9 {
        items.iter().collect()
    } else {
        return Err(TourError::InvalidRotation(format!(
            "expected 3x3 rows or 9 values, got {} entries",
            items.len()
        )));
    };

    let mut rows = [[0.0f32; 3]; 3];
    for (i, item) in flat.into_iter().enumerate() {
        rows[i / 3][i % 3] = number(item)
            .ok_or_else(|| TourError::InvalidRotation(format!("non-numeric entry {item}")))?;
    }
    Ok(rows)
}
