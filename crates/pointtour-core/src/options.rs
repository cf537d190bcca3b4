//! Configuration options for a tour session.

use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::{UVec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{Result, TourError};

/// Axis direction used for the world up vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisDirection {
    /// Positive X axis.
    PosX,
    /// Negative X axis.
    NegX,
    /// Positive Y axis (default up).
    #[default]
    PosY,
    /// Negative Y axis.
    NegY,
    /// Positive Z axis.
    PosZ,
    /// Negative Z axis.
    NegZ,
}

impl AxisDirection {
    /// Returns the unit vector for this direction.
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        match self {
            AxisDirection::PosX => Vec3::X,
            AxisDirection::NegX => Vec3::NEG_X,
            AxisDirection::PosY => Vec3::Y,
            AxisDirection::NegY => Vec3::NEG_Y,
            AxisDirection::PosZ => Vec3::Z,
            AxisDirection::NegZ => Vec3::NEG_Z,
        }
    }
}

/// Where the orbit-control target goes while the camera flies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum LookTargetPolicy {
    /// Target is recomputed every frame as a point `distance` ahead of the
    /// camera along its current facing direction.
    FollowForward {
        /// Distance from the camera to the target.
        distance: f32,
    },
    /// Target is interpolated toward `end position + offset`, computed once
    /// when the transition begins.
    FixedLookahead {
        /// World-space offset from the destination camera position.
        offset: Vec3,
    },
}

impl Default for LookTargetPolicy {
    fn default() -> Self {
        LookTargetPolicy::FollowForward { distance: 1.0 }
    }
}

/// Options for a tour session.
///
/// Every field has a default, so a JSON file only needs to list what it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TourOptions {
    /// Colored point cloud (PLY).
    pub point_cloud_path: Option<PathBuf>,

    /// Camera pose document (JSON).
    pub cameras_path: Option<PathBuf>,

    /// Directory prepended to marker image references.
    pub image_dir: Option<PathBuf>,

    /// Length of a camera flight in milliseconds.
    pub transition_duration_ms: u64,

    /// Easing applied to flight progress.
    pub easing: Easing,

    /// Orbit target behavior during a flight.
    pub look_target: LookTargetPolicy,

    /// Radius of the pickable marker spheres.
    pub marker_radius: f32,

    /// Marker color.
    pub marker_color: Vec3,

    /// Rendered point size.
    pub point_size: f32,

    /// Color used when the point cloud carries no per-vertex colors.
    pub point_color: Vec3,

    /// Background color.
    pub background_color: Vec3,

    /// Vertical field of view in degrees.
    pub fov_degrees: f32,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Camera position before any asset is loaded.
    pub initial_camera_position: Vec3,

    /// World up direction used by the orbit controls.
    pub up_direction: AxisDirection,

    /// Whether orbit motion eases out over several frames.
    pub damping_enabled: bool,

    /// Fraction of pending orbit motion applied per frame.
    pub damping_factor: f32,

    /// Fade-in time of the photograph shown after a flight.
    pub overlay_fade_ms: u64,

    /// Initial viewport size in pixels.
    pub viewport: UVec2,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            point_cloud_path: None,
            cameras_path: None,
            image_dir: None,
            transition_duration_ms: 1000,
            easing: Easing::Smoothstep,
            look_target: LookTargetPolicy::default(),
            marker_radius: 0.05,
            marker_color: Vec3::new(0.2, 0.6, 1.0),
            point_size: 0.01,
            point_color: Vec3::ONE,
            background_color: Vec3::ZERO,
            fov_degrees: 60.0,
            near: 0.01,
            far: 1000.0,
            initial_camera_position: Vec3::new(0.0, 2.0, 6.0),
            up_direction: AxisDirection::PosY,
            damping_enabled: true,
            damping_factor: 0.05,
            overlay_fade_ms: 500,
            viewport: UVec2::new(1280, 720),
        }
    }
}

impl TourOptions {
    /// Parses options from a JSON string and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file and validates them.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let options = Self::from_json_str(&json)?;
        log::debug!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Flight duration.
    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    /// Overlay fade duration.
    #[must_use]
    pub fn overlay_fade(&self) -> Duration {
        Duration::from_millis(self.overlay_fade_ms)
    }

    /// Checks the numeric fields.
    ///
    /// Comparisons are negated so NaN values are rejected too.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<()> {
        if !(self.marker_radius > 0.0) {
            return Err(TourError::InvalidOptions(format!(
                "marker_radius must be positive, got {}",
                self.marker_radius
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(TourError::InvalidOptions(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(TourError::InvalidOptions(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(TourError::InvalidOptions(format!(
                "damping_factor must be in [0, 1], got {}",
                self.damping_factor
            )));
        }
        if let LookTargetPolicy::FollowForward { distance } = self.look_target {
            if !(distance > 0.0) {
                return Err(TourError::InvalidOptions(format!(
                    "look target distance must be positive, got {distance}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = TourOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.transition_duration(), Duration::from_secs(1));
        assert_eq!(options.easing, Easing::Smoothstep);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = TourOptions::from_json_str(
            r#"{ "transition_duration_ms": 250, "cameras_path": "cams.json" }"#,
        )
        .unwrap();
        assert_eq!(options.transition_duration_ms, 250);
        assert_eq!(options.cameras_path, Some(PathBuf::from("cams.json")));
        assert_eq!(options.marker_radius, 0.05);
    }

    #[test]
    fn test_look_target_policy_json() {
        let options = TourOptions::from_json_str(
            r#"{ "look_target": { "policy": "fixed_lookahead", "offset": [0.0, 0.0, -1.0] } }"#,
        )
        .unwrap();
        assert_eq!(
            options.look_target,
            LookTargetPolicy::FixedLookahead {
                offset: Vec3::new(0.0, 0.0, -1.0)
            }
        );
    }

    #[test]
    fn test_validation_rejects_bad_clip_planes() {
        let options = TourOptions {
            near: 10.0,
            far: 1.0,
            ..TourOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(TourError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            TourOptions::from_json_str("{ not json"),
            Err(TourError::JsonError(_))
        ));
    }
}
