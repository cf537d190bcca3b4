//! Camera poses and the live viewpoint.

use glam::{Mat3, Quat, Vec3};

use crate::error::{Result, TourError};

/// Facing direction of an unrotated camera (right-handed, looking down -Z).
pub const CAMERA_FORWARD: Vec3 = Vec3::NEG_Z;

/// Smallest determinant accepted for a rotation matrix.
const MIN_ROTATION_DETERMINANT: f32 = 1e-6;

/// Position and orientation of a camera in scene space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera position.
    pub position: Vec3,
    /// Camera orientation (unit quaternion).
    pub orientation: Quat,
}

impl CameraPose {
    /// Creates a pose, normalizing the orientation.
    #[must_use]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
        }
    }

    /// Direction the camera faces.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * CAMERA_FORWARD
    }
}

/// The live camera/controls state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewpointState {
    /// Camera position.
    pub position: Vec3,
    /// Camera orientation (unit quaternion).
    pub orientation: Quat,
    /// Orbit-control target.
    pub look_target: Vec3,
}

impl ViewpointState {
    /// Creates a viewpoint.
    #[must_use]
    pub fn new(position: Vec3, orientation: Quat, look_target: Vec3) -> Self {
        Self {
            position,
            orientation,
            look_target,
        }
    }

    /// The camera part of this viewpoint.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            orientation: self.orientation,
        }
    }

    /// Direction the camera faces.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * CAMERA_FORWARD
    }
}

/// Converts a row-major 3x3 rotation matrix into a unit quaternion.
///
/// Rejects non-finite entries and matrices whose determinant is not clearly
/// positive (singular matrices and reflections).
pub fn rotation_from_rows(rows: [[f32; 3]; 3]) -> Result<Quat> {
    if rows.iter().flatten().any(|v| !v.is_finite()) {
        return Err(TourError::InvalidRotation(
            "matrix has non-finite entries".to_string(),
        ));
    }

    // glam matrices are column-major
    let matrix = Mat3::from_cols_array_2d(&rows).transpose();
    let det = matrix.determinant();
    if det < MIN_ROTATION_DETERMINANT {
        return Err(TourError::InvalidRotation(format!(
            "determinant {det} is not a proper rotation"
        )));
    }

    Ok(Quat::from_mat3(&matrix).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_rows() {
        let q = rotation_from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        assert!((q.dot(Quat::IDENTITY).abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rows_are_read_row_major() {
        // 90 degrees about +Y: x -> -z, z -> x
        let rows = [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]];
        let q = rotation_from_rows(rows).unwrap();
        let expected = Quat::from_rotation_y(FRAC_PI_2);
        assert!((q.dot(expected).abs() - 1.0).abs() < 1e-5);
        assert!((q * Vec3::X - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_reflection_is_rejected() {
        let rows = [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert!(matches!(
            rotation_from_rows(rows),
            Err(TourError::InvalidRotation(_))
        ));
    }

    #[test]
    fn test_singular_and_nan_are_rejected() {
        assert!(rotation_from_rows([[0.0; 3]; 3]).is_err());
        let rows = [[f32::NAN, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert!(rotation_from_rows(rows).is_err());
    }

    #[test]
    fn test_pose_orientation_is_normalized() {
        let pose = CameraPose::new(Vec3::ZERO, Quat::from_xyzw(0.0, 0.0, 0.0, 2.0));
        assert!(pose.orientation.is_normalized());
        assert!((pose.forward() - CAMERA_FORWARD).length() < 1e-6);
    }
}
