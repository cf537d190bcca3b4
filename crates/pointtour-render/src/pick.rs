//! Screen-space to scene-space picking rays.

use glam::{UVec2, Vec2, Vec4};
use pointtour_core::Ray;

use crate::camera::Camera;

/// Converts a pixel position (origin top-left, y down) to normalized device
/// coordinates in `[-1, 1]²` (y up).
///
/// Returns `None` for a zero-sized viewport.
#[must_use]
pub fn screen_to_ndc(position: Vec2, viewport: UVec2) -> Option<Vec2> {
    if viewport.x == 0 || viewport.y == 0 {
        return None;
    }

    let half_width = viewport.x as f32 / 2.0;
    let half_height = viewport.y as f32 / 2.0;
    Some(Vec2::new(
        (position.x / half_width) - 1.0,
        1.0 - (position.y / half_height),
    ))
}

/// Builds the ray from the camera through a point in normalized device
/// coordinates.
#[must_use]
pub fn ray_from_ndc(camera: &Camera, ndc: Vec2) -> Option<Ray> {
    let inv_view_proj = camera.view_projection_matrix().inverse();

    // wgpu-style NDC depth [0, 1]
    let near = inv_view_proj * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
    let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

    if near.w.abs() < 1e-6 || far.w.abs() < 1e-6 {
        return None;
    }

    let ray_origin = near.truncate() / near.w;
    let ray_far = far.truncate() / far.w;
    Ray::new(ray_origin, ray_far - ray_origin)
}

/// Builds the picking ray under a pixel position.
#[must_use]
pub fn screen_ray(camera: &Camera, position: Vec2, viewport: UVec2) -> Option<Ray> {
    let ndc = screen_to_ndc(position, viewport)?;
    ray_from_ndc(camera, ndc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_screen_to_ndc_corners() {
        let viewport = UVec2::new(800, 600);
        assert_eq!(screen_to_ndc(Vec2::new(400.0, 300.0), viewport), Some(Vec2::ZERO));
        assert_eq!(
            screen_to_ndc(Vec2::new(0.0, 0.0), viewport),
            Some(Vec2::new(-1.0, 1.0))
        );
        assert_eq!(
            screen_to_ndc(Vec2::new(800.0, 600.0), viewport),
            Some(Vec2::new(1.0, -1.0))
        );
    }

    #[test]
    fn test_zero_viewport_has_no_ray() {
        let camera = Camera::new(1.0);
        assert!(screen_ray(&camera, Vec2::ZERO, UVec2::new(0, 600)).is_none());
    }

    #[test]
    fn test_center_ray_follows_forward() {
        let mut camera = Camera::new(1.0);
        camera.position = Vec3::new(1.0, 2.0, 5.0);
        camera.look_at(Vec3::new(1.0, 2.0, 0.0));
        let ray = screen_ray(&camera, Vec2::new(320.0, 240.0), UVec2::new(640, 480)).unwrap();
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        // origin sits on the near plane
        assert!((ray.origin - Vec3::new(1.0, 2.0, 5.0 - camera.near)).length() < 1e-3);
    }

    #[test]
    fn test_right_edge_ray_leans_right() {
        let camera = Camera::new(1.0);
        let ray = screen_ray(&camera, Vec2::new(640.0, 240.0), UVec2::new(640, 480)).unwrap();
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y.abs() < 1e-4);
    }
}
