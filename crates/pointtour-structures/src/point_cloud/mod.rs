//! Colored point cloud structure.

mod ply;

pub use ply::{load_ply, read_ply};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Sphere enclosing a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center of the sphere.
    pub center: Vec3,
    /// Radius of the sphere.
    pub radius: f32,
}

/// GPU vertex layout: position followed by linear RGB in `[0, 1]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    /// Position in world space.
    pub position: [f32; 3],
    /// Color in `[0, 1]`.
    pub color: [f32; 3],
}

/// A point cloud with one color per point.
#[derive(Debug, Clone)]
pub struct PointCloud {
    name: String,
    points: Vec<Vec3>,
    colors: Vec<Vec3>,
    point_size: f32,
}

impl PointCloud {
    /// Creates a point cloud painted with a single color.
    pub fn new(name: impl Into<String>, points: Vec<Vec3>, color: Vec3) -> Self {
        let colors = vec![color.clamp(Vec3::ZERO, Vec3::ONE); points.len()];
        Self {
            name: name.into(),
            points,
            colors,
            point_size: 0.01,
        }
    }

    /// Replaces the per-point colors.
    ///
    /// Colors are clamped to `[0, 1]`. Returns the cloud unchanged if the
    /// color count does not match the point count.
    #[must_use]
    pub fn with_colors(mut self, colors: Vec<Vec3>) -> Self {
        if colors.len() == self.points.len() {
            self.colors = colors
                .into_iter()
                .map(|c| c.clamp(Vec3::ZERO, Vec3::ONE))
                .collect();
        } else {
            log::warn!(
                "point cloud '{}': ignoring {} colors for {} points",
                self.name,
                colors.len(),
                self.points.len()
            );
        }
        self
    }

    /// Returns the name of the cloud.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of points.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Returns the per-point colors.
    #[must_use]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Rendered point size.
    #[must_use]
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Sets the rendered point size.
    pub fn set_point_size(&mut self, size: f32) -> &mut Self {
        self.point_size = size.max(0.0);
        self
    }

    /// Axis-aligned bounding box, or `None` for an empty cloud.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Sphere centered on the bounding box, just large enough to hold every
    /// point.
    #[must_use]
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        let (min, max) = self.bounding_box()?;
        let center = (min + max) * 0.5;
        let radius_squared = self
            .points
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0f32, f32::max);
        Some(BoundingSphere {
            center,
            radius: radius_squared.sqrt(),
        })
    }

    /// Interleaved vertices for upload.
    #[must_use]
    pub fn vertices(&self) -> Vec<PointVertex> {
        self.points
            .iter()
            .zip(&self.colors)
            .map(|(p, c)| PointVertex {
                position: p.to_array(),
                color: c.to_array(),
            })
            .collect()
    }

    /// Interleaved vertices as raw bytes.
    #[must_use]
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.vertices()).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bounding_sphere_of_box_corners() {
        let cloud = PointCloud::new(
            "cube",
            vec![Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::ZERO],
            Vec3::ONE,
        );
        let sphere = cloud.bounding_sphere().unwrap();
        assert_eq!(sphere.center, Vec3::ZERO);
        assert!((sphere.radius - 3f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_bounding_sphere_is_box_centered() {
        let cloud = PointCloud::new(
            "offset",
            vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 0.0), Vec3::new(4.0, 0.0, 0.0)],
            Vec3::ONE,
        );
        let sphere = cloud.bounding_sphere().unwrap();
        assert_eq!(sphere.center, Vec3::new(3.0, 1.0, 0.0));
        assert!((sphere.radius - 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_empty_cloud_has_no_extent() {
        let cloud = PointCloud::new("empty", Vec::new(), Vec3::ONE);
        assert!(cloud.is_empty());
        assert!(cloud.bounding_box().is_none());
        assert!(cloud.bounding_sphere().is_none());
        assert!(cloud.vertex_bytes().is_empty());
    }

    #[test]
    fn test_colors_are_clamped_and_length_checked() {
        let cloud = PointCloud::new("pts", vec![Vec3::ZERO, Vec3::X], Vec3::splat(2.0));
        assert_eq!(cloud.colors(), &[Vec3::ONE, Vec3::ONE]);

        let cloud = cloud.with_colors(vec![Vec3::new(-1.0, 0.5, 3.0), Vec3::ZERO]);
        assert_eq!(cloud.colors()[0], Vec3::new(0.0, 0.5, 1.0));

        let cloud = cloud.with_colors(vec![Vec3::ZERO]);
        assert_eq!(cloud.colors()[0], Vec3::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn test_vertex_layout() {
        let cloud = PointCloud::new("pts", vec![Vec3::new(1.0, 2.0, 3.0)], Vec3::new(0.1, 0.2, 0.3));
        let vertices = cloud.vertices();
        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].color, [0.1, 0.2, 0.3]);
        assert_eq!(cloud.vertex_bytes().len(), 6 * std::mem::size_of::<f32>());
    }

    proptest! {
        #[test]
        fn prop_bounding_sphere_holds_every_point(
            coords in prop::collection::vec((-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0), 1..64)
        ) {
            let points: Vec<Vec3> = coords.into_iter().map(|(x, y, z)| Vec3::new(x, y, z)).collect();
            let cloud = PointCloud::new("random", points, Vec3::ONE);
            let sphere = cloud.bounding_sphere().unwrap();
            for p in cloud.points() {
                prop_assert!(p.distance(sphere.center) <= sphere.radius * (1.0 + 1e-5) + 1e-5);
            }
        }
    }
}
