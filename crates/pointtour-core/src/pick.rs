//! Picking and selection system.

use glam::Vec3;

/// A ray in scene space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing the direction.
    ///
    /// Returns `None` for a zero-length direction.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.normalize_or_zero();
        if direction.length_squared() < 1e-12 {
            return None;
        }
        Some(Self { origin, direction })
    }

    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray parameter where the ray enters a sphere.
    ///
    /// A ray starting inside the sphere does not hit it.
    #[must_use]
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let near = -b - discriminant.sqrt();
        (near >= 0.0).then_some(near)
    }
}

/// Result of a pick/selection operation.
#[derive(Debug, Clone)]
pub struct PickResult {
    /// Index of the picked element in its collection.
    pub element_index: usize,

    /// Display name of the picked element.
    pub label: String,

    /// The world position of the hit point.
    pub world_position: Vec3,

    /// Ray parameter of the hit point.
    pub distance: f32,
}

impl PickResult {
    /// Creates a new pick result.
    pub fn new(
        element_index: usize,
        label: impl Into<String>,
        world_position: Vec3,
        distance: f32,
    ) -> Self {
        Self {
            element_index,
            label: label.into(),
            world_position,
            distance,
        }
    }
}

/// Trait for objects that can be hit by a picking ray.
pub trait RayPickable {
    /// Ray parameter of the nearest hit, if any.
    fn ray_intersect(&self, ray: &Ray) -> Option<f32>;

    /// Name reported in a [`PickResult`].
    fn pick_label(&self) -> &str;
}

/// Tests every item and returns the one hit nearest to the ray origin.
pub fn pick_nearest<'a, T, I>(ray: &Ray, items: I) -> Option<PickResult>
where
    T: RayPickable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut best_hit: Option<(usize, &T, f32)> = None;
    for (index, item) in items.into_iter().enumerate() {
        let Some(t) = item.ray_intersect(ray) else {
            continue;
        };
        let is_better = best_hit.as_ref().is_none_or(|(_, _, best_t)| t < *best_t);
        if is_better {
            best_hit = Some((index, item, t));
        }
    }

    best_hit.map(|(index, item, t)| PickResult::new(index, item.pick_label(), ray.at(t), t))
}
