//! Clickable camera markers.
//!
//! Each marker stands for one photograph: a small sphere at the camera
//! center that flies the viewer to that camera's pose when picked.

mod pose_file;

pub use pose_file::{parse_rotation_rows, parse_vec3, PoseDocument, PoseRecord};

use std::path::{Path, PathBuf};

use glam::{Quat, Vec3};
use pointtour_core::{
    pick_nearest, rotation_from_rows, CameraPose, PickResult, Ray, RayPickable, Result,
    TourOptions,
};

/// File extensions recognized as photographs when a label doubles as a file
/// name.
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "tif", "tiff", "webp", "bmp"];

/// A clickable camera marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    label: String,
    position: Vec3,
    orientation: Option<Quat>,
    translation: Option<Vec3>,
    image: Option<PathBuf>,
    radius: f32,
}

impl Marker {
    /// Creates a marker without orientation or image.
    pub fn new(label: impl Into<String>, position: Vec3, radius: f32) -> Self {
        Self {
            label: label.into(),
            position,
            orientation: None,
            translation: None,
            image: None,
            radius,
        }
    }

    /// Sets the camera orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = Some(orientation.normalize());
        self
    }

    /// Sets the photograph shown on arrival.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<PathBuf>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Sets the raw translation vector from the pose file.
    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the marker position (the camera center).
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Camera orientation, if the pose file provided a usable one.
    #[must_use]
    pub fn orientation(&self) -> Option<Quat> {
        self.orientation
    }

    /// Raw translation vector, if present.
    #[must_use]
    pub fn translation(&self) -> Option<Vec3> {
        self.translation
    }

    /// Photograph associated with the marker.
    #[must_use]
    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    /// Picking radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Destination pose for a flight to this marker.
    ///
    /// Markers without an orientation keep `fallback`, normally the
    /// camera's orientation when the flight starts.
    #[must_use]
    pub fn pose_or(&self, fallback: Quat) -> CameraPose {
        CameraPose::new(self.position, self.orientation.unwrap_or(fallback))
    }
}

impl RayPickable for Marker {
    fn ray_intersect(&self, ray: &Ray) -> Option<f32> {
        ray.intersect_sphere(self.position, self.radius)
    }

    fn pick_label(&self) -> &str {
        &self.label
    }
}

/// The set of markers built from a pose document.
#[derive(Debug, Clone)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    radius: f32,
    color: Vec3,
}

impl MarkerSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new(radius: f32, color: Vec3) -> Self {
        Self {
            markers: Vec::new(),
            radius,
            color,
        }
    }

    /// Creates an empty set styled from tour options.
    #[must_use]
    pub fn from_options(options: &TourOptions) -> Self {
        Self::new(options.marker_radius, options.marker_color)
    }

    /// Builds markers from pose records, in order.
    ///
    /// A record with a malformed center is skipped. A record with a missing
    /// or malformed rotation still gets a marker, without orientation.
    #[must_use]
    pub fn from_records(
        records: &[PoseRecord],
        radius: f32,
        color: Vec3,
        image_dir: Option<&Path>,
    ) -> Self {
        let mut set = Self::new(radius, color);
        for (index, record) in records.iter().enumerate() {
            if let Some(marker) = marker_from_record(index, record, radius, image_dir) {
                set.markers.push(marker);
            }
        }
        log::info!("built {} markers from {} records", set.len(), records.len());
        set
    }

    /// Builds markers from a parsed document, styled from tour options.
    #[must_use]
    pub fn from_document(document: &PoseDocument, options: &TourOptions) -> Self {
        Self::from_records(
            &document.cameras,
            options.marker_radius,
            options.marker_color,
            options.image_dir.as_deref(),
        )
    }

    /// Reads a pose file and builds its markers.
    pub fn load(path: impl AsRef<Path>, options: &TourOptions) -> Result<Self> {
        let document = PoseDocument::load(path)?;
        Ok(Self::from_document(&document, options))
    }

    /// Adds a marker.
    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Returns all markers.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Returns the marker at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Iterates over the markers.
    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    /// Sphere radius used for display.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Marker color.
    #[must_use]
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// The marker hit nearest to the ray origin.
    #[must_use]
    pub fn pick(&self, ray: &Ray) -> Option<PickResult> {
        pick_nearest(ray, &self.markers)
    }
}

impl<'a> IntoIterator for &'a MarkerSet {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}

fn marker_from_record(
    index: usize,
    record: &PoseRecord,
    radius: f32,
    image_dir: Option<&Path>,
) -> Option<Marker> {
    let label = record
        .label
        .clone()
        .unwrap_or_else(|| format!("cam_{index}"));

    let position = match record.center.as_ref().map(parse_vec3).transpose() {
        Ok(center) => center.unwrap_or(Vec3::ZERO),
        Err(e) => {
            log::warn!("skipping camera '{label}': bad center: {e}");
            return None;
        }
    };

    let mut marker = Marker::new(label, position, radius);

    if let Some(rotation) = &record.rotation {
        match parse_rotation_rows(rotation).and_then(rotation_from_rows) {
            Ok(orientation) => marker = marker.with_orientation(orientation),
            Err(e) => log::warn!(
                "camera '{}': {e}; keeping the current orientation on arrival",
                marker.label
            ),
        }
    }

    if let Some(translation) = &record.translation {
        match parse_vec3(translation) {
            Ok(translation) => marker = marker.with_translation(translation),
            Err(e) => log::debug!("camera '{}': ignoring translation: {e}", marker.label),
        }
    }

    if let Some(image) = image_reference(record, &marker.label, image_dir) {
        marker = marker.with_image(image);
    }

    Some(marker)
}

/// The photograph for a record: the explicit `image` field, or the label
/// when it looks like an image file name. Relative paths are resolved
/// against `image_dir`.
fn image_reference(record: &PoseRecord, label: &str, image_dir: Option<&Path>) -> Option<PathBuf> {
    let name = record
        .image
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| has_image_extension(label).then_some(label))?;

    let path = PathBuf::from(name);
    Some(match image_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    })
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const CAMERAS: &str = r#"{ "cameras": [
        { "label": "IMG_0001.JPG", "center": [0, 0, 0],
          "rotation": [[1, 0, 0], [0, 1, 0], [0, 0, 1]] },
        { "center": [2, 0, 0], "rotation": [[0, 0, 1], [0, 1, 0], [-1, 0, 0]],
          "image": "photos/second.png" },
        { "label": "broken", "center": [0, 0, -5], "rotation": [[1, 0], [0, 1]] },
        { "label": "nowhere", "center": "here" },
        { "label": "flat", "center": [0, 3, 0], "rotation": [1, 0, 0, 0, 1, 0, 0, 0, 1],
          "translation": [0.5, 0, 0] }
    ] }"#;

    fn build(image_dir: Option<&Path>) -> MarkerSet {
        let document = PoseDocument::from_json_str(CAMERAS).unwrap();
        MarkerSet::from_records(&document.cameras, 0.05, Vec3::new(0.2, 0.6, 1.0), image_dir)
    }

    #[test]
    fn test_records_become_markers_in_order() {
        let set = build(None);
        let labels: Vec<&str> = set.iter().map(Marker::label).collect();
        assert_eq!(labels, ["IMG_0001.JPG", "cam_1", "broken", "flat"]);
        assert_eq!(set.get(1).unwrap().position(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(set.get(3).unwrap().translation(), Some(Vec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_bad_rotation_keeps_marker_without_orientation() {
        let set = build(None);
        let broken = set.get(2).unwrap();
        assert!(broken.orientation().is_none());

        let fallback = Quat::from_rotation_y(0.3);
        let pose = broken.pose_or(fallback);
        assert_eq!(pose.position, Vec3::new(0.0, 0.0, -5.0));
        assert!(pose.orientation.abs_diff_eq(fallback, 1e-6));
    }

    #[test]
    fn test_rotation_rows_become_orientation() {
        let set = build(None);
        let turned = set.get(1).unwrap().orientation().unwrap();
        let expected = Quat::from_rotation_y(FRAC_PI_2);
        assert!(turned.dot(expected).abs() > 1.0 - 1e-5);
        assert!(set.get(3).unwrap().orientation().unwrap().abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn test_image_references() {
        let set = build(Some(Path::new("/data/images")));
        assert_eq!(
            set.get(0).unwrap().image(),
            Some(Path::new("/data/images/IMG_0001.JPG"))
        );
        assert_eq!(
            set.get(1).unwrap().image(),
            Some(Path::new("/data/images/photos/second.png"))
        );
        assert!(set.get(2).unwrap().image().is_none());

        let set = build(None);
        assert_eq!(set.get(0).unwrap().image(), Some(Path::new("IMG_0001.JPG")));
    }

    #[test]
    fn test_pick_nearest_marker_along_ray() {
        let set = build(None);
        // Looking down -Z from the origin side: both origin marker and the
        // one at z=-5 lie on the ray
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z).unwrap();
        let hit = set.pick(&ray).unwrap();
        assert_eq!(hit.element_index, 0);
        assert_eq!(hit.label, "IMG_0001.JPG");
        assert!((hit.distance - 1.95).abs() < 1e-5);
    }

    #[test]
    fn test_pick_from_inside_a_marker_reaches_the_next_one() {
        let mut set = MarkerSet::new(0.05, Vec3::ONE);
        set.push(Marker::new("here", Vec3::ZERO, 0.05));
        set.push(Marker::new("ahead", Vec3::new(0.0, 0.0, -3.0), 0.05));

        // Camera parked on "here": rays start on its near plane
        let ray = Ray::new(Vec3::new(0.0, 0.0, -0.01), Vec3::NEG_Z).unwrap();
        let hit = set.pick(&ray).unwrap();
        assert_eq!(hit.element_index, 1);
        assert_eq!(hit.label, "ahead");

        let sideways = Ray::new(Vec3::new(0.0, 0.0, -0.01), Vec3::X).unwrap();
        assert!(set.pick(&sideways).is_none());
    }

    #[test]
    fn test_pick_miss() {
        let set = build(None);
        let ray = Ray::new(Vec3::new(10.0, 10.0, 10.0), Vec3::X).unwrap();
        assert!(set.pick(&ray).is_none());
        assert!(MarkerSet::new(0.05, Vec3::ONE).pick(&ray).is_none());
    }

    #[test]
    fn test_image_extension_detection() {
        assert!(has_image_extension("a.JPG"));
        assert!(has_image_extension("dir/b.tiff"));
        assert!(!has_image_extension("cam_3"));
        assert!(!has_image_extension("notes.txt"));
    }
}
