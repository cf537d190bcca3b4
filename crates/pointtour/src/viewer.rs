//! The tour viewer session.

use std::path::{Path, PathBuf};
use std::time::Instant;

use glam::{Mat4, UVec2, Vec2, Vec3};
use pointtour_core::{PickResult, Result, TourError, TourOptions, ViewpointState};
use pointtour_render::{screen_ray, Camera, OrbitControls, TransitionConfig, TransitionEngine};
use pointtour_structures::{load_ply, ImageOverlay, MarkerSet, PointCloud};

use crate::input::{InputEvent, PointerButton};

/// Log-distance change per scroll line.
const ZOOM_PER_LINE: f32 = 0.05;

/// Everything an external renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    /// Combined view-projection matrix.
    pub view_projection: Mat4,
    /// Live camera state after this frame's update.
    pub viewpoint: ViewpointState,
    /// Clear color.
    pub background_color: Vec3,
    /// Raw progress of the flight stepped this frame, if any.
    pub transition_progress: Option<f32>,
    /// Photograph to draw over the scene.
    pub overlay_image: Option<PathBuf>,
    /// Opacity of the photograph.
    pub overlay_opacity: f32,
    /// Marker reached on this frame.
    pub completed_marker: Option<usize>,
}

/// A virtual tour: point cloud, camera markers, and the viewpoint flying
/// between them.
pub struct Viewer {
    options: TourOptions,
    camera: Camera,
    controls: OrbitControls,
    transition: TransitionEngine,
    markers: MarkerSet,
    point_cloud: Option<PointCloud>,
    overlay: ImageOverlay,
    viewport: UVec2,
    flight_marker: Option<usize>,
    active_marker: Option<usize>,
}

impl Viewer {
    /// Creates an empty viewer from validated options.
    pub fn new(options: TourOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            camera: Camera::from_options(&options),
            controls: OrbitControls::from_options(&options),
            transition: TransitionEngine::new(TransitionConfig::from_options(&options)),
            markers: MarkerSet::from_options(&options),
            point_cloud: None,
            overlay: ImageOverlay::new(options.overlay_fade()),
            viewport: options.viewport,
            flight_marker: None,
            active_marker: None,
            options,
        })
    }

    /// Loads the point cloud and cameras named in the options.
    ///
    /// Failures are logged and skipped; the viewer stays usable with
    /// whatever loaded.
    pub fn load_assets(&mut self) {
        if let Some(path) = self.options.point_cloud_path.clone() {
            if let Err(e) = self.load_point_cloud(&path) {
                log::error!("failed to load point cloud {}: {e}", path.display());
            }
        }
        if let Some(path) = self.options.cameras_path.clone() {
            if let Err(e) = self.load_cameras(&path) {
                log::error!("failed to load cameras {}: {e}", path.display());
            }
        }
    }

    /// Loads a PLY point cloud and frames the view on it.
    pub fn load_point_cloud(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut cloud = load_ply(path, self.options.point_color)?;
        cloud.set_point_size(self.options.point_size);
        self.set_point_cloud(cloud);
        Ok(())
    }

    /// Loads a camera pose file, replacing the markers. Returns the marker
    /// count.
    pub fn load_cameras(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let markers = MarkerSet::load(path, &self.options)?;
        let count = markers.len();
        self.set_markers(markers);
        Ok(count)
    }

    /// Replaces the point cloud and frames the view on its bounding sphere.
    pub fn set_point_cloud(&mut self, cloud: PointCloud) {
        if let Some(sphere) = cloud.bounding_sphere() {
            log::debug!(
                "framing point cloud: center {:?}, radius {}",
                sphere.center,
                sphere.radius
            );
            self.transition.cancel();
            self.flight_marker = None;
            self.controls.stop();
            self.camera.frame_sphere(sphere.center, sphere.radius);
        }
        self.point_cloud = Some(cloud);
    }

    /// Replaces the markers.
    pub fn set_markers(&mut self, markers: MarkerSet) {
        self.transition.cancel();
        self.flight_marker = None;
        self.active_marker = None;
        self.overlay.hide();
        self.markers = markers;
    }

    /// Reacts to one input event.
    pub fn handle_event(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::Click { position } => {
                let Some(hit) = self.pick_at(position) else {
                    log::debug!("click at {position:?} hit no marker");
                    return;
                };
                log::debug!("picked marker '{}' at distance {}", hit.label, hit.distance);
                if let Err(e) = self.fly_to_marker(hit.element_index, now) {
                    log::warn!("{e}");
                }
            }
            InputEvent::Drag { delta, button } => {
                if self.transition.is_active() {
                    return;
                }
                let height = self.viewport.y.max(1) as f32;
                match button {
                    PointerButton::Primary => {
                        let scale = std::f32::consts::TAU / height;
                        self.controls.rotate(delta.x * scale, delta.y * scale);
                    }
                    PointerButton::Secondary => {
                        let scale = 2.0 * (self.camera.fov * 0.5).tan() / height;
                        self.controls.pan(delta.x * scale, delta.y * scale);
                    }
                }
            }
            InputEvent::Scroll { delta } => {
                if !self.transition.is_active() {
                    self.controls.zoom(delta * ZOOM_PER_LINE);
                }
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    /// Sets the viewport size in pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = UVec2::new(width, height);
        if width > 0 && height > 0 {
            self.camera.set_aspect_ratio(width as f32 / height as f32);
        }
    }

    /// The marker under a pixel position, if any.
    #[must_use]
    pub fn pick_at(&self, position: Vec2) -> Option<PickResult> {
        let ray = screen_ray(&self.camera, position, self.viewport)?;
        self.markers.pick(&ray)
    }

    /// Starts a flight to the marker at `index`, replacing any flight in
    /// progress.
    pub fn fly_to_marker(&mut self, index: usize, now: Instant) -> Result<()> {
        let marker = self
            .markers
            .get(index)
            .ok_or(TourError::MarkerNotFound(index))?;
        let target = marker.pose_or(self.camera.orientation);
        log::info!("flying to marker '{}'", marker.label());

        self.overlay.hide();
        self.controls.stop();
        self.active_marker = None;
        self.flight_marker = Some(index);
        self.transition.begin(self.camera.viewpoint(), target, now);
        Ok(())
    }

    /// Steps the viewer to `now` and returns what to draw.
    ///
    /// A flight in progress drives the camera; otherwise the orbit controls
    /// do.
    pub fn frame(&mut self, now: Instant) -> FrameState {
        let mut transition_progress = None;
        let mut completed_marker = None;

        if let Some(step) = self.transition.advance(now) {
            self.camera.apply_viewpoint(&step.viewpoint);
            transition_progress = Some(step.progress);
            if step.completed {
                completed_marker = self.flight_marker.take();
            }
        } else {
            self.controls.update(&mut self.camera);
        }

        if let Some(index) = completed_marker {
            self.arrive(index, now);
        }
        self.overlay.update(now);

        FrameState {
            view_projection: self.camera.view_projection_matrix(),
            viewpoint: self.camera.viewpoint(),
            background_color: self.options.background_color,
            transition_progress,
            overlay_image: self.overlay.image().map(Path::to_path_buf),
            overlay_opacity: self.overlay.opacity(now),
            completed_marker,
        }
    }

    fn arrive(&mut self, index: usize, now: Instant) {
        self.active_marker = Some(index);
        let Some(marker) = self.markers.get(index) else {
            return;
        };
        log::info!("arrived at marker '{}'", marker.label());
        if let Some(image) = marker.image() {
            self.overlay.show(image, now);
        }
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &TourOptions {
        &self.options
    }

    /// Returns the camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Returns the camera for direct manipulation.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Returns the orbit controls.
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Returns the markers.
    #[must_use]
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Returns the point cloud, if one is loaded.
    #[must_use]
    pub fn point_cloud(&self) -> Option<&PointCloud> {
        self.point_cloud.as_ref()
    }

    /// Returns the photograph overlay.
    #[must_use]
    pub fn overlay(&self) -> &ImageOverlay {
        &self.overlay
    }

    /// Whether a flight is in progress.
    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.transition.is_active()
    }

    /// Marker the viewer last arrived at, cleared when a new flight starts.
    #[must_use]
    pub fn active_marker(&self) -> Option<usize> {
        self.active_marker
    }

    /// Viewport size in pixels.
    #[must_use]
    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use pointtour_structures::Marker;

    fn viewer() -> Viewer {
        let mut viewer = Viewer::new(TourOptions::default()).unwrap();
        let mut markers = MarkerSet::from_options(viewer.options());
        markers.push(Marker::new("origin", Vec3::ZERO, 0.05).with_image("origin.jpg"));
        markers.push(Marker::new("left", Vec3::new(-3.0, 0.0, 0.0), 0.05));
        viewer.set_markers(markers);
        viewer
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let options = TourOptions {
            marker_radius: 0.0,
            ..TourOptions::default()
        };
        assert!(matches!(
            Viewer::new(options),
            Err(TourError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_unknown_marker() {
        let mut viewer = viewer();
        assert!(matches!(
            viewer.fly_to_marker(7, Instant::now()),
            Err(TourError::MarkerNotFound(7))
        ));
        assert!(!viewer.is_flying());
    }

    #[test]
    fn test_flight_keeps_orientation_without_rotation() {
        let mut viewer = viewer();
        let t0 = Instant::now();
        let start_orientation = viewer.camera().orientation;

        viewer.fly_to_marker(1, t0).unwrap();
        let frame = viewer.frame(t0 + Duration::from_secs(2));

        assert_eq!(frame.completed_marker, Some(1));
        assert_eq!(frame.viewpoint.position, Vec3::new(-3.0, 0.0, 0.0));
        assert!(frame.viewpoint.orientation.abs_diff_eq(start_orientation, 1e-6));
        assert!(frame.overlay_image.is_none());
        assert_eq!(viewer.active_marker(), Some(1));
    }

    #[test]
    fn test_drag_is_ignored_during_flight() {
        let mut viewer = viewer();
        let t0 = Instant::now();
        viewer.fly_to_marker(0, t0).unwrap();
        viewer.handle_event(
            InputEvent::Drag {
                delta: Vec2::new(100.0, 0.0),
                button: PointerButton::Primary,
            },
            t0,
        );
        assert!(!viewer.controls_mut().has_pending_motion());
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut viewer = viewer();
        viewer.handle_event(
            InputEvent::Resize {
                width: 400,
                height: 200,
            },
            Instant::now(),
        );
        assert_eq!(viewer.viewport(), UVec2::new(400, 200));
        assert_eq!(viewer.camera().aspect_ratio, 2.0);

        viewer.resize(0, 0);
        assert_eq!(viewer.camera().aspect_ratio, 2.0);
        assert!(viewer.pick_at(Vec2::ZERO).is_none());
    }
}
