//! Camera and orbit-control management.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
use pointtour_core::{AxisDirection, TourOptions, ViewpointState, CAMERA_FORWARD};

/// Smallest polar angle (radians) between the orbit offset and the up axis.
const MIN_POLAR_ANGLE: f32 = 0.01;

/// Pending motion below this magnitude is dropped.
const PENDING_EPSILON: f32 = 1e-5;

/// Builds the orientation of a camera facing `forward` with `up` roughly up.
///
/// Returns `None` when `forward` is zero or parallel to `up`.
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let look = forward.normalize_or_zero();
    let right = look.cross(up).normalize_or_zero();
    if look == Vec3::ZERO || right == Vec3::ZERO {
        return None;
    }
    let up = right.cross(look).normalize();
    // Camera looks down -Z in eye space
    let rotation = Mat3::from_cols(right, up, -look);
    Some(Quat::from_mat3(&rotation).normalize())
}

/// A perspective camera for viewing the tour.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Camera orientation (unit quaternion).
    pub orientation: Quat,
    /// Point the orbit controls revolve around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// World up direction.
    pub up_direction: AxisDirection,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            orientation: Quat::IDENTITY,
            target: Vec3::ZERO,
            fov: 60f32.to_radians(),
            aspect_ratio,
            near: 0.01,
            far: 1000.0,
            up_direction: AxisDirection::PosY,
        };
        camera.look_at(Vec3::ZERO);
        camera
    }

    /// Creates a camera from tour options, looking at the origin.
    #[must_use]
    pub fn from_options(options: &TourOptions) -> Self {
        let aspect_ratio = if options.viewport.y == 0 {
            1.0
        } else {
            options.viewport.x as f32 / options.viewport.y as f32
        };
        let mut camera = Self {
            position: options.initial_camera_position,
            orientation: Quat::IDENTITY,
            target: Vec3::ZERO,
            fov: options.fov_degrees.to_radians(),
            aspect_ratio,
            near: options.near,
            far: options.far,
            up_direction: options.up_direction,
        };
        camera.look_at(Vec3::ZERO);
        camera
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// World up vector.
    #[must_use]
    pub fn world_up(&self) -> Vec3 {
        self.up_direction.to_vec3()
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    /// Returns the projection matrix (right-handed, depth in `[0, 1]`).
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * CAMERA_FORWARD
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// Returns the camera's up direction.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Points the camera at `target` and makes it the orbit center.
    ///
    /// The orientation is kept when `target` coincides with the position or
    /// lies straight along the world up axis.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        if let Some(orientation) = look_rotation(target - self.position, self.world_up()) {
            self.orientation = orientation;
        }
    }

    /// Frames a bounding sphere: the camera sits above and in front of the
    /// center and looks at it.
    pub fn frame_sphere(&mut self, center: Vec3, radius: f32) {
        let radius = if radius > 0.0 { radius } else { 1.0 };
        self.position = center + Vec3::new(0.0, radius * 1.5, radius * 2.0);
        self.look_at(center);
    }

    /// Snapshot of the live viewpoint.
    #[must_use]
    pub fn viewpoint(&self) -> ViewpointState {
        ViewpointState::new(self.position, self.orientation, self.target)
    }

    /// Overwrites position, orientation and orbit target.
    pub fn apply_viewpoint(&mut self, viewpoint: &ViewpointState) {
        self.position = viewpoint.position;
        self.orientation = viewpoint.orientation;
        self.target = viewpoint.look_target;
    }

    /// Returns FOV in degrees.
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

/// Orbit/pan/zoom controls revolving the camera around its target.
///
/// Input accumulates as pending motion; [`OrbitControls::update`] applies it
/// once per frame. With damping, each update applies `damping_factor` of the
/// pending motion and keeps the rest for later frames.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Whether motion eases out over several frames.
    pub damping_enabled: bool,
    /// Fraction of pending motion applied per update.
    pub damping_factor: f32,
    /// Radians per unit of rotate input.
    pub rotate_speed: f32,
    /// Target-distance multiples per unit of pan input.
    pub pan_speed: f32,
    /// Log-distance change per unit of zoom input.
    pub zoom_speed: f32,
    /// Closest allowed camera-to-target distance.
    pub min_distance: f32,
    /// Farthest allowed camera-to-target distance.
    pub max_distance: f32,
    pending_rotate: Vec2,
    pending_pan: Vec2,
    pending_zoom: f32,
}

impl OrbitControls {
    /// Creates controls with the given damping.
    #[must_use]
    pub fn new(damping_enabled: bool, damping_factor: f32) -> Self {
        Self {
            damping_enabled,
            damping_factor: damping_factor.clamp(0.0, 1.0),
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.01,
            max_distance: f32::INFINITY,
            pending_rotate: Vec2::ZERO,
            pending_pan: Vec2::ZERO,
            pending_zoom: 0.0,
        }
    }

    /// Creates controls from tour options.
    #[must_use]
    pub fn from_options(options: &TourOptions) -> Self {
        Self::new(options.damping_enabled, options.damping_factor)
    }

    /// Queues an orbit: `delta_x` revolves around the up axis, `delta_y`
    /// tilts toward or away from it.
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.pending_rotate += Vec2::new(delta_x, delta_y) * self.rotate_speed;
    }

    /// Queues a pan in screen-aligned units scaled by the target distance.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        self.pending_pan += Vec2::new(delta_x, delta_y) * self.pan_speed;
    }

    /// Queues a zoom; positive values move toward the target.
    pub fn zoom(&mut self, delta: f32) {
        self.pending_zoom += delta * self.zoom_speed;
    }

    /// Whether any queued motion remains.
    #[must_use]
    pub fn has_pending_motion(&self) -> bool {
        self.pending_rotate.length_squared() > PENDING_EPSILON * PENDING_EPSILON
            || self.pending_pan.length_squared() > PENDING_EPSILON * PENDING_EPSILON
            || self.pending_zoom.abs() > PENDING_EPSILON
    }

    /// Drops all queued motion.
    pub fn stop(&mut self) {
        self.pending_rotate = Vec2::ZERO;
        self.pending_pan = Vec2::ZERO;
        self.pending_zoom = 0.0;
    }

    /// Applies queued motion to the camera.
    ///
    /// Leaves the camera untouched and returns `false` when nothing is
    /// queued.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if !self.has_pending_motion() {
            self.stop();
            return false;
        }

        let factor = if self.damping_enabled {
            self.damping_factor
        } else {
            1.0
        };
        let rotate = self.pending_rotate * factor;
        let pan = self.pending_pan * factor;
        let zoom = self.pending_zoom * factor;

        let up = camera.world_up();
        let offset = camera.position - camera.target;
        let distance = offset.length().max(self.min_distance);

        // Pan moves camera and target together along the screen axes
        let pan_offset = (camera.right() * -pan.x + camera.up() * pan.y) * distance;
        let target = camera.target + pan_offset;

        let mut direction = offset.normalize_or_zero();
        if direction == Vec3::ZERO {
            direction = -camera.forward();
        }

        // Revolve around the up axis
        direction = Quat::from_axis_angle(up, -rotate.x) * direction;

        // Tilt, keeping clear of the poles
        let polar = direction.dot(up).clamp(-1.0, 1.0).acos();
        let new_polar = (polar - rotate.y).clamp(
            MIN_POLAR_ANGLE,
            std::f32::consts::PI - MIN_POLAR_ANGLE,
        );
        let mut horizontal = (direction - up * direction.dot(up)).normalize_or_zero();
        if horizontal == Vec3::ZERO {
            horizontal = (-camera.forward() - up * (-camera.forward()).dot(up)).normalize_or_zero();
        }
        if horizontal == Vec3::ZERO {
            horizontal = up.any_orthonormal_vector();
        }
        direction = horizontal * new_polar.sin() + up * new_polar.cos();

        let new_distance = (distance * (-zoom).exp()).clamp(self.min_distance, self.max_distance);

        camera.position = target + direction * new_distance;
        camera.look_at(target);

        if self.damping_enabled {
            let keep = 1.0 - factor;
            self.pending_rotate *= keep;
            self.pending_pan *= keep;
            self.pending_zoom *= keep;
        } else {
            self.stop();
        }
        true
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(true, 0.05)
    }
}
