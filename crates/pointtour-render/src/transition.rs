//! Camera flight animation between poses.
//!
//! A transition interpolates the viewpoint from wherever it is when the
//! flight starts to a destination [`CameraPose`]: position by linear
//! interpolation, orientation by shortest-arc slerp, both driven by an eased
//! progress value computed from wall-clock time. The orbit target follows
//! the configured [`LookTargetPolicy`].

use std::time::{Duration, Instant};

use glam::{Quat, Vec3};
use pointtour_core::{
    CameraPose, Easing, LookTargetPolicy, TourOptions, ViewpointState, CAMERA_FORWARD,
};

/// Above this dot product two orientations are interpolated linearly.
const SLERP_LINEAR_THRESHOLD: f32 = 0.9995;

/// Dot products this close to zero are treated as a half turn.
const HALF_TURN_EPSILON: f32 = 1e-6;

/// Sign of the largest-magnitude component, checked in `w, x, y, z` order.
///
/// `q` and `-q` have the same largest component with opposite signs, so the
/// result picks one representative per rotation.
fn canonical_sign(q: Quat) -> f32 {
    let mut best = q.w;
    for component in [q.x, q.y, q.z] {
        if component.abs() > best.abs() {
            best = component;
        }
    }
    if best < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Interpolates two unit quaternions along the shortest arc.
///
/// The endpoints are returned unchanged at `t = 0` and `t = 1`. For a half
/// turn both arcs are equally short; the direction then depends only on the
/// rotation `end` represents, never on the sign it was written with.
#[must_use]
pub fn slerp_shortest(start: Quat, end: Quat, t: f32) -> Quat {
    if t <= 0.0 {
        return start;
    }
    if t >= 1.0 {
        return end;
    }

    let mut end = end;
    let mut dot = start.dot(end);
    let flip = if dot.abs() <= HALF_TURN_EPSILON {
        canonical_sign(end) < 0.0
    } else {
        dot < 0.0
    };
    if flip {
        end = -end;
        dot = -dot;
    }

    if dot > SLERP_LINEAR_THRESHOLD {
        return (start * (1.0 - t) + end * t).normalize();
    }

    let theta = dot.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let scale_start = ((1.0 - t) * theta).sin() / sin_theta;
    let scale_end = (t * theta).sin() / sin_theta;
    (start * scale_start + end * scale_end).normalize()
}

/// Settings shared by every transition an engine runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    /// Flight length.
    pub duration: Duration,
    /// Progress easing.
    pub easing: Easing,
    /// Orbit target behavior.
    pub look_target: LookTargetPolicy,
}

impl TransitionConfig {
    /// Creates a config from tour options.
    #[must_use]
    pub fn from_options(options: &TourOptions) -> Self {
        Self {
            duration: options.transition_duration(),
            easing: options.easing,
            look_target: options.look_target,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1000),
            easing: Easing::Smoothstep,
            look_target: LookTargetPolicy::default(),
        }
    }
}

/// An in-flight transition.
#[derive(Debug, Clone, Copy)]
pub struct TransitionState {
    /// Viewpoint captured when the transition began.
    pub start: ViewpointState,
    /// Destination pose.
    pub end: CameraPose,
    /// Orbit target at the destination (used by the fixed-lookahead policy).
    pub end_look_target: Vec3,
    /// When the transition began.
    pub start_time: Instant,
    /// Flight length.
    pub duration: Duration,
    /// Raw progress as of the last `advance`, in `[0, 1]`.
    pub progress: f32,
}

impl TransitionState {
    /// Raw progress at `now`, clamped to `[0, 1]`.
    ///
    /// A zero duration is complete immediately.
    #[must_use]
    pub fn raw_progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// One frame of transition output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStep {
    /// Interpolated viewpoint to apply to the camera.
    pub viewpoint: ViewpointState,
    /// Raw progress in `[0, 1]`.
    pub progress: f32,
    /// Eased progress in `[0, 1]`.
    pub eased: f32,
    /// `true` on the single step that reaches the destination.
    pub completed: bool,
}

/// Drives camera flights, one at a time.
#[derive(Debug, Clone, Default)]
pub struct TransitionEngine {
    config: TransitionConfig,
    state: Option<TransitionState>,
}

impl TransitionEngine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Replaces the configuration; an in-flight transition keeps its duration.
    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    /// Starts a flight from `current` to `target`, replacing any flight in
    /// progress.
    pub fn begin(&mut self, current: ViewpointState, target: CameraPose, now: Instant) {
        let end = if target.orientation.is_normalized() {
            target
        } else {
            CameraPose::new(target.position, target.orientation)
        };
        let end_look_target = match self.config.look_target {
            LookTargetPolicy::FollowForward { distance } => end.position + end.forward() * distance,
            LookTargetPolicy::FixedLookahead { offset } => end.position + offset,
        };

        if self.state.is_some() {
            log::debug!("camera transition preempted");
        }

        self.state = Some(TransitionState {
            start: current,
            end,
            end_look_target,
            start_time: now,
            duration: self.config.duration,
            progress: 0.0,
        });
    }

    /// Whether a flight is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Raw progress of the flight in progress, or 0 when idle.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.state.as_ref().map_or(0.0, |state| state.progress)
    }

    /// The flight in progress, if any.
    #[must_use]
    pub fn state(&self) -> Option<&TransitionState> {
        self.state.as_ref()
    }

    /// Abandons the flight in progress without completing it.
    pub fn cancel(&mut self) {
        self.state = None;
    }

    /// Computes the viewpoint for `now`.
    ///
    /// Returns `None` when idle. The step that reaches the destination
    /// carries the exact end pose, has `completed` set, and leaves the
    /// engine idle.
    pub fn advance(&mut self, now: Instant) -> Option<TransitionStep> {
        let state = self.state.as_mut()?;

        let raw = state.raw_progress(now);
        state.progress = raw;
        let completed = raw >= 1.0;
        let eased = if completed {
            1.0
        } else {
            self.config.easing.apply(raw)
        };

        let viewpoint = interpolate(state, self.config.look_target, eased);
        if completed {
            self.state = None;
        }

        Some(TransitionStep {
            viewpoint,
            progress: raw,
            eased,
            completed,
        })
    }
}

fn interpolate(state: &TransitionState, policy: LookTargetPolicy, eased: f32) -> ViewpointState {
    let start = &state.start;
    let end = &state.end;

    let (position, orientation) = if eased >= 1.0 {
        (end.position, end.orientation)
    } else if eased <= 0.0 {
        (start.position, start.orientation)
    } else {
        (
            start.position.lerp(end.position, eased),
            slerp_shortest(start.orientation, end.orientation, eased),
        )
    };

    let look_target = match policy {
        LookTargetPolicy::FollowForward { .. } if eased <= 0.0 => start.look_target,
        LookTargetPolicy::FollowForward { distance } => {
            position + orientation * CAMERA_FORWARD * distance
        }
        LookTargetPolicy::FixedLookahead { .. } => {
            start.look_target.lerp(state.end_look_target, eased)
        }
    };

    ViewpointState::new(position, orientation, look_target)
}
