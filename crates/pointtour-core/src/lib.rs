//! Core abstractions for pointtour.
//!
//! This crate provides the types shared by every other pointtour crate:
//! - [`CameraPose`] and [`ViewpointState`] for camera placement
//! - [`Easing`] curves for transition progress
//! - [`Ray`], [`RayPickable`] and [`PickResult`] for marker selection
//! - [`TourOptions`] configuration and the [`TourError`] type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod easing;
pub mod error;
pub mod options;
pub mod pick;
pub mod pose;

pub use easing::{smootherstep, smoothstep, Easing};
pub use error::{Result, TourError};
pub use options::{AxisDirection, LookTargetPolicy, TourOptions};
pub use pick::{pick_nearest, PickResult, Ray, RayPickable};
pub use pose::{rotation_from_rows, CameraPose, ViewpointState, CAMERA_FORWARD};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, Quat, UVec2, Vec2, Vec3, Vec4};
