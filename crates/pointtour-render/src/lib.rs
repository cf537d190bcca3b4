//! View and animation layer for pointtour.
//!
//! This crate owns everything that moves the viewpoint:
//! - [`Camera`] and [`OrbitControls`]
//! - the [`TransitionEngine`] that flies the camera between poses
//! - screen-space picking rays

// Graphics code intentionally uses casts for pixel coordinates
#![allow(clippy::cast_precision_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod camera;
pub mod pick;
pub mod transition;

pub use camera::{look_rotation, Camera, OrbitControls};
pub use pick::{ray_from_ndc, screen_ray, screen_to_ndc};
pub use transition::{
    slerp_shortest, TransitionConfig, TransitionEngine, TransitionState, TransitionStep,
};
