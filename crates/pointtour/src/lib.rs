//! pointtour: a virtual tour through a photogrammetry point cloud.
//!
//! The viewer loads a colored point cloud and the camera poses recovered
//! alongside it. Each camera becomes a clickable marker; clicking one flies
//! the viewpoint to that camera's pose and reveals the photograph taken
//! there.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Instant;
//! use pointtour::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let options = TourOptions {
//!         point_cloud_path: Some("scene.ply".into()),
//!         cameras_path: Some("cameras.json".into()),
//!         ..TourOptions::default()
//!     };
//!     let mut viewer = Viewer::new(options)?;
//!     viewer.load_assets();
//!
//!     // In the host's event loop:
//!     viewer.handle_event(InputEvent::Click { position: Vec2::new(640.0, 360.0) }, Instant::now());
//!     let frame = viewer.frame(Instant::now());
//!     println!("{:?}", frame.viewpoint);
//!     Ok(())
//! }
//! ```
//!
//! Drawing is left to the host: [`FrameState`] carries the camera matrices
//! and overlay, and [`PointCloud::vertex_bytes`] the point buffer.

// Pixel sizes are converted to floats for camera math
#![allow(clippy::cast_precision_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

mod input;
mod viewer;

pub use input::{InputEvent, PointerButton, PointerTracker, DRAG_THRESHOLD};
pub use viewer::{FrameState, Viewer};

// Re-export core types
pub use pointtour_core::{
    smootherstep, smoothstep, AxisDirection, CameraPose, Easing, LookTargetPolicy, PickResult,
    Ray, RayPickable, Result, TourError, TourOptions, ViewpointState, Mat4, Quat, UVec2, Vec2,
    Vec3,
};

// Re-export view types
pub use pointtour_render::{
    look_rotation, screen_ray, Camera, OrbitControls, TransitionConfig, TransitionEngine,
    TransitionStep,
};

// Re-export scene content
pub use pointtour_structures::{
    BoundingSphere, ImageOverlay, Marker, MarkerSet, OverlayState, PointCloud, PointVertex,
    PoseDocument, PoseRecord,
};

/// Installs the `env_logger` backend, defaulting to `info`.
///
/// Safe to call more than once; later calls do nothing.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
