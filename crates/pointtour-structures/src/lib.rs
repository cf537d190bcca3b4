//! Scene content for pointtour.
//!
//! This crate provides the things a tour displays:
//! - the colored [`PointCloud`] loaded from PLY
//! - the [`MarkerSet`] built from a camera pose document
//! - the [`ImageOverlay`] showing a marker's photograph

// Color conversion casts between integer channels and floats
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod marker;
pub mod overlay;
pub mod point_cloud;

pub use marker::{Marker, MarkerSet, PoseDocument, PoseRecord};
pub use overlay::{ImageOverlay, OverlayState};
pub use point_cloud::{load_ply, read_ply, BoundingSphere, PointCloud, PointVertex};
