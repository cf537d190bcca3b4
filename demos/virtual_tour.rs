#![allow(clippy::cast_precision_loss)]
//! Scripted virtual tour.
//!
//! Loads a point cloud and camera poses, then visits every camera in turn
//! at a simulated 60 frames per second, logging the viewpoint along the
//! way. Without arguments a synthetic scene is used: a torus with a ring
//! of cameras looking at its center.
//!
//! Run with: cargo run --example `virtual_tour` -- [scene.ply cameras.json]

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use pointtour::*;

const FRAME: Duration = Duration::from_micros(16_667);

/// Generate colored points on a torus lying in the XZ plane.
fn generate_torus(
    major_radius: f32,
    minor_radius: f32,
    n_major: usize,
    n_minor: usize,
) -> PointCloud {
    let mut points = Vec::with_capacity(n_major * n_minor);
    let mut colors = Vec::with_capacity(n_major * n_minor);
    for i in 0..n_major {
        let theta = TAU * i as f32 / n_major as f32;
        for j in 0..n_minor {
            let phi = TAU * j as f32 / n_minor as f32;
            let ring = major_radius + minor_radius * phi.cos();
            points.push(Vec3::new(
                ring * theta.cos(),
                minor_radius * phi.sin(),
                ring * theta.sin(),
            ));
            colors.push(Vec3::new(
                i as f32 / n_major as f32,
                j as f32 / n_minor as f32,
                0.5,
            ));
        }
    }
    PointCloud::new("torus", points, Vec3::ONE).with_colors(colors)
}

/// A ring of cameras outside the torus, each facing the center.
fn generate_cameras(count: usize, radius: f32, options: &TourOptions) -> MarkerSet {
    let mut markers = MarkerSet::from_options(options);
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32;
        let position = Vec3::new(radius * angle.cos(), 0.5, radius * angle.sin());
        let mut marker = Marker::new(format!("cam_{i}"), position, options.marker_radius);
        if let Some(orientation) = look_rotation(-position, Vec3::Y) {
            marker = marker.with_orientation(orientation);
        }
        markers.push(marker);
    }
    markers
}

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut viewer = if let [ply, cameras] = args.as_slice() {
        let options = TourOptions {
            point_cloud_path: Some(ply.into()),
            cameras_path: Some(cameras.into()),
            ..TourOptions::default()
        };
        let mut viewer = Viewer::new(options)?;
        viewer.load_assets();
        viewer
    } else {
        let mut viewer = Viewer::new(TourOptions::default())?;
        viewer.set_point_cloud(generate_torus(2.0, 0.5, 96, 32));
        let markers = generate_cameras(6, 4.0, viewer.options());
        viewer.set_markers(markers);
        viewer
    };

    if let Some(cloud) = viewer.point_cloud() {
        log::info!(
            "scene: {} points ({} bytes of vertex data), {} markers",
            cloud.num_points(),
            cloud.vertex_bytes().len(),
            viewer.markers().len()
        );
    }

    let mut now = Instant::now();
    for index in 0..viewer.markers().len() {
        // Click the marker where it appears on screen when it is visible
        let pixel = viewer
            .markers()
            .get(index)
            .and_then(|marker| project(&viewer, marker.position()));
        if let Some(pixel) = pixel {
            viewer.handle_event(InputEvent::Click { position: pixel }, now);
        }
        if !viewer.is_flying() {
            viewer.fly_to_marker(index, now)?;
        }

        let mut frames = 0u32;
        loop {
            now += FRAME;
            frames += 1;
            let frame = viewer.frame(now);
            if frames % 15 == 0 {
                if let Some(progress) = frame.transition_progress {
                    log::info!(
                        "  {:>3.0}%  position {:?}",
                        progress * 100.0,
                        frame.viewpoint.position
                    );
                }
            }
            if let Some(arrived) = frame.completed_marker {
                log::info!(
                    "arrived at '{}' after {frames} frames",
                    viewer.markers().get(arrived).map_or("?", Marker::label)
                );
                break;
            }
        }
    }

    Ok(())
}

/// Pixel position of a world point, if it is in front of the camera and on
/// screen.
fn project(viewer: &Viewer, point: Vec3) -> Option<Vec2> {
    let clip = viewer.camera().view_projection_matrix() * point.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
        return None;
    }
    let size = viewer.viewport().as_vec2();
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * size.x,
        (1.0 - ndc.y) * 0.5 * size.y,
    ))
}
