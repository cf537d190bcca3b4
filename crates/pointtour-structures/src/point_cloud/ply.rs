//! PLY point cloud loading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use pointtour_core::{Result, TourError};

use super::PointCloud;

const RED_KEYS: [&str; 3] = ["red", "r", "diffuse_red"];
const GREEN_KEYS: [&str; 3] = ["green", "g", "diffuse_green"];
const BLUE_KEYS: [&str; 3] = ["blue", "b", "diffuse_blue"];

/// Reads a PLY file from disk.
///
/// The cloud is named after the file stem.
pub fn load_ply(path: impl AsRef<Path>, fallback_color: Vec3) -> Result<PointCloud> {
    let path = path.as_ref();
    log::info!("loading point cloud: {}", path.display());

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let name = path
        .file_stem()
        .map_or_else(|| "point cloud".to_string(), |s| s.to_string_lossy().into_owned());
    let cloud = read_ply(&mut reader, name, fallback_color)?;

    log::info!(
        "point cloud loaded: {} points from {}",
        cloud.num_points(),
        path.display()
    );
    Ok(cloud)
}

/// Reads an ascii or binary PLY stream.
///
/// Positions come from the `x`/`y`/`z` properties of the `vertex` element.
/// Colors are normalized to `[0, 1]`; a file without colors is painted
/// with `fallback_color`.
pub fn read_ply<R: BufRead>(
    reader: &mut R,
    name: impl Into<String>,
    fallback_color: Vec3,
) -> Result<PointCloud> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(reader)
        .map_err(|e| TourError::Ply(e.to_string()))?;

    let vertices = ply
        .payload
        .get("vertex")
        .ok_or_else(|| TourError::Ply("no 'vertex' element".to_string()))?;

    let mut points = Vec::with_capacity(vertices.len());
    for (index, vertex) in vertices.iter().enumerate() {
        points.push(Vec3::new(
            coordinate(vertex, "x", index)?,
            coordinate(vertex, "y", index)?,
            coordinate(vertex, "z", index)?,
        ));
    }

    let colors: Option<Vec<Vec3>> = vertices.iter().map(vertex_color).collect();
    let cloud = PointCloud::new(name, points, fallback_color);
    Ok(match colors {
        Some(colors) => cloud.with_colors(colors),
        None => {
            log::debug!("point cloud '{}' has no vertex colors", cloud.name());
            cloud
        }
    })
}

fn coordinate(vertex: &DefaultElement, key: &str, index: usize) -> Result<f32> {
    vertex
        .get(key)
        .and_then(scalar_value)
        .map(|v| v as f32)
        .ok_or_else(|| TourError::Ply(format!("vertex {index} has no scalar '{key}'")))
}

fn scalar_value(property: &Property) -> Option<f64> {
    match property {
        Property::Char(v) => Some(f64::from(*v)),
        Property::UChar(v) => Some(f64::from(*v)),
        Property::Short(v) => Some(f64::from(*v)),
        Property::UShort(v) => Some(f64::from(*v)),
        Property::Int(v) => Some(f64::from(*v)),
        Property::UInt(v) => Some(f64::from(*v)),
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        _ => None,
    }
}

/// One color channel in `[0, 1]`.
///
/// Integer channels are scaled by their type's maximum; float channels are
/// taken as already normalized.
fn color_channel(property: &Property) -> Option<f32> {
    let value = match property {
        Property::UChar(v) => f32::from(*v) / f32::from(u8::MAX),
        Property::UShort(v) => f32::from(*v) / f32::from(u16::MAX),
        Property::Char(v) => f32::from(*v) / f32::from(i8::MAX),
        Property::Float(v) => *v,
        Property::Double(v) => *v as f32,
        other => (scalar_value(other)? / f64::from(u8::MAX)) as f32,
    };
    Some(value.clamp(0.0, 1.0))
}

fn channel(vertex: &DefaultElement, keys: &[&str]) -> Option<f32> {
    keys.iter()
        .find_map(|key| vertex.get(*key))
        .and_then(color_channel)
}

fn vertex_color(vertex: &DefaultElement) -> Option<Vec3> {
    Some(Vec3::new(
        channel(vertex, &RED_KEYS)?,
        channel(vertex, &GREEN_KEYS)?,
        channel(vertex, &BLUE_KEYS)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORED: &str = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
end_header
0 0 0 255 0 0
1 2 3 0 255 51
-1 0.5 2 0 0 0
";

    #[test]
    fn test_reads_positions_and_normalizes_colors() {
        let cloud = read_ply(&mut COLORED.as_bytes(), "colored", Vec3::ONE).unwrap();
        assert_eq!(cloud.num_points(), 3);
        assert_eq!(cloud.points()[1], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cloud.colors()[0], Vec3::new(1.0, 0.0, 0.0));
        assert!((cloud.colors()[1] - Vec3::new(0.0, 1.0, 0.2)).length() < 1e-6);
        assert!(cloud
            .colors()
            .iter()
            .all(|c| c.min_element() >= 0.0 && c.max_element() <= 1.0));
    }

    #[test]
    fn test_float_colors_pass_through() {
        let ply = "ply
format ascii 1.0
element vertex 1
property double x
property double y
property double z
property float r
property float g
property float b
end_header
1 1 1 0.25 0.5 1.5
";
        let cloud = read_ply(&mut ply.as_bytes(), "float", Vec3::ONE).unwrap();
        assert_eq!(cloud.colors()[0], Vec3::new(0.25, 0.5, 1.0));
    }

    #[test]
    fn test_missing_colors_use_fallback() {
        let ply = "ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
end_header
0 0 0
1 1 1
";
        let fallback = Vec3::new(0.5, 0.5, 0.5);
        let cloud = read_ply(&mut ply.as_bytes(), "plain", fallback).unwrap();
        assert_eq!(cloud.colors(), &[fallback, fallback]);
    }

    #[test]
    fn test_missing_coordinate_is_an_error() {
        let ply = "ply
format ascii 1.0
element vertex 1
property float x
property float y
end_header
0 0
";
        let err = read_ply(&mut ply.as_bytes(), "flat", Vec3::ONE).unwrap_err();
        assert!(matches!(err, TourError::Ply(msg) if msg.contains("'z'")));
    }

    #[test]
    fn test_missing_vertex_element_is_an_error() {
        let ply = "ply
format ascii 1.0
element face 0
property list uchar int vertex_indices
end_header
";
        assert!(matches!(
            read_ply(&mut ply.as_bytes(), "faces", Vec3::ONE),
            Err(TourError::Ply(_))
        ));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(read_ply(&mut "not a ply file".as_bytes(), "bad", Vec3::ONE).is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            load_ply("/nonexistent/cloud.ply", Vec3::ONE),
            Err(TourError::IoError(_))
        ));
    }
}
