use std::io::BufRead;
use std::path::Path;

use glam::{Vec3, Vec4};

use super::PlyError;
use crate::store::Vertex;

const EXPECTED_PROPERTIES: [(&str, &str); 7] = [
    ("float", "x"),
    ("float", "y"),
    ("float", "z"),
    ("uchar", "red"),
    ("uchar", "green"),
    ("uchar", "blue"),
    ("uchar", "alpha"),
];

struct PlyHeader {
    vertex_count: usize,
}

fn parse_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, PlyError> {
    let mut line = String::new();
    let mut vertex_count = None;
    let mut is_ascii = false;
    let mut is_ply = false;
    let mut properties = Vec::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();

        if trimmed == "ply" {
            is_ply = true;
            continue;
        }

        if trimmed == "end_header" {
            break;
        }

        if trimmed.starts_with("format ascii") {
            is_ascii = true;
        } else if trimmed.starts_with("element vertex") {
            vertex_count = trimmed
                .split_whitespace()
                .last()
                .and_then(|s| s.parse().ok());
        } else if trimmed.starts_with("property") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() >= 3 {
                properties.push((parts[1].to_string(), parts[2].to_string()));
            }
        }
    }

    if !is_ply || !is_ascii {
        return Err(PlyError::InvalidHeader);
    }

    let matches_layout = properties.len() == EXPECTED_PROPERTIES.len()
        && properties
            .iter()
            .zip(EXPECTED_PROPERTIES.iter())
            .all(|((data_type, name), (expected_type, expected_name))| {
                data_type == expected_type && name == expected_name
            });
    if !matches_layout {
        return Err(PlyError::UnsupportedProperty);
    }

    let vertex_count = vertex_count.ok_or(PlyError::InvalidHeader)?;
    Ok(PlyHeader { vertex_count })
}

/// Read an ASCII PLY file with the `x y z red green blue alpha` layout
/// produced by [`super::write_ply_ascii`].
pub fn read_ply_ascii<R: BufRead>(reader: &mut R) -> Result<Vec<Vertex>, PlyError> {
    let header = parse_header(reader)?;

    let mut vertices = Vec::with_capacity(header.vertex_count);
    let mut line = String::new();
    for _ in 0..header.vertex_count {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::InvalidVertex);
        }
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != EXPECTED_PROPERTIES.len() {
            return Err(PlyError::InvalidVertex);
        }

        let mut position = [0.0f32; 3];
        for (axis, value) in position.iter_mut().zip(values.iter()) {
            *axis = value.parse().map_err(|_| PlyError::InvalidVertex)?;
        }
        let mut color = [0u8; 4];
        for (channel, value) in color.iter_mut().zip(values[3..].iter()) {
            *channel = value.parse().map_err(|_| PlyError::InvalidVertex)?;
        }

        vertices.push(Vertex {
            position: Vec3::from_array(position),
            color: Vec4::new(
                color[0] as f32 / 255.0,
                color[1] as f32 / 255.0,
                color[2] as f32 / 255.0,
                color[3] as f32 / 255.0,
            ),
        });
    }

    Ok(vertices)
}

/// Read an ASCII PLY file from `path`.
pub fn read_ply_ascii_from_path(path: impl AsRef<Path>) -> Result<Vec<Vertex>, PlyError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    read_ply_ascii(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::super::write_ply_ascii_to_path;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_header_basic() -> Result<(), PlyError> {
        let header_text = "ply\nformat ascii 1.0\nelement vertex 10\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nproperty uchar alpha\nend_header\n";
        let mut reader = std::io::BufReader::new(header_text.as_bytes());
        let header = parse_header(&mut reader)?;
        assert_eq!(header.vertex_count, 10);
        Ok(())
    }

    #[test]
    fn test_parse_header_rejects_binary() {
        let header_text = "ply\nformat binary_little_endian 1.0\nelement vertex 1\nend_header\n";
        let mut reader = std::io::BufReader::new(header_text.as_bytes());
        assert!(matches!(
            parse_header(&mut reader),
            Err(PlyError::InvalidHeader)
        ));
    }

    #[test]
    fn test_parse_header_rejects_unknown_layout() {
        let header_text =
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nend_header\n";
        let mut reader = std::io::BufReader::new(header_text.as_bytes());
        assert!(matches!(
            parse_header(&mut reader),
            Err(PlyError::UnsupportedProperty)
        ));
    }

    #[test]
    fn test_read_truncated_data() {
        let text = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nproperty uchar alpha\nend_header\n0 0 0 255 255 255 255\n";
        let mut reader = std::io::BufReader::new(text.as_bytes());
        assert!(matches!(
            read_ply_ascii(&mut reader),
            Err(PlyError::InvalidVertex)
        ));
    }

    #[test]
    fn test_roundtrip_through_file() -> Result<(), PlyError> {
        let vertices = vec![
            Vertex {
                position: Vec3::new(0.25, -1.0, 2.5),
                color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            },
            Vertex {
                position: Vec3::new(-3.5, 0.0, 0.125),
                color: Vec4::new(0.0, 0.0, 1.0, 1.0),
            },
        ];

        let file = tempfile::NamedTempFile::new()?;
        write_ply_ascii_to_path(file.path(), &vertices)?;
        let parsed = read_ply_ascii_from_path(file.path())?;

        assert_eq!(parsed.len(), vertices.len());
        for (parsed, original) in parsed.iter().zip(vertices.iter()) {
            assert_eq!(parsed.position, original.position);
            for i in 0..4 {
                assert_relative_eq!(parsed.color[i], original.color[i], epsilon = 1.0 / 255.0);
            }
        }
        Ok(())
    }
}
