use std::io::Write;
use std::path::Path;

use super::PlyError;
use crate::store::Vertex;

/// Write vertices as an ASCII PLY file to `writer`.
///
/// The header declares the exact vertex count and the fixed property list
/// `x, y, z` (float) followed by `red, green, blue, alpha` (uchar). Color
/// bytes are derived from the stored [0, 1] channels by multiplying by 255
/// and truncating. The export is all-or-nothing: any failure surfaces as a
/// [`PlyError`] for this one request.
pub fn write_ply_ascii<W: Write>(writer: &mut W, vertices: &[Vertex]) -> Result<(), PlyError> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    for axis in ["x", "y", "z"] {
        writeln!(writer, "property float {axis}")?;
    }
    for channel in ["red", "green", "blue", "alpha"] {
        writeln!(writer, "property uchar {channel}")?;
    }
    writeln!(writer, "end_header")?;

    for vertex in vertices {
        let [red, green, blue, alpha] = vertex.color.to_array().map(|c| (c * 255.0) as u8);
        writeln!(
            writer,
            "{} {} {} {} {} {} {}",
            vertex.position.x, vertex.position.y, vertex.position.z, red, green, blue, alpha
        )?;
    }
    writer.flush()?;

    Ok(())
}

/// Write vertices as an ASCII PLY file at `path`.
pub fn write_ply_ascii_to_path(
    path: impl AsRef<Path>,
    vertices: &[Vertex],
) -> Result<(), PlyError> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_ply_ascii(&mut writer, vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn test_write_two_vertices() -> Result<(), PlyError> {
        let vertices = [
            Vertex {
                position: Vec3::new(1.5, -0.25, 3.0),
                color: Vec4::new(1.0, 0.0, 0.5, 1.0),
            },
            Vertex {
                position: Vec3::new(0.0, 2.0, -1.5),
                color: Vec4::new(0.0, 1.0, 0.0, 1.0),
            },
        ];

        let mut buffer = Vec::new();
        write_ply_ascii(&mut buffer, &vertices)?;
        let text = String::from_utf8(buffer).expect("ascii output");

        let expected = "\
ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
property uchar alpha
end_header
1.5 -0.25 3 255 0 127 255
0 2 -1.5 0 255 0 255
";
        assert_eq!(text, expected);
        Ok(())
    }

    #[test]
    fn test_write_empty_store() -> Result<(), PlyError> {
        let mut buffer = Vec::new();
        write_ply_ascii(&mut buffer, &[])?;
        let text = String::from_utf8(buffer).expect("ascii output");
        assert!(text.contains("element vertex 0"));
        assert!(text.ends_with("end_header\n"));
        Ok(())
    }
}
