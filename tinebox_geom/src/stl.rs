// Binary STL output.
//
// Layout: an 80-byte header (never beginning with "solid", which would
// mark an ASCII file), a little-endian u32 triangle count, then one
// 50-byte record per facet — normal, three vertices, and a zero
// attribute byte count. The facet normal is the stored per-vertex normal
// of the facet's first corner; emitters keep all three corners of a facet
// on the same flat normal, so no recomputation happens here.

use crate::mesh::MeshData;
use std::io::{self, Write};

const HEADER_TAG: &[u8] = b"tinebox binary STL";

/// Write `mesh` as binary STL. Fails on a malformed index buffer or a
/// triangle count beyond the format's u32; I/O errors pass through
/// untouched.
pub fn write_binary<W: Write>(mesh: &MeshData, writer: &mut W) -> io::Result<()> {
    if mesh.indices.len() % 3 != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "index count {} is not a multiple of 3",
                mesh.indices.len()
            ),
        ));
    }
    let count = u32::try_from(mesh.triangle_count()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} triangles exceed the STL limit", mesh.triangle_count()),
        )
    })?;

    let mut header = [0u8; 80];
    header[..HEADER_TAG.len()].copy_from_slice(HEADER_TAG);
    writer.write_all(&header)?;
    writer.write_all(&count.to_le_bytes())?;

    for tri in mesh.indices.chunks_exact(3) {
        for value in mesh.normal(tri[0]) {
            writer.write_all(&value.to_le_bytes())?;
        }
        for &vertex_index in tri {
            for value in mesh.vertex(vertex_index) {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
