//! STL (Stereolithography) decoding and binary encoding.
//!
//! Both encodings share the `.stl` extension; the decoder tells them apart
//! from the bytes alone.
//!
//! # Format Detection
//!
//! - Binary if the declared triangle count matches the byte length exactly
//!   (`84 + 50·n`), or if the 80-byte header contains NUL bytes
//! - Otherwise ASCII if the text starts with `solid` (after optional whitespace)
//! - Otherwise binary
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles (advisory)
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (ignored)
//! end
//! ```
//!
//! The decoder reads every complete 50-byte record present after the
//! header, whatever the declared count says. Trailing partial records are
//! dropped.
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```

use std::io::Write;

use mesh_types::{MeshTopology, Triangle, TriangleMesh};
use tracing::{debug, warn};

use crate::MeshFormat;
use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Header plus the u32 triangle count.
const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Decode STL bytes of either encoding into a flat mesh.
///
/// # Errors
///
/// Returns [`IoError::Parse`] if a binary file is shorter than its
/// 84-byte preamble, if any coordinate is NaN or infinite, or if ASCII
/// content is not valid UTF-8, has an unparsable coordinate, has a facet
/// without exactly three vertices, or stops before `endsolid`.
pub fn decode_stl(bytes: &[u8]) -> IoResult<TriangleMesh> {
    if is_binary(bytes) {
        decode_binary(bytes)
    } else {
        decode_ascii(bytes)
    }
}

fn is_binary(bytes: &[u8]) -> bool {
    if let Some(count) = declared_count(bytes) {
        let expected = (count as usize)
            .checked_mul(TRIANGLE_SIZE)
            .and_then(|n| n.checked_add(PREAMBLE_SIZE));
        if expected == Some(bytes.len()) {
            return true;
        }
        // Binary headers often contain nulls; text never does
        if bytes[..HEADER_SIZE].contains(&0) {
            return true;
        }
    }

    let text_start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(&[][..], |i| &bytes[i..]);
    !text_start.starts_with(b"solid")
}

fn declared_count(bytes: &[u8]) -> Option<u32> {
    let raw: [u8; 4] = bytes.get(HEADER_SIZE..PREAMBLE_SIZE)?.try_into().ok()?;
    Some(u32::from_le_bytes(raw))
}

fn decode_binary(bytes: &[u8]) -> IoResult<TriangleMesh> {
    let declared = declared_count(bytes).ok_or_else(|| {
        IoError::parse(
            MeshFormat::Stl,
            format!(
                "file is {} bytes, shorter than the {PREAMBLE_SIZE}-byte binary preamble",
                bytes.len()
            ),
        )
    })?;

    let records = bytes[PREAMBLE_SIZE..].chunks_exact(TRIANGLE_SIZE);
    let present = records.len();
    if present != declared as usize {
        warn!(
            declared,
            present,
            trailing_bytes = records.remainder().len(),
            "binary STL triangle count disagrees with file length; reading records present"
        );
    }

    let mut mesh = TriangleMesh::with_capacity(present);
    for (index, record) in records.enumerate() {
        // Skip normal (12 bytes), read 3 vertices (36 bytes total)
        let mut coords = [0.0f64; 9];
        for (slot, raw) in coords.iter_mut().zip(record[12..48].chunks_exact(4)) {
            *slot = f64::from(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]));
        }
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(IoError::parse(
                MeshFormat::Stl,
                format!("triangle {index} has a non-finite vertex coordinate"),
            ));
        }
        mesh.push_triangle(&Triangle::from_flat(&coords));
    }

    debug!(triangles = mesh.triangle_count(), "decoded binary STL");
    Ok(mesh)
}

fn decode_ascii(bytes: &[u8]) -> IoResult<TriangleMesh> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IoError::parse(MeshFormat::Stl, format!("ASCII STL is not UTF-8: {e}")))?;
    let fail = |line_no: usize, message: String| {
        IoError::parse(MeshFormat::Stl, format!("line {}: {message}", line_no + 1))
    };

    let mut mesh = TriangleMesh::new();
    let mut in_facet = false;
    let mut in_loop = false;
    let mut closed = false;
    let mut facet: Vec<f64> = Vec::with_capacity(9);

    for (line_no, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "facet" if in_facet => return Err(fail(line_no, "facet opened twice".into())),
            "facet" => {
                in_facet = true;
                facet.clear();
            }
            "outer" if !in_facet => return Err(fail(line_no, "loop outside a facet".into())),
            "outer" => in_loop = true,
            "vertex" if in_loop => {
                for _ in 0..3 {
                    let value = parts
                        .next()
                        .ok_or_else(|| fail(line_no, "vertex needs three coordinates".into()))?
                        .parse::<f64>()
                        .map_err(|e| fail(line_no, e.to_string()))?;
                    if !value.is_finite() {
                        return Err(fail(line_no, format!("non-finite coordinate {value}")));
                    }
                    facet.push(value);
                }
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                let coords: &[f64; 9] = facet.as_slice().try_into().map_err(|_| {
                    fail(
                        line_no,
                        format!("facet has {} vertices, expected 3", facet.len() / 3),
                    )
                })?;
                mesh.push_triangle(&Triangle::from_flat(coords));
                facet.clear();
                in_facet = false;
            }
            "endsolid" => {
                closed = true;
                break;
            }
            _ => {}
        }
    }

    if in_facet || in_loop {
        return Err(IoError::parse(
            MeshFormat::Stl,
            "file ends inside an unfinished facet",
        ));
    }
    if !closed {
        return Err(IoError::parse(MeshFormat::Stl, "missing endsolid"));
    }

    debug!(triangles = mesh.triangle_count(), "decoded ASCII STL");
    Ok(mesh)
}

/// Encode a flat mesh as binary STL.
///
/// Normals are recomputed from the winding; degenerate triangles get a
/// zero normal.
///
/// # Example
///
/// ```
/// use mesh_io::encode_stl_binary;
/// use mesh_types::{Triangle, TriangleMesh};
///
/// let mesh = TriangleMesh::from_triangles([Triangle::from_arrays(
///     [0.0, 0.0, 0.0],
///     [1.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0],
/// )]);
///
/// let bytes = encode_stl_binary(&mesh);
/// assert_eq!(bytes.len(), 84 + 50);
/// ```
#[must_use]
pub fn encode_stl_binary(mesh: &TriangleMesh) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(PREAMBLE_SIZE + mesh.triangle_count() * TRIANGLE_SIZE);
    // Writing into a Vec cannot fail
    let _ = write_stl_binary(mesh, &mut bytes);
    bytes
}

/// Write a flat mesh as binary STL.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_stl_binary<W: Write>(mesh: &TriangleMesh, mut writer: W) -> IoResult<()> {
    // Write 80-byte header (padded with spaces)
    let mut header = [b' '; HEADER_SIZE];
    let text = b"binary STL written by mesh-io";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: binary STL stores the count as u32
    let face_count = mesh.triangle_count() as u32;
    writer.write_all(&face_count.to_le_bytes())?;

    for tri in mesh.triangles() {
        let normal = tri.normal().unwrap_or_default();
        write_f32_triple(&mut writer, normal.x, normal.y, normal.z)?;
        for v in tri.vertices() {
            write_f32_triple(&mut writer, v.x, v.y, v.z)?;
        }
        // Attribute byte count
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_f32_triple<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> IoResult<()> {
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: f64 to f32 is intentional for STL format
    {
        writer.write_all(&(x as f32).to_le_bytes())?;
        writer.write_all(&(y as f32).to_le_bytes())?;
        writer.write_all(&(z as f32).to_le_bytes())?;
    }
    Ok(())
}
