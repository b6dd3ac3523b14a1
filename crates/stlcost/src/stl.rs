//! Binary STL decoding and volume computation.
//!
//! # Layout
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles (little-endian)
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (ignored)
//! end
//! ```
//!
//! The declared triangle count is checked against the buffer length before
//! any record is read, so a hostile count can never cause an out-of-bounds
//! read. Callers should still cap the buffer size before decoding.

use tracing::debug;

use crate::error::{CostError, Result};
use crate::geometry::Triangle;
use crate::units::mm3_to_cm3;

/// Size of the free-form header.
pub const HEADER_SIZE: usize = 80;

/// Smallest valid binary STL: header plus triangle count.
pub const MIN_SIZE: usize = HEADER_SIZE + 4;

/// Size of one triangle record (normal + 3 vertices + attribute).
pub const TRIANGLE_SIZE: usize = 50;

/// Offset of the first vertex inside a triangle record.
const VERTEX_OFFSET: usize = 12;

/// Header and triangle count of a binary STL buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StlHeader {
    /// Raw 80-byte header.
    pub raw: [u8; HEADER_SIZE],
    /// Declared triangle count.
    pub triangle_count: u32,
}

impl StlHeader {
    /// Header as text, with trailing NULs and whitespace removed.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.raw)
            .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string()
    }
}

/// Compute the enclosed volume of a binary STL mesh, in cm³.
///
/// Sums the signed volume of the tetrahedron formed by each triangle and the
/// origin, then returns the absolute value converted from mm³. Accumulation
/// is done in `f64` although the file stores `f32` coordinates.
///
/// The result is exact for a closed, consistently oriented mesh regardless of
/// where the origin is, and winding only affects the sign. No topology checks
/// are made: for open or self-intersecting meshes the value is only an
/// approximation, and opposite-facing pieces can cancel each other out.
///
/// # Errors
///
/// - [`CostError::TooShort`] if the buffer is shorter than 84 bytes.
/// - [`CostError::Truncated`] if it is shorter than its triangle count requires.
/// - [`CostError::Parse`] if it is longer than its triangle count allows or a
///   vertex coordinate is NaN or infinite.
pub fn decode_volume(buffer: &[u8]) -> Result<f64> {
    let header = read_header(buffer)?;

    let mut volume_mm3 = 0.0f64;
    for (index, record) in records(buffer).enumerate() {
        volume_mm3 += parse_record(record, index)?.signed_volume();
    }

    let volume = mm3_to_cm3(volume_mm3.abs());
    debug!(
        triangles = header.triangle_count,
        volume_cm3 = volume,
        "decoded STL volume"
    );
    Ok(volume)
}

/// Validate the buffer layout and return its header.
///
/// Performs every length check [`decode_volume`] relies on, without reading
/// any triangle.
pub fn read_header(buffer: &[u8]) -> Result<StlHeader> {
    if buffer.len() < MIN_SIZE {
        return Err(CostError::TooShort {
            len: buffer.len(),
            min: MIN_SIZE,
        });
    }

    let mut raw = [0u8; HEADER_SIZE];
    raw.copy_from_slice(&buffer[..HEADER_SIZE]);
    let triangle_count = u32::from_le_bytes([
        buffer[HEADER_SIZE],
        buffer[HEADER_SIZE + 1],
        buffer[HEADER_SIZE + 2],
        buffer[HEADER_SIZE + 3],
    ]);

    let expected = (triangle_count as usize)
        .checked_mul(TRIANGLE_SIZE)
        .and_then(|n| n.checked_add(MIN_SIZE))
        .ok_or_else(|| {
            CostError::Parse(format!(
                "triangle count {triangle_count} exceeds addressable size"
            ))
        })?;

    if buffer.len() < expected {
        return Err(CostError::Truncated {
            len: buffer.len(),
            triangles: triangle_count,
            expected,
        });
    }

    if buffer.len() > expected {
        let body = buffer.len() - MIN_SIZE;
        if body % TRIANGLE_SIZE != 0 {
            return Err(CostError::Parse(format!(
                "{} trailing bytes do not form a whole triangle record",
                body % TRIANGLE_SIZE
            )));
        }
        return Err(CostError::Parse(format!(
            "declared {triangle_count} triangles but buffer holds {}",
            body / TRIANGLE_SIZE
        )));
    }

    Ok(StlHeader {
        raw,
        triangle_count,
    })
}

/// Decode every triangle of a binary STL buffer.
///
/// # Errors
///
/// Same as [`decode_volume`].
pub fn read_triangles(buffer: &[u8]) -> Result<Vec<Triangle>> {
    let header = read_header(buffer)?;
    let mut triangles = Vec::with_capacity(header.triangle_count as usize);
    for (index, record) in records(buffer).enumerate() {
        triangles.push(parse_record(record, index)?);
    }
    Ok(triangles)
}

/// Encode triangles as a binary STL buffer.
///
/// The header text is truncated or space-padded to 80 bytes, normals are
/// recomputed from the winding and attribute counts are zero.
pub fn to_bytes(header: &str, triangles: &[Triangle]) -> Vec<u8> {
    let mut data = Vec::with_capacity(MIN_SIZE + triangles.len() * TRIANGLE_SIZE);

    let mut raw = [b' '; HEADER_SIZE];
    let text = header.as_bytes();
    let n = text.len().min(HEADER_SIZE);
    raw[..n].copy_from_slice(&text[..n]);
    data.extend_from_slice(&raw);

    data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());

    for tri in triangles {
        for c in tri.normal() {
            data.extend_from_slice(&c.to_le_bytes());
        }
        for v in tri.vertices() {
            for c in v {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

/// Triangle records of an already validated buffer.
fn records(buffer: &[u8]) -> impl Iterator<Item = &[u8]> {
    buffer[MIN_SIZE..].chunks_exact(TRIANGLE_SIZE)
}

fn parse_record(record: &[u8], index: usize) -> Result<Triangle> {
    let tri = Triangle::new(
        read_vertex(&record[VERTEX_OFFSET..]),
        read_vertex(&record[VERTEX_OFFSET + 12..]),
        read_vertex(&record[VERTEX_OFFSET + 24..]),
    );
    let finite = tri
        .vertices()
        .iter()
        .all(|v| v.iter().all(|c| c.is_finite()));
    if !finite {
        return Err(CostError::Parse(format!(
            "triangle {index} has a non-finite vertex coordinate"
        )));
    }
    Ok(tri)
}

fn read_vertex(buf: &[u8]) -> [f32; 3] {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    [x, y, z]
}
