//! Triangle geometry shared by the decoder and the CLI.

use serde::{Deserialize, Serialize};

/// A mesh triangle with vertices in millimeters, as stored in an STL file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex.
    pub v1: [f32; 3],
    /// Second vertex.
    pub v2: [f32; 3],
    /// Third vertex.
    pub v3: [f32; 3],
}

impl Triangle {
    /// Create a triangle from three vertices.
    pub fn new(v1: [f32; 3], v2: [f32; 3], v3: [f32; 3]) -> Self {
        Self { v1, v2, v3 }
    }

    /// Signed volume (mm³) of the tetrahedron spanned by this triangle and
    /// the origin, `v1 · (v2 × v3) / 6`.
    ///
    /// Coordinates are widened to `f64` before any arithmetic. The
    /// expansion order is fixed so that results are reproducible bit for bit.
    pub fn signed_volume(&self) -> f64 {
        let [ax, ay, az] = widen(self.v1);
        let [bx, by, bz] = widen(self.v2);
        let [cx, cy, cz] = widen(self.v3);

        (ax * (by * cz - cy * bz) - ay * (bx * cz - cx * bz) + az * (bx * cy - cx * by)) / 6.0
    }

    /// The same triangle with opposite winding.
    pub fn reversed(&self) -> Self {
        Self {
            v1: self.v1,
            v2: self.v3,
            v3: self.v2,
        }
    }

    /// Unit normal from the right-hand rule, or +Z for degenerate triangles.
    pub fn normal(&self) -> [f32; 3] {
        let e1 = sub(self.v2, self.v1);
        let e2 = sub(self.v3, self.v1);
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > 1e-10 {
            [n[0] / len, n[1] / len, n[2] / len]
        } else {
            [0.0, 0.0, 1.0]
        }
    }

    /// Vertices in order.
    pub fn vertices(&self) -> [[f32; 3]; 3] {
        [self.v1, self.v2, self.v3]
    }
}

fn widen(v: [f32; 3]) -> [f64; 3] {
    [v[0] as f64, v[1] as f64, v[2] as f64]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Axis-aligned bounding box in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner.
    pub min: [f64; 3],
    /// Maximum corner.
    pub max: [f64; 3],
}

impl Bounds {
    /// Bounding box of a set of triangles, `None` if there are none.
    pub fn of<'a>(triangles: impl IntoIterator<Item = &'a Triangle>) -> Option<Self> {
        let mut bounds: Option<Bounds> = None;
        for tri in triangles {
            for v in tri.vertices() {
                let p = widen(v);
                let b = bounds.get_or_insert(Bounds { min: p, max: p });
                for i in 0..3 {
                    b.min[i] = b.min[i].min(p[i]);
                    b.max[i] = b.max[i].max(p[i]);
                }
            }
        }
        bounds
    }

    /// Extent along each axis.
    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Twelve outward-facing triangles of an axis-aligned cube with one corner
/// at `origin`.
pub fn cube_triangles(origin: [f32; 3], edge: f32) -> Vec<Triangle> {
    let [x, y, z] = origin;
    let s = edge;
    let p = [
        [x, y, z],
        [x + s, y, z],
        [x + s, y + s, z],
        [x, y + s, z],
        [x, y, z + s],
        [x + s, y, z + s],
        [x + s, y + s, z + s],
        [x, y + s, z + s],
    ];
    let faces: [[usize; 3]; 12] = [
        // bottom
        [0, 2, 1],
        [0, 3, 2],
        // top
        [4, 5, 6],
        [4, 6, 7],
        // front
        [0, 1, 5],
        [0, 5, 4],
        // back
        [2, 3, 7],
        [2, 7, 6],
        // left
        [0, 4, 7],
        [0, 7, 3],
        // right
        [1, 2, 6],
        [1, 6, 5],
    ];
    faces
        .iter()
        .map(|f| Triangle::new(p[f[0]], p[f[1]], p[f[2]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signed_volume_unit_tetrahedron() {
        let tri = Triangle::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        assert_relative_eq!(tri.signed_volume(), 1.0 / 6.0);
        assert_relative_eq!(tri.reversed().signed_volume(), -1.0 / 6.0);
    }

    #[test]
    fn test_triangle_through_origin_has_no_volume() {
        let tri = Triangle::new([0.0, 0.0, 0.0], [3.0, 1.0, 2.0], [5.0, 7.0, 1.0]);
        assert_eq!(tri.signed_volume(), 0.0);
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let tris = cube_triangles([0.0, 0.0, 0.0], 10.0);
        assert_eq!(tris.len(), 12);
        let total: f64 = tris.iter().map(Triangle::signed_volume).sum();
        assert_relative_eq!(total, 1000.0, max_relative = 1e-12);

        // Bottom face normal points down.
        assert_eq!(tris[0].normal(), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_bounds() {
        let tris = cube_triangles([-5.0, 2.0, 0.0], 4.0);
        let b = Bounds::of(&tris).unwrap();
        assert_eq!(b.min, [-5.0, 2.0, 0.0]);
        assert_eq!(b.max, [-1.0, 6.0, 4.0]);
        assert_eq!(b.size(), [4.0, 4.0, 4.0]);
        assert!(Bounds::of(&Vec::<Triangle>::new()).is_none());
    }

    #[test]
    fn test_degenerate_normal() {
        let tri = Triangle::new([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        assert_eq!(tri.normal(), [0.0, 0.0, 1.0]);
    }
}
