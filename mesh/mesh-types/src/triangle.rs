//! A single facet with owned corner positions.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One facet of a model, corners in millimeters.
///
/// Corners run counter-clockwise seen from outside the part, so the
/// right-hand normal points out of the solid.
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// // Area of a right triangle with legs 1 and 1
/// assert!((tri.area() - 0.5).abs() < 1e-10);
///
/// // Normal points in +Z direction
/// let normal = tri.normal().unwrap();
/// assert!((normal.z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Facet from three corners.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Facet from three `[x, y, z]` arrays.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Triangle;
    ///
    /// let tri = Triangle::from_arrays(
    ///     [0.0, 0.0, 0.0],
    ///     [1.0, 0.0, 0.0],
    ///     [0.0, 1.0, 0.0],
    /// );
    /// assert_eq!(tri.v1.x, 1.0);
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_arrays(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self {
            v0: Point3::new(v0[0], v0[1], v0[2]),
            v1: Point3::new(v1[0], v1[1], v1[2]),
            v2: Point3::new(v2[0], v2[1], v2[2]),
        }
    }

    /// Create a triangle from nine contiguous coordinates
    /// `[ax, ay, az, bx, by, bz, cx, cy, cz]`.
    #[inline]
    #[must_use]
    pub fn from_flat(c: &[f64; 9]) -> Self {
        Self::from_arrays([c[0], c[1], c[2]], [c[3], c[4], c[5]], [c[6], c[7], c[8]])
    }

    /// Flatten the triangle back into nine contiguous coordinates.
    #[inline]
    #[must_use]
    pub fn to_flat(&self) -> [f64; 9] {
        [
            self.v0.x, self.v0.y, self.v0.z, self.v1.x, self.v1.y, self.v1.z, self.v2.x,
            self.v2.y, self.v2.z,
        ]
    }

    /// `(B−A)×(C−A)`: outward for correct winding, length twice the area.
    #[inline]
    fn edge_cross(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit outward normal, or `None` for a sliver with no area.
    ///
    /// Binary STL stores one of these per facet.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.edge_cross().try_normalize(f64::EPSILON)
    }

    /// Facet area in mm². Never negative; zero for collinear corners.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        0.5 * self.edge_cross().norm()
    }

    /// Signed volume of the tetrahedron spanned by this triangle and the origin.
    ///
    /// Computes `A · (B × C) / 6`. Summed over a closed, outward-wound
    /// surface this is the enclosed volume (divergence theorem); for an
    /// inward-wound surface the sum is negative.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Triangle;
    ///
    /// let tri = Triangle::from_arrays([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
    /// assert!((tri.signed_volume() - 1.0 / 6.0).abs() < 1e-12);
    /// assert!((tri.reversed().signed_volume() + 1.0 / 6.0).abs() < 1e-12);
    /// ```
    #[inline]
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let (a, b, c) = (&self.v0, &self.v1, &self.v2);
        let cross = Vector3::new(
            b.y.mul_add(c.z, -(b.z * c.y)),
            b.z.mul_add(c.x, -(b.x * c.z)),
            b.x.mul_add(c.y, -(b.y * c.x)),
        );
        a.z.mul_add(cross.z, a.x.mul_add(cross.x, a.y * cross.y)) / 6.0
    }

    /// Corners in winding order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Same facet facing the other way.
    #[inline]
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            v0: self.v0,
            v1: self.v2,
            v2: self.v1,
        }
    }
}
