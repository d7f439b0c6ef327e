//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in the mesh's native frame.
///
/// Starts out empty (`min > max` on every axis) and grows as points are
/// added. Derived data: recompute it whenever the mesh changes.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 20.0, 5.0)];
/// let aabb = Aabb::from_points(points.iter());
///
/// assert_eq!(aabb.extents().y, 20.0);
/// assert_eq!(aabb.volume(), 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Smallest x, y and z seen.
    pub min: Point3<f64>,
    /// Largest x, y and z seen.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Box spanning two corners given in any order.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// A box containing no points.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// True until the first point is added. A box around a single point is
    /// not empty; it has zero extent.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Size along each axis. Zero for an empty box.
    #[inline]
    #[must_use]
    pub fn extents(&self) -> Vector3<f64> {
        if self.is_empty() {
            Vector3::zeros()
        } else {
            self.max - self.min
        }
    }

    /// Midpoint of the box. The origin for an empty box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        if self.is_empty() {
            Point3::origin()
        } else {
            nalgebra::center(&self.min, &self.max)
        }
    }

    /// Product of the extents. Zero for an empty or flat box.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.extents().product()
    }

    /// Grow the box to contain `point`.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
