//! Node placement: an affine 4x4 matrix applied to model geometry.

use mesh_types::{IndexedMesh, Triangle};
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

/// Where a scene node sits relative to its parent.
///
/// Any affine matrix works: translations, rotations and scales compose
/// through [`then`](Self::then), and a decoder can hand over a node's
/// matrix directly with [`from_matrix`](Self::from_matrix).
///
/// A placement with a negative determinant mirrors the part; facets are
/// re-wound on the way through so they keep facing outward.
///
/// # Example
///
/// ```
/// use mesh_transform::Transform3D;
/// use mesh_types::Point3;
///
/// let lift = Transform3D::translation(0.0, 0.0, 5.0);
/// let double = Transform3D::uniform_scale(2.0);
///
/// // Lift first, then double
/// let p = lift.then(&double).transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(p, Point3::new(2.0, 0.0, 10.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    matrix: Matrix4<f64>,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Leaves geometry where it is.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Wrap a 4x4 affine matrix as stored by a scene format.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// The underlying 4x4 matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Turn `angle` radians about `axis` through the origin, right-handed.
    ///
    /// A zero-length axis has no direction and yields the identity.
    #[must_use]
    pub fn rotation(axis: Vector3<f64>, angle: f64) -> Self {
        Unit::try_new(axis, f64::EPSILON).map_or_else(Self::identity, |axis| Self {
            matrix: Rotation3::from_axis_angle(&axis, angle).to_homogeneous(),
        })
    }

    /// Move by `(dx, dy, dz)` millimeters.
    #[must_use]
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(dx, dy, dz)),
        }
    }

    /// Stretch each axis independently. A negative factor mirrors.
    #[must_use]
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)),
        }
    }

    /// Same factor on every axis.
    #[must_use]
    pub fn uniform_scale(factor: f64) -> Self {
        Self {
            matrix: Matrix4::new_scaling(factor),
        }
    }

    /// `self` applied first, `outer` after it.
    #[must_use]
    pub fn then(&self, outer: &Self) -> Self {
        Self {
            matrix: outer.matrix * self.matrix,
        }
    }

    /// True when the matrix is exactly the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }

    /// True when the linear part has a negative determinant.
    #[must_use]
    pub fn is_mirroring(&self) -> bool {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0
    }

    /// Place a single point.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    /// Place a facet, re-winding it if the placement mirrors.
    #[must_use]
    pub fn transform_triangle(&self, triangle: &Triangle) -> Triangle {
        let [a, b, c] = triangle.vertices().map(|v| self.transform_point(&v));
        if self.is_mirroring() {
            Triangle::new(a, c, b)
        } else {
            Triangle::new(a, b, c)
        }
    }

    /// Place every position of an indexed mesh. Face indices are shared,
    /// except that a mirroring placement swaps their winding.
    #[must_use]
    pub fn apply_to_mesh(&self, mesh: &IndexedMesh) -> IndexedMesh {
        let mut placed = mesh.clone();
        placed
            .positions
            .iter_mut()
            .for_each(|p| *p = self.transform_point(p));
        if self.is_mirroring() {
            placed.flip_winding();
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{MeshTopology, cuboid};

    fn enclosed(mesh: &IndexedMesh) -> f64 {
        mesh.triangles().map(|t| t.signed_volume()).sum()
    }

    #[test]
    fn default_placement_is_identity() {
        let p = Point3::new(3.0, -4.0, 12.5);
        assert!(Transform3D::default().is_identity());
        assert_eq!(Transform3D::identity().transform_point(&p), p);
    }

    #[test]
    fn translation_moves_points() {
        let t = Transform3D::translation(10.0, -20.0, 0.5);
        assert!(!t.is_identity());
        assert_eq!(
            t.transform_point(&Point3::new(1.0, 1.0, 1.0)),
            Point3::new(11.0, -19.0, 1.5)
        );
    }

    #[test]
    fn order_of_composition_matters() {
        let shift = Transform3D::translation(1.0, 0.0, 0.0);
        let triple = Transform3D::uniform_scale(3.0);
        let origin = Point3::origin();

        assert_relative_eq!(shift.then(&triple).transform_point(&origin).x, 3.0);
        assert_relative_eq!(triple.then(&shift).transform_point(&origin).x, 1.0);
    }

    #[test]
    fn quarter_turn_about_z() {
        let turn = Transform3D::rotation(Vector3::z(), std::f64::consts::FRAC_PI_2);
        let p = turn.transform_point(&Point3::new(1.0, 0.0, 4.0));

        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 4.0, epsilon = 1e-12);
        assert!(!turn.is_mirroring());
    }

    #[test]
    fn zero_axis_rotation_is_identity() {
        assert!(Transform3D::rotation(Vector3::zeros(), 1.0).is_identity());
    }

    #[test]
    fn rotated_mesh_keeps_its_volume() {
        let turn = Transform3D::rotation(Vector3::new(1.0, 1.0, 0.0), 0.7);
        let placed = turn.apply_to_mesh(&cuboid(10.0, 20.0, 30.0));

        assert_relative_eq!(enclosed(&placed), 6000.0, epsilon = 1e-6);
    }

    #[test]
    fn raw_matrix_round_trips() {
        let shift = Transform3D::translation(4.0, 5.0, 6.0);
        let raw = Transform3D::from_matrix(*shift.matrix());

        assert_eq!(raw, shift);
        assert_relative_eq!(raw.transform_point(&Point3::origin()).z, 6.0);
    }

    #[test]
    fn mirroring_needs_an_odd_number_of_flips() {
        assert!(Transform3D::scale(-1.0, 1.0, 1.0).is_mirroring());
        assert!(!Transform3D::scale(-1.0, -1.0, 1.0).is_mirroring());
        assert!(Transform3D::uniform_scale(-1.0).is_mirroring());
        assert!(!Transform3D::translation(-5.0, -5.0, -5.0).is_mirroring());
    }

    #[test]
    fn mirrored_facet_keeps_facing_out() {
        let facet = Triangle::from_arrays([2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]);
        let mirrored = Transform3D::scale(1.0, -1.0, 1.0).transform_triangle(&facet);

        assert_relative_eq!(mirrored.signed_volume(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn placed_mesh_shares_faces() {
        let part = cuboid(10.0, 20.0, 30.0);
        let placed = Transform3D::translation(5.0, 5.0, 5.0).apply_to_mesh(&part);

        assert_eq!(placed.faces, part.faces);
        assert_relative_eq!(enclosed(&placed), 6000.0, epsilon = 1e-9);
    }

    #[test]
    fn mirrored_mesh_volume_stays_positive() {
        let part = cuboid(10.0, 10.0, 10.0);
        let mirrored = Transform3D::scale(1.0, 1.0, -2.0).apply_to_mesh(&part);

        assert_relative_eq!(enclosed(&mirrored), 2000.0, epsilon = 1e-9);
    }
}
