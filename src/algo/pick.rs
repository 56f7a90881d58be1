//! Ray picking against mesh faces.
//!
//! [`intersect_face`] tests one triangle; [`intersect`] and
//! [`intersect_with`] scan every face and choose one hit.
//!
//! # Choosing between several hits
//!
//! The default [`PickPolicy::LargestPlaneDistance`] keeps the hit whose face
//! plane is farthest from the ray origin (largest signed distance), which is
//! how picking has always behaved for interactive use. This is not the same
//! as the first surface along the ray when the ray passes through several
//! layers; [`PickPolicy::NearestAlongRay`] selects that instead.
//!
//! # Example
//!
//! ```
//! use wingmesh::prelude::*;
//! use wingmesh::algo::pick::intersect;
//! use nalgebra::{Point3, Vector3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! let hit = intersect(&mesh, &Point3::new(0.25, 0.25, 1.0), &Vector3::new(0.0, 0.0, -1.0)).unwrap();
//! assert_eq!(hit.face, FaceId::new(0));
//! assert!((hit.distance - 1.0).abs() < 1e-12);
//! ```

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex};

/// Tolerance for sliver faces and for ray origins lying in a face plane.
pub const PICK_EPSILON: f64 = 1e-7;

/// A ray with an origin and a (not necessarily unit) direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Where the ray starts.
    pub origin: Point3<f64>,
    /// Direction of travel. Hit distances are measured in multiples of it.
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Create a ray.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// The point at parameter `t` along the ray.
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Where a ray meets a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<I: MeshIndex = u32> {
    /// The face that was hit.
    pub face: FaceId<I>,

    /// Weights of corners 0, 1 and 2. Non-negative and summing to one.
    pub barycentric: [f64; 3],

    /// Ray parameter of the hit point.
    pub distance: f64,

    /// Signed distance of the ray origin from the face plane, positive on
    /// the side the face normal points to.
    pub plane_distance: f64,
}

/// How to choose among several faces hit by the same ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickPolicy {
    /// Keep the hit with the largest signed plane distance.
    #[default]
    LargestPlaneDistance,
    /// Keep the hit closest to the ray origin along the ray.
    NearestAlongRay,
}

/// Options for [`intersect_with`].
#[derive(Debug, Clone)]
pub struct PickOptions {
    /// How to choose among several hits.
    pub policy: PickPolicy,

    /// Tolerance for sliver faces and in-plane ray origins.
    pub epsilon: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            policy: PickPolicy::default(),
            epsilon: PICK_EPSILON,
        }
    }
}

impl PickOptions {
    /// Set the hit selection policy.
    pub fn with_policy(mut self, policy: PickPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Pick the first surface along the ray.
    pub fn nearest(self) -> Self {
        self.with_policy(PickPolicy::NearestAlongRay)
    }

    /// Set the tolerance. Must be finite and positive.
    pub fn with_epsilon(mut self, epsilon: f64) -> Result<Self> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(MeshError::invalid_param(
                "epsilon",
                epsilon,
                "must be finite and positive",
            ));
        }
        self.epsilon = epsilon;
        Ok(self)
    }
}

/// Intersect a ray with a single face.
///
/// Returns `None` when the face is a sliver, the origin lies in the face
/// plane, the ray runs parallel to or away from the plane, or the plane
/// point falls outside the triangle.
pub fn intersect_face<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
    ray: &Ray,
    epsilon: f64,
) -> Option<RayHit<I>> {
    let [q1, q2, q3] = mesh.face_positions(face);

    let v2 = q2 - q1;
    let v3 = q3 - q1;
    let area = v2.cross(&v3);
    let area_norm = area.norm();
    if area_norm < epsilon {
        return None;
    }

    let mut normal = v2.normalize().cross(&v3.normalize()).normalize();
    let plane_distance = normal.dot(&(ray.origin - q1));
    if plane_distance.abs() < epsilon {
        return None;
    }

    // Face the normal towards the ray origin
    if plane_distance < 0.0 {
        normal = -normal;
    }
    let closing = -normal.dot(&ray.direction);
    if closing <= 0.0 {
        return None;
    }

    let distance = plane_distance.abs() / closing;
    let w = ray.at(distance) - q1;

    let o3 = v2.cross(&w);
    let o2 = w.cross(&v3);
    if o2.dot(&area) < 0.0 || o3.dot(&area) < 0.0 {
        return None;
    }

    let b2 = o2.norm() / area_norm;
    let b3 = o3.norm() / area_norm;
    let b1 = 1.0 - b2 - b3;
    if b1 < 0.0 {
        return None;
    }

    Some(RayHit {
        face,
        barycentric: [b1, b2, b3],
        distance,
        plane_distance,
    })
}

/// Intersect a ray with every face using the default [`PickOptions`].
pub fn intersect<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
) -> Option<RayHit<I>> {
    intersect_with(mesh, &Ray::new(*origin, *direction), &PickOptions::default())
}

/// Intersect a ray with every face and choose one hit by `options.policy`.
///
/// Ties keep the face with the lower ID.
pub fn intersect_with<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    ray: &Ray,
    options: &PickOptions,
) -> Option<RayHit<I>> {
    let better = |hit: &RayHit<I>, best: &RayHit<I>| match options.policy {
        PickPolicy::LargestPlaneDistance => hit.plane_distance > best.plane_distance,
        PickPolicy::NearestAlongRay => hit.distance < best.distance,
    };

    mesh.face_ids()
        .filter_map(|f| intersect_face(mesh, f, ray, options.epsilon))
        .fold(None, |best, hit| match best {
            Some(b) if !better(&hit, &b) => Some(b),
            _ => Some(hit),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    fn single_triangle() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    /// Two parallel triangles stacked at z = 0 and z = -1.
    fn stacked_layers() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(0.0, 1.0, -1.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [3, 4, 5]]).unwrap()
    }

    #[test]
    fn test_centroid_hit() {
        let mesh = single_triangle();
        let centroid = mesh.face_centroid(FaceId::new(0));
        let origin = centroid + Vector3::new(0.0, 0.0, 2.0);

        let hit = intersect(&mesh, &origin, &Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert_eq!(hit.face, FaceId::new(0));

        let sum: f64 = hit.barycentric.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        for b in hit.barycentric {
            assert!((0.0..=1.0).contains(&b));
            assert!((b - 1.0 / 3.0).abs() < 1e-12);
        }
        assert!((hit.distance - 2.0).abs() < 1e-12);
        assert!((hit.plane_distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_barycentric_weights_reconstruct_point() {
        let mesh = single_triangle();
        let ray = Ray::new(Point3::new(0.6, 0.1, 3.0), Vector3::new(0.0, 0.0, -2.0));
        let hit = intersect_face(&mesh, FaceId::new(0), &ray, PICK_EPSILON).unwrap();

        let [p0, p1, p2] = mesh.face_positions(hit.face);
        let [b0, b1, b2] = hit.barycentric;
        let rebuilt = p0.coords * b0 + p1.coords * b1 + p2.coords * b2;
        assert!((rebuilt - ray.at(hit.distance).coords).norm() < 1e-12);
        assert!((hit.distance - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_hit_from_back_side() {
        let mesh = single_triangle();
        let hit = intersect(&mesh, &Point3::new(0.2, 0.2, -1.0), &Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(hit.plane_distance < 0.0);
        assert!((hit.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_miss_outside_footprint() {
        let mesh = single_triangle();
        let origin = Point3::new(0.8, 0.8, 1.0);
        assert!(intersect(&mesh, &origin, &Vector3::new(0.0, 0.0, -1.0)).is_none());

        let origin = Point3::new(-0.1, 0.5, 1.0);
        assert!(intersect(&mesh, &origin, &Vector3::new(0.0, 0.0, -1.0)).is_none());
    }

    #[test]
    fn test_miss_parallel_ray() {
        let mesh = single_triangle();
        let origin = Point3::new(-1.0, 0.2, 0.5);
        assert!(intersect(&mesh, &origin, &Vector3::new(1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_miss_pointing_away() {
        let mesh = single_triangle();
        let origin = Point3::new(0.2, 0.2, 1.0);
        assert!(intersect(&mesh, &origin, &Vector3::new(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_miss_origin_in_plane() {
        let mesh = single_triangle();
        let origin = Point3::new(0.2, 0.2, 0.0);
        assert!(intersect(&mesh, &origin, &Vector3::new(0.0, 0.0, -1.0)).is_none());
    }

    #[test]
    fn test_sliver_face_is_skipped() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let origin = Point3::new(1.0, 0.0, 1.0);
        assert!(intersect(&mesh, &origin, &Vector3::new(0.0, 0.0, -1.0)).is_none());
    }

    #[test]
    fn test_empty_mesh_has_no_hit() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert!(intersect(&mesh, &Point3::origin(), &Vector3::z()).is_none());
    }

    // Open question: the default policy prefers the face plane farthest from
    // the origin, not the first surface the ray meets.
    #[test]
    fn test_default_policy_prefers_largest_plane_distance() {
        let mesh = stacked_layers();
        let origin = Point3::new(0.2, 0.2, 1.0);
        let down = Vector3::new(0.0, 0.0, -1.0);

        let hit = intersect(&mesh, &origin, &down).unwrap();
        assert_eq!(hit.face, FaceId::new(1));
        assert!((hit.plane_distance - 2.0).abs() < 1e-12);
    }

    // Open question: hits from behind a face have a negative plane distance
    // and still compete under the default policy, so a ray that only sees
    // back sides picks the least negative one instead of nothing.
    #[test]
    fn test_default_policy_keeps_back_side_hits() {
        let mesh = stacked_layers();
        let origin = Point3::new(0.2, 0.2, -2.0);
        let up = Vector3::new(0.0, 0.0, 1.0);

        let hit = intersect(&mesh, &origin, &up).unwrap();
        assert_eq!(hit.face, FaceId::new(1));
        assert!((hit.plane_distance + 1.0).abs() < 1e-12);
        assert!((hit.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_policy_picks_first_surface() {
        let mesh = stacked_layers();
        let ray = Ray::new(Point3::new(0.2, 0.2, 1.0), Vector3::new(0.0, 0.0, -1.0));

        let hit = intersect_with(&mesh, &ray, &PickOptions::default().nearest()).unwrap();
        assert_eq!(hit.face, FaceId::new(0));
        assert!((hit.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_epsilon_rejected() {
        assert!(PickOptions::default().with_epsilon(0.0).is_err());
        assert!(PickOptions::default().with_epsilon(f64::NAN).is_err());
        assert!(PickOptions::default().with_epsilon(1e-9).is_ok());
    }
}
