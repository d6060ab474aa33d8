use bevy::math::{Mat4, Vec3};

use crate::engine::anchors::PlaneGeometry;

/// Slab-method ray/AABB intersection. Returns the distance along the ray to the
/// first surface in front of the origin.
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let direction = ray_direction[axis];

        // Parallel to this slab: inside it or a miss.
        if direction == 0.0 {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction;
        let (mut t0, mut t1) = ((min[axis] - origin) * inv, (max[axis] - origin) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

/// Where a world-space ray meets a plane anchor, in anchor-local coordinates.
pub struct PlaneHit {
    pub distance: f32,
    pub local_point: Vec3,
}

/// Intersect a ray with a plane anchor's estimated extent. The extent is a
/// zero-height box in anchor space centred on the plane's center.
pub fn ray_hits_plane_extent(
    origin: Vec3,
    direction: Vec3,
    anchor_pose: Mat4,
    plane: &PlaneGeometry,
) -> Option<PlaneHit> {
    let inv = anchor_pose.inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(direction);

    let half = Vec3::new(plane.extent.x * 0.5, 0.0, plane.extent.z * 0.5);
    let distance = ray_aabb_hit_t(o_local, d_local, plane.center - half, plane.center + half)?;
    Some(PlaneHit {
        distance,
        local_point: o_local + d_local * distance,
    })
}

/// Intersect a ray with the infinite plane through the anchor's center.
pub fn ray_hits_infinite_plane(
    origin: Vec3,
    direction: Vec3,
    anchor_pose: Mat4,
    plane: &PlaneGeometry,
) -> Option<PlaneHit> {
    let inv = anchor_pose.inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(direction);

    if d_local.y.abs() <= f32::EPSILON {
        return None;
    }
    let distance = (plane.center.y - o_local.y) / d_local.y;
    if distance < 0.0 {
        return None;
    }
    Some(PlaneHit {
        distance,
        local_point: o_local + d_local * distance,
    })
}
