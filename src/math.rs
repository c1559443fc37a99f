/*
 * Math Helpers
 *
 * Small vector/quaternion utilities shared by the pipeline stages.
 * Headings follow the +Z forward / +Y up convention.
 */

use glam::{EulerRot, Mat3, Quat, Vec3};

// Below this squared length a vector is treated as having no direction
pub const DEGENERATE_LENGTH_SQ: f32 = 1.0e-12;

// Normalize, returning zero instead of NaN for (near) zero-length input
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let length_sq = v.length_squared();
    if length_sq > DEGENERATE_LENGTH_SQ && length_sq.is_finite() {
        v / length_sq.sqrt()
    } else {
        Vec3::ZERO
    }
}

#[inline]
pub fn forward(rotation: Quat) -> Vec3 {
    rotation * Vec3::Z
}

#[inline]
pub fn up(rotation: Quat) -> Vec3 {
    rotation * Vec3::Y
}

// Rotation whose +Z axis points along `forward` and whose +Y axis is as close
// to `up` as possible. None when `forward` is degenerate or parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let z = safe_normalize(forward);
    if z == Vec3::ZERO {
        return None;
    }
    let x = safe_normalize(up.cross(z));
    if x == Vec3::ZERO {
        return None;
    }
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}

// Falls back to `current` so a degenerate velocity never produces a NaN rotation
#[inline]
pub fn look_rotation_or(forward: Vec3, up: Vec3, current: Quat) -> Quat {
    look_rotation(forward, up).unwrap_or(current)
}

// Rotation from three Euler angles in degrees, applied z, then x, then y
pub fn euler_degrees(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, y.to_radians(), x.to_radians(), z.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-5;

    #[test]
    fn safe_normalize_of_zero_is_zero() {
        let n = safe_normalize(Vec3::ZERO);
        assert_eq!(n, Vec3::ZERO);
        assert!(!n.is_nan());
    }

    #[test]
    fn safe_normalize_of_tiny_vector_is_zero() {
        assert_eq!(safe_normalize(Vec3::splat(1.0e-9)), Vec3::ZERO);
    }

    #[test]
    fn safe_normalize_is_unit_regardless_of_magnitude() {
        for scale in [1.0e-3_f32, 1.0, 250.0, 1.0e6] {
            let n = safe_normalize(Vec3::new(3.0, -4.0, 12.0) * scale);
            assert!((n.length() - 1.0).abs() < EPS, "scale {scale} gave {n:?}");
            assert!((n - Vec3::new(3.0, -4.0, 12.0) / 13.0).length() < EPS);
        }
    }

    #[test]
    fn look_rotation_points_forward_axis_along_direction() {
        let dir = Vec3::new(1.0, 0.5, -2.0);
        let rotation = look_rotation(dir, Vec3::Y).unwrap();
        assert!((forward(rotation) - dir.normalize()).length() < EPS);
        // Up stays in the plane spanned by the requested up and forward
        assert!(up(rotation).dot(Vec3::Y) > 0.0);
    }

    #[test]
    fn look_rotation_identity_for_plus_z() {
        let rotation = look_rotation(Vec3::Z, Vec3::Y).unwrap();
        assert!(rotation.abs_diff_eq(Quat::IDENTITY, EPS));
    }

    #[test]
    fn look_rotation_rejects_degenerate_input() {
        assert!(look_rotation(Vec3::ZERO, Vec3::Y).is_none());
        assert!(look_rotation(Vec3::Y * 3.0, Vec3::Y).is_none());
        let current = euler_degrees(10.0, 20.0, 30.0);
        assert_eq!(look_rotation_or(Vec3::ZERO, Vec3::Y, current), current);
    }

    #[test]
    fn euler_degrees_full_turn_is_identity_rotation() {
        let q = euler_degrees(360.0, -360.0, 0.0);
        let v = Vec3::new(0.3, -0.2, 0.9);
        assert!((q * v - v).length() < 1.0e-4);
    }
}
