use core::ops::{Index, Mul};

use crate::{Mat4, Vec3, Vec4};

const QUAT_NORMALIZED_THRESHOLD: f32 = 0.001;

/// Rotation quaternion, `w` is the scalar part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    x: f32,
    y: f32,
    z: f32,
    w: f32,
}

impl Index<usize> for Quat {
    type Output = f32;
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("INDEXING OUT_OF_BOUNDS in Quat"),
        }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Builds a quaternion from raw components and normalizes it.
    pub fn from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Quat {
        Quat { x, y, z, w }.normalized()
    }

    /// Rotation of `angle` radians around `axis` (need not be unit length).
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Quat {
        let axis = axis.normalize();
        let factor = f32::sin(angle / 2.0);

        Quat {
            x: axis[0] * factor,
            y: axis[1] * factor,
            z: axis[2] * factor,
            w: f32::cos(angle / 2.0),
        }
        .normalized()
    }

    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Quat {
        let yaw_rotation = Quat::from_axis_angle(Vec3::Y, yaw);
        let pitch_rotation = Quat::from_axis_angle(Vec3::X, pitch);

        yaw_rotation * pitch_rotation
    }

    fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    pub fn is_normalized(&self) -> bool {
        f32::abs(1.0 - self.length_squared()) < QUAT_NORMALIZED_THRESHOLD
    }

    /// Unit-length copy. A zero quaternion normalizes to identity.
    pub fn normalized(&self) -> Quat {
        let len = self.length_squared().sqrt();
        if len == 0.0 {
            return Quat::IDENTITY;
        }
        Quat {
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
            w: self.w / len,
        }
    }

    /// Conjugate, which is the inverse for unit quaternions.
    pub fn inverse(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    pub fn dot(&self, rhs: Quat) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    /// Rotation matrix with no translation.
    pub fn to_mat4(&self) -> Mat4 {
        let x2 = self.x + self.x;
        let y2 = self.y + self.y;
        let z2 = self.z + self.z;

        let xx = self.x * x2;
        let xy = self.x * y2;
        let xz = self.x * z2;

        let yy = self.y * y2;
        let yz = self.y * z2;
        let zz = self.z * z2;

        let wx = self.w * x2;
        let wy = self.w * y2;
        let wz = self.w * z2;

        Mat4([
            Vec4([1.0 - (yy + zz), xy + wz, xz - wy, 0.0]),
            Vec4([xy - wz, 1.0 - (xx + zz), yz + wx, 0.0]),
            Vec4([xz + wy, yz - wx, 1.0 - (xx + yy), 0.0]),
            Vec4([0.0, 0.0, 0.0, 1.0]),
        ])
    }
}

impl Mul for Quat {
    type Output = Quat;

    fn mul(self, other: Quat) -> Self::Output {
        debug_assert!(self.is_normalized());
        debug_assert!(other.is_normalized());

        Self {
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
        }
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        let q = Vec3::new(self.x, self.y, self.z);
        let t = 2.0 * q.cross(v);

        v + (self.w * t) + q.cross(t)
    }
}
