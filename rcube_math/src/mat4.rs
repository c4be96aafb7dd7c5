use core::ops::{Index, Mul};

use crate::{Quat, Vec3, Vec4};

/// Mat4 is considered a column-major matrix, constructed using 4 Vec4s
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [Vec4; 4]);

impl Index<usize> for Mat4 {
    type Output = Vec4;

    fn index(&self, index: usize) -> &Vec4 {
        match index {
            0 => &self.0[0],
            1 => &self.0[1],
            2 => &self.0[2],
            3 => &self.0[3],
            _ => panic!("INDEXING OUT_OF_BOUNDS in Mat4"),
        }
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4([
        Vec4([1.0, 0.0, 0.0, 0.0]),
        Vec4([0.0, 1.0, 0.0, 0.0]),
        Vec4([0.0, 0.0, 1.0, 0.0]),
        Vec4([0.0, 0.0, 0.0, 1.0]),
    ]);

    pub fn from_translation(pos: Vec3) -> Mat4 {
        Mat4([
            Vec4([1.0, 0.0, 0.0, 0.0]),
            Vec4([0.0, 1.0, 0.0, 0.0]),
            Vec4([0.0, 0.0, 1.0, 0.0]),
            Vec4([pos[0], pos[1], pos[2], 1.0]),
        ])
    }

    pub fn from_scale(scale: Vec3) -> Mat4 {
        Mat4([
            Vec4([scale[0], 0.0, 0.0, 0.0]),
            Vec4([0.0, scale[1], 0.0, 0.0]),
            Vec4([0.0, 0.0, scale[2], 0.0]),
            Vec4([0.0, 0.0, 0.0, 1.0]),
        ])
    }

    pub fn from_rotation(rotation: Quat) -> Mat4 {
        rotation.to_mat4()
    }

    /// `T * R * S`: a point is scaled, then rotated, then translated.
    pub fn from_scale_rotation_translation(scale: Vec3, rotation: Quat, translation: Vec3) -> Mat4 {
        let rotation_scale = rotation.to_mat4().mul_mat4(&Mat4::from_scale(scale));
        Mat4::from_translation(translation).mul_mat4(&rotation_scale)
    }

    pub fn column(&self, index: usize) -> Vec4 {
        self[index]
    }

    pub fn extract_row(&self, index: usize) -> Vec4 {
        Vec4([
            self[0][index],
            self[1][index],
            self[2][index],
            self[3][index],
        ])
    }

    /// Translation part (the fourth column).
    pub fn translation(&self) -> Vec3 {
        self[3].xyz()
    }

    pub fn mul_mat4(&self, rhs: &Mat4) -> Mat4 {
        let rows = [
            self.extract_row(0),
            self.extract_row(1),
            self.extract_row(2),
            self.extract_row(3),
        ];
        let column = |c: usize| {
            Vec4([
                Vec4::dot(&rows[0], &rhs[c]),
                Vec4::dot(&rows[1], &rhs[c]),
                Vec4::dot(&rows[2], &rhs[c]),
                Vec4::dot(&rows[3], &rhs[c]),
            ])
        };
        Mat4([column(0), column(1), column(2), column(3)])
    }

    pub fn mul_vec4(&self, v: &Vec4) -> Vec4 {
        Vec4([
            Vec4::dot(&self.extract_row(0), v),
            Vec4::dot(&self.extract_row(1), v),
            Vec4::dot(&self.extract_row(2), v),
            Vec4::dot(&self.extract_row(3), v),
        ])
    }

    /// Transforms a point (`w = 1`); assumes the lower row is `0 0 0 1`.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.mul_vec4(&Vec4::from_point(p)).xyz()
    }

    /// Transforms a direction (`w = 0`), ignoring translation.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.mul_vec4(&Vec4::from_direction(d)).xyz()
    }

    pub fn perspective(fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        let fov_ratio = near * f32::tan(f32::to_radians(fov_degrees) / 2.0);

        let r = aspect_ratio * fov_ratio;
        let l = -r;
        let t = fov_ratio;
        let b = -t;
        Mat4([
            Vec4([2.0 * near / (r - l), 0.0, 0.0, 0.0]),
            Vec4([0.0, 2.0 * near / (t - b), 0.0, 0.0]),
            Vec4([
                (r + l) / (r - l),
                (t + b) / (t - b),
                -(far + near) / (far - near),
                -1.0,
            ]),
            Vec4([0.0, 0.0, -2.0 * far * near / (far - near), 0.0]),
        ])
    }

    /// General inverse via 2x2 sub-determinants. `None` when singular.
    pub fn inverse(&self) -> Option<Mat4> {
        let a = |c: usize, r: usize| self[c][r];

        let s0 = a(0, 0) * a(1, 1) - a(1, 0) * a(0, 1);
        let s1 = a(0, 0) * a(1, 2) - a(1, 0) * a(0, 2);
        let s2 = a(0, 0) * a(1, 3) - a(1, 0) * a(0, 3);
        let s3 = a(0, 1) * a(1, 2) - a(1, 1) * a(0, 2);
        let s4 = a(0, 1) * a(1, 3) - a(1, 1) * a(0, 3);
        let s5 = a(0, 2) * a(1, 3) - a(1, 2) * a(0, 3);

        let c5 = a(2, 2) * a(3, 3) - a(3, 2) * a(2, 3);
        let c4 = a(2, 1) * a(3, 3) - a(3, 1) * a(2, 3);
        let c3 = a(2, 1) * a(3, 2) - a(3, 1) * a(2, 2);
        let c2 = a(2, 0) * a(3, 3) - a(3, 0) * a(2, 3);
        let c1 = a(2, 0) * a(3, 2) - a(3, 0) * a(2, 2);
        let c0 = a(2, 0) * a(3, 1) - a(3, 0) * a(2, 1);

        let det = s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0;
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        Some(Mat4([
            Vec4([
                (a(1, 1) * c5 - a(1, 2) * c4 + a(1, 3) * c3) * inv_det,
                (-a(0, 1) * c5 + a(0, 2) * c4 - a(0, 3) * c3) * inv_det,
                (a(3, 1) * s5 - a(3, 2) * s4 + a(3, 3) * s3) * inv_det,
                (-a(2, 1) * s5 + a(2, 2) * s4 - a(2, 3) * s3) * inv_det,
            ]),
            Vec4([
                (-a(1, 0) * c5 + a(1, 2) * c2 - a(1, 3) * c1) * inv_det,
                (a(0, 0) * c5 - a(0, 2) * c2 + a(0, 3) * c1) * inv_det,
                (-a(3, 0) * s5 + a(3, 2) * s2 - a(3, 3) * s1) * inv_det,
                (a(2, 0) * s5 - a(2, 2) * s2 + a(2, 3) * s1) * inv_det,
            ]),
            Vec4([
                (a(1, 0) * c4 - a(1, 1) * c2 + a(1, 3) * c0) * inv_det,
                (-a(0, 0) * c4 + a(0, 1) * c2 - a(0, 3) * c0) * inv_det,
                (a(3, 0) * s4 - a(3, 1) * s2 + a(3, 3) * s0) * inv_det,
                (-a(2, 0) * s4 + a(2, 1) * s2 - a(2, 3) * s0) * inv_det,
            ]),
            Vec4([
                (-a(1, 0) * c3 + a(1, 1) * c1 - a(1, 2) * c0) * inv_det,
                (a(0, 0) * c3 - a(0, 1) * c1 + a(0, 2) * c0) * inv_det,
                (-a(3, 0) * s3 + a(3, 1) * s1 - a(3, 2) * s0) * inv_det,
                (a(2, 0) * s3 - a(2, 1) * s1 + a(2, 2) * s0) * inv_det,
            ]),
        ]))
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.mul_mat4(&rhs)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(m: Mat4) -> Self {
        [m[0].into(), m[1].into(), m[2].into(), m[3].into()]
    }
}
