use approx::assert_abs_diff_eq;
use std::f32::consts::{FRAC_PI_2, PI};

use rcube_math::{Mat4, Quat, Vec3};

#[test]
fn test_quat_identity() {
    let quat = Quat::IDENTITY;
    let vec = Vec3::new(1.0, 1.0, 1.0);
    let rotated_vec = quat * vec;
    assert_eq!(vec, rotated_vec);
}

#[test]
fn test_quat_rotate_quarter_turns() {
    let quat = Quat::from_axis_angle(Vec3::X, FRAC_PI_2);
    let vec = Vec3::new(1.0, 1.0, 0.0);

    let expected = [
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 0.0, -1.0),
        vec,
    ];
    let mut rotated_vec = vec;
    for step in expected {
        rotated_vec = quat * rotated_vec;
        assert_abs_diff_eq!(rotated_vec[0], step[0], epsilon = 0.0001);
        assert_abs_diff_eq!(rotated_vec[1], step[1], epsilon = 0.0001);
        assert_abs_diff_eq!(rotated_vec[2], step[2], epsilon = 0.0001);
    }
}

#[test]
fn test_quat_is_unit_length() {
    let quat = Quat::from_axis_angle(Vec3::new(2.25, 6.21, 1.22), 0.25);
    assert!(quat.is_normalized());
    assert_abs_diff_eq!(quat.dot(quat), 1.0, epsilon = 0.0001);
}

#[test]
fn test_quat_inverse() {
    let quat = Quat::from_axis_angle(Vec3::new(2.25, 6.21, 1.22), 0.25);
    let vec = Vec3::new(1.0, 2.0, 3.0);
    let unrotated_vec = quat.inverse() * (quat * vec);
    assert_abs_diff_eq!(vec[0], unrotated_vec[0], epsilon = 0.0001);
    assert_abs_diff_eq!(vec[1], unrotated_vec[1], epsilon = 0.0001);
    assert_abs_diff_eq!(vec[2], unrotated_vec[2], epsilon = 0.0001);
}

#[test]
fn test_quat_mat_agrees_with_quat_rotation() {
    let quat = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 1.0), FRAC_PI_2);
    let mat = Mat4::from_rotation(quat);
    let vec = Vec3::new(0.5, -2.0, 3.0);

    let by_quat = quat * vec;
    let by_mat = mat.transform_point(vec);
    assert_abs_diff_eq!(by_quat[0], by_mat[0], epsilon = 0.0001);
    assert_abs_diff_eq!(by_quat[1], by_mat[1], epsilon = 0.0001);
    assert_abs_diff_eq!(by_quat[2], by_mat[2], epsilon = 0.0001);
}

#[test]
fn test_half_turn_about_x() {
    let mat = Quat::from_axis_angle(Vec3::X, PI).to_mat4();
    let v = mat.transform_point(Vec3::new(1.0, 1.0, 1.0));
    assert_abs_diff_eq!(v[0], 1.0, epsilon = 0.0001);
    assert_abs_diff_eq!(v[1], -1.0, epsilon = 0.0001);
    assert_abs_diff_eq!(v[2], -1.0, epsilon = 0.0001);
}

#[test]
fn test_zero_quat_normalizes_to_identity() {
    assert_eq!(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0), Quat::IDENTITY);
}
