//! End-to-end transformation pipeline tests: camera and projection
//! matrices built the way a renderer builds them, checked against
//! reference values computed at f64 precision.

use std::f32::consts::{FRAC_PI_4, FRAC_PI_2};

use gfxmath::{Mat3, Mat4, Quat, Vec3, Vec4};

const EPSILON: f32 = 1e-5;

fn assert_mat4_eq(actual: Mat4, expected: [f32; 16]) {
    let a = actual.to_array();
    for (i, (x, y)) in a.iter().zip(expected.iter()).enumerate() {
        assert!(
            (x - y).abs() < EPSILON,
            "element {} differs: expected {}, got {}",
            i, y, x
        );
    }
}

fn assert_vec3_eq(actual: Vec3, expected: Vec3, tol: f32) {
    assert!(
        (actual.x - expected.x).abs() < tol
            && (actual.y - expected.y).abs() < tol
            && (actual.z - expected.z).abs() < tol,
        "Expected {:?}, got {:?}",
        expected, actual
    );
}

#[test]
fn view_projection_chain_matches_reference() {
    // perspective * lookAt * rotZ(45deg), reference computed in f64
    let m = Mat4::perspective(FRAC_PI_4, 1.0, 0.1, 100.0, false)
        .mul_look_at(0.0, 2.0, 10.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0)
        .rotate_z(FRAC_PI_4);
    assert_mat4_eq(m, [
        1.7071067811865475, 1.6739559209724564, -0.13895267678214573, -0.1386750490563073,
        -1.7071067811865472, 1.6739559209724566, -0.13895267678214573, -0.1386750490563073,
        0.0, -0.4734662332507986, -0.9825438001667779, -0.9805806756909202,
        0.0, 0.0, 10.01825532153429, 10.19803902718557,
    ]);
}

#[test]
fn look_at_matches_reference() {
    let m = Mat4::look_at(0.0, 2.0, 10.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
    assert_mat4_eq(m, [
        1.0, 0.0, 0.0, 0.0,
        0.0, 0.980581, 0.196116, 0.0,
        0.0, -0.196116, 0.980581, 0.0,
        0.0, 0.0, -10.198039, 1.0,
    ]);
}

#[test]
fn view_2d_chain_matches_reference() {
    let m = Mat3::view(-2.0, 2.0, -2.0, 2.0).rotate(FRAC_PI_4);
    let expected = [
        0.3535533905932738, 0.35355339059327373, 0.0,
        -0.35355339059327373, 0.3535533905932738, 0.0,
        0.0, 0.0, -1.0,
    ];
    for (i, (x, y)) in m.to_array().iter().zip(expected.iter()).enumerate() {
        assert!(
            (x - y).abs() < EPSILON,
            "element {} differs: expected {}, got {}",
            i, y, x
        );
    }
}

#[test]
fn frustum_corners_lie_on_their_planes() {
    let m = Mat4::perspective(FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0, false)
        .mul_look_at(2.0, 3.0, 8.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
    let corner_planes = [
        (Mat4::CORNER_NXNYNZ, [Mat4::PLANE_NX, Mat4::PLANE_NY, Mat4::PLANE_NZ]),
        (Mat4::CORNER_PXNYNZ, [Mat4::PLANE_PX, Mat4::PLANE_NY, Mat4::PLANE_NZ]),
        (Mat4::CORNER_PXPYNZ, [Mat4::PLANE_PX, Mat4::PLANE_PY, Mat4::PLANE_NZ]),
        (Mat4::CORNER_NXPYNZ, [Mat4::PLANE_NX, Mat4::PLANE_PY, Mat4::PLANE_NZ]),
        (Mat4::CORNER_PXNYPZ, [Mat4::PLANE_PX, Mat4::PLANE_NY, Mat4::PLANE_PZ]),
        (Mat4::CORNER_NXNYPZ, [Mat4::PLANE_NX, Mat4::PLANE_NY, Mat4::PLANE_PZ]),
        (Mat4::CORNER_NXPYPZ, [Mat4::PLANE_NX, Mat4::PLANE_PY, Mat4::PLANE_PZ]),
        (Mat4::CORNER_PXPYPZ, [Mat4::PLANE_PX, Mat4::PLANE_PY, Mat4::PLANE_PZ]),
    ];
    for (corner, planes) in corner_planes {
        let p = m.frustum_corner(corner);
        for plane in planes {
            let eq = m.frustum_plane(plane);
            let dist = eq.x * p.x + eq.y * p.y + eq.z * p.z + eq.w;
            assert!(
                dist.abs() < 1e-3,
                "corner {} off plane {} by {}",
                corner, plane, dist
            );
        }
    }
}

#[test]
#[should_panic(expected = "invalid frustum plane index")]
fn frustum_plane_rejects_bad_index() {
    let _ = Mat4::IDENTITY.frustum_plane(6);
}

#[test]
#[should_panic(expected = "invalid frustum corner index")]
fn frustum_corner_rejects_bad_index() {
    let _ = Mat4::IDENTITY.frustum_corner(8);
}

#[test]
fn unproject_inverts_project_through_full_pipeline() {
    let viewport = [0.0, 0.0, 1280.0, 720.0];
    let m = Mat4::perspective(FRAC_PI_2, 1280.0 / 720.0, 0.5, 200.0, false)
        .mul_look_at(5.0, 4.0, 12.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0);
    let inv = m.invert();
    for p in [
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-3.0, 0.5, 2.0),
        Vec3::new(4.0, -1.0, -6.0),
    ] {
        let win = m.project(p.x, p.y, p.z, viewport);
        assert_vec3_eq(m.unproject(win.x, win.y, win.z, viewport), p, 1e-3);
        assert_vec3_eq(inv.unproject_inv(win.x, win.y, win.z, viewport), p, 1e-3);
    }
}

#[test]
fn picking_ray_passes_through_projected_point() {
    let viewport = [0.0, 0.0, 1280.0, 720.0];
    let m = Mat4::perspective(FRAC_PI_2, 1280.0 / 720.0, 0.5, 200.0, false)
        .mul_look_at(0.0, 2.0, 10.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
    let target = Vec3::new(1.5, -0.5, 1.0);
    let win = m.project(target.x, target.y, target.z, viewport);
    let (origin, dir) = m.unproject_ray(win.x, win.y, viewport);
    // The target lies on the ray: (target - origin) is parallel to dir
    let to_target = target - origin;
    let cross = to_target.cross(dir);
    assert!(cross.length() < 1e-2 * dir.length(), "cross {:?}", cross);
}

#[test]
fn quaternion_and_matrix_rotation_agree() {
    let q = Quat::from_axis_angle(0.9, 0.3, -0.5, 0.8);
    let m = Mat4::from_quat(&q);
    let v = Vec3::new(2.0, -1.0, 0.5);
    assert_vec3_eq(m.transform_position(v), q.transform(v), 1e-5);
    // Round trip through the matrix recovers the rotation
    let q2 = Quat::from_normalized_mat4(&m);
    let w = q2.transform(v);
    assert_vec3_eq(w, q.transform(v), 1e-5);
}

#[test]
fn normal_matrix_preserves_perpendicularity() {
    let model = Mat4::from_translation(1.0, 2.0, 3.0)
        .rotate(0.7, 0.0, 1.0, 0.0)
        .scale(2.0, 1.0, 0.25);
    let normal = Vec3::new(0.0, 0.0, 1.0);
    let tangent = Vec3::new(1.0, 0.0, 0.0);
    let n = model.normal_matrix().transform(normal);
    let t = model.transform_direction(tangent);
    assert!(n.dot(t).abs() < 1e-5, "normal not perpendicular: {}", n.dot(t));
}

#[test]
fn shadow_flattens_onto_ground_plane() {
    let light = Vec4::new(0.0, 10.0, 0.0, 1.0);
    let m = Mat4::IDENTITY.shadow(light, 0.0, 1.0, 0.0, 0.0);
    for p in [
        Vec3::new(1.0, 5.0, 1.0),
        Vec3::new(-2.0, 1.0, 3.0),
        Vec3::new(0.5, 8.0, -4.0),
    ] {
        let s = m.transform_project(p);
        assert!(s.y.abs() < 1e-4, "shadow of {:?} not on plane: {:?}", p, s);
    }
}

#[test]
fn invert_round_trips_through_pipeline_matrices() {
    let matrices = [
        Mat4::perspective(FRAC_PI_4, 1.5, 0.1, 100.0, false),
        Mat4::look_at(1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0),
        Mat4::ortho(-4.0, 4.0, -3.0, 3.0, 0.1, 50.0, true),
        Mat4::from_translation(1.0, -2.0, 0.5).rotate(1.2, 0.0, 1.0, 0.0),
    ];
    for m in matrices {
        let id = m.mul(m.invert()).to_array();
        for (i, x) in id.iter().enumerate() {
            let expected = if i % 5 == 0 { 1.0 } else { 0.0 };
            assert!((x - expected).abs() < 1e-4, "element {}: {}", i, x);
        }
    }
}

#[test]
fn slerp_hits_both_endpoints() {
    let a = Quat::from_axis_angle(0.3, 0.0, 1.0, 0.0);
    let b = Quat::from_axis_angle(2.1, 1.0, 0.0, 0.0);
    let s0 = a.slerp(b, 0.0);
    let s1 = a.slerp(b, 1.0);
    let v = Vec3::new(1.0, 2.0, 3.0);
    assert_vec3_eq(s0.transform(v), a.transform(v), 1e-5);
    assert_vec3_eq(s1.transform(v), b.transform(v), 1e-5);
}
