//! Column-major matrix helpers for building view-projection transforms.
//!
//! Matrices are indexed `m[column][row]` with OpenGL clip conventions
//! (right-handed view space, clip depth in `[-w, w]`), which is what
//! `Frustum::from_view_projection` expects.

/// Right-handed perspective projection.
///
/// `fov_y` is the vertical field of view in radians.
#[must_use]
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> [[f32; 4]; 4] {
    let f = 1.0 / (fov_y * 0.5).tan();
    let depth = near - far;
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, (far + near) / depth, -1.0],
        [0.0, 0.0, 2.0 * far * near / depth, 0.0],
    ]
}

/// Right-handed view matrix looking from `eye` towards `target`, Y up.
#[must_use]
pub fn look_at(eye: [f32; 3], target: [f32; 3], up: [f32; 3]) -> [[f32; 4]; 4] {
    let f = normalize(sub(target, eye));
    let s = normalize(cross(f, up));
    let u = cross(s, f);
    [
        [s[0], u[0], -f[0], 0.0],
        [s[1], u[1], -f[1], 0.0],
        [s[2], u[2], -f[2], 0.0],
        [-dot(s, eye), -dot(u, eye), dot(f, eye), 1.0],
    ]
}

/// Matrix product `a * b`.
#[must_use]
pub fn multiply(a: &[[f32; 4]; 4], b: &[[f32; 4]; 4]) -> [[f32; 4]; 4] {
    let mut out = [[0.0; 4]; 4];
    for (col, out_col) in out.iter_mut().enumerate() {
        for (row, value) in out_col.iter_mut().enumerate() {
            *value = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    out
}

#[inline]
fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    #[test]
    fn test_multiply_identity() {
        let p = perspective(1.0, 1.5, 0.1, 100.0);
        assert_eq!(multiply(&IDENTITY, &p), p);
        assert_eq!(multiply(&p, &IDENTITY), p);
    }

    #[test]
    fn test_look_at_moves_target_onto_negative_z() {
        let view = look_at([0.0, 10.0, 0.0], [0.0, 10.0, 10.0], [0.0, 1.0, 0.0]);
        // Transform the target point (0, 10, 10, 1)
        let p = [0.0, 10.0, 10.0, 1.0];
        let z: f32 = (0..4).map(|k| view[k][2] * p[k]).sum();
        let x: f32 = (0..4).map(|k| view[k][0] * p[k]).sum();

        assert!((z + 10.0).abs() < 1e-5);
        assert!(x.abs() < 1e-5);
    }
}
