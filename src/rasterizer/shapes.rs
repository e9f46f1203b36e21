//! Mesh builders for common shapes
//!
//! 2D shapes carry attributes `x y s t`; 3D shapes carry
//! `x y z s t nx ny nz`. Triangles are counter-clockwise seen from outside.

use std::f32::consts::{PI, TAU};

use super::error::RenderError;
use super::math::Vec3;
use super::mesh::Mesh;

pub const ATTR_DIM_2D: usize = 4;
pub const ATTR_DIM_3D: usize = 8;

/// Axis-aligned rectangle `[left, right] x [bottom, top]` with st covering 0..1
pub fn rectangle(left: f32, right: f32, bottom: f32, top: f32) -> Mesh {
    let mut mesh = Mesh::with_capacity(ATTR_DIM_2D, 4, 2);
    mesh.push_vertex(&[left, bottom, 0.0, 0.0]);
    mesh.push_vertex(&[right, bottom, 1.0, 0.0]);
    mesh.push_vertex(&[right, top, 1.0, 1.0]);
    mesh.push_vertex(&[left, top, 0.0, 1.0]);
    mesh.push_triangle(0, 1, 2);
    mesh.push_triangle(0, 2, 3);
    mesh
}

/// Triangle fan approximating an ellipse around `(cx, cy)`
pub fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32, sides: usize) -> Result<Mesh, RenderError> {
    if sides < 3 {
        return Err(RenderError::InvalidShape(format!(
            "an ellipse needs at least 3 sides, got {sides}"
        )));
    }
    let mut mesh = Mesh::with_capacity(ATTR_DIM_2D, sides + 1, sides);
    mesh.push_vertex(&[cx, cy, 0.5, 0.5]);
    for i in 0..sides {
        let (s, c) = (TAU * i as f32 / sides as f32).sin_cos();
        mesh.push_vertex(&[cx + rx * c, cy + ry * s, 0.5 + 0.5 * c, 0.5 + 0.5 * s]);
    }
    for i in 0..sides {
        mesh.push_triangle(0, i + 1, (i + 1) % sides + 1);
    }
    Ok(mesh)
}

/// Box `[left, right] x [bottom, top] x [far, near]` with flat face normals
pub fn cuboid(left: f32, right: f32, bottom: f32, top: f32, far: f32, near: f32) -> Result<Mesh, RenderError> {
    if !(left < right && bottom < top && far < near) {
        return Err(RenderError::InvalidShape(
            "cuboid bounds must satisfy left < right, bottom < top, far < near".to_string(),
        ));
    }
    let (l, r, b, t, f, n) = (left, right, bottom, top, far, near);
    // Each face: four corners counter-clockwise from outside, then the normal
    let faces: [([Vec3; 4], Vec3); 6] = [
        ([Vec3::new(l, b, n), Vec3::new(r, b, n), Vec3::new(r, t, n), Vec3::new(l, t, n)], Vec3::Z),
        ([Vec3::new(r, b, f), Vec3::new(l, b, f), Vec3::new(l, t, f), Vec3::new(r, t, f)], -Vec3::Z),
        ([Vec3::new(r, b, n), Vec3::new(r, b, f), Vec3::new(r, t, f), Vec3::new(r, t, n)], Vec3::X),
        ([Vec3::new(l, b, f), Vec3::new(l, b, n), Vec3::new(l, t, n), Vec3::new(l, t, f)], -Vec3::X),
        ([Vec3::new(l, t, n), Vec3::new(r, t, n), Vec3::new(r, t, f), Vec3::new(l, t, f)], Vec3::Y),
        ([Vec3::new(l, b, f), Vec3::new(r, b, f), Vec3::new(r, b, n), Vec3::new(l, b, n)], -Vec3::Y),
    ];
    let st = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

    let mut mesh = Mesh::with_capacity(ATTR_DIM_3D, 24, 12);
    for (corners, normal) in faces {
        let base = mesh.vertex_count();
        for (p, (s, t)) in corners.iter().zip(st) {
            mesh.push_vertex(&[p.x, p.y, p.z, s, t, normal.x, normal.y, normal.z]);
        }
        mesh.push_triangle(base, base + 1, base + 2);
        mesh.push_triangle(base, base + 2, base + 3);
    }
    Ok(mesh)
}

/// UV sphere centered on the origin. Triangles touching the poles collapse
/// to zero area and are skipped by the renderer.
pub fn sphere(radius: f32, lat_count: usize, long_count: usize) -> Result<Mesh, RenderError> {
    if radius <= 0.0 || lat_count < 2 || long_count < 3 {
        return Err(RenderError::InvalidShape(format!(
            "sphere needs radius > 0, >= 2 latitudes, >= 3 longitudes \
             (got {radius}, {lat_count}, {long_count})"
        )));
    }
    let columns = long_count + 1;
    let mut mesh = Mesh::with_capacity(ATTR_DIM_3D, (lat_count + 1) * columns, 2 * lat_count * long_count);
    for i in 0..=lat_count {
        let phi = PI * i as f32 / lat_count as f32;
        for j in 0..=long_count {
            let theta = TAU * j as f32 / long_count as f32;
            let n = Vec3::spherical(1.0, phi, theta);
            let p = n * radius;
            let s = j as f32 / long_count as f32;
            let t = 1.0 - i as f32 / lat_count as f32;
            mesh.push_vertex(&[p.x, p.y, p.z, s, t, n.x, n.y, n.z]);
        }
    }
    for i in 0..lat_count {
        for j in 0..long_count {
            let a = i * columns + j;
            let b = a + columns;
            mesh.push_triangle(a, b, b + 1);
            mesh.push_triangle(a, b + 1, a + 1);
        }
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::mesh::face_normal;

    #[test]
    fn test_rectangle_layout() {
        let mesh = rectangle(1.0, 3.0, 2.0, 5.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.vertex(2), &[3.0, 5.0, 1.0, 1.0]);
        assert_eq!(mesh.triangles().len(), 2);
    }

    #[test]
    fn test_ellipse_needs_three_sides() {
        assert!(ellipse(0.0, 0.0, 1.0, 1.0, 2).is_err());
        let mesh = ellipse(0.0, 0.0, 2.0, 1.0, 16).unwrap();
        assert_eq!(mesh.vertex_count(), 17);
        assert_eq!(mesh.triangles().len(), 16);
        assert_eq!(mesh.triangles()[15], [0, 16, 1]);
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = cuboid(-1.0, 1.0, -2.0, 2.0, -3.0, 3.0).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        for tri in mesh.triangles() {
            let p = |i: usize| Vec3::from_slice(&mesh.vertex(i)[0..3]);
            let geometric = face_normal(p(tri[0]), p(tri[1]), p(tri[2]));
            let stored = Vec3::from_slice(&mesh.vertex(tri[0])[5..8]);
            assert!(geometric.dot(stored) > 0.99);
        }
        assert!(cuboid(1.0, -1.0, 0.0, 1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = sphere(2.0, 8, 12).unwrap();
        assert_eq!(mesh.vertex_count(), 9 * 13);
        for i in 0..mesh.vertex_count() {
            let p = Vec3::from_slice(&mesh.vertex(i)[0..3]);
            assert!((p.len() - 2.0).abs() < 1e-4);
        }
        assert!(sphere(0.0, 8, 12).is_err());
    }
}
