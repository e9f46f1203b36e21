//! Meshes and the per-draw mesh renderer

use serde::{Serialize, Deserialize};

use super::error::RenderError;
use super::math::{Vec2, Vec3};
use super::shading::{DrawCall, PositionKind, RenderTarget, ShadingProgram};
use super::triangle::{rasterize_triangle, Corner};

/// Below this |w| a homogeneous vertex is treated as degenerate
const MIN_W: f32 = 1e-6;

/// Vertices (flat, `attribute_dim` floats each) plus index triangles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    attribute_dim: usize,
    vertices: Vec<f32>,
    triangles: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new(attribute_dim: usize) -> Self {
        Self {
            attribute_dim,
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(attribute_dim: usize, vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            attribute_dim,
            vertices: Vec::with_capacity(vertex_count * attribute_dim),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Build from flat vertex data, validating lengths and indices
    pub fn from_parts(
        attribute_dim: usize,
        vertices: Vec<f32>,
        triangles: Vec<[usize; 3]>,
    ) -> Result<Self, RenderError> {
        if attribute_dim == 0 || vertices.len() % attribute_dim != 0 {
            return Err(RenderError::InvalidShape(format!(
                "{} floats do not divide into vertices of {}",
                vertices.len(),
                attribute_dim
            )));
        }
        let mesh = Self {
            attribute_dim,
            vertices,
            triangles,
        };
        mesh.check_indices()?;
        Ok(mesh)
    }

    pub fn attribute_dim(&self) -> usize {
        self.attribute_dim
    }

    pub fn vertex_count(&self) -> usize {
        if self.attribute_dim == 0 {
            0
        } else {
            self.vertices.len() / self.attribute_dim
        }
    }

    pub fn vertex(&self, i: usize) -> &[f32] {
        &self.vertices[i * self.attribute_dim..(i + 1) * self.attribute_dim]
    }

    pub fn vertex_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.vertices[i * self.attribute_dim..(i + 1) * self.attribute_dim]
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Append a vertex; extra values are dropped, missing ones are zero
    pub fn push_vertex(&mut self, attributes: &[f32]) -> usize {
        let index = self.vertex_count();
        self.vertices.extend(
            attributes
                .iter()
                .copied()
                .chain(std::iter::repeat(0.0))
                .take(self.attribute_dim),
        );
        index
    }

    pub fn push_triangle(&mut self, i: usize, j: usize, k: usize) {
        self.triangles.push([i, j, k]);
    }

    fn check_indices(&self) -> Result<(), RenderError> {
        let vertex_count = self.vertex_count();
        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i >= vertex_count) {
                return Err(RenderError::TriangleIndex {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}

/// Counters from one [`render_mesh`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    /// Triangles that wrote nothing because they were degenerate
    pub skipped: usize,
    pub fragments: usize,
}

/// Divide x, y, z by w and map through the viewport. False when w is too
/// close to zero to divide by.
fn to_screen(varyings: &mut [f32], target: &RenderTarget<'_>) -> bool {
    let w = varyings[3];
    if !(w.abs() >= MIN_W) {
        return false;
    }
    let ndc = [varyings[0] / w, varyings[1] / w, varyings[2] / w, 1.0];
    let screen = target.viewport.mul_vec(ndc);
    varyings[..4].copy_from_slice(&screen);
    true
}

/// Draw every triangle of `mesh` with one program, uniform vector and
/// texture set.
///
/// The vertex stage runs once per vertex. Configuration mismatches are
/// reported before anything is drawn; degenerate triangles are skipped and
/// counted.
pub fn render_mesh<P: ShadingProgram + ?Sized>(
    mesh: &Mesh,
    call: &DrawCall<'_, P>,
    target: &mut RenderTarget<'_>,
) -> Result<RenderStats, RenderError> {
    let layout = call.layout();
    if mesh.attribute_dim() != layout.attribute_dim() {
        return Err(RenderError::AttributeDim {
            expected: layout.attribute_dim(),
            actual: mesh.attribute_dim(),
        });
    }
    mesh.check_indices()?;
    target.validate()?;

    let varying_dim = layout.varying_dim();
    let vertex_count = mesh.vertex_count();

    // Vertex stage
    let mut varyings = vec![0.0; vertex_count * varying_dim];
    let mut usable = vec![true; vertex_count];
    for (i, out) in varyings.chunks_exact_mut(varying_dim).enumerate() {
        call.program.shade_vertex(call.uniforms, mesh.vertex(i), out);
        if layout.position == PositionKind::Homogeneous {
            usable[i] = to_screen(out, target);
        }
    }

    let mut stats = RenderStats::default();
    for tri in mesh.triangles() {
        stats.triangles += 1;
        if tri.iter().any(|&i| !usable[i]) {
            stats.skipped += 1;
            continue;
        }

        let corner = |i: usize| Corner::from_varyings(&varyings[i * varying_dim..(i + 1) * varying_dim]);
        let (Some(a), Some(b), Some(c)) = (corner(tri[0]), corner(tri[1]), corner(tri[2])) else {
            stats.skipped += 1;
            continue;
        };
        let corners = [a, b, c];
        if is_degenerate(&corners) {
            stats.skipped += 1;
            continue;
        }
        stats.fragments += rasterize_triangle(corners, call, target)?;
    }

    log::trace!(
        "render_mesh: {} triangles, {} skipped, {} fragments",
        stats.triangles,
        stats.skipped,
        stats.fragments
    );
    Ok(stats)
}

fn is_degenerate(corners: &[Corner<'_>; 3]) -> bool {
    let [a, b, c] = corners.map(|corner| corner.position);
    let area = signed_area(a, b, c);
    area == 0.0 || !area.is_finite()
}

/// Flat normal of a 3D triangle, for mesh builders
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize()
}

/// Screen-space signed area (positive when counter-clockwise)
pub fn signed_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    0.5 * (b - a).perp_dot(c - a)
}
