//! Triangle scan conversion with affine varying interpolation
//!
//! The triangle is canonicalized so its leftmost vertex `a` comes first and
//! `a, b, c` run counter-clockwise. Then `a–b` is always the lower edge, and
//! the triangle splits at the middle vertex into at most two column spans,
//! each bounded below and above by one edge line.
//!
//! Coverage rule: pixel `(i, j)` is the integer point `(i, j)`. Columns are
//! half-open `[ceil(x_left), ceil(x_right))` and rows are half-open
//! `[ceil(y_low), ceil(y_high))`. Edge lines are always evaluated from their
//! lexicographically smaller endpoint, so two triangles sharing an edge get
//! bit-identical bounds and every point on the shared edge goes to exactly
//! one of them.

use std::ops::Range;

use super::error::RenderError;
use super::math::{Mat2, Vec2};
use super::shading::{DrawCall, RenderTarget, ShadingProgram};

/// One shaded triangle corner
#[derive(Debug, Clone, Copy)]
pub struct Corner<'v> {
    pub position: Vec2,
    pub varyings: &'v [f32],
}

impl<'v> Corner<'v> {
    pub fn new(position: Vec2, varyings: &'v [f32]) -> Self {
        Self { position, varyings }
    }

    /// Screen position taken from the two leading varyings. None when there
    /// are fewer than two.
    pub fn from_varyings(varyings: &'v [f32]) -> Option<Self> {
        match varyings {
            [x, y, ..] => Some(Self {
                position: Vec2::new(*x, *y),
                varyings,
            }),
            _ => None,
        }
    }
}

/// Precomputed inverse of the edge matrix `[B-A | C-A]`.
///
/// A point `X` decomposes as `A + p(B-A) + q(C-A)`; any varying at `X` is then
/// `Va + p(Vb-Va) + q(Vc-Va)`.
#[derive(Debug, Clone, Copy)]
pub struct TriangleSetup {
    origin: Vec2,
    inverse: Mat2,
}

impl TriangleSetup {
    /// None for zero-area (or non-finite) triangles
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Option<Self> {
        let inverse = Mat2::from_columns(b - a, c - a).inverse()?;
        if inverse.m.iter().flatten().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self { origin: a, inverse })
    }

    /// `(p, q)` for the point `(x, y)`
    pub fn coords(&self, x: f32, y: f32) -> (f32, f32) {
        let pq = self.inverse.mul_vec(Vec2::new(x, y) - self.origin);
        (pq.x, pq.y)
    }

    /// Affine interpolation of the corner varyings at `(x, y)` into `out`
    pub fn interpolate(&self, x: f32, y: f32, va: &[f32], vb: &[f32], vc: &[f32], out: &mut [f32]) {
        let (p, q) = self.coords(x, y);
        for (k, o) in out.iter_mut().enumerate() {
            *o = va[k] + p * (vb[k] - va[k]) + q * (vc[k] - va[k]);
        }
    }
}

/// Lexicographic (x, then y) order on points
fn precedes(u: Vec2, v: Vec2) -> bool {
    u.x < v.x || (u.x == v.x && u.y < v.y)
}

/// y of the line through `u` and `v` at column `x`, evaluated from the
/// smaller endpoint. Never called on vertical edges: their column span is
/// empty.
fn edge_y(u: Vec2, v: Vec2, x: f32) -> f32 {
    let (p, q) = if precedes(v, u) { (v, u) } else { (u, v) };
    p.y + ((q.y - p.y) / (q.x - p.x)) * (x - p.x)
}

fn span(lo: f32, hi: f32, limit: usize) -> Range<i64> {
    let start = (lo.ceil() as i64).max(0);
    let end = (hi.ceil() as i64).min(limit as i64);
    start..end
}

/// Rasterize one triangle: interpolate varyings, run the fragment stage,
/// depth test and write. Returns the number of fragments written.
///
/// Zero-area or non-finite triangles are skipped and write nothing. The
/// corners may come in either winding.
pub fn rasterize_triangle<P: ShadingProgram + ?Sized>(
    corners: [Corner<'_>; 3],
    call: &DrawCall<'_, P>,
    target: &mut RenderTarget<'_>,
) -> Result<usize, RenderError> {
    target.validate()?;
    let varying_dim = call.layout().varying_dim();
    for corner in &corners {
        if corner.varyings.len() != varying_dim {
            return Err(RenderError::VaryingLen {
                expected: varying_dim,
                actual: corner.varyings.len(),
            });
        }
    }

    if corners.iter().any(|c| !c.position.is_finite()) {
        log::trace!("skipping triangle with non-finite corner");
        return Ok(0);
    }

    // Leftmost first, keeping the cyclic order
    let first = (0..3)
        .reduce(|best, i| if precedes(corners[i].position, corners[best].position) { i } else { best })
        .unwrap_or(0);
    let a = corners[first];
    let mut b = corners[(first + 1) % 3];
    let mut c = corners[(first + 2) % 3];
    if (b.position - a.position).perp_dot(c.position - a.position) < 0.0 {
        std::mem::swap(&mut b, &mut c);
    }

    let Some(setup) = TriangleSetup::new(a.position, b.position, c.position) else {
        log::trace!("skipping degenerate triangle");
        return Ok(0);
    };

    let mut scratch = vec![0.0; varying_dim];
    let mut written = 0;
    let (pa, pb, pc) = (a.position, b.position, c.position);
    let (width, height) = (target.framebuffer.width, target.framebuffer.height);

    let mut scan = |columns: Range<i64>, lower: (Vec2, Vec2), upper: (Vec2, Vec2)| {
        for i in columns {
            let x = i as f32;
            let rows = span(edge_y(lower.0, lower.1, x), edge_y(upper.0, upper.1, x), height);
            for j in rows {
                let y = j as f32;
                setup.interpolate(x, y, a.varyings, b.varyings, c.varyings, &mut scratch);
                let fragment = call.program.shade_fragment(call.uniforms, call.textures, &scratch);
                if target.write(i as usize, j as usize, &fragment) {
                    written += 1;
                }
            }
        }
    };

    if pc.x < pb.x {
        // c is the middle column: upper edge switches from a–c to c–b
        scan(span(pa.x, pc.x, width), (pa, pb), (pa, pc));
        scan(span(pc.x, pb.x, width), (pa, pb), (pc, pb));
    } else {
        // b is the middle column: lower edge switches from a–b to b–c
        scan(span(pa.x, pb.x, width), (pa, pb), (pa, pc));
        scan(span(pb.x, pc.x, width), (pb, pc), (pa, pc));
    }

    Ok(written)
}
