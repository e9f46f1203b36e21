//! Visual effects: concrete shading programs
//!
//! Each effect owns its [`ProgramLayout`] and resolves the offsets it needs
//! from the layout's schemas once, at construction. The `uniforms` helpers
//! pack a uniform vector in the order the layout declares.

mod blend;
mod camera_textured;
mod depth_textured;
mod gradient;
mod sprite;

pub use blend::Blend;
pub use camera_textured::CameraTextured;
pub use depth_textured::DepthTextured;
pub use gradient::Gradient;
pub use sprite::Sprite;

use std::ops::Range;

use crate::rasterizer::{PositionKind, ProgramLayout, RenderError, Schema};

fn layout(
    attributes: &[(&str, usize)],
    varyings: &[(&str, usize)],
    uniforms: &[(&str, usize)],
    texture_count: usize,
    position: PositionKind,
) -> Result<ProgramLayout, RenderError> {
    Ok(ProgramLayout {
        attributes: Schema::from_fields(attributes)?,
        varyings: Schema::from_fields(varyings)?,
        uniforms: Schema::from_fields(uniforms)?,
        texture_count,
        position,
    })
}

fn rgb_at(values: &[f32], range: &Range<usize>) -> [f32; 3] {
    let s = &values[range.clone()];
    [s[0], s[1], s[2]]
}

fn modulate(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}

/// Diffuse intensity with an ambient floor, clamped to 0..1
fn shade_intensity(normal: [f32; 3], light_dir: [f32; 3], ambient: f32) -> f32 {
    let diffuse = (normal[0] * light_dir[0] + normal[1] * light_dir[1] + normal[2] * light_dir[2]).max(0.0);
    (ambient + (1.0 - ambient) * diffuse).clamp(0.0, 1.0)
}
