//! Per-vertex colors blended across the triangle

use std::ops::Range;

use crate::rasterizer::{Fragment, PositionKind, ProgramLayout, RenderError, ShadingProgram, Texture};

use super::{layout, modulate, rgb_at};

/// Attributes `xy rgb`; uniforms `tint`
pub struct Gradient {
    layout: ProgramLayout,
    vary_rgb: Range<usize>,
    unif_tint: Range<usize>,
}

impl Gradient {
    pub fn new() -> Result<Self, RenderError> {
        let layout = layout(
            &[("xy", 2), ("rgb", 3)],
            &[("xy", 2), ("rgb", 3)],
            &[("tint", 3)],
            0,
            PositionKind::Screen,
        )?;
        Ok(Self {
            vary_rgb: layout.varyings.require("rgb")?,
            unif_tint: layout.uniforms.require("tint")?,
            layout,
        })
    }

    pub fn uniforms(&self, tint: [f32; 3]) -> Vec<f32> {
        tint.to_vec()
    }
}

impl ShadingProgram for Gradient {
    fn layout(&self) -> &ProgramLayout {
        &self.layout
    }

    fn shade_vertex(&self, _uniforms: &[f32], attributes: &[f32], varyings: &mut [f32]) {
        varyings.copy_from_slice(attributes);
    }

    fn shade_fragment(&self, uniforms: &[f32], _textures: &[&Texture], varyings: &[f32]) -> Fragment {
        Fragment::flat(modulate(rgb_at(varyings, &self.vary_rgb), rgb_at(uniforms, &self.unif_tint)))
    }
}
