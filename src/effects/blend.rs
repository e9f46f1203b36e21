//! Three-texture composite: two modulated textures plus an additive one

use std::ops::Range;

use crate::rasterizer::{Fragment, PositionKind, ProgramLayout, RenderError, ShadingProgram, Texture};

use super::{layout, modulate, rgb_at};

/// Attributes `xy st rgb`; uniforms `tint`; three textures.
///
/// Color is `tex0 * tex1 * rgb * tint + tex2`, with every channel saturated
/// to 1.
pub struct Blend {
    layout: ProgramLayout,
    vary_st: Range<usize>,
    vary_rgb: Range<usize>,
    unif_tint: Range<usize>,
}

impl Blend {
    pub fn new() -> Result<Self, RenderError> {
        let layout = layout(
            &[("xy", 2), ("st", 2), ("rgb", 3)],
            &[("xy", 2), ("st", 2), ("rgb", 3)],
            &[("tint", 3)],
            3,
            PositionKind::Screen,
        )?;
        Ok(Self {
            vary_st: layout.varyings.require("st")?,
            vary_rgb: layout.varyings.require("rgb")?,
            unif_tint: layout.uniforms.require("tint")?,
            layout,
        })
    }

    pub fn uniforms(&self, tint: [f32; 3]) -> Vec<f32> {
        tint.to_vec()
    }
}

impl ShadingProgram for Blend {
    fn layout(&self) -> &ProgramLayout {
        &self.layout
    }

    fn shade_vertex(&self, _uniforms: &[f32], attributes: &[f32], varyings: &mut [f32]) {
        varyings.copy_from_slice(attributes);
    }

    fn shade_fragment(&self, uniforms: &[f32], textures: &[&Texture], varyings: &[f32]) -> Fragment {
        let st = &varyings[self.vary_st.clone()];
        let sample = |i: usize| {
            let c = textures[i].sample(st[0], st[1]);
            [c[0], c[1], c[2]]
        };
        let base = modulate(sample(0), rgb_at(varyings, &self.vary_rgb));
        let base = modulate(modulate(base, sample(1)), rgb_at(uniforms, &self.unif_tint));
        let add = sample(2);
        Fragment::flat([
            (base[0] + add[0]).min(1.0),
            (base[1] + add[1]).min(1.0),
            (base[2] + add[2]).min(1.0),
        ])
    }
}
