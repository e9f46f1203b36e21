//! Textured 2D shapes moved by a homogeneous 3x3 modeling matrix

use std::ops::Range;

use crate::rasterizer::{
    Fragment, Mat3, PositionKind, ProgramLayout, RenderError, ShadingProgram, Texture, Vec3,
};

use super::{layout, modulate, rgb_at};

/// Attributes `xy st`; uniforms `tint modeling`; one texture
pub struct Sprite {
    layout: ProgramLayout,
    attr_xy: Range<usize>,
    attr_st: Range<usize>,
    vary_xy: Range<usize>,
    vary_st: Range<usize>,
    unif_tint: Range<usize>,
    unif_modeling: Range<usize>,
}

impl Sprite {
    pub fn new() -> Result<Self, RenderError> {
        let layout = layout(
            &[("xy", 2), ("st", 2)],
            &[("xy", 2), ("st", 2)],
            &[("tint", 3), ("modeling", 9)],
            1,
            PositionKind::Screen,
        )?;
        Ok(Self {
            attr_xy: layout.attributes.require("xy")?,
            attr_st: layout.attributes.require("st")?,
            vary_xy: layout.varyings.require("xy")?,
            vary_st: layout.varyings.require("st")?,
            unif_tint: layout.uniforms.require("tint")?,
            unif_modeling: layout.uniforms.require("modeling")?,
            layout,
        })
    }

    pub fn uniforms(&self, tint: [f32; 3], modeling: &Mat3) -> Vec<f32> {
        let mut unif = vec![0.0; self.layout.uniform_dim()];
        unif[self.unif_tint.clone()].copy_from_slice(&tint);
        unif[self.unif_modeling.clone()].copy_from_slice(&modeling.to_flat());
        unif
    }
}

impl ShadingProgram for Sprite {
    fn layout(&self) -> &ProgramLayout {
        &self.layout
    }

    fn shade_vertex(&self, uniforms: &[f32], attributes: &[f32], varyings: &mut [f32]) {
        let modeling = Mat3::from_slice(&uniforms[self.unif_modeling.clone()]);
        let xy = &attributes[self.attr_xy.clone()];
        let p = modeling.mul_vec(Vec3::new(xy[0], xy[1], 1.0));
        varyings[self.vary_xy.clone()].copy_from_slice(&[p.x, p.y]);
        varyings[self.vary_st.clone()].copy_from_slice(&attributes[self.attr_st.clone()]);
    }

    fn shade_fragment(&self, uniforms: &[f32], textures: &[&Texture], varyings: &[f32]) -> Fragment {
        let st = &varyings[self.vary_st.clone()];
        let sample = textures[0].sample(st[0], st[1]);
        let texel = [sample[0], sample[1], sample[2]];
        Fragment::flat(modulate(texel, rgb_at(uniforms, &self.unif_tint)))
    }
}
