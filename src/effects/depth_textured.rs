//! Textured 3D meshes placed directly in screen space, with depth

use std::ops::Range;

use crate::rasterizer::{
    Fragment, Mat4, PositionKind, ProgramLayout, RenderError, ShadingProgram, Texture,
};

use super::{layout, modulate, rgb_at};

/// Attributes `xyz st n`; uniforms `tint modeling`; one texture.
///
/// The modeling matrix takes mesh coordinates straight to screen x, y with
/// z growing toward the viewer, so depth is `-z`.
pub struct DepthTextured {
    layout: ProgramLayout,
    attr_xyz: Range<usize>,
    attr_st: Range<usize>,
    vary_xyz: Range<usize>,
    vary_st: Range<usize>,
    unif_tint: Range<usize>,
    unif_modeling: Range<usize>,
}

impl DepthTextured {
    pub fn new() -> Result<Self, RenderError> {
        let layout = layout(
            &[("xyz", 3), ("st", 2), ("n", 3)],
            &[("xyz", 3), ("st", 2)],
            &[("tint", 3), ("modeling", 16)],
            1,
            PositionKind::Screen,
        )?;
        Ok(Self {
            attr_xyz: layout.attributes.require("xyz")?,
            attr_st: layout.attributes.require("st")?,
            vary_xyz: layout.varyings.require("xyz")?,
            vary_st: layout.varyings.require("st")?,
            unif_tint: layout.uniforms.require("tint")?,
            unif_modeling: layout.uniforms.require("modeling")?,
            layout,
        })
    }

    pub fn uniforms(&self, tint: [f32; 3], modeling: &Mat4) -> Vec<f32> {
        let mut unif = vec![0.0; self.layout.uniform_dim()];
        unif[self.unif_tint.clone()].copy_from_slice(&tint);
        unif[self.unif_modeling.clone()].copy_from_slice(&modeling.to_flat());
        unif
    }
}

impl ShadingProgram for DepthTextured {
    fn layout(&self) -> &ProgramLayout {
        &self.layout
    }

    fn shade_vertex(&self, uniforms: &[f32], attributes: &[f32], varyings: &mut [f32]) {
        let modeling = Mat4::from_slice(&uniforms[self.unif_modeling.clone()]);
        let xyz = &attributes[self.attr_xyz.clone()];
        let p = modeling.mul_vec([xyz[0], xyz[1], xyz[2], 1.0]);
        varyings[self.vary_xyz.clone()].copy_from_slice(&p[..3]);
        varyings[self.vary_st.clone()].copy_from_slice(&attributes[self.attr_st.clone()]);
    }

    fn shade_fragment(&self, uniforms: &[f32], textures: &[&Texture], varyings: &[f32]) -> Fragment {
        let st = &varyings[self.vary_st.clone()];
        let sample = textures[0].sample(st[0], st[1]);
        let rgb = modulate([sample[0], sample[1], sample[2]], rgb_at(uniforms, &self.unif_tint));
        let z = varyings[self.vary_xyz.start + 2];
        Fragment::new(rgb, -z)
    }
}
