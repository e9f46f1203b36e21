//! Textured, diffusely lit 3D meshes seen through a camera

use std::ops::Range;

use crate::rasterizer::{
    Fragment, Mat4, PositionKind, ProgramLayout, RenderError, ShadingProgram, Texture, Vec3,
};

use super::{layout, modulate, rgb_at, shade_intensity};

/// Attributes `xyz st n`; uniforms `tint modeling camera light ambient`;
/// one texture.
///
/// `camera` is projection times inverse camera pose. Positions leave the
/// vertex stage in clip space; after the divide and viewport, varying z is
/// the normalized device depth, which the fragment stage reports as depth.
/// `light` is a world-space direction toward the light.
pub struct CameraTextured {
    layout: ProgramLayout,
    attr_xyz: Range<usize>,
    attr_st: Range<usize>,
    attr_n: Range<usize>,
    vary_xyzw: Range<usize>,
    vary_st: Range<usize>,
    vary_n: Range<usize>,
    unif_tint: Range<usize>,
    unif_modeling: Range<usize>,
    unif_camera: Range<usize>,
    unif_light: Range<usize>,
    unif_ambient: usize,
}

impl CameraTextured {
    pub fn new() -> Result<Self, RenderError> {
        let layout = layout(
            &[("xyz", 3), ("st", 2), ("n", 3)],
            &[("xyzw", 4), ("st", 2), ("n", 3)],
            &[("tint", 3), ("modeling", 16), ("camera", 16), ("light", 3), ("ambient", 1)],
            1,
            PositionKind::Homogeneous,
        )?;
        Ok(Self {
            attr_xyz: layout.attributes.require("xyz")?,
            attr_st: layout.attributes.require("st")?,
            attr_n: layout.attributes.require("n")?,
            vary_xyzw: layout.varyings.require("xyzw")?,
            vary_st: layout.varyings.require("st")?,
            vary_n: layout.varyings.require("n")?,
            unif_tint: layout.uniforms.require("tint")?,
            unif_modeling: layout.uniforms.require("modeling")?,
            unif_camera: layout.uniforms.require("camera")?,
            unif_light: layout.uniforms.require("light")?,
            unif_ambient: layout.uniforms.require("ambient")?.start,
            layout,
        })
    }

    pub fn uniforms(&self, tint: [f32; 3], modeling: &Mat4, camera: &Mat4, light: Vec3, ambient: f32) -> Vec<f32> {
        let mut unif = vec![0.0; self.layout.uniform_dim()];
        unif[self.unif_tint.clone()].copy_from_slice(&tint);
        unif[self.unif_modeling.clone()].copy_from_slice(&modeling.to_flat());
        unif[self.unif_camera.clone()].copy_from_slice(&camera.to_flat());
        unif[self.unif_light.clone()].copy_from_slice(&light.normalize().to_array());
        unif[self.unif_ambient] = ambient;
        unif
    }

    /// Replace only the modeling matrix, for per-frame animation
    pub fn set_modeling(&self, uniforms: &mut [f32], modeling: &Mat4) {
        uniforms[self.unif_modeling.clone()].copy_from_slice(&modeling.to_flat());
    }

    pub fn set_camera(&self, uniforms: &mut [f32], camera: &Mat4) {
        uniforms[self.unif_camera.clone()].copy_from_slice(&camera.to_flat());
    }
}

impl ShadingProgram for CameraTextured {
    fn layout(&self) -> &ProgramLayout {
        &self.layout
    }

    fn shade_vertex(&self, uniforms: &[f32], attributes: &[f32], varyings: &mut [f32]) {
        let modeling = Mat4::from_slice(&uniforms[self.unif_modeling.clone()]);
        let camera = Mat4::from_slice(&uniforms[self.unif_camera.clone()]);
        let xyz = &attributes[self.attr_xyz.clone()];
        let world = modeling.mul_vec([xyz[0], xyz[1], xyz[2], 1.0]);
        varyings[self.vary_xyzw.clone()].copy_from_slice(&camera.mul_vec(world));
        varyings[self.vary_st.clone()].copy_from_slice(&attributes[self.attr_st.clone()]);

        // Normals rotate with the model but ignore its translation
        let n = &attributes[self.attr_n.clone()];
        let normal = modeling.mul_vec([n[0], n[1], n[2], 0.0]);
        varyings[self.vary_n.clone()].copy_from_slice(&normal[..3]);
    }

    fn shade_fragment(&self, uniforms: &[f32], textures: &[&Texture], varyings: &[f32]) -> Fragment {
        let st = &varyings[self.vary_st.clone()];
        let sample = textures[0].sample(st[0], st[1]);
        let rgb = modulate([sample[0], sample[1], sample[2]], rgb_at(uniforms, &self.unif_tint));

        let normal = Vec3::from_slice(&varyings[self.vary_n.clone()]).normalize();
        let intensity = shade_intensity(
            normal.to_array(),
            rgb_at(uniforms, &self.unif_light),
            uniforms[self.unif_ambient],
        );
        let z = varyings[self.vary_xyzw.start + 2];
        Fragment::new(rgb.map(|c| c * intensity), z)
    }
}
