//! Demo scenes: one effect, its meshes, textures and animated uniforms

use std::f32::consts::{FRAC_PI_6, TAU};

use crate::config::{DemoConfig, SceneKind, TextureConfig};
use crate::effects::{Blend, CameraTextured, DepthTextured, Gradient, Sprite};
use crate::rasterizer::{
    render_mesh, shapes, Camera, DepthBuffer, DrawCall, Framebuffer, Mat3, Mat4, Mesh,
    ProjectionKind, RenderError, RenderStats, RenderTarget, ShadingProgram, Texture, Vec2, Vec3,
};

/// Radians per second
const SPIN_SPEED: f32 = 0.6;

/// Checkerboard colors per texture slot, used when no image is available
const FALLBACK_PALETTES: [([f32; 3], [f32; 3]); 3] = [
    ([0.9, 0.9, 0.9], [0.2, 0.3, 0.6]),
    ([1.0, 1.0, 1.0], [0.6, 0.6, 0.6]),
    ([0.3, 0.1, 0.0], [0.0, 0.0, 0.0]),
];

/// A mesh together with its own uniform vector
struct Model {
    mesh: Mesh,
    uniforms: Vec<f32>,
}

enum Content {
    Gradient(Gradient, Model),
    Sprite(Sprite, Model),
    Blend(Blend, Model),
    DepthTextured(DepthTextured, Vec<Model>),
    CameraTextured(CameraTextured, Vec<Model>, Camera),
}

pub struct Scene {
    kind: SceneKind,
    width: usize,
    height: usize,
    clear_color: [f32; 3],
    textures: Vec<Texture>,
    content: Content,
    time: f32,
}

impl Scene {
    /// Build the scene the config asks for, loading its textures from disk
    pub fn from_config(config: &DemoConfig) -> Result<Self, RenderError> {
        let textures = load_textures(config.scene, &config.textures);
        Self::new(config.scene, config.width, config.height, config.clear_color, textures)
    }

    /// Build a scene around already loaded textures. Missing texture slots
    /// are filled with checkerboards, extra ones are dropped.
    pub fn new(
        kind: SceneKind,
        width: usize,
        height: usize,
        clear_color: [f32; 3],
        mut textures: Vec<Texture>,
    ) -> Result<Self, RenderError> {
        let count = kind.texture_count();
        textures.truncate(count);
        while textures.len() < count {
            textures.push(fallback_texture(textures.len()));
        }

        let content = build_content(kind, width as f32, height as f32)?;
        log::info!("scene {:?} ready at {}x{}", kind, width, height);

        let mut scene = Self {
            kind,
            width,
            height,
            clear_color,
            textures,
            content,
            time: 0.0,
        };
        scene.animate();
        Ok(scene)
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    /// Advance the animation from `old_time` to `new_time` (seconds)
    pub fn update(&mut self, old_time: f64, new_time: f64) {
        self.time += (new_time - old_time) as f32;
        self.animate();
    }

    /// Switch every texture between nearest and linear filtering
    pub fn toggle_filter(&mut self) {
        for tex in &mut self.textures {
            tex.set_filter(tex.filter().toggled());
        }
        if let Some(tex) = self.textures.first() {
            log::info!("texture filtering: {:?}", tex.filter());
        }
    }

    /// Clear both buffers and draw every model
    pub fn render(&self, framebuffer: &mut Framebuffer, depth: &mut DepthBuffer) -> Result<RenderStats, RenderError> {
        framebuffer.clear_rgb(self.clear_color);
        depth.clear_far();

        let textures: Vec<&Texture> = self.textures.iter().collect();
        let mut stats = RenderStats::default();
        match &self.content {
            Content::Gradient(program, model) => {
                let mut target = RenderTarget::new(framebuffer);
                add(&mut stats, draw(program, model, &textures, &mut target)?);
            }
            Content::Sprite(program, model) => {
                let mut target = RenderTarget::new(framebuffer);
                add(&mut stats, draw(program, model, &textures, &mut target)?);
            }
            Content::Blend(program, model) => {
                let mut target = RenderTarget::new(framebuffer);
                add(&mut stats, draw(program, model, &textures, &mut target)?);
            }
            Content::DepthTextured(program, models) => {
                let mut target = RenderTarget::new(framebuffer).with_depth(depth);
                for model in models {
                    add(&mut stats, draw(program, model, &textures, &mut target)?);
                }
            }
            Content::CameraTextured(program, models, _) => {
                let mut target = RenderTarget::new(framebuffer).with_depth(depth);
                for model in models {
                    add(&mut stats, draw(program, model, &textures, &mut target)?);
                }
            }
        }
        Ok(stats)
    }

    /// Recompute the time-dependent uniforms
    fn animate(&mut self) {
        let angle = (self.time * SPIN_SPEED) % TAU;
        let (w, h) = (self.width as f32, self.height as f32);
        let pulse = 0.75 + 0.25 * (self.time * 2.0).sin();

        match &mut self.content {
            Content::Gradient(program, model) => {
                model.uniforms = program.uniforms([1.0, pulse, 1.0]);
            }
            Content::Sprite(program, model) => {
                let modeling = Mat3::isometry_2d(angle, Vec2::new(w * 0.5, h * 0.5));
                model.uniforms = program.uniforms([1.0, 1.0, 1.0], &modeling);
            }
            Content::Blend(program, model) => {
                model.uniforms = program.uniforms([pulse, 1.0, 1.0]);
            }
            Content::DepthTextured(program, models) => {
                let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
                let placements = [(0.4, -0.05), (0.6, 0.05)];
                for (model, (fx, z)) in models.iter_mut().zip(placements) {
                    let rotation = Mat3::angle_axis(angle, axis);
                    let modeling = Mat4::isometry(&rotation, Vec3::new(w * fx, h * 0.5, z * w));
                    model.uniforms = program.uniforms([1.0, 1.0, 1.0], &modeling);
                }
            }
            Content::CameraTextured(program, models, camera) => {
                let camera_matrix = camera.projection_inverse_isometry();
                let light = Vec3::new(1.0, 1.0, 1.0);
                let offsets = [-0.8, 0.8];
                for (model, dx) in models.iter_mut().zip(offsets) {
                    let rotation = Mat3::angle_axis(angle, Vec3::Y);
                    let modeling = Mat4::isometry(&rotation, Vec3::new(dx, 0.0, 0.0));
                    model.uniforms = program.uniforms([1.0, 1.0, 1.0], &modeling, &camera_matrix, light, 0.2);
                }
            }
        }
    }
}

fn build_content(kind: SceneKind, w: f32, h: f32) -> Result<Content, RenderError> {
    let side = w.min(h);
    let content = match kind {
        SceneKind::Gradient => {
            let mesh = st_to_colors(&shapes::rectangle(w * 0.15, w * 0.85, h * 0.15, h * 0.85));
            Content::Gradient(Gradient::new()?, Model::new(mesh))
        }
        SceneKind::Sprite => {
            let mesh = shapes::ellipse(0.0, 0.0, side * 0.35, side * 0.2, 24)?;
            Content::Sprite(Sprite::new()?, Model::new(mesh))
        }
        SceneKind::Blend => {
            let mesh = append_st_colors(&shapes::rectangle(w * 0.1, w * 0.9, h * 0.1, h * 0.9));
            Content::Blend(Blend::new()?, Model::new(mesh))
        }
        SceneKind::DepthTextured => {
            let r = side * 0.2;
            let models = vec![
                Model::new(shapes::sphere(r, 12, 24)?),
                Model::new(shapes::cuboid(-r, r, -r, r, -r, r)?),
            ];
            Content::DepthTextured(DepthTextured::new()?, models)
        }
        SceneKind::CameraTextured => {
            let mut camera = Camera::new(ProjectionKind::Perspective);
            camera.set_frustum(FRAC_PI_6, 10.0, 10.0, w, h);
            camera.look_at(Vec3::ZERO, 10.0, 1.2, 0.3);
            let models = vec![
                Model::new(shapes::sphere(0.7, 16, 32)?),
                Model::new(shapes::cuboid(-0.5, 0.5, -0.5, 0.5, -0.5, 0.5)?),
            ];
            Content::CameraTextured(CameraTextured::new()?, models, camera)
        }
    };
    Ok(content)
}

impl Model {
    fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            uniforms: Vec::new(),
        }
    }
}

fn draw<P: ShadingProgram>(
    program: &P,
    model: &Model,
    textures: &[&Texture],
    target: &mut RenderTarget<'_>,
) -> Result<RenderStats, RenderError> {
    let call = DrawCall::new(program, &model.uniforms, textures)?;
    render_mesh(&model.mesh, &call, target)
}

fn add(total: &mut RenderStats, stats: RenderStats) {
    total.triangles += stats.triangles;
    total.skipped += stats.skipped;
    total.fragments += stats.fragments;
}

/// Color derived from texture coordinates, shared by the 2D color meshes
fn st_color(s: f32, t: f32) -> [f32; 3] {
    [s, t, 1.0 - s]
}

/// Replace the st of `x y s t` vertices with an rgb color: `x y r g b`
fn st_to_colors(mesh: &Mesh) -> Mesh {
    let mut out = Mesh::with_capacity(mesh.attribute_dim() + 1, mesh.vertex_count(), mesh.triangles().len());
    for i in 0..mesh.vertex_count() {
        let v = mesh.vertex(i);
        let [r, g, b] = st_color(v[2], v[3]);
        out.push_vertex(&[v[0], v[1], r, g, b]);
    }
    for tri in mesh.triangles() {
        out.push_triangle(tri[0], tri[1], tri[2]);
    }
    out
}

/// Extend `x y s t` vertices with an rgb color derived from st: `x y s t r g b`
fn append_st_colors(mesh: &Mesh) -> Mesh {
    let mut out = Mesh::with_capacity(mesh.attribute_dim() + 3, mesh.vertex_count(), mesh.triangles().len());
    for i in 0..mesh.vertex_count() {
        let v = mesh.vertex(i);
        let [r, g, b] = st_color(v[2], v[3]);
        out.push_vertex(&[v[0], v[1], v[2], v[3], r, g, b]);
    }
    for tri in mesh.triangles() {
        out.push_triangle(tri[0], tri[1], tri[2]);
    }
    out
}

fn fallback_texture(slot: usize) -> Texture {
    let (c1, c2) = FALLBACK_PALETTES[slot % FALLBACK_PALETTES.len()];
    Texture::checkerboard(64, 8, c1, c2)
}

/// Load one texture per slot the scene binds, substituting a checkerboard
/// for slots without a path or whose image fails to load
pub fn load_textures(kind: SceneKind, configs: &[TextureConfig]) -> Vec<Texture> {
    (0..kind.texture_count())
        .map(|slot| {
            let config = configs.get(slot).cloned().unwrap_or_default();
            let mut tex = match &config.path {
                Some(path) => Texture::from_file(path).unwrap_or_else(|e| {
                    log::warn!("texture slot {}: {}, using a checkerboard", slot, e);
                    fallback_texture(slot)
                }),
                None => fallback_texture(slot),
            };
            tex.set_filter(config.filter);
            tex.set_wrap(config.wrap_s, config.wrap_t);
            tex
        })
        .collect()
}
