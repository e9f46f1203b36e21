//! Shading program contract
//!
//! A program declares the layout of its attribute, varying and uniform
//! vectors once, through [`Schema`]s, and provides the two programmable
//! stages. The fixed pipeline ([`super::render_mesh`],
//! [`super::rasterize_triangle`]) validates every draw against that layout
//! before touching a pixel and is generic over the program type, so dispatch
//! is static per draw call.

use super::depth::DepthBuffer;
use super::error::{RenderError, SchemaError};
use super::framebuffer::Framebuffer;
use super::math::Mat4;
use super::texture::Texture;

/// One named slice of a flat float vector
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub offset: usize,
    pub width: usize,
}

/// Ordered list of named fields with precomputed offsets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
    dim: usize,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field of `width` floats
    pub fn with(mut self, name: &str, width: usize) -> Result<Self, SchemaError> {
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if width == 0 {
            return Err(SchemaError::ZeroWidth(name.to_string()));
        }
        if self.fields.iter().any(|f| f.name == name) {
            return Err(SchemaError::Duplicate(name.to_string()));
        }
        self.fields.push(Field {
            name: name.to_string(),
            offset: self.dim,
            width,
        });
        self.dim += width;
        Ok(self)
    }

    /// Build from `(name, width)` pairs in order
    pub fn from_fields(fields: &[(&str, usize)]) -> Result<Self, SchemaError> {
        fields
            .iter()
            .try_fold(Schema::new(), |schema, &(name, width)| schema.with(name, width))
    }

    /// Total number of floats
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn offset(&self, name: &str) -> Option<usize> {
        self.field(name).map(|f| f.offset)
    }

    pub fn range(&self, name: &str) -> Option<std::ops::Range<usize>> {
        self.field(name).map(|f| f.offset..f.offset + f.width)
    }

    /// Like [`Schema::range`], for fields a program cannot work without
    pub fn require(&self, name: &str) -> Result<std::ops::Range<usize>, SchemaError> {
        self.range(name).ok_or_else(|| SchemaError::Missing(name.to_string()))
    }
}

/// How the leading varyings encode position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
    /// Varyings 0 and 1 are screen x and y
    Screen,
    /// Varyings 0..4 are clip-space x, y, z, w. The mesh renderer divides by
    /// w and applies the target's viewport before rasterizing.
    Homogeneous,
}

impl PositionKind {
    pub fn components(self) -> usize {
        match self {
            PositionKind::Screen => 2,
            PositionKind::Homogeneous => 4,
        }
    }
}

/// Declared dimensionality of a shading program
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLayout {
    pub attributes: Schema,
    pub varyings: Schema,
    pub uniforms: Schema,
    pub texture_count: usize,
    pub position: PositionKind,
}

impl ProgramLayout {
    pub fn attribute_dim(&self) -> usize {
        self.attributes.dim()
    }

    pub fn varying_dim(&self) -> usize {
        self.varyings.dim()
    }

    pub fn uniform_dim(&self) -> usize {
        self.uniforms.dim()
    }
}

/// Output of the fragment stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub rgb: [f32; 3],
    /// Smaller is closer
    pub depth: f32,
}

impl Fragment {
    pub fn new(rgb: [f32; 3], depth: f32) -> Self {
        Self { rgb, depth }
    }

    /// Fragment for programs without meaningful depth
    pub fn flat(rgb: [f32; 3]) -> Self {
        Self { rgb, depth: 0.0 }
    }
}

/// The two programmable stages. Both must be pure: identical inputs give
/// identical outputs.
pub trait ShadingProgram {
    fn layout(&self) -> &ProgramLayout;

    /// Fill `varyings` (exactly `varying_dim` long) from one vertex
    fn shade_vertex(&self, uniforms: &[f32], attributes: &[f32], varyings: &mut [f32]);

    /// Color and depth for one interpolated varying vector
    fn shade_fragment(&self, uniforms: &[f32], textures: &[&Texture], varyings: &[f32]) -> Fragment;
}

/// Everything constant for one draw: program, uniforms, textures.
/// Construction validates the bundle against the program layout.
pub struct DrawCall<'a, P: ShadingProgram + ?Sized> {
    pub(crate) program: &'a P,
    pub(crate) uniforms: &'a [f32],
    pub(crate) textures: &'a [&'a Texture],
}

impl<P: ShadingProgram + ?Sized> Clone for DrawCall<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: ShadingProgram + ?Sized> Copy for DrawCall<'_, P> {}

impl<'a, P: ShadingProgram + ?Sized> DrawCall<'a, P> {
    pub fn new(
        program: &'a P,
        uniforms: &'a [f32],
        textures: &'a [&'a Texture],
    ) -> Result<Self, RenderError> {
        let layout = program.layout();
        if uniforms.len() != layout.uniform_dim() {
            return Err(RenderError::UniformDim {
                expected: layout.uniform_dim(),
                actual: uniforms.len(),
            });
        }
        if textures.len() != layout.texture_count {
            return Err(RenderError::TextureCount {
                expected: layout.texture_count,
                actual: textures.len(),
            });
        }
        let needed = layout.position.components();
        if layout.varying_dim() < needed {
            return Err(RenderError::VaryingDim {
                varyings: layout.varying_dim(),
                needed,
            });
        }
        Ok(Self {
            program,
            uniforms,
            textures,
        })
    }

    pub fn layout(&self) -> &'a ProgramLayout {
        self.program.layout()
    }

    pub fn uniforms(&self) -> &'a [f32] {
        self.uniforms
    }
}

/// Where fragments land. The depth buffer is optional: 2D effects draw
/// without one.
pub struct RenderTarget<'a> {
    pub framebuffer: &'a mut Framebuffer,
    pub depth: Option<&'a mut DepthBuffer>,
    /// Applied after the homogeneous divide
    pub viewport: Mat4,
}

impl<'a> RenderTarget<'a> {
    pub fn new(framebuffer: &'a mut Framebuffer) -> Self {
        let viewport = Mat4::viewport(framebuffer.width, framebuffer.height);
        Self {
            framebuffer,
            depth: None,
            viewport,
        }
    }

    pub fn with_depth(mut self, depth: &'a mut DepthBuffer) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_viewport(mut self, viewport: Mat4) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if let Some(depth) = &self.depth {
            let (w, h) = (self.framebuffer.width, self.framebuffer.height);
            if depth.width() != w || depth.height() != h {
                return Err(RenderError::DepthSize {
                    width: w,
                    height: h,
                    depth_width: depth.width(),
                    depth_height: depth.height(),
                });
            }
        }
        Ok(())
    }

    /// Depth test (when a depth buffer is bound) followed by the color write
    pub fn write(&mut self, x: usize, y: usize, fragment: &Fragment) -> bool {
        if let Some(depth) = self.depth.as_deref_mut() {
            if !depth.test_and_set(x, y, fragment.depth) {
                return false;
            }
        }
        self.framebuffer.set_pixel_rgb(x, y, fragment.rgb);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passthrough {
        layout: ProgramLayout,
    }

    impl Passthrough {
        fn new(textures: usize) -> Self {
            Self {
                layout: ProgramLayout {
                    attributes: Schema::from_fields(&[("xy", 2)]).unwrap(),
                    varyings: Schema::from_fields(&[("xy", 2)]).unwrap(),
                    uniforms: Schema::from_fields(&[("tint", 3)]).unwrap(),
                    texture_count: textures,
                    position: PositionKind::Screen,
                },
            }
        }
    }

    impl ShadingProgram for Passthrough {
        fn layout(&self) -> &ProgramLayout {
            &self.layout
        }

        fn shade_vertex(&self, _uniforms: &[f32], attributes: &[f32], varyings: &mut [f32]) {
            varyings.copy_from_slice(attributes);
        }

        fn shade_fragment(&self, uniforms: &[f32], _textures: &[&Texture], _varyings: &[f32]) -> Fragment {
            Fragment::flat([uniforms[0], uniforms[1], uniforms[2]])
        }
    }

    #[test]
    fn test_schema_offsets() {
        let schema = Schema::from_fields(&[("xyz", 3), ("st", 2), ("n", 3)]).unwrap();
        assert_eq!(schema.dim(), 8);
        assert_eq!(schema.offset("st"), Some(3));
        assert_eq!(schema.range("n"), Some(5..8));
        assert_eq!(schema.offset("missing"), None);
        assert_eq!(schema.require("missing"), Err(SchemaError::Missing("missing".to_string())));
    }

    #[test]
    fn test_schema_rejects_misconfiguration() {
        assert_eq!(
            Schema::from_fields(&[("st", 2), ("st", 2)]),
            Err(SchemaError::Duplicate("st".to_string()))
        );
        assert_eq!(Schema::from_fields(&[("", 1)]), Err(SchemaError::EmptyName));
        assert_eq!(
            Schema::from_fields(&[("n", 0)]),
            Err(SchemaError::ZeroWidth("n".to_string()))
        );
    }

    #[test]
    fn test_draw_call_checks_uniforms_and_textures() {
        let program = Passthrough::new(1);
        let tex = Texture::solid([1.0, 1.0, 1.0]);
        assert_eq!(
            DrawCall::new(&program, &[1.0, 1.0], &[&tex]).err(),
            Some(RenderError::UniformDim { expected: 3, actual: 2 })
        );
        assert_eq!(
            DrawCall::new(&program, &[1.0, 1.0, 1.0], &[]).err(),
            Some(RenderError::TextureCount { expected: 1, actual: 0 })
        );
        assert!(DrawCall::new(&program, &[1.0, 1.0, 1.0], &[&tex]).is_ok());
    }

    #[test]
    fn test_target_rejects_mismatched_depth() {
        let mut fb = Framebuffer::new(4, 4);
        let mut depth = DepthBuffer::new(4, 3);
        let target = RenderTarget::new(&mut fb).with_depth(&mut depth);
        assert!(matches!(target.validate(), Err(RenderError::DepthSize { .. })));
    }

    #[test]
    fn test_target_write_respects_depth() {
        let mut fb = Framebuffer::new(2, 2);
        let mut depth = DepthBuffer::new(2, 2);
        let mut target = RenderTarget::new(&mut fb).with_depth(&mut depth);
        assert!(target.write(0, 0, &Fragment::new([1.0, 0.0, 0.0], 2.0)));
        assert!(!target.write(0, 0, &Fragment::new([0.0, 1.0, 0.0], 3.0)));
        assert!(target.write(0, 0, &Fragment::new([0.0, 0.0, 1.0], 1.0)));
        assert_eq!(fb.get_pixel(0, 0).to_bytes(), [0, 0, 255, 255]);
    }
}
