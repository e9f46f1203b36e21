//! Textures and sampling
//!
//! Texel data is stored as floats in 0..1 with 3 (RGB) or 4 (RGBA) channels.
//! Texel row 0 is `t = 0`; images are flipped on load so `t = 0` is the
//! bottom of the picture.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use serde::{Serialize, Deserialize};

use super::error::TextureError;

/// Sub-texel filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    Nearest,
    Linear,
}

impl Filter {
    pub fn toggled(self) -> Self {
        match self {
            Filter::Nearest => Filter::Linear,
            Filter::Linear => Filter::Nearest,
        }
    }
}

/// Policy for coordinates outside 0..1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Wrap {
    #[default]
    Clamp,
    Repeat,
}

impl Wrap {
    fn apply(self, c: f32) -> f32 {
        match self {
            Wrap::Clamp => c.clamp(0.0, 1.0),
            Wrap::Repeat => c - c.floor(),
        }
    }

    /// Texel index closest to `c` along an axis of `size` texels
    fn nearest(self, c: f32, size: usize) -> usize {
        let c = self.apply(c);
        match self {
            Wrap::Clamp => (c * (size - 1) as f32).round() as usize,
            Wrap::Repeat => ((c * size as f32) as usize).min(size - 1),
        }
    }

    /// The two texels a linear filter blends along one axis, and the weight
    /// of the second
    fn footprint(self, c: f32, size: usize) -> (usize, usize, f32) {
        let c = self.apply(c);
        match self {
            // Texel centers span the closed range 0..=1
            Wrap::Clamp => {
                let u = c * (size - 1) as f32;
                let u0 = u.floor();
                let i = u0 as usize;
                (i, (i + 1).min(size - 1), u - u0)
            }
            // Texel i is centered on (i + 0.5) / size; neighbours wrap
            Wrap::Repeat => {
                let u = c * size as f32 - 0.5;
                let u0 = u.floor();
                let i = (u0 as i64).rem_euclid(size as i64) as usize;
                (i, (i + 1) % size, u - u0)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Texture {
    pub name: String,
    width: usize,
    height: usize,
    texel_dim: usize,
    texels: Vec<f32>,
    filter: Filter,
    wrap_s: Wrap,
    wrap_t: Wrap,
}

impl Texture {
    /// Build from raw texels, row-major starting at `t = 0`
    pub fn from_texels(
        width: usize,
        height: usize,
        texel_dim: usize,
        texels: Vec<f32>,
    ) -> Result<Self, TextureError> {
        if texel_dim != 3 && texel_dim != 4 {
            return Err(TextureError::TexelDim(texel_dim));
        }
        if width == 0 || height == 0 || texels.len() != width * height * texel_dim {
            return Err(TextureError::Size {
                width,
                height,
                texel_dim,
                len: texels.len(),
            });
        }
        Ok(Self {
            name: String::new(),
            width,
            height,
            texel_dim,
            texels,
            filter: Filter::default(),
            wrap_s: Wrap::default(),
            wrap_t: Wrap::default(),
        })
    }

    /// Load texture from an image file (PNG, JPEG, BMP)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_image(img, name)?;
        log::info!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
        Ok(tex)
    }

    /// Load texture from encoded image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(img, name)
    }

    fn from_image(img: DynamicImage, name: String) -> Result<Self, TextureError> {
        let (width, height) = img.dimensions();
        let (width, height) = (width as usize, height as usize);
        let texel_dim = if img.color().has_alpha() { 4 } else { 3 };
        let rgba = img.to_rgba8();

        let mut texels = Vec::with_capacity(width * height * texel_dim);
        // Bottom image row first
        for y in (0..height).rev() {
            for x in 0..width {
                let p = rgba.get_pixel(x as u32, y as u32);
                texels.extend(p.0[..texel_dim].iter().map(|&c| c as f32 / 255.0));
            }
        }

        let mut tex = Self::from_texels(width, height, texel_dim, texels)?;
        tex.name = name;
        Ok(tex)
    }

    /// One-texel texture
    pub fn solid(rgb: [f32; 3]) -> Self {
        Self {
            name: "solid".to_string(),
            width: 1,
            height: 1,
            texel_dim: 3,
            texels: rgb.to_vec(),
            filter: Filter::default(),
            wrap_s: Wrap::default(),
            wrap_t: Wrap::default(),
        }
    }

    /// Create a checkerboard test texture with `cell`-sized squares
    pub fn checkerboard(size: usize, cell: usize, color1: [f32; 3], color2: [f32; 3]) -> Self {
        let size = size.max(1);
        let cell = cell.max(1);
        let mut texels = Vec::with_capacity(size * size * 3);
        for y in 0..size {
            for x in 0..size {
                let checker = ((x / cell) + (y / cell)) % 2 == 0;
                texels.extend_from_slice(if checker { &color1 } else { &color2 });
            }
        }
        Self {
            name: "checkerboard".to_string(),
            width: size,
            height: size,
            texel_dim: 3,
            texels,
            filter: Filter::default(),
            wrap_s: Wrap::default(),
            wrap_t: Wrap::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 3 for RGB, 4 for RGBA
    pub fn texel_dim(&self) -> usize {
        self.texel_dim
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Wrap mode along s (left/right) and t (top/bottom)
    pub fn set_wrap(&mut self, wrap_s: Wrap, wrap_t: Wrap) {
        self.wrap_s = wrap_s;
        self.wrap_t = wrap_t;
    }

    pub fn wrap(&self) -> (Wrap, Wrap) {
        (self.wrap_s, self.wrap_t)
    }

    /// Texel at integer coordinates as RGBA (alpha 1 for RGB textures)
    pub fn texel(&self, i: usize, j: usize) -> [f32; 4] {
        let i = i.min(self.width - 1);
        let j = j.min(self.height - 1);
        let idx = (j * self.width + i) * self.texel_dim;
        let t = &self.texels[idx..idx + self.texel_dim];
        [t[0], t[1], t[2], if self.texel_dim == 4 { t[3] } else { 1.0 }]
    }

    /// Filtered sample at normalized coordinates (s, t)
    pub fn sample(&self, s: f32, t: f32) -> [f32; 4] {
        match self.filter {
            Filter::Nearest => self.texel(
                self.wrap_s.nearest(s, self.width),
                self.wrap_t.nearest(t, self.height),
            ),
            Filter::Linear => {
                let (i0, i1, fu) = self.wrap_s.footprint(s, self.width);
                let (j0, j1, fv) = self.wrap_t.footprint(t, self.height);
                let c00 = self.texel(i0, j0);
                let c10 = self.texel(i1, j0);
                let c01 = self.texel(i0, j1);
                let c11 = self.texel(i1, j1);
                let mut out = [0.0; 4];
                for k in 0..4 {
                    let bottom = c00[k] + fu * (c10[k] - c00[k]);
                    let top = c01[k] + fu * (c11[k] - c01[k]);
                    out[k] = bottom + fv * (top - bottom);
                }
                out
            }
        }
    }
}
