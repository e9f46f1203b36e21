//! Error types for the pipeline
//!
//! Configuration errors are loud: they are returned before any pixel is
//! touched. Degenerate geometry is not an error and never shows up here.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("schema field name is empty")]
    EmptyName,
    #[error("schema field `{0}` declared twice")]
    Duplicate(String),
    #[error("schema field `{0}` has zero width")]
    ZeroWidth(String),
    #[error("schema has no field `{0}`")]
    Missing(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("mesh has {actual} attributes per vertex, program expects {expected}")]
    AttributeDim { expected: usize, actual: usize },
    #[error("uniform vector has {actual} components, program expects {expected}")]
    UniformDim { expected: usize, actual: usize },
    #[error("{actual} textures bound, program expects {expected}")]
    TextureCount { expected: usize, actual: usize },
    #[error("program declares {varyings} varyings, too few for a {needed}-component position")]
    VaryingDim { varyings: usize, needed: usize },
    #[error("corner varying vector has {actual} components, program expects {expected}")]
    VaryingLen { expected: usize, actual: usize },
    #[error("triangle {triangle} references vertex {index}, mesh has {vertex_count}")]
    TriangleIndex {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("depth buffer is {depth_width}x{depth_height}, framebuffer is {width}x{height}")]
    DepthSize {
        width: usize,
        height: usize,
        depth_width: usize,
        depth_height: usize,
    },
    #[error("invalid shape parameters: {0}")]
    InvalidShape(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("texture is {width}x{height} with texel dimension {texel_dim} but {len} values were given")]
    Size {
        width: usize,
        height: usize,
        texel_dim: usize,
        len: usize,
    },
    #[error("texel dimension must be 3 or 4, got {0}")]
    TexelDim(usize),
}
