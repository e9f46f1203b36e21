//! Software shading pipeline
//!
//! Features:
//! - Programmable vertex and fragment stages over plain float vectors
//! - Scanline triangle rasterizer with affine varying interpolation
//! - Gap-free, overlap-free coverage of shared triangle edges
//! - Depth buffer with closer-wins testing
//! - Nearest/linear texture filtering with clamp/repeat wrapping

mod camera;
mod depth;
mod error;
mod framebuffer;
mod math;
mod mesh;
mod shading;
pub mod shapes;
mod texture;
mod triangle;

pub use camera::*;
pub use depth::*;
pub use error::*;
pub use framebuffer::*;
pub use math::*;
pub use mesh::*;
pub use shading::*;
pub use texture::*;
pub use triangle::*;

/// Default demo resolution
pub const WIDTH: usize = 512;
pub const HEIGHT: usize = 512;
