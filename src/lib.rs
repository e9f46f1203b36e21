//! softpipe: a software shading pipeline
//!
//! - [`rasterizer`]: the pipeline itself (math, textures, depth, shading
//!   programs, triangle and mesh rasterization, cameras, mesh shapes)
//! - [`effects`]: ready-made shading programs
//! - [`scene`]: animated demo scenes built from the effects
//! - [`config`] and [`logging`]: demo plumbing

pub mod config;
pub mod effects;
pub mod logging;
pub mod rasterizer;
pub mod scene;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
