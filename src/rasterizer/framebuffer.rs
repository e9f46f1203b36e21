//! Color target for software rendering

use serde::{Serialize, Deserialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Quantize a 0..1 float color.
    ///
    /// Channels are saturated to 0..=1 first (NaN becomes 0). This is the one
    /// overflow rule of the pipeline; shaders may emit any value.
    pub fn from_rgb_f32(rgb: [f32; 3]) -> Self {
        Self::new(quantize(rgb[0]), quantize(rgb[1]), quantize(rgb[2]))
    }

    pub fn to_rgb_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn quantize(c: f32) -> u8 {
    if c.is_nan() {
        return 0;
    }
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// RGBA8 pixel grid. Row 0 is the bottom row as far as the pipeline is
/// concerned; presenters flip when blitting to a top-down surface.
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn clear_rgb(&mut self, rgb: [f32; 3]) {
        self.clear(Color::from_rgb_f32(rgb));
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Write a 0..1 float color; see [`Color::from_rgb_f32`] for the
    /// out-of-range rule
    pub fn set_pixel_rgb(&mut self, x: usize, y: usize, rgb: [f32; 3]) {
        self.set_pixel(x, y, Color::from_rgb_f32(rgb));
    }

    /// Black for out-of-range coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Color {
                r: self.pixels[idx],
                g: self.pixels[idx + 1],
                b: self.pixels[idx + 2],
                a: self.pixels[idx + 3],
            }
        } else {
            Color::BLACK
        }
    }
}
