//! Depth buffer for hidden-surface removal
//!
//! Smaller depth values are closer. Shaders choose how they encode depth
//! (e.g. `-z` in eye space or `z` in normalized device coordinates), as long
//! as nearer fragments produce smaller numbers.

/// Sentinel used by [`DepthBuffer::clear_far`]
pub const FAR: f32 = f32::MAX;

pub struct DepthBuffer {
    depths: Vec<f32>,
    width: usize,
    height: usize,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depths: vec![FAR; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every pixel to `sentinel`; call once per frame before drawing
    pub fn clear(&mut self, sentinel: f32) {
        self.depths.fill(sentinel);
    }

    pub fn clear_far(&mut self) {
        self.clear(FAR);
    }

    /// Stored depth, or None outside the buffer
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.depths[y * self.width + x])
        } else {
            None
        }
    }

    /// Store `depth` iff it is strictly closer than the current value.
    /// Rejections (including NaN and out-of-range pixels) leave the buffer
    /// untouched.
    pub fn test_and_set(&mut self, x: usize, y: usize, depth: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let slot = &mut self.depths[y * self.width + x];
        if depth < *slot {
            *slot = depth;
            true
        } else {
            false
        }
    }
}
