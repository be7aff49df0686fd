pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 monochrome pixel grid, row-major.
///
/// `dirty` is raised by every clear or draw and stays up until a renderer
/// takes the frame.
pub struct FrameBuffer {
    bit_buffer: [bool; WIDTH * HEIGHT],
    dirty: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [false; WIDTH * HEIGHT],
            // nothing has been shown yet
            dirty: true,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [false; WIDTH * HEIGHT];
        self.dirty = true;
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[(y % HEIGHT) * WIDTH + (x % WIDTH)]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// XORs `sprite` onto the grid at (x, y), MSB of each row first.
    /// Coordinates wrap around both edges. Returns true when any lit pixel
    /// was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = (y as usize + i) % HEIGHT;
            for j in 0..8 {
                let bit = (row >> (7 - j)) & 1 == 1;
                if !bit {
                    continue;
                }
                let nx = (x as usize + j) % WIDTH;
                let index = (ny * WIDTH) + nx;
                if self.bit_buffer[index] {
                    vf = true;
                }
                self.bit_buffer[index] ^= true;
            }
        }
        self.dirty = true;
        vf
    }
}
