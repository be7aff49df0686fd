use chip8vm::display::{FrameBuffer, HEIGHT, WIDTH};
use minifb::{Key, Scale, Window, WindowOptions};

const ON: (u16, u16, u16) = (0, 127, 255);
const OFF: (u16, u16, u16) = (0, 0, 0);

/// The host window: draws frames and reads the keyboard.
pub struct Screen {
    pixel_buffer: Vec<u32>,
    window: Window,
}

impl Screen {
    pub fn new(scale: usize) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "chip8vm - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: to_scale(scale),
                ..WindowOptions::default()
            },
        )?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            pixel_buffer: vec![from_u16_rgb(OFF); WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Keypad values of every mapped key currently held.
    pub fn held_keys(&self) -> Vec<u8> {
        self.window
            .get_keys()
            .into_iter()
            .filter_map(key_to_num)
            .collect()
    }

    pub fn draw(&mut self, frame: &FrameBuffer) -> anyhow::Result<()> {
        for (pixel, lit) in self.pixel_buffer.iter_mut().zip(frame.pixels()) {
            *pixel = from_u16_rgb(if *lit { ON } else { OFF });
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)?;
        Ok(())
    }

    // pumps input without pushing a new frame
    pub fn update(&mut self) {
        self.window.update();
    }
}

fn from_u16_rgb((r, g, b): (u16, u16, u16)) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

fn to_scale(scale: usize) -> Scale {
    match scale {
        0..=1 => Scale::X1,
        2..=3 => Scale::X2,
        4..=7 => Scale::X4,
        8..=15 => Scale::X8,
        16..=31 => Scale::X16,
        _ => Scale::X32,
    }
}

// 1 2 3 C      1 2 3 4
// 4 5 6 D  <-  Q W E R
// 7 8 9 E      A S D F
// A 0 B F      Z X C V
fn key_to_num(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(key_to_num(Key::Key4), Some(0xC));
        assert_eq!(key_to_num(Key::X), Some(0x0));
        assert_eq!(key_to_num(Key::V), Some(0xF));
        assert_eq!(key_to_num(Key::Space), None);
    }

    #[test]
    fn test_scale_rounds_down() {
        assert!(matches!(to_scale(10), Scale::X8));
        assert!(matches!(to_scale(16), Scale::X16));
        assert!(matches!(to_scale(0), Scale::X1));
    }
}
