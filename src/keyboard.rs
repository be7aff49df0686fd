pub const KEY_COUNT: usize = 16;

/// Hex keypad as seen by the VM.
pub trait Keypad {
    /// Whether key `key` (0x0..=0xF) is held right now.
    fn is_pressed(&self, key: u8) -> bool;

    /// Next key pressed since the last poll, if any. Polled by FX0A until
    /// it yields something.
    fn poll_key_press(&mut self) -> Option<u8>;
}

/// Pressed state for the 16 keys, fed by whatever owns the real input.
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    keys: [bool; KEY_COUNT],
    pending: Option<u8>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: u8) {
        let Some(slot) = self.keys.get_mut(key as usize) else {
            return;
        };
        if !*slot {
            self.pending = Some(key);
        }
        *slot = true;
    }

    pub fn release(&mut self, key: u8) {
        if let Some(slot) = self.keys.get_mut(key as usize) {
            *slot = false;
        }
    }

    /// Replace the whole pressed set at once, recording fresh presses.
    pub fn sync(&mut self, held: &[u8]) {
        let mut next = [false; KEY_COUNT];
        for key in held {
            if let Some(slot) = next.get_mut(*key as usize) {
                *slot = true;
            }
        }
        for (key, now) in next.iter().enumerate() {
            if *now && !self.keys[key] {
                self.pending = Some(key as u8);
            }
        }
        self.keys = next;
    }
}

impl Keypad for KeyState {
    fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    fn poll_key_press(&mut self) -> Option<u8> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release() {
        let mut keys = KeyState::new();
        keys.press(0xA);
        assert!(keys.is_pressed(0xA));
        assert!(!keys.is_pressed(0xB));
        keys.release(0xA);
        assert!(!keys.is_pressed(0xA));
        assert!(!keys.is_pressed(0x20));
    }

    #[test]
    fn test_pending_only_on_transition() {
        let mut keys = KeyState::new();
        keys.press(0x3);
        assert_eq!(keys.poll_key_press(), Some(0x3));
        assert_eq!(keys.poll_key_press(), None);
        // held, not a new press
        keys.press(0x3);
        assert_eq!(keys.poll_key_press(), None);
    }

    #[test]
    fn test_sync_records_new_presses() {
        let mut keys = KeyState::new();
        keys.sync(&[0x1, 0x2]);
        assert!(keys.is_pressed(0x1) && keys.is_pressed(0x2));
        keys.poll_key_press();
        keys.sync(&[0x2, 0xF]);
        assert!(!keys.is_pressed(0x1));
        assert_eq!(keys.poll_key_press(), Some(0xF));
    }
}
