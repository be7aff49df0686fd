use crate::error::{Chip8Error, Result};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const FONT_START: TypeAddr = 0x000;
pub const FONT_GLYPH_HEIGHT: TypeAddr = 5;
pub const STACK_SIZE: usize = 16;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the built-in glyph for hex digit `digit` (low nibble only).
pub fn font_glyph_addr(digit: u8) -> TypeAddr {
    FONT_START + (digit & 0xF) as TypeAddr * FONT_GLYPH_HEIGHT
}

pub struct Memory {
    // 4k bytes
    // 000 -> 1FF reserved, font glyphs live at the very bottom
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
        };
        mem.install_font();
        mem
    }

    fn install_font(&mut self) {
        let start = FONT_START as usize;
        self.bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
    }

    /// Zero everything and put the font back.
    pub fn clear(&mut self) {
        self.bytes = [0; MEMORY_SIZE];
        self.install_font();
    }

    pub fn read_byte(&self, addr: TypeAddr) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Chip8Error::out_of_bounds(addr))
    }

    pub fn write_byte(&mut self, addr: TypeAddr, val: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Chip8Error::out_of_bounds(addr))?;
        *byte = val;
        Ok(())
    }

    // big-endian, both bytes must be addressable
    pub fn read_word(&self, addr: TypeAddr) -> Result<u16> {
        let l = self.read_byte(addr)?;
        let r = match addr.checked_add(1) {
            Some(next) => self.read_byte(next)?,
            None => {
                return Err(Chip8Error::MemoryOutOfBounds {
                    addr: addr as usize + 1,
                })
            }
        };
        Ok(((l as u16) << 8) | r as u16)
    }

    /// Borrow `len` bytes starting at `addr`.
    pub fn slice(&self, addr: TypeAddr, len: usize) -> Result<&[u8]> {
        let start = addr as usize;
        match start.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(&self.bytes[start..end]),
            // report the first byte that falls off the end
            _ => Err(Chip8Error::MemoryOutOfBounds {
                addr: start.max(MEMORY_SIZE),
            }),
        }
    }

    // copies the program in at 0x200, nothing is touched when the ROM is rejected
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(Chip8Error::EmptyRom);
        }
        if bytes.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max: MAX_ROM_SIZE,
            });
        }

        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

/// Fixed 16 slot return address stack.
pub struct Stack {
    addresses: [TypeAddr; STACK_SIZE],
    sp: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_SIZE],
            sp: 0,
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        if self.sp >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow);
        }
        self.addresses[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn clear(&mut self) {
        self.addresses = [0; STACK_SIZE];
        self.sp = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_installed() {
        let mem = Memory::new();
        assert_eq!(mem.slice(font_glyph_addr(0x0), 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(mem.slice(font_glyph_addr(0xF), 5).unwrap(), &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert_eq!(font_glyph_addr(0x1A), font_glyph_addr(0xA));
    }

    #[test]
    fn test_read_write_bounds() {
        let mut mem = Memory::new();
        mem.write_byte(0xFFF, 0xAB).unwrap();
        assert_eq!(mem.read_byte(0xFFF), Ok(0xAB));
        assert_eq!(
            mem.read_byte(0x1000),
            Err(Chip8Error::MemoryOutOfBounds { addr: 0x1000 })
        );
        assert!(mem.write_byte(0x1000, 1).is_err());
    }

    #[test]
    fn test_read_word_big_endian() {
        let mut mem = Memory::new();
        mem.write_byte(0x300, 0xA2).unwrap();
        mem.write_byte(0x301, 0x2A).unwrap();
        assert_eq!(mem.read_word(0x300), Ok(0xA22A));
        assert!(mem.read_word(0xFFE).is_ok());
        assert_eq!(
            mem.read_word(0xFFF),
            Err(Chip8Error::MemoryOutOfBounds { addr: 0x1000 })
        );
    }

    #[test]
    fn test_slice_bounds() {
        let mem = Memory::new();
        assert_eq!(mem.slice(0xFFE, 2).unwrap().len(), 2);
        assert!(mem.slice(0xFFE, 3).is_err());
    }

    #[test]
    fn test_load_rom_sizes() {
        let mut mem = Memory::new();
        assert_eq!(mem.load_rom(&[]), Err(Chip8Error::EmptyRom));
        assert!(mem.load_rom(&vec![0x11; MAX_ROM_SIZE]).is_ok());
        assert_eq!(mem.read_byte(0xFFF), Ok(0x11));

        let mut mem = Memory::new();
        assert_eq!(
            mem.load_rom(&vec![0x11; MAX_ROM_SIZE + 1]),
            Err(Chip8Error::RomTooLarge {
                size: MAX_ROM_SIZE + 1,
                max: MAX_ROM_SIZE
            })
        );
        assert_eq!(mem.read_byte(PROGRAM_START), Ok(0));
    }

    #[test]
    fn test_clear_reinstalls_font() {
        let mut mem = Memory::new();
        mem.write_byte(0x000, 0).unwrap();
        mem.write_byte(0x400, 7).unwrap();
        mem.clear();
        assert_eq!(mem.read_byte(0x000), Ok(0xF0));
        assert_eq!(mem.read_byte(0x400), Ok(0));
    }

    #[test]
    fn test_stack_limits() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), Err(Chip8Error::StackUnderflow));
        for i in 0..STACK_SIZE {
            stack.push(0x200 + i as u16 * 2).unwrap();
        }
        assert_eq!(stack.depth(), 16);
        assert_eq!(stack.push(0x300), Err(Chip8Error::StackOverflow));
        assert_eq!(stack.pop(), Ok(0x21E));
        assert_eq!(stack.depth(), 15);
    }
}
