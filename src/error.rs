use crate::memory::TypeAddr;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Faults raised by the VM. Everything here except the load-time variants
/// halts execution until the next reset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Chip8Error {
    #[error("memory access out of bounds at address {addr:#06X}")]
    MemoryOutOfBounds { addr: usize },

    #[error("call stack overflow: more than 16 nested subroutine calls")]
    StackOverflow,

    #[error("call stack underflow: return with no active subroutine")]
    StackUnderflow,

    #[error("register V{0:X} does not exist")]
    InvalidRegister(u8),

    #[error("ROM is empty")]
    EmptyRom,

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("a ROM is already loaded, reset before loading another")]
    RomAlreadyLoaded,

    #[error("VM has already started executing, reset before loading a ROM")]
    AlreadyRunning,

    #[error("VM halted after a fatal fault, reset to continue")]
    Halted,
}

impl Chip8Error {
    pub fn out_of_bounds(addr: TypeAddr) -> Self {
        Self::MemoryOutOfBounds {
            addr: addr as usize,
        }
    }

    /// Load-time errors leave the VM untouched; everything else stops it.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::EmptyRom
                | Self::RomTooLarge { .. }
                | Self::RomAlreadyLoaded
                | Self::AlreadyRunning
        )
    }
}
