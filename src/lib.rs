// 16 8-bit data registers named V0 to VF, VF doubles as the flag register
// I -> address register (12 bits used)
//
// 16 level return address stack
//
// Delay timer & Sound timer: count down at 60 times / s until 0,
// beep while the sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each 2 bytes (big-endian)
//      NNN: address
//      KK: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
//
// The core does not pace itself: the host calls `step` at the CPU rate and
// `tick_timers` at 60Hz.

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod quirks;
pub mod registers;
pub mod sound;
pub mod timer;

pub use emulator::{Emulator, StepResult};
pub use error::{Chip8Error, Result};
pub use keyboard::{KeyState, Keypad};
pub use quirks::Quirks;
pub use sound::{Beeper, Silent};
