use crate::{
    decode::Instruction,
    display::FrameBuffer,
    error::{Chip8Error, Result},
    keyboard::{KeyState, Keypad},
    memory::{font_glyph_addr, Memory, Stack, PROGRAM_START},
    quirks::Quirks,
    registers::Registers,
    sound::{Beeper, Silent},
    timer::Timer,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// What a single `step` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Executed,
    /// FX0A is waiting for a key, PC stays on it until one arrives.
    WaitingForKey,
    /// Word matched no instruction. Skipped over, execution can continue.
    UnknownOpcode(u16),
}

pub struct Emulator<K: Keypad = KeyState, B: Beeper = Silent> {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    stack: Stack,
    delay_timer: Timer,
    sound_timer: Timer,
    keypad: K,
    beeper: B,
    quirks: Quirks,
    rng: StdRng,
    loaded: bool,
    started: bool,
    // set once FX0A has parked, presses from before that are stale
    awaiting_key: bool,
    halted: bool,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(KeyState::new(), Silent)
    }
}

impl<K: Keypad, B: Beeper> Emulator<K, B> {
    pub fn new(keypad: K, beeper: B) -> Self {
        Self::with_quirks(keypad, beeper, Quirks::default())
    }

    pub fn with_quirks(keypad: K, beeper: B, quirks: Quirks) -> Self {
        Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            stack: Stack::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            keypad,
            beeper,
            quirks,
            rng: StdRng::from_entropy(),
            loaded: false,
            started: false,
            awaiting_key: false,
            halted: false,
        }
    }

    /// Copies the program to 0x200. Only allowed once between resets, and
    /// never after the first step.
    pub fn load(&mut self, rom: &[u8]) -> Result<()> {
        if self.loaded {
            return Err(Chip8Error::RomAlreadyLoaded);
        }
        if self.started {
            return Err(Chip8Error::AlreadyRunning);
        }
        self.mem.load_rom(rom)?;
        self.regs.pc.set_addr(PROGRAM_START);
        self.loaded = true;
        log::debug!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Back to power-on state: memory wiped and font reinstalled, registers,
    /// stack, timers and screen zeroed. Keypad, beeper and quirks are kept.
    pub fn reset(&mut self) {
        self.fb = FrameBuffer::new();
        self.regs = Registers::new();
        self.mem.clear();
        self.stack.clear();
        self.delay_timer = Timer::default();
        self.sound_timer = Timer::default();
        self.loaded = false;
        self.started = false;
        self.awaiting_key = false;
        self.halted = false;
        log::debug!("reset");
    }

    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    /// Hands out the frame if anything changed since the last call, and
    /// clears the dirty flag.
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if !self.fb.is_dirty() {
            return None;
        }
        self.fb.mark_clean();
        Some(&self.fb)
    }

    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.get()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.get()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// One 60Hz tick of both timers. The beeper fires on every tick that
    /// finds the sound timer running.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        if self.sound_timer.tick() {
            self.beeper.beep();
        }
    }

    /// Fetch, decode and execute one instruction.
    pub fn step(&mut self) -> Result<StepResult> {
        if self.halted {
            return Err(Chip8Error::Halted);
        }
        self.started = true;
        let pc = self.regs.pc.0;
        let outcome = self
            .mem
            .read_word(pc)
            .map(Instruction::decode)
            .and_then(|ins| self.execute_ins(ins));

        match outcome {
            Ok(StepResult::UnknownOpcode(word)) => {
                log::warn!("unknown opcode {word:#06X} at {pc:#05X}");
                Ok(StepResult::UnknownOpcode(word))
            }
            Ok(result) => Ok(result),
            Err(e) => {
                if e.is_fatal() {
                    log::error!("fatal fault at {pc:#05X}: {e}");
                    self.halted = true;
                }
                Err(e)
            }
        }
    }

    pub fn execute_ins(&mut self, ins: Instruction) -> Result<StepResult> {
        // everything below sees PC already pointing past this instruction
        self.regs.pc.increment();

        match ins {
            Instruction::ClearScreen => self.fb.clear_buffer(),
            Instruction::PopSubroutine => {
                let addr = self.stack.pop()?;
                self.regs.pc.set_addr(addr);
            }
            Instruction::Jump(addr) => self.regs.pc.set_addr(addr),
            Instruction::PushSubroutine(addr) => {
                self.stack.push(self.regs.pc.0)?;
                self.regs.pc.set_addr(addr);
            }
            Instruction::SkipEqualConstant(vx, kk) => {
                self.skip_if(self.regs.get(vx)? == kk);
            }
            Instruction::SkipNotEqualConstant(vx, kk) => {
                self.skip_if(self.regs.get(vx)? != kk);
            }
            Instruction::SkipEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx)? == self.regs.get(vy)?);
            }
            Instruction::SkipNotEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx)? != self.regs.get(vy)?);
            }
            Instruction::SetRegister(vx, kk) => self.regs.set_register(vx, kk)?,
            Instruction::AddToRegister(vx, kk) => self.regs.add_to_register(vx, kk)?,
            Instruction::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy)?)?;
            }
            Instruction::Or(vx, vy) => {
                let value = self.regs.get(vx)? | self.regs.get(vy)?;
                self.regs.set_register(vx, value)?;
            }
            Instruction::And(vx, vy) => {
                let value = self.regs.get(vx)? & self.regs.get(vy)?;
                self.regs.set_register(vx, value)?;
            }
            Instruction::XOr(vx, vy) => {
                let value = self.regs.get(vx)? ^ self.regs.get(vy)?;
                self.regs.set_register(vx, value)?;
            }
            // VF is written last so it wins when X is F
            Instruction::Add(vx, vy) => {
                let sum = self.regs.get(vx)? as u16 + self.regs.get(vy)? as u16;
                self.regs.set_register(vx, sum as u8)?;
                self.regs.set_flag(sum > 0xFF);
            }
            Instruction::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx)?, self.regs.get(vy)?);
                self.regs.set_register(vx, x.wrapping_sub(y))?;
                self.regs.set_flag(x >= y); // no borrow
            }
            Instruction::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx)?, self.regs.get(vy)?);
                self.regs.set_register(vx, y.wrapping_sub(x))?;
                self.regs.set_flag(y >= x);
            }
            Instruction::RightShift(vx, vy) => {
                let value = self.shift_source(vx, vy)?;
                self.regs.set_register(vx, value >> 1)?;
                self.regs.set_flag(value & 1 == 1);
            }
            Instruction::LeftShift(vx, vy) => {
                let value = self.shift_source(vx, vy)?;
                self.regs.set_register(vx, value << 1)?;
                self.regs.set_flag((value >> 7) & 1 == 1);
            }
            Instruction::SetIndexRegister(addr) => self.regs.index.set_addr(addr),
            Instruction::JumpWithOffset(addr) => {
                self.regs.pc.set_addr(addr + self.regs.get(0)? as u16);
            }
            Instruction::Random(vx, kk) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, ransuu & kk)?;
            }
            Instruction::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x)?, self.regs.get(reg_y)?);
                let sprite = self.mem.slice(self.regs.index.0, height as usize)?;
                let collided = self.fb.paint(x, y, sprite);
                self.regs.set_flag(collided);
            }
            Instruction::SkipIfPressed(vx) => {
                let key = self.regs.get(vx)?;
                self.skip_if(self.keypad.is_pressed(key));
            }
            Instruction::SkipIfNotPressed(vx) => {
                let key = self.regs.get(vx)?;
                self.skip_if(!self.keypad.is_pressed(key));
            }
            Instruction::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.delay_timer.get())?;
            }
            Instruction::GetKey(vx) => match self.next_key_press() {
                Some(key) => {
                    self.awaiting_key = false;
                    self.regs.set_register(vx, key)?;
                }
                None => {
                    // stay parked on FX0A
                    self.regs.pc.set_addr(self.regs.pc.0.wrapping_sub(2));
                    return Ok(StepResult::WaitingForKey);
                }
            },
            Instruction::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)?),
            Instruction::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)?),
            Instruction::AddToIndex(vx) => self.regs.index.add(self.regs.get(vx)? as u16),
            Instruction::PointChar(vx) => {
                self.regs.index.set_addr(font_glyph_addr(self.regs.get(vx)?));
            }
            Instruction::ToDecimal(vx) => {
                let value = self.regs.get(vx)?;
                let index = self.regs.index.0;
                for (i, digit) in [value / 100, (value / 10) % 10, value % 10].iter().enumerate() {
                    self.mem.write_byte(index.wrapping_add(i as u16), *digit)?;
                }
            }
            Instruction::StoreRegisterToMemory(vx) => {
                let index = self.regs.index.0;
                for reg in 0..=vx {
                    self.mem
                        .write_byte(index.wrapping_add(reg as u16), self.regs.get(reg)?)?;
                }
                self.advance_index_after_transfer(vx);
            }
            Instruction::LoadRegisterFromMemory(vx) => {
                let index = self.regs.index.0;
                for reg in 0..=vx {
                    let reg_val = self.mem.read_byte(index.wrapping_add(reg as u16))?;
                    self.regs.set_register(reg, reg_val)?;
                }
                self.advance_index_after_transfer(vx);
            }
            Instruction::Unknown(word) => return Ok(StepResult::UnknownOpcode(word)),
        }
        Ok(StepResult::Executed)
    }

    // only presses made after FX0A started waiting count
    fn next_key_press(&mut self) -> Option<u8> {
        if !self.awaiting_key {
            self.keypad.poll_key_press();
            self.awaiting_key = true;
            return None;
        }
        self.keypad.poll_key_press()
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.regs.pc.increment();
        }
    }

    fn shift_source(&self, vx: u8, vy: u8) -> Result<u8> {
        if self.quirks.shift_uses_vy {
            return self.regs.get(vy);
        }
        self.regs.get(vx)
    }

    fn advance_index_after_transfer(&mut self, vx: u8) {
        if self.quirks.load_store_increments_index {
            self.regs.index.add(vx as u16 + 1);
        }
    }
}
