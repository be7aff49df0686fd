use crate::{
    error::{Chip8Error, Result},
    memory::{TypeAddr, PROGRAM_START},
};

pub const REG_COUNT: usize = 16;
pub const FLAG_REGISTER: u8 = 0xF;

/// V0..VF plus the program counter and the index register.
pub struct Registers {
    registers: [u8; REG_COUNT],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; REG_COUNT],
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0),
        }
    }

    pub fn get(&self, reg_num: u8) -> Result<u8> {
        self.registers
            .get(reg_num as usize)
            .copied()
            .ok_or(Chip8Error::InvalidRegister(reg_num))
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) -> Result<()> {
        let reg = self
            .registers
            .get_mut(reg_num as usize)
            .ok_or(Chip8Error::InvalidRegister(reg_num))?;
        *reg = value;
        Ok(())
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) -> Result<()> {
        let total = self.get(reg_num)?.wrapping_add(value);
        self.set_register(reg_num, total)
    }

    pub fn set_flag(&mut self, value: bool) {
        self.registers[FLAG_REGISTER as usize] = value as u8;
    }

    pub fn flag(&self) -> u8 {
        self.registers[FLAG_REGISTER as usize]
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

// only the low 12 bits point anywhere useful
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn add(&mut self, offset: u16) {
        self.0 = self.0.wrapping_add(offset);
    }
}
