use crate::memory::TypeAddr;

/// A fetched 16-bit instruction word with its packed fields pulled apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // top nibble, kept in place (0x1000, 0x2000, ...)
    pub fn class(&self) -> u16 {
        self.code & 0xF000
    }

    pub fn x(&self) -> u8 {
        ((self.code & 0x0F00) >> 8) as u8
    }

    pub fn y(&self) -> u8 {
        ((self.code & 0x00F0) >> 4) as u8
    }

    pub fn n(&self) -> u8 {
        (self.code & 0x000F) as u8
    }

    pub fn kk(&self) -> u8 {
        (self.code & 0x00FF) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.code & 0x0FFF
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 00E0
    // turn all pixels off
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XKK
    SkipEqualConstant(u8, u8),
    // 4XKK
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XKK
    SetRegister(u8, u8),
    // 7XKK
    // no carry flag
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXKK
    Random(u8, u8),
    // DXYN
    // draw an N row sprite read from I at (VX, VY), VF = collision
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    /// Bit pattern that matches no instruction. Carries the raw word.
    Unknown(u16),
}

impl Instruction {
    pub fn decode(ins: u16) -> Self {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        match raw.class() {
            0x0000 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::Unknown(ins),
            },
            0x1000 => Self::Jump(raw.nnn()),
            0x2000 => Self::PushSubroutine(raw.nnn()),
            0x3000 => Self::SkipEqualConstant(x, raw.kk()),
            0x4000 => Self::SkipNotEqualConstant(x, raw.kk()),
            0x5000 if raw.n() == 0 => Self::SkipEqualRegister(x, y),
            0x6000 => Self::SetRegister(x, raw.kk()),
            0x7000 => Self::AddToRegister(x, raw.kk()),
            0x8000 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unknown(ins),
            },
            0x9000 if raw.n() == 0 => Self::SkipNotEqualRegister(x, y),
            0xA000 => Self::SetIndexRegister(raw.nnn()),
            0xB000 => Self::JumpWithOffset(raw.nnn()),
            0xC000 => Self::Random(x, raw.kk()),
            0xD000 => Self::Display(x, y, raw.n()),
            0xE000 => match raw.kk() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unknown(ins),
            },
            0xF000 => match raw.kk() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unknown(ins),
            },
            _ => Self::Unknown(ins),
        }
    }
}
