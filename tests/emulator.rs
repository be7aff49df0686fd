use chip8vm::{
    display::{HEIGHT, WIDTH},
    memory::MAX_ROM_SIZE,
    Chip8Error, Emulator, KeyState, StepResult,
};

fn assemble(program: &[u16]) -> Vec<u8> {
    program.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn boot(program: &[u16]) -> Emulator {
    let mut emu: Emulator = Emulator::default();
    emu.load(&assemble(program)).unwrap();
    emu
}

fn run(emu: &mut Emulator, steps: usize) {
    for _ in 0..steps {
        emu.step().unwrap();
    }
}

#[test]
fn call_and_return_resume_after_call() {
    // 0x200 V0 = 0, 0x202 call 0x20A, 0x204 V0 += 1, 0x206 jump to self,
    // 0x20A V1 = 9, 0x20C return
    let mut emu = boot(&[0x6000, 0x220A, 0x7001, 0x1206, 0x0000, 0x6109, 0x00EE]);
    run(&mut emu, 4);
    assert_eq!(emu.registers().pc.0, 0x204);
    assert_eq!(emu.stack_depth(), 0);
    run(&mut emu, 1);
    assert_eq!(emu.registers().get(0), Ok(1));
    assert_eq!(emu.registers().get(1), Ok(9));
}

#[test]
fn seventeenth_nested_call_overflows() {
    // every call lands on the next instruction, which calls again
    let program: Vec<u16> = (0..17).map(|i| 0x2202 + i * 2).collect();
    let mut emu = boot(&program);
    run(&mut emu, 16);
    assert_eq!(emu.stack_depth(), 16);
    assert_eq!(emu.step(), Err(Chip8Error::StackOverflow));
    assert!(emu.is_halted());
}

#[test]
fn clear_after_draws_blanks_screen() {
    let mut emu = boot(&[
        0x6005, 0x6107, 0xF029, 0xD015, // draw glyph 5
        0x6030, 0xD105, // draw again elsewhere
        0x00E0,
    ]);
    run(&mut emu, 6);
    assert!(emu.framebuffer().pixels().iter().any(|p| *p));
    assert!(emu.take_frame().is_some());
    run(&mut emu, 1);
    let frame = emu.take_frame().expect("clear marks the frame dirty");
    assert_eq!(frame.pixels().len(), WIDTH * HEIGHT);
    assert!(frame.pixels().iter().all(|p| !*p));
}

#[test]
fn double_draw_is_identity_with_full_collision() {
    let mut emu = boot(&[0x603E, 0x611E, 0xA000, 0xD01F, 0xD01F]);
    run(&mut emu, 3);
    let before: Vec<bool> = emu.framebuffer().pixels().to_vec();
    run(&mut emu, 1);
    assert_eq!(emu.registers().get(0xF), Ok(0));
    // sprite wraps off the right and bottom edges
    assert!(emu.framebuffer().pixel(62, 30));
    assert!(emu.framebuffer().pixel(0, 30));
    assert!(emu.framebuffer().pixel(62, 0));
    run(&mut emu, 1);
    assert_eq!(emu.registers().get(0xF), Ok(1));
    assert_eq!(emu.framebuffer().pixels(), before.as_slice());
}

#[test]
fn timers_count_one_second_regardless_of_steps() {
    // DT = 100, ST = 30, then spin
    let mut emu = boot(&[0x6064, 0xF015, 0x611E, 0xF118, 0x1208]);
    run(&mut emu, 4);
    for tick in 0..60 {
        for _ in 0..(tick % 13) {
            emu.step().unwrap();
        }
        emu.tick_timers();
    }
    assert_eq!(emu.delay_timer(), 40);
    assert_eq!(emu.sound_timer(), 0);
}

#[test]
fn rom_size_limits() {
    let mut emu: Emulator = Emulator::default();
    assert_eq!(emu.load(&[]), Err(Chip8Error::EmptyRom));
    assert!(matches!(
        emu.load(&vec![0xAA; MAX_ROM_SIZE + 1]),
        Err(Chip8Error::RomTooLarge { .. })
    ));
    assert_eq!(emu.memory().read_byte(0x200), Ok(0));
    assert!(emu.load(&vec![0xAA; MAX_ROM_SIZE]).is_ok());
    assert_eq!(emu.memory().read_byte(0xFFF), Ok(0xAA));
    assert_eq!(emu.registers().pc.0, 0x200);
}

#[test]
fn running_off_the_end_of_memory_is_fatal() {
    let mut emu = boot(&[0x1FFE]);
    run(&mut emu, 1);
    // 0xFFE holds 0x0000, an unknown opcode, then PC lands on 0x1000
    assert_eq!(emu.step(), Ok(StepResult::UnknownOpcode(0x0000)));
    assert!(matches!(
        emu.step(),
        Err(Chip8Error::MemoryOutOfBounds { addr: 0x1000 })
    ));
    emu.reset();
    assert!(!emu.is_halted());
}

#[test]
fn key_wait_with_custom_keypad() {
    struct Scripted(Vec<u8>);
    impl chip8vm::Keypad for Scripted {
        fn is_pressed(&self, _key: u8) -> bool {
            false
        }
        fn poll_key_press(&mut self) -> Option<u8> {
            self.0.pop()
        }
    }

    let mut emu = Emulator::new(Scripted(vec![]), chip8vm::Silent);
    emu.load(&assemble(&[0xF30A])).unwrap();
    assert_eq!(emu.step(), Ok(StepResult::WaitingForKey));
    emu.keypad_mut().0.push(0x7);
    assert_eq!(emu.step(), Ok(StepResult::Executed));
    assert_eq!(emu.registers().get(3), Ok(0x7));

    // a key tapped before FX0A runs does not satisfy it
    let mut keyed = Emulator::new(KeyState::new(), chip8vm::Silent);
    keyed.load(&assemble(&[0x6000, 0x1204, 0xF00A])).unwrap();
    keyed.keypad_mut().press(0x1);
    keyed.keypad_mut().release(0x1);
    assert_eq!(keyed.step(), Ok(StepResult::Executed));
    assert_eq!(keyed.step(), Ok(StepResult::Executed));
    assert_eq!(keyed.step(), Ok(StepResult::WaitingForKey));
    assert_eq!(keyed.step(), Ok(StepResult::WaitingForKey));
    keyed.keypad_mut().press(0xC);
    assert_eq!(keyed.step(), Ok(StepResult::Executed));
    assert_eq!(keyed.registers().get(0), Ok(0xC));
}
