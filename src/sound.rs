/// Anything that can make the CHIP-8 buzz. Called once per timer tick while
/// the sound timer is non-zero.
pub trait Beeper {
    fn beep(&mut self);
}

/// Default beeper, makes no sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Beeper for Silent {
    fn beep(&mut self) {}
}

impl<F: FnMut()> Beeper for F {
    fn beep(&mut self) {
        self()
    }
}
