pub const TIMER_DEC_PER_SECOND: u64 = 60;

/// An 8-bit counter that the host ticks down at 60Hz.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    /// Counts down by one. Returns whether the timer was running when ticked.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_stops_at_zero() {
        let mut timer = Timer::new(2);
        assert!(timer.tick());
        assert!(timer.tick());
        assert!(!timer.tick());
        assert_eq!(timer.get(), 0);
    }

    #[test]
    fn test_one_second_of_ticks() {
        for start in [0u8, 1, 59, 60, 61, 255] {
            let mut timer = Timer::new(start);
            for _ in 0..TIMER_DEC_PER_SECOND {
                timer.tick();
            }
            assert_eq!(timer.get(), start.saturating_sub(60));
        }
    }
}
