// Separately:
// CPU: --ips times per second (700 by default)
// Display: 60 times per second
// Timer: 60 times per second
//
// All pacing lives here, the VM only knows how to do one step or one tick.

use std::{
    fs,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context;
use chip8vm::{timer::TIMER_DEC_PER_SECOND, Emulator, KeyState, Quirks, StepResult};
use clap::Parser;

use audio::Sound;
use window::Screen;

mod audio;
mod window;

// never try to catch up on more than this much wall time at once
const MAX_CATCH_UP: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 virtual machine", long_about = None)]
struct Args {
    /// Path to the ROM file to run
    #[arg(short, long)]
    rom: PathBuf,

    /// Instructions per second
    #[arg(short, long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(1..))]
    ips: u32,

    /// Window scale factor, rounded down to 1, 2, 4, 8, 16 or 32
    #[arg(short, long, default_value_t = 10)]
    scale: usize,

    /// 8XY6/8XYE shift VY into VX (COSMAC VIP)
    #[arg(long)]
    shift_vy: bool,

    /// FX55/FX65 advance I past the registers they touch (COSMAC VIP)
    #[arg(long)]
    increment_index: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM {}", args.rom.display()))?;

    let quirks = Quirks {
        shift_uses_vy: args.shift_vy,
        load_store_increments_index: args.increment_index,
    };

    let sound = match Sound::new() {
        Ok(sound) => Some(sound),
        Err(e) => {
            log::warn!("audio disabled: {e:#}");
            None
        }
    };
    let beeper = move || {
        if let Some(sound) = &sound {
            sound.beep();
        }
    };

    let mut emu = Emulator::with_quirks(KeyState::new(), beeper, quirks);
    emu.load(&rom)?;
    log::info!("running {} at {} instructions/s", args.rom.display(), args.ips);

    let mut screen = Screen::new(args.scale)?;
    let cycle = Duration::from_secs_f64(1.0 / args.ips as f64);
    let tick = Duration::from_nanos(1_000_000_000 / TIMER_DEC_PER_SECOND);

    let mut last = Instant::now();
    let mut cpu_budget = Duration::ZERO;
    let mut timer_budget = Duration::ZERO;

    while screen.is_running() {
        let now = Instant::now();
        let elapsed = (now - last).min(MAX_CATCH_UP);
        last = now;
        cpu_budget += elapsed;
        timer_budget += elapsed;

        emu.keypad_mut().sync(&screen.held_keys());

        while cpu_budget >= cycle {
            cpu_budget -= cycle;
            let result = emu.step().context("CHIP-8 program crashed")?;
            if result == StepResult::WaitingForKey {
                // nothing more to do until the next batch of input
                cpu_budget = Duration::ZERO;
                break;
            }
        }

        while timer_budget >= tick {
            timer_budget -= tick;
            emu.tick_timers();
        }

        match emu.take_frame() {
            Some(frame) => screen.draw(frame)?,
            None => screen.update(),
        }
    }

    Ok(())
}
