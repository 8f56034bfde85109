use std::time::Duration;

use crate::chip8::Chip8;
use crate::config::{clamp_clock_hz, Config};
use crate::constants::CLOCK_HZ_DEFAULT;
use crate::program::Program;

/// What happened during one call to `Scheduler::advance`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Instructions stepped
    pub steps: u32,
    /// Timer ticks delivered
    pub timer_ticks: u32,
    /// The frame should be presented now
    pub refresh: bool,
    /// The sound timer is running
    pub buzzing: bool,
}

/// # Scheduler
/// Turns elapsed wall time into calls on the machine at three independent rates.
///
/// Each rate has an accumulator of time it has not used up yet. Every `advance` tops them up
/// and then discharges whole periods, so a slow host catches up with several steps or timer
/// ticks in one go while a fast host sees none. Refreshes don't catch up: missed frames are
/// dropped, since nothing changes between them.
pub struct Scheduler {
    config: Config,
    clock_period: Duration,
    timer_period: Duration,
    refresh_period: Duration,
    clock_acc: Duration,
    timer_acc: Duration,
    refresh_acc: Duration,
    paused: bool,
}

impl Scheduler {
    pub fn new(config: Config) -> Self {
        let config = config.sanitized();
        Scheduler {
            clock_period: period(config.clock_hz),
            timer_period: period(config.timer_hz),
            refresh_period: period(config.refresh_hz),
            config,
            clock_acc: Duration::ZERO,
            timer_acc: Duration::ZERO,
            refresh_acc: Duration::ZERO,
            paused: false,
        }
    }

    /// Runs the machine forward by `elapsed`
    ///
    /// # Arguments
    /// * `chip8` the machine to drive
    /// * `elapsed` wall time since the previous call
    pub fn advance(&mut self, chip8: &mut Chip8, elapsed: Duration) -> Tick {
        let mut tick = Tick::default();

        if !self.paused {
            self.timer_acc += elapsed;
            while self.timer_acc >= self.timer_period {
                chip8.tick_timers();
                self.timer_acc -= self.timer_period;
                tick.timer_ticks += 1;
            }

            self.clock_acc += elapsed;
            while self.clock_acc >= self.clock_period {
                chip8.step();
                self.clock_acc -= self.clock_period;
                tick.steps += 1;
            }
        }

        self.refresh_acc += elapsed;
        if self.refresh_acc >= self.refresh_period {
            self.refresh_acc = Duration::ZERO;
            tick.refresh = true;
        }

        tick.buzzing = chip8.should_buzz();
        tick
    }

    /// Loads a program into a blank machine and runs it straight away
    pub fn load(&mut self, chip8: &mut Chip8, program: &Program) {
        chip8.load_program(program);
        self.resume();
    }

    /// Restarts the loaded program and runs it straight away
    pub fn restart(&mut self, chip8: &mut Chip8) {
        chip8.restart();
        self.resume();
    }

    /// The rates currently in use
    pub fn config(&self) -> Config {
        self.config
    }

    pub fn clock_hz(&self) -> f64 {
        self.config.clock_hz
    }

    pub fn timer_hz(&self) -> f64 {
        self.config.timer_hz
    }

    pub fn refresh_hz(&self) -> f64 {
        self.config.refresh_hz
    }

    pub fn timer_period(&self) -> Duration {
        self.timer_period
    }

    /// Changes the instruction clock, clamped to the supported range
    pub fn set_clock_hz(&mut self, hz: f64) {
        if hz.is_nan() {
            log::warn!("ignoring a clock rate that is not a number");
            return;
        }
        self.config.clock_hz = clamp_clock_hz(hz);
        self.clock_period = period(self.config.clock_hz);
        log::debug!("clock set to {} Hz", self.config.clock_hz);
    }

    pub fn adjust_clock_hz(&mut self, delta: f64) {
        self.set_clock_hz(self.config.clock_hz + delta);
    }

    pub fn reset_clock_hz(&mut self) {
        self.set_clock_hz(CLOCK_HZ_DEFAULT);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::debug!("{}", if self.paused { "paused" } else { "resumed" });
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::debug!("resumed");
        }
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// No rate ticks more than once per nanosecond
const MIN_PERIOD: Duration = Duration::from_nanos(1);

fn period(hz: f64) -> Duration {
    Duration::try_from_secs_f64(1.0 / hz)
        .unwrap_or(Duration::MAX)
        .max(MIN_PERIOD)
}
