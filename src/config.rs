use std::fmt;

use crate::constants::{CLOCK_HZ_DEFAULT, CLOCK_HZ_MAX, CLOCK_HZ_MIN, REFRESH_HZ, TIMER_HZ};

/// Environment variable that overrides the instruction clock
pub const CLOCK_HZ_VAR: &str = "CHIP8_CLOCK_HZ";

/// # Config
/// The three rates a host drives the machine at.
/// - `clock_hz` instructions per second; adjustable within CLOCK_HZ_MIN..=CLOCK_HZ_MAX
/// - `timer_hz` timer ticks per second; programs assume 60
/// - `refresh_hz` how often the frame buffer is presented
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub clock_hz: f64,
    pub timer_hz: f64,
    pub refresh_hz: f64,
}

impl Config {
    /// The default config with the clock taken from `CHIP8_CLOCK_HZ` when it is set
    pub fn from_env() -> Self {
        Self::with_clock_setting(std::env::var(CLOCK_HZ_VAR).ok().as_deref())
    }

    fn with_clock_setting(setting: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(setting) = setting {
            match setting.trim().parse::<f64>() {
                Ok(hz) if hz.is_finite() => config.clock_hz = clamp_clock_hz(hz),
                _ => log::warn!(
                    "{}={:?} is not a frequency; using {} Hz",
                    CLOCK_HZ_VAR,
                    setting,
                    config.clock_hz
                ),
            }
        }
        config
    }

    /// The same config with every rate made usable: the clock is clamped, and a timer or
    /// refresh rate that isn't a positive finite number falls back to its default
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Config {
            clock_hz: if self.clock_hz.is_finite() {
                clamp_clock_hz(self.clock_hz)
            } else {
                log::warn!("clock rate {} is not a frequency", self.clock_hz);
                defaults.clock_hz
            },
            timer_hz: positive_or("timer", self.timer_hz, defaults.timer_hz),
            refresh_hz: positive_or("refresh", self.refresh_hz, defaults.refresh_hz),
        }
    }
}

fn positive_or(name: &str, hz: f64, default: f64) -> f64 {
    if hz.is_finite() && hz > 0.0 {
        hz
    } else {
        log::warn!("{} rate {} is not a frequency; using {} Hz", name, hz, default);
        default
    }
}

/// Rates as a status line, e.g. `Clock @ 600 Hz  Timers @ 60 Hz  Refresh @ 60 Hz`
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Clock @ {} Hz  Timers @ {} Hz  Refresh @ {} Hz",
            self.clock_hz, self.timer_hz, self.refresh_hz
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            clock_hz: CLOCK_HZ_DEFAULT,
            timer_hz: TIMER_HZ,
            refresh_hz: REFRESH_HZ,
        }
    }
}

/// Keeps an instruction clock inside the supported range
pub fn clamp_clock_hz(hz: f64) -> f64 {
    hz.clamp(CLOCK_HZ_MIN, CLOCK_HZ_MAX)
}
