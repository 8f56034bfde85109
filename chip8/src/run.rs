use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use chip8_vm::{keymap, Chip8, Config, MemoryWindow, Program, Scheduler, Tick};

use crate::control::{control, Control, CLOCK_STEP_HZ};
use crate::display::Display;

/// How long the loop sleeps between scheduler updates
const CYCLE_TIME: Duration = Duration::from_millis(1);

/// # Host
/// Everything the runner drives: the machine, its clock and the debugger's memory cursor.
pub struct Host {
    chip8: Chip8,
    scheduler: Scheduler,
    window: MemoryWindow,
    // The keypad key pressed on the previous refresh, if any
    held: Option<u8>,
    running: bool,
}

impl Host {
    pub fn new(chip8: Chip8, scheduler: Scheduler) -> Self {
        Host {
            chip8,
            scheduler,
            window: MemoryWindow::new(),
            held: None,
            running: true,
        }
    }

    pub fn load(&mut self, program: &Program) {
        self.scheduler.load(&mut self.chip8, program);
        self.window.follow(self.chip8.state());
    }

    /// Runs the machine forward; the memory cursor tracks the pc unless paused
    pub fn update(&mut self, elapsed: Duration) -> Tick {
        let tick = self.scheduler.advance(&mut self.chip8, elapsed);
        if !self.scheduler.is_paused() {
            self.window.follow(self.chip8.state());
        }
        tick
    }

    /// Handles one refresh worth of input: releases the key held since the last refresh,
    /// otherwise takes the next character
    pub fn next_input(&mut self, keys: &mut impl Iterator<Item = char>) {
        if let Some(key) = self.held.take() {
            self.chip8.set_key(key, false);
        } else if let Some(key) = keys.next() {
            self.input(key);
        }
    }

    fn input(&mut self, key: char) {
        if let Some(hex) = keymap(key) {
            self.chip8.set_key(hex, true);
            self.held = Some(hex);
        } else if let Some(control) = control(key) {
            self.apply(control);
        } else {
            log::warn!("{:?} isn't a key or a control", key);
        }
    }

    fn apply(&mut self, control: Control) {
        log::debug!("{:?}", control);
        match control {
            Control::Stop => self.running = false,
            Control::TogglePause => self.scheduler.toggle_pause(),
            Control::Restart => {
                self.scheduler.restart(&mut self.chip8);
                self.window.follow(self.chip8.state());
            }
            Control::LoadDemo => self.load(&Program::demo()),
            Control::SlowDown => self.scheduler.adjust_clock_hz(-CLOCK_STEP_HZ),
            Control::SpeedUp => self.scheduler.adjust_clock_hz(CLOCK_STEP_HZ),
            Control::ResetClock => self.scheduler.reset_clock_hz(),
            // The cursor only moves by hand while the pc isn't dragging it along
            Control::CursorUp if self.scheduler.is_paused() => self.window.move_cursor(-1),
            Control::CursorDown if self.scheduler.is_paused() => self.window.move_cursor(1),
            Control::CursorUp | Control::CursorDown => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Registers, the memory around the cursor and the rates, as the debugger screen shows them
    pub fn panels(&self) -> String {
        format!(
            "{}\n{}\n{}{}",
            self.chip8.snapshot(),
            self.window.view(self.chip8.state()),
            self.scheduler.config(),
            if self.scheduler.is_paused() { "  (paused)" } else { "" }
        )
    }
}

/// Runs a program in real time for `run_time`, then prints the debugger panels.
///
/// # Arguments
/// * `program` the ROM to load
/// * `run_time` how long to keep the machine running
/// * `keys` keypad keys and controls, one per refresh; keypad keys are released on the next
pub fn run(program: &Program, run_time: Duration, keys: &str) -> Result<(), Box<dyn Error>> {
    let mut host = Host::new(Chip8::new(), Scheduler::new(Config::from_env()));
    host.load(program);
    log::info!("{} for {:?}", host.scheduler.config(), run_time);

    let stdout = io::stdout();
    let mut display = Display::new(stdout.lock());
    let mut keys = keys.chars();
    let mut buzzing = false;

    let start = Instant::now();
    let mut last_cycle = start;

    while host.is_running() && start.elapsed() < run_time {
        let current_time = Instant::now();
        let tick = host.update(current_time - last_cycle);
        last_cycle = current_time;

        if tick.refresh {
            host.next_input(&mut keys);

            // If the draw flag is set, unset it and render the current frame
            if let Some(frame) = host.chip8.take_frame() {
                display.render(&frame)?;
            }
        }

        if tick.buzzing != buzzing {
            buzzing = tick.buzzing;
            log::info!("buzzer {}", if buzzing { "on" } else { "off" });
        }

        // Handle timing
        std::thread::sleep(CYCLE_TIME.saturating_sub(current_time.elapsed()));
    }

    println!("{}", host.panels());
    Ok(())
}
