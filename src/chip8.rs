use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::NUM_KEYS;
use crate::instruction::Instruction;
use crate::program::Program;
use crate::snapshot::Snapshot;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns its entire state, so any number of machines can run side by side.
///
/// Supplies interfaces for:
/// - loading programs and the various resets
/// - pressing and releasing keys
/// - advancing the CPU by one instruction
/// - advancing its timers by one tick
/// - inspecting its frame buffer and registers for rendering by some display
pub struct Chip8 {
    state: State,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A machine whose RND instruction produces the same sequence on every run
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            rng,
        }
    }

    /// Restart the loaded program from the beginning
    pub fn restart(&mut self) {
        log::debug!("restarting");
        self.state.restart();
    }

    /// Erase the loaded program
    pub fn clear_program(&mut self) {
        self.state.clear_program();
    }

    /// Restart and erase the loaded program
    pub fn full_reset(&mut self) {
        log::debug!("resetting");
        self.state.full_reset();
    }

    /// Load a program into a blank machine
    ///
    /// # Arguments
    /// * `program` a program that is known to fit in memory
    pub fn load_program(&mut self, program: &Program) {
        self.full_reset();
        self.state.load_program(program.bytes());
        log::debug!("loaded a {} byte program", program.len());
    }

    /// Set the pressed status of a key.
    /// A press while some register is waiting for a key is written to that register.
    ///
    /// # Arguments
    /// * `key` the hex digit of the key, 0x0..=0xF
    /// * `pressed` whether the key is now down
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        let index = usize::from(key);
        if index >= NUM_KEYS {
            log::warn!("ignoring key {:#04X}; the keypad only has keys 0..F", key);
            return;
        }
        self.state.pressed_keys[index] = pressed;

        if pressed {
            if let Some(register) = self.state.register_needing_key.take() {
                log::debug!("key {:X} delivered to V{:X}", key, register);
                self.state.v[register] = key;
            }
        }
    }

    /// Advances the CPU by a single instruction
    /// - does nothing while awaiting a keypress
    /// - fetches the next opcode and moves the pc past it
    /// - decodes and executes it; opcodes that don't decode are skipped
    pub fn step(&mut self) {
        if self.state.is_awaiting_key() {
            return;
        }

        let pc = self.state.pc;
        let op = self.state.get_op();
        self.state.advance();

        match Instruction::decode(op) {
            Some(instruction) => {
                log::trace!("{:03X}: {:04X} {}", pc, op, instruction);
                instruction.execute(&mut self.state, &mut self.rng);
            }
            None => log::trace!("{:03X}: {:04X} skipped", pc, op),
        }
    }

    /// Counts both timers down by one, stopping at 0.
    /// Call this at 60Hz, independently of `step`.
    pub fn tick_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Whether a tone should be playing
    pub fn should_buzz(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.state.is_awaiting_key()
    }

    /// The current frame
    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns a copy of the FrameBuffer if it changed since the last call
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if std::mem::take(&mut self.state.draw_flag) {
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Copies out the registers and counters for diagnostic displays
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.state)
    }

    /// Read-only view of the whole machine, memory included
    pub fn state(&self) -> &State {
        &self.state
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FLAG, PROGRAM_START};

    fn with_program(bytes: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::with_seed(0);
        let program = Program::new(bytes.to_vec()).unwrap();
        chip8.load_program(&program);
        chip8
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = with_program(&[0x00, 0xE0]);
        chip8.step();
        assert_eq!(chip8.state.pc, PROGRAM_START + 2);
    }

    #[test]
    fn test_step_skips_unknown_opcodes() {
        let mut chip8 = with_program(&[0x01, 0x23, 0xFF, 0xFF, 0x60, 0x42]);
        chip8.step();
        chip8.step();
        chip8.step();
        assert_eq!(chip8.state.pc, PROGRAM_START + 6);
        assert_eq!(chip8.state.v[0x0], 0x42);
    }

    #[test]
    fn test_doesnt_step_while_awaiting_key() {
        // LD V3, K; LD V0, $FF
        let mut chip8 = with_program(&[0xF3, 0x0A, 0x60, 0xFF]);
        chip8.step();
        assert!(chip8.is_awaiting_key());

        let v = chip8.state.v;
        for _ in 0..10 {
            chip8.step();
        }
        assert_eq!(chip8.state.pc, PROGRAM_START + 2);
        assert_eq!(chip8.state.v, v);

        chip8.set_key(0xB, true);
        assert!(!chip8.is_awaiting_key());
        assert_eq!(chip8.state.v[0x3], 0xB);

        chip8.step();
        assert_eq!(chip8.state.v[0x0], 0xFF);
    }

    #[test]
    fn test_key_release_doesnt_end_wait() {
        let mut chip8 = with_program(&[0xF3, 0x0A]);
        chip8.step();
        chip8.set_key(0x2, false);
        assert!(chip8.is_awaiting_key());
        assert_eq!(chip8.state.v[0x3], 0);
    }

    #[test]
    fn test_first_press_wins() {
        let mut chip8 = with_program(&[0xF3, 0x0A]);
        chip8.step();
        chip8.set_key(0x7, true);
        chip8.set_key(0x9, true);
        assert_eq!(chip8.state.v[0x3], 0x7);
        assert!(chip8.state.pressed_keys[0x9]);
    }

    #[test]
    fn test_timers_keep_running_while_awaiting_key() {
        // LD V0, $03; LD DT, V0; LD V1, K
        let mut chip8 = with_program(&[0x60, 0x03, 0xF0, 0x15, 0xF1, 0x0A]);
        for _ in 0..3 {
            chip8.step();
        }
        assert!(chip8.is_awaiting_key());
        chip8.tick_timers();
        assert_eq!(chip8.state.delay_timer, 2);
    }

    #[test]
    fn test_out_of_range_key_is_ignored() {
        let mut chip8 = Chip8::with_seed(0);
        chip8.set_key(0x10, true);
        assert!(chip8.state.pressed_keys.iter().all(|&pressed| !pressed));
    }

    #[test]
    fn test_timers_floor_at_zero() {
        let mut chip8 = Chip8::with_seed(0);
        chip8.state.delay_timer = 2;
        chip8.state.sound_timer = 1;
        assert!(chip8.should_buzz());
        for _ in 0..5 {
            chip8.tick_timers();
        }
        assert_eq!(chip8.state.delay_timer, 0);
        assert_eq!(chip8.state.sound_timer, 0);
        assert!(!chip8.should_buzz());
    }

    #[test]
    fn test_take_frame_only_after_drawing() {
        // LD F, V0; DRW V0, V0, 5
        let mut chip8 = with_program(&[0xF0, 0x29, 0xD0, 0x05]);
        chip8.take_frame();
        chip8.step();
        assert_eq!(chip8.take_frame(), None);
        chip8.step();
        let frame = chip8.take_frame().expect("DRW should set the draw flag");
        assert_eq!(frame[0], 0xF0u64 << 56);
        assert_eq!(chip8.take_frame(), None);
    }

    #[test]
    fn test_load_program_resets_first() {
        let mut chip8 = with_program(&[0x6A, 0x01, 0x00, 0xE0, 0x00, 0xE0]);
        chip8.step();
        let program = Program::new(vec![0x12, 0x00]).unwrap();
        chip8.load_program(&program);
        assert_eq!(chip8.state.v[0xA], 0);
        assert_eq!(chip8.state.pc, PROGRAM_START);
        assert_eq!(chip8.state.memory[0x202..0x206], [0, 0, 0, 0]);
    }

    #[test]
    fn test_seeded_machines_agree() {
        // RND V0, $FF; RND V1, $FF
        let program = Program::new(vec![0xC0, 0xFF, 0xC1, 0xFF]).unwrap();
        let mut a = Chip8::with_seed(42);
        let mut b = Chip8::with_seed(42);
        a.load_program(&program);
        b.load_program(&program);
        for _ in 0..2 {
            a.step();
            b.step();
        }
        assert_eq!(a.state.v, b.state.v);
    }

    #[test]
    fn test_collision_program() {
        // LD I, $20A; DRW V0, V0, 1; DRW V0, V0, 1; JP $206; (sprite) $80
        let mut chip8 = with_program(&[
            0xA2, 0x0A, 0xD0, 0x01, 0xD0, 0x01, 0x12, 0x06, 0x00, 0x00, 0x80,
        ]);
        chip8.step();
        chip8.step();
        assert_eq!(chip8.state.v[FLAG], 0);
        assert_eq!(chip8.frame()[0], 1 << 63);
        chip8.step();
        assert_eq!(chip8.state.v[FLAG], 1);
        assert_eq!(chip8.frame()[0], 0);
    }
}
