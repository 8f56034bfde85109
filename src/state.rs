use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, FONT_START, MAX_PROGRAM_SIZE, MEMORY_SIZE, NUM_KEYS,
    NUM_REGISTERS, PROGRAM_START, SPRITE_SHEET, STACK_SIZE,
};
use crate::opcode;

/// The Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - all 16 are general purpose
///     - VF is also overwritten with carry, borrow, shift and collision flags
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, always inside the 12-bit address space
///
/// Pointer
/// - (sp) the number of return addresses on the stack, 0..=16
///
/// Timers
/// - 2 8-bit timers (delay & sound) that count down to 0
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x200 is reserved; the hex digit sprites live at 0x000
///     - 0x200.. holds the program and whatever it writes
/// - 32 rows of 64 pixels, one bit per pixel
///
/// ## Input
/// - 16 flags tracking the pressed status of keys 0..F
/// - Execution halts while some register is waiting for a key
#[derive(Clone)]
pub struct State {
    pub v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub pressed_keys: [bool; NUM_KEYS],
    pub register_needing_key: Option<usize>,
}

/// The FrameBuffer is indexed by row; the most significant bit of a row is its leftmost pixel
pub type FrameBuffer = [u64; DISPLAY_HEIGHT];

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = usize::from(FONT_START);
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [0; DISPLAY_HEIGHT],
            draw_flag: false,
            pressed_keys: [false; NUM_KEYS],
            register_needing_key: None,
        }
    }

    /// Puts every register back to its power-on value without touching memory
    pub fn restart(&mut self) {
        self.v = [0; NUM_REGISTERS];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.stack = [0; STACK_SIZE];
        self.frame_buffer = [0; DISPLAY_HEIGHT];
        self.draw_flag = true;
        self.register_needing_key = None;
    }

    /// Zeroes the program region, leaving the reserved region (and the font) alone
    pub fn clear_program(&mut self) {
        self.memory[usize::from(PROGRAM_START)..].fill(0);
    }

    pub fn full_reset(&mut self) {
        self.restart();
        self.clear_program();
    }

    /// Copies a program into memory at PROGRAM_START.
    ///
    /// Sizing is the loader's job; anything past the end of memory is dropped.
    pub fn load_program(&mut self, program: &[u8]) {
        debug_assert!(program.len() <= MAX_PROGRAM_SIZE);
        if program.len() > MAX_PROGRAM_SIZE {
            log::warn!(
                "dropping the last {} bytes of the program",
                program.len() - MAX_PROGRAM_SIZE
            );
        }
        let len = program.len().min(MAX_PROGRAM_SIZE);
        let start = usize::from(PROGRAM_START);
        self.memory[start..start + len].copy_from_slice(&program[..len]);
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn get_op(&self) -> u16 {
        opcode::from_bytes(self.read(self.pc), self.read(self.pc.wrapping_add(1)))
    }

    /// Moves the pc past one instruction
    pub fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(2) & ADDRESS_MASK;
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.memory[wrap(addr)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.memory[wrap(addr)] = value;
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.register_needing_key.is_some()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Folds any 16-bit address into the 4KB address space
fn wrap(addr: u16) -> usize {
    usize::from(addr) % MEMORY_SIZE
}
