/// Total addressable memory in bytes
pub const MEMORY_SIZE: usize = 4096;

/// 0x000 - 0x200 is reserved for the interpreter; programs are loaded at 0x200
pub const PROGRAM_START: u16 = 0x200;

/// The largest program that fits between PROGRAM_START and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Addresses are 12 bits wide; anything past this wraps back to 0x000
pub const ADDRESS_MASK: u16 = 0x0FFF;

pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const NUM_KEYS: usize = 16;

/// The flag register (VF)
pub const FLAG: usize = 0xF;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Default instruction clock in Hz and the range it may be set to
pub const CLOCK_HZ_DEFAULT: f64 = 600.0;
pub const CLOCK_HZ_MIN: f64 = 1.0;
pub const CLOCK_HZ_MAX: f64 = 1000.0;

/// Delay and sound timers tick down at 60Hz
pub const TIMER_HZ: f64 = 60.0;

/// How often a host should sample the frame buffer
pub const REFRESH_HZ: f64 = 60.0;

/// Where the hex digit sprites begin in memory
pub const FONT_START: u16 = 0x000;

/// Each digit sprite is 5 rows tall
pub const FONT_SPRITE_HEIGHT: u16 = 5;

/// # Sprite Sheet
/// Sprites for the hex digits 0..F, each 8 pixels wide by 5 tall.
/// Only the high nibble of each row is used, e.g. "0" is:
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
