/// # Opcodes
///
/// Instructions are 16 bits, stored big-endian, and read as four nibbles `(n3, n2, n1, n0)`.
/// The opcode itself is some fixed pattern over those nibbles:
/// - `(n, _, _, _)` the broad category; every instruction has one
/// - `(n, _, _, n)` the register-to-register ALU and compare operations
/// - `(n, _, n, n)` the key, timer and memory operations
/// - `(n, n, n, n)` the two instructions with no operands (CLS, RET)
///
/// The nibbles an opcode doesn't own carry its operands:
/// - `[_nnn]` a 12-bit address
/// - `[__kk]` an 8-bit immediate
/// - `[___n]` a 4-bit immediate (sprite height)
/// - `[_x__]` the first register, Vx
/// - `[__y_]` the second register, Vy
pub trait Opcode {
    /// Returns the Opcode's component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[_x__]` as a register index
    fn x(&self) -> usize;

    /// `[__y_]` as a register index
    fn y(&self) -> usize;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (
            (self >> 12) as u8,
            ((self >> 8) & 0xF) as u8,
            ((self >> 4) & 0xF) as u8,
            (self & 0xF) as u8,
        )
    }

    fn x(&self) -> usize {
        usize::from((self >> 8) & 0xF)
    }

    fn y(&self) -> usize {
        usize::from((self >> 4) & 0xF)
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

/// Joins two bytes fetched from memory into an opcode; the first byte is the high one.
pub fn from_bytes(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}
