use std::fmt;

use rand::RngCore;

use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A decoded Chip-8 instruction and its operands.
///
/// `x` and `y` are register indices, `kk` and `n` are immediates and `addr` is a 12-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Clear,
    Return,
    Jump { addr: u16 },
    Call { addr: u16 },
    SkipEqual { x: usize, kk: u8 },
    SkipNotEqual { x: usize, kk: u8 },
    SkipRegEqual { x: usize, y: usize },
    Load { x: usize, kk: u8 },
    Add { x: usize, kk: u8 },
    Move { x: usize, y: usize },
    Or { x: usize, y: usize },
    And { x: usize, y: usize },
    Xor { x: usize, y: usize },
    AddReg { x: usize, y: usize },
    Sub { x: usize, y: usize },
    ShiftRight { x: usize, y: usize },
    SubN { x: usize, y: usize },
    ShiftLeft { x: usize, y: usize },
    SkipRegNotEqual { x: usize, y: usize },
    LoadI { addr: u16 },
    JumpOffset { addr: u16 },
    Random { x: usize, kk: u8 },
    Draw { x: usize, y: usize, n: u8 },
    SkipPressed { x: usize },
    SkipNotPressed { x: usize },
    LoadDelay { x: usize },
    AwaitKey { x: usize },
    SetDelay { x: usize },
    SetSound { x: usize },
    AddI { x: usize },
    LoadSprite { x: usize },
    Bcd { x: usize },
    Store { x: usize },
    Read { x: usize },
}

impl Instruction {
    /// Selects the Instruction for a given Opcode.
    ///
    /// CLS and RET are matched on the whole opcode before any of the patterns with operands.
    /// Opcodes that match nothing (including 0nnn machine code calls) decode to `None`.
    pub fn decode(op: u16) -> Option<Self> {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x1, ..) => Jump { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SkipEqual { x, kk },
            (0x4, ..) => SkipNotEqual { x, kk },
            (0x5, .., 0x0) => SkipRegEqual { x, y },
            (0x6, ..) => Load { x, kk },
            (0x7, ..) => Add { x, kk },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x, y },
            (0x8, .., 0x7) => SubN { x, y },
            (0x8, .., 0xE) => ShiftLeft { x, y },
            (0x9, .., 0x0) => SkipRegNotEqual { x, y },
            (0xA, ..) => LoadI { addr },
            (0xB, ..) => JumpOffset { addr },
            (0xC, ..) => Random { x, kk },
            (0xD, ..) => Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => SkipPressed { x },
            (0xE, _, 0xA, 0x1) => SkipNotPressed { x },
            (0xF, _, 0x0, 0x7) => LoadDelay { x },
            (0xF, _, 0x0, 0xA) => AwaitKey { x },
            (0xF, _, 0x1, 0x5) => SetDelay { x },
            (0xF, _, 0x1, 0x8) => SetSound { x },
            (0xF, _, 0x1, 0xE) => AddI { x },
            (0xF, _, 0x2, 0x9) => LoadSprite { x },
            (0xF, _, 0x3, 0x3) => Bcd { x },
            (0xF, _, 0x5, 0x5) => Store { x },
            (0xF, _, 0x6, 0x5) => Read { x },
            _ => return None,
        };
        Some(instruction)
    }

    /// Applies the instruction to a state whose pc has already moved past it
    pub fn execute(self, state: &mut State, rng: &mut dyn RngCore) {
        use Instruction::*;

        match self {
            Clear => clr(state),
            Return => rts(state),
            Jump { addr } => jump(state, addr),
            Call { addr } => call(state, addr),
            SkipEqual { x, kk } => ske(state, x, kk),
            SkipNotEqual { x, kk } => skne(state, x, kk),
            SkipRegEqual { x, y } => skre(state, x, y),
            Load { x, kk } => load(state, x, kk),
            Add { x, kk } => add(state, x, kk),
            Move { x, y } => mv(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            AddReg { x, y } => addr(state, x, y),
            Sub { x, y } => sub(state, x, y),
            ShiftRight { x, y } => shr(state, x, y),
            SubN { x, y } => subn(state, x, y),
            ShiftLeft { x, y } => shl(state, x, y),
            SkipRegNotEqual { x, y } => skrne(state, x, y),
            LoadI { addr } => loadi(state, addr),
            JumpOffset { addr } => jumpi(state, addr),
            Random { x, kk } => rand(state, x, kk, rng),
            Draw { x, y, n } => draw(state, x, y, n),
            SkipPressed { x } => skpr(state, x),
            SkipNotPressed { x } => skup(state, x),
            LoadDelay { x } => moved(state, x),
            AwaitKey { x } => keyd(state, x),
            SetDelay { x } => loads(state, x),
            SetSound { x } => ld(state, x),
            AddI { x } => addi(state, x),
            LoadSprite { x } => ldspr(state, x),
            Bcd { x } => bcd(state, x),
            Store { x } => stor(state, x),
            Read { x } => read(state, x),
        }
    }
}

/// Assembly style mnemonics, for traces and debuggers
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { addr } => write!(f, "JP ${:03X}", addr),
            Call { addr } => write!(f, "CALL ${:03X}", addr),
            SkipEqual { x, kk } => write!(f, "SE V{:X}, ${:02X}", x, kk),
            SkipNotEqual { x, kk } => write!(f, "SNE V{:X}, ${:02X}", x, kk),
            SkipRegEqual { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Load { x, kk } => write!(f, "LD V{:X}, ${:02X}", x, kk),
            Add { x, kk } => write!(f, "ADD V{:X}, ${:02X}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipRegNotEqual { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI { addr } => write!(f, "LD I, ${:03X}", addr),
            JumpOffset { addr } => write!(f, "JP V0, ${:03X}", addr),
            Random { x, kk } => write!(f, "RND V{:X}, ${:02X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipPressed { x } => write!(f, "SKP V{:X}", x),
            SkipNotPressed { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            AwaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LoadSprite { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Read { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
