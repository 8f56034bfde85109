use std::fmt;

use crate::constants::{NUM_REGISTERS, STACK_SIZE};
use crate::state::State;

/// A copy of the registers and counters, taken between instructions for debuggers and
/// status panels. Memory and the frame buffer are left out; borrow those from the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub register_needing_key: Option<usize>,
}

impl Snapshot {
    pub fn of(state: &State) -> Self {
        Snapshot {
            v: state.v,
            i: state.i,
            pc: state.pc,
            sp: state.sp,
            stack: state.stack,
            delay_timer: state.delay_timer,
            sound_timer: state.sound_timer,
            register_needing_key: state.register_needing_key,
        }
    }
}

/// One register per line, the way a status panel shows them
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, value) in self.v.iter().enumerate() {
            writeln!(f, "V{:X}: ${:02X}", index, value)?;
        }
        writeln!(f, " I: ${:03X}", self.i)?;
        writeln!(f, "DL: ${:02X}", self.delay_timer)?;
        writeln!(f, "SD: ${:02X}", self.sound_timer)?;
        writeln!(f, "PC: ${:03X}", self.pc)?;
        writeln!(f, "SP: ${:X}", self.sp)?;
        for (index, address) in self.stack.iter().enumerate() {
            writeln!(f, "ST[{:X}]: ${:03X}", index, address)?;
        }
        if let Some(register) = self.register_needing_key {
            writeln!(f, "waiting for a key in V{:X}", register)?;
        }
        Ok(())
    }
}
