use std::fmt;

use crate::constants::MEMORY_SIZE;
use crate::state::State;

/// Rows shown below the first one, so a window covers `BREADTH + 1` addresses
pub const BREADTH: usize = 16;

/// # Memory Window
/// A scrolling view of memory for debuggers.
///
/// The window holds a cursor. Moving the cursor inside the window leaves the window where it
/// is; moving it past either edge drags the window along so the cursor sits on that edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWindow {
    begin: usize,
    cursor: usize,
}

impl MemoryWindow {
    pub fn new() -> Self {
        MemoryWindow {
            begin: 0,
            cursor: 0,
        }
    }

    /// Puts the cursor on `address`, clamped to the last byte of memory
    pub fn set_cursor(&mut self, address: usize) {
        self.cursor = address.min(MEMORY_SIZE - 1);
        if self.cursor < self.begin {
            self.begin = self.cursor;
        } else if self.cursor > self.end() {
            self.begin = self.cursor - BREADTH;
        }
    }

    /// Moves the cursor up (negative) or down (positive), stopping at either end of memory
    pub fn move_cursor(&mut self, rows: isize) {
        self.set_cursor(self.cursor.saturating_add_signed(rows));
    }

    /// Puts the cursor on the next instruction
    pub fn follow(&mut self, state: &State) {
        self.set_cursor(usize::from(state.pc));
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    /// The last address shown
    pub fn end(&self) -> usize {
        self.begin + BREADTH
    }

    /// The window over a particular machine, ready to print
    pub fn view<'a>(&'a self, state: &'a State) -> MemoryView<'a> {
        MemoryView {
            window: self,
            state,
        }
    }
}

impl Default for MemoryWindow {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MemoryView<'a> {
    window: &'a MemoryWindow,
    state: &'a State,
}

/// One `$address    $byte` line per row, the cursor row marked with `>`
impl fmt::Display for MemoryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for address in self.window.begin..=self.window.end() {
            let marker = if address == self.window.cursor { '>' } else { ' ' };
            writeln!(
                f,
                "{} ${:04X}    ${:02X}",
                marker, address, self.state.memory[address]
            )?;
        }
        Ok(())
    }
}
