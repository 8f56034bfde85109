pub use chip8::Chip8;
pub use config::{Config, CLOCK_HZ_VAR};
pub use error::Chip8Error;
pub use instruction::Instruction;
pub use keymap::keymap;
pub use memory_window::{MemoryView, MemoryWindow};
pub use program::Program;
pub use scheduler::{Scheduler, Tick};
pub use snapshot::Snapshot;
pub use state::{FrameBuffer, State};

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
mod keymap;
mod memory_window;
mod opcode;
mod operations;
mod program;
mod scheduler;
mod snapshot;
pub mod state;
