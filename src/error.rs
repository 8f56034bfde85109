use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong around the machine.
///
/// The machine itself never fails while stepping; these all come from getting a
/// program into it.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("program is {size} bytes but only {max} bytes of memory are available")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("ROM files should have a '.ch8' extension: {}", path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("unable to read program: {0}")]
    Io(#[from] std::io::Error),
}
