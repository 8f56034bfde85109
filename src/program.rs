use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::constants::MAX_PROGRAM_SIZE;
use crate::error::Chip8Error;

/// # Program
/// A Chip-8 program image that is known to fit between 0x200 and the end of memory.
///
/// ROMs are plain binary files with no header, so the only checks possible are the size and
/// the conventional `.ch8` extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Wraps raw bytes, rejecting anything too large to load
    pub fn new(bytes: Vec<u8>) -> Result<Self, Chip8Error> {
        if bytes.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: bytes.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        Ok(Program { bytes })
    }

    /// Read a program from a source
    ///
    /// # Arguments
    /// * `reader` anything that contains a ROM
    pub fn read(reader: &mut dyn Read) -> Result<Self, Chip8Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::new(bytes)
    }

    /// Read a program from a `.ch8` file
    pub fn open(path: &Path) -> Result<Self, Chip8Error> {
        if path.extension().map_or(true, |extension| extension != "ch8") {
            return Err(Chip8Error::UnsupportedExtension {
                path: path.to_path_buf(),
            });
        }
        let mut reader = BufReader::new(File::open(path)?);
        Self::read(&mut reader)
    }

    /// The program that runs when no ROM is given: a "CH-8" logo sliding down the screen
    #[rustfmt::skip]
    pub fn demo() -> Self {
        Program {
            bytes: vec![
                0x6E, 0x0C, 0x60, 0x88, 0x61, 0x88, 0x62, 0xF8, 0x63, 0x88, 0x64, 0x88, 0xA2, 0x70, 0xF4, 0x55,
                0x60, 0x00, 0x61, 0x00, 0x62, 0xF8, 0x63, 0x00, 0x64, 0x00, 0xF4, 0x55, 0x22, 0x2E, 0x6A, 0x0A,
                0xFA, 0x15, 0xFA, 0x07, 0x3A, 0x00, 0x12, 0x22, 0x22, 0x2E, 0x7E, 0x01, 0x12, 0x1C, 0x60, 0x0C,
                0xF0, 0x29, 0x60, 0x10, 0xD0, 0xE5, 0xA2, 0x70, 0x60, 0x18, 0xD0, 0xE5, 0xA2, 0x75, 0x60, 0x20,
                0xD0, 0xE5, 0x60, 0x08, 0xF0, 0x29, 0x60, 0x28, 0xD0, 0xE5, 0x00, 0xEE,
            ],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
