use std::io::{self, Write};

use chip8_vm::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_vm::FrameBuffer;

const LIT: char = '#';
const UNLIT: char = '.';

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// The on/off state of these pixels is encoded as 1/0 respectively in one u64 per row,
/// most significant bit leftmost.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display<W: Write> {
    out: W,
}

impl<W: Write> Display<W> {
    /// Creates a new display that prints frames as text.
    ///
    /// # Arguments
    /// * `out` where finished frames are written
    pub fn new(out: W) -> Self {
        Display { out }
    }

    /// Formats a Chip-8 FrameBuffer as lines of text, one character per pixel.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    fn frame_to_text(frame: &FrameBuffer) -> String {
        let mut text = String::with_capacity((DISPLAY_WIDTH + 1) * DISPLAY_HEIGHT);
        for row in frame.iter() {
            text.extend((0..DISPLAY_WIDTH).map(|column| {
                if row & (1 << (DISPLAY_WIDTH - 1 - column)) != 0 {
                    LIT
                } else {
                    UNLIT
                }
            }));
            text.push('\n');
        }
        text
    }

    /// Formats the Chip-8 FrameBuffer as text and writes it out.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        writeln!(self.out, "{}", Self::frame_to_text(frame))?;
        self.out.flush()
    }
}
