/// Emulator controls that sit outside the hex keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Stop,
    TogglePause,
    Restart,
    LoadDemo,
    SlowDown,
    SpeedUp,
    ResetClock,
    CursorUp,
    CursorDown,
}

/// How much one SlowDown or SpeedUp changes the clock, in Hz
pub const CLOCK_STEP_HZ: f64 = 10.0;

/// # Controls
/// None of these collide with the keypad keys.
/// ```text
/// ESC  stop            [  clock -10 Hz
/// P    pause/resume    ]  clock +10 Hz
/// 0    restart         =  default clock
/// BS   reload the demo K/J  memory cursor up/down (while paused)
/// ```
/// `<` stands in for backspace, since it is easier to type in an argument.
pub fn control(key: char) -> Option<Control> {
    match key.to_ascii_uppercase() {
        '\u{1b}' => Some(Control::Stop),
        'P' => Some(Control::TogglePause),
        '0' => Some(Control::Restart),
        '\u{8}' | '<' => Some(Control::LoadDemo),
        '[' => Some(Control::SlowDown),
        ']' => Some(Control::SpeedUp),
        '=' => Some(Control::ResetClock),
        'K' => Some(Control::CursorUp),
        'J' => Some(Control::CursorDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip8_vm::keymap;

    #[test]
    fn test_controls_dont_shadow_keypad() {
        for key in "\u{1b}p0\u{8}<[]=kj".chars() {
            assert!(control(key).is_some(), "{:?}", key);
            assert_eq!(keymap(key), None, "{:?}", key);
        }
    }

    #[test]
    fn test_layout() {
        assert_eq!(control('p'), Some(Control::TogglePause));
        assert_eq!(control('P'), Some(Control::TogglePause));
        assert_eq!(control('0'), Some(Control::Restart));
        assert_eq!(control('<'), Some(Control::LoadDemo));
        assert_eq!(control('x'), None);
    }
}
