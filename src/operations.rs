use rand::RngCore;

use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG, FONT_SPRITE_HEIGHT, FONT_START, STACK_SIZE,
};
use crate::state::State;

// Every operation runs after the pc has already been moved past its own instruction.

/// clear
pub fn clr(state: &mut State) {
    state.frame_buffer = [0; DISPLAY_HEIGHT];
    state.draw_flag = true;
}

/// PC = STACK.pop()
pub fn rts(state: &mut State) {
    debug_assert!(state.sp > 0, "call stack underflow");
    if state.sp == 0 {
        log::warn!("ignoring return with an empty call stack at {:#05X}", state.pc);
        return;
    }
    state.sp -= 1;
    state.pc = state.stack[usize::from(state.sp)];
}

/// PC = addr
pub fn jump(state: &mut State, addr: u16) {
    state.pc = addr;
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) {
    let sp = usize::from(state.sp);
    debug_assert!(sp < STACK_SIZE, "call stack overflow");
    if sp >= STACK_SIZE {
        log::warn!("ignoring call to {:#05X} with a full call stack", addr);
        return;
    }
    state.stack[sp] = state.pc;
    state.sp += 1;
    state.pc = addr;
}

/// pc += 2 when `condition` holds
fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.advance();
    }
}

/// if Vx == kk then pc += 2
pub fn ske(state: &mut State, x: usize, kk: u8) {
    let condition = state.v[x] == kk;
    skip_if(state, condition);
}

/// if Vx != kk then pc += 2
pub fn skne(state: &mut State, x: usize, kk: u8) {
    let condition = state.v[x] != kk;
    skip_if(state, condition);
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &mut State, x: usize, y: usize) {
    let condition = state.v[x] == state.v[y];
    skip_if(state, condition);
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &mut State, x: usize, y: usize) {
    let condition = state.v[x] != state.v[y];
    skip_if(state, condition);
}

/// Vx = kk
pub fn load(state: &mut State, x: usize, kk: u8) {
    state.v[x] = kk;
}

/// Vx += kk
/// Overflow wraps and leaves VF alone
pub fn add(state: &mut State, x: usize, kk: u8) {
    state.v[x] = state.v[x].wrapping_add(kk);
}

/// Vx = Vy
pub fn mv(state: &mut State, x: usize, y: usize) {
    state.v[x] = state.v[y];
}

/// Vx |= Vy
pub fn or(state: &mut State, x: usize, y: usize) {
    state.v[x] |= state.v[y];
}

/// Vx &= Vy
pub fn and(state: &mut State, x: usize, y: usize) {
    state.v[x] &= state.v[y];
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: usize, y: usize) {
    state.v[x] ^= state.v[y];
}

// The flag ops below read both operands up front and write VF last, so when Vx is VF
// the flag wins.

/// Vx += Vy; VF = overflow
pub fn addr(state: &mut State, x: usize, y: usize) {
    let (res, over) = state.v[x].overflowing_add(state.v[y]);
    state.v[x] = res;
    state.v[FLAG] = u8::from(over);
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &mut State, x: usize, y: usize) {
    let (res, under) = state.v[x].overflowing_sub(state.v[y]);
    state.v[x] = res;
    state.v[FLAG] = u8::from(!under);
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &mut State, x: usize, y: usize) {
    let (res, under) = state.v[y].overflowing_sub(state.v[x]);
    state.v[x] = res;
    state.v[FLAG] = u8::from(!under);
}

/// Vx = Vy >> 1; VF = lsb of Vy
pub fn shr(state: &mut State, x: usize, y: usize) {
    let src = state.v[y];
    state.v[x] = src >> 1;
    state.v[FLAG] = src & 0x1;
}

/// Vx = Vy << 1; VF = msb of Vy
pub fn shl(state: &mut State, x: usize, y: usize) {
    let src = state.v[y];
    state.v[x] = src << 1;
    state.v[FLAG] = src >> 7;
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) {
    state.i = addr;
}

/// PC = V0 + addr
pub fn jumpi(state: &mut State, addr: u16) {
    state.pc = (addr + u16::from(state.v[0x0])) & ADDRESS_MASK;
}

/// Vx = rand_byte & kk
pub fn rand(state: &mut State, x: usize, kk: u8, rng: &mut dyn RngCore) {
    let mut rand_byte = [0u8; 1];
    rng.fill_bytes(&mut rand_byte);
    state.v[x] = rand_byte[0] & kk;
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the n byte sprite at I onto the FrameBuffer at (Vx, Vy).
/// Rows wrap around the bottom of the screen; columns past the right edge are clipped.
/// Sets VF if any pixels were erased.
pub fn draw(state: &mut State, x: usize, y: usize, n: u8) {
    let column = u32::from(state.v[x]);
    let top = usize::from(state.v[y]);
    let mut collided = false;

    for byte in 0..n {
        let sprite = u64::from(state.read(state.i.wrapping_add(u16::from(byte))));
        // Line the sprite up against the left edge, then slide it right to its column
        let mask = (sprite << (DISPLAY_WIDTH - 8))
            .checked_shr(column)
            .unwrap_or(0);
        let row = &mut state.frame_buffer[(top + usize::from(byte)) % DISPLAY_HEIGHT];
        collided |= *row & mask != 0;
        *row ^= mask;
    }

    state.v[FLAG] = u8::from(collided);
    state.draw_flag = true;
}

/// Keys are a hex digit; only the low nibble of Vx picks one
fn key_in(state: &State, x: usize) -> bool {
    state.pressed_keys[usize::from(state.v[x] & 0xF)]
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &mut State, x: usize) {
    let condition = key_in(state, x);
    skip_if(state, condition);
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &mut State, x: usize) {
    let condition = !key_in(state, x);
    skip_if(state, condition);
}

/// Vx = DT
pub fn moved(state: &mut State, x: usize) {
    state.v[x] = state.delay_timer;
}

/// await keypress for Vx
pub fn keyd(state: &mut State, x: usize) {
    log::debug!("V{:X} is waiting for a key", x);
    state.register_needing_key = Some(x);
}

/// DT = Vx
pub fn loads(state: &mut State, x: usize) {
    state.delay_timer = state.v[x];
}

/// ST = Vx
pub fn ld(state: &mut State, x: usize) {
    state.sound_timer = state.v[x];
}

/// I += Vx
pub fn addi(state: &mut State, x: usize) {
    state.i = state.i.wrapping_add(u16::from(state.v[x]));
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &mut State, x: usize) {
    state.i = FONT_START + u16::from(state.v[x]) * FONT_SPRITE_HEIGHT;
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &mut State, x: usize) {
    let value = state.v[x];
    let digits = [value / 100, value / 10 % 10, value % 10];
    for (offset, digit) in (0u16..).zip(digits) {
        state.write(state.i.wrapping_add(offset), digit);
    }
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
pub fn stor(state: &mut State, x: usize) {
    for (offset, register) in (0u16..).zip(0..=x) {
        state.write(state.i.wrapping_add(offset), state.v[register]);
    }
    state.i = state.i.wrapping_add(x as u16 + 1);
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
pub fn read(state: &mut State, x: usize) {
    for (offset, register) in (0u16..).zip(0..=x) {
        state.v[register] = state.read(state.i.wrapping_add(offset));
    }
    state.i = state.i.wrapping_add(x as u16 + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PROGRAM_START;

    /// A state whose pc has already moved past an instruction at 0x200
    fn stepped() -> State {
        let mut state = State::new();
        state.advance();
        state
    }

    #[test]
    fn test_load_every_register_and_byte() {
        let mut state = State::new();
        for x in 0..16 {
            for kk in 0..=u8::MAX {
                load(&mut state, x, kk);
                assert_eq!(state.v[x], kk);
            }
        }
    }

    #[test]
    fn test_add_wraps_without_flag() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[FLAG] = 0x7;
        add(&mut state, 0x1, 0x2);
        assert_eq!(state.v[0x1], 0x1);
        assert_eq!(state.v[FLAG], 0x7);
    }

    #[test]
    fn test_addr_every_pair() {
        let mut state = State::new();
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                state.v[0x1] = a;
                state.v[0x2] = b;
                addr(&mut state, 0x1, 0x2);
                let sum = u16::from(a) + u16::from(b);
                assert_eq!(state.v[0x1], sum as u8);
                assert_eq!(state.v[FLAG], u8::from(sum > 255));
            }
        }
    }

    #[test]
    fn test_sub_every_pair() {
        let mut state = State::new();
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                state.v[0x1] = a;
                state.v[0x2] = b;
                sub(&mut state, 0x1, 0x2);
                assert_eq!(state.v[0x1], a.wrapping_sub(b));
                assert_eq!(state.v[FLAG], u8::from(a >= b));
            }
        }
    }

    #[test]
    fn test_subn_every_pair() {
        let mut state = State::new();
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                state.v[0x1] = a;
                state.v[0x2] = b;
                subn(&mut state, 0x1, 0x2);
                assert_eq!(state.v[0x1], b.wrapping_sub(a));
                assert_eq!(state.v[FLAG], u8::from(b >= a));
            }
        }
    }

    #[test]
    fn test_shifts_every_byte() {
        let mut state = State::new();
        for value in 0..=u8::MAX {
            state.v[0x2] = value;
            shl(&mut state, 0x1, 0x2);
            assert_eq!(state.v[0x1], value << 1);
            assert_eq!(state.v[FLAG], (value >> 7) & 1);

            shr(&mut state, 0x1, 0x2);
            assert_eq!(state.v[0x1], value >> 1);
            assert_eq!(state.v[FLAG], value & 1);
        }
    }

    #[test]
    fn test_flag_wins_when_vf_is_the_destination() {
        let mut state = State::new();
        state.v[FLAG] = 0xFF;
        state.v[0x1] = 0x02;
        addr(&mut state, FLAG, 0x1);
        assert_eq!(state.v[FLAG], 0x1);
    }

    #[test]
    fn test_call_and_return_sixteen_deep() {
        let mut state = stepped();
        let mut return_addresses = Vec::new();
        for depth in 0..STACK_SIZE as u16 {
            return_addresses.push(state.pc);
            call(&mut state, 0x300 + depth * 0x10);
            state.advance();
        }
        assert_eq!(usize::from(state.sp), STACK_SIZE);
        while let Some(expected) = return_addresses.pop() {
            rts(&mut state);
            assert_eq!(state.pc, expected);
        }
        assert_eq!(state.sp, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "call stack overflow")]
    fn test_seventeenth_call_asserts() {
        let mut state = stepped();
        for _ in 0..=STACK_SIZE {
            call(&mut state, 0x300);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "call stack underflow")]
    fn test_return_on_empty_stack_asserts() {
        let mut state = stepped();
        rts(&mut state);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_seventeenth_call_is_ignored() {
        let mut state = stepped();
        for depth in 0..STACK_SIZE as u16 {
            call(&mut state, 0x300 + depth * 0x10);
        }
        let (pc, stack) = (state.pc, state.stack);

        call(&mut state, 0x800);
        assert_eq!(usize::from(state.sp), STACK_SIZE);
        assert_eq!(state.pc, pc);
        assert_eq!(state.stack, stack);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_return_on_empty_stack_is_ignored() {
        let mut state = stepped();
        rts(&mut state);
        assert_eq!(state.sp, 0);
        assert_eq!(state.pc, PROGRAM_START + 2);
    }

    #[test]
    fn test_skip_moves_past_next_instruction() {
        let mut state = stepped();
        state.v[0x4] = 0x44;
        ske(&mut state, 0x4, 0x44);
        assert_eq!(state.pc, PROGRAM_START + 4);
        skne(&mut state, 0x4, 0x44);
        assert_eq!(state.pc, PROGRAM_START + 4);
    }

    #[test]
    fn test_jumpi_adds_v0() {
        let mut state = State::new();
        state.v[0x0] = 0x10;
        jumpi(&mut state, 0x300);
        assert_eq!(state.pc, 0x310);
    }

    #[test]
    fn test_jumpi_stays_in_address_space() {
        let mut state = State::new();
        state.v[0x0] = 0xFF;
        jumpi(&mut state, 0xFFF);
        assert_eq!(state.pc, 0x0FE);
    }

    #[test]
    fn test_rand_respects_mask() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(8);
        let mut state = State::new();
        for _ in 0..64 {
            rand(&mut state, 0x3, 0x0F, &mut rng);
            assert_eq!(state.v[0x3] & 0xF0, 0);
        }
        rand(&mut state, 0x3, 0x00, &mut rng);
        assert_eq!(state.v[0x3], 0);
    }

    #[test]
    fn test_draw_clips_at_right_edge() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300] = 0xFF;
        state.v[0x0] = 60;
        state.v[0x1] = 0;
        draw(&mut state, 0x0, 0x1, 1);
        assert_eq!(state.frame_buffer[0], 0x0000_0000_0000_000F);
        assert_eq!(state.v[FLAG], 0);
    }

    #[test]
    fn test_draw_past_last_column_draws_nothing() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300] = 0xFF;
        state.v[0x0] = 64;
        draw(&mut state, 0x0, 0x1, 1);
        assert_eq!(state.frame_buffer, [0; DISPLAY_HEIGHT]);
    }

    #[test]
    fn test_draw_wraps_rows() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x302].copy_from_slice(&[0x80, 0x80]);
        state.v[0x0] = 0;
        state.v[0x1] = 31;
        draw(&mut state, 0x0, 0x1, 2);
        assert_eq!(state.frame_buffer[31], 1 << 63);
        assert_eq!(state.frame_buffer[0], 1 << 63);
    }

    #[test]
    fn test_draw_twice_erases_and_collides() {
        let mut state = State::new();
        // the "0" glyph at (1, 1)
        state.v[0x0] = 0x1;
        draw(&mut state, 0x0, 0x0, 5);
        assert_eq!(state.v[FLAG], 0);
        assert_eq!(state.frame_buffer[1], 0xF0u64 << 55);
        assert_eq!(state.frame_buffer[2], 0x90u64 << 55);

        draw(&mut state, 0x0, 0x0, 5);
        assert_eq!(state.v[FLAG], 1);
        assert_eq!(state.frame_buffer, [0; DISPLAY_HEIGHT]);
    }

    #[test]
    fn test_draw_collision_sticks_across_rows() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x302].copy_from_slice(&[0x80, 0x00]);
        state.frame_buffer[0] = 1 << 63;
        draw(&mut state, 0x1, 0x1, 2);
        assert_eq!(state.v[FLAG], 1);
    }

    #[test]
    fn test_key_skips_use_low_nibble() {
        let mut state = stepped();
        state.pressed_keys[0x3] = true;
        state.v[0x5] = 0x13;
        skpr(&mut state, 0x5);
        assert_eq!(state.pc, PROGRAM_START + 4);
        skup(&mut state, 0x5);
        assert_eq!(state.pc, PROGRAM_START + 4);
    }

    #[test]
    fn test_ldspr_points_at_glyph() {
        let mut state = State::new();
        state.v[0x2] = 0xA;
        ldspr(&mut state, 0x2);
        assert_eq!(state.i, 50);
        assert_eq!(state.memory[50..55], [0xF0, 0x90, 0xF0, 0x90, 0x90]);
    }

    #[test]
    fn test_bcd_of_255() {
        let mut state = State::new();
        state.v[0x1] = 255;
        state.i = 0x300;
        bcd(&mut state, 0x1);
        assert_eq!(state.memory[0x300..0x303], [2, 5, 5]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_stor_then_read_round_trip() {
        let mut state = State::new();
        let values = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        state.v[..6].copy_from_slice(&values);
        state.v[0x6] = 0x77;
        state.i = 0x400;

        stor(&mut state, 5);
        assert_eq!(state.i, 0x406);
        assert_eq!(state.memory[0x400..0x406], values);
        assert_eq!(state.memory[0x406], 0);

        state.v = [0; 16];
        state.i = 0x400;
        read(&mut state, 5);
        assert_eq!(state.i, 0x406);
        assert_eq!(state.v[..6], values);
        assert_eq!(state.v[0x6], 0);
    }

    #[test]
    fn test_addi_wraps_sixteen_bits() {
        let mut state = State::new();
        state.i = 0xFFFF;
        state.v[0x1] = 0x2;
        addi(&mut state, 0x1);
        assert_eq!(state.i, 0x1);
    }
}
