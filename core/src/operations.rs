use rand::Rng;

use crate::constants::{FONT_BASE, GLYPH_SIZE, STACK_DEPTH};
use crate::error::Fault;
use crate::machine::Machine;
use crate::opcode::Opcode;
use crate::state::Mode;

/// Handler for a single decoded instruction. PC already points past the
/// instruction word when a handler runs; faults abort the step with the
/// machine otherwise untouched beyond what already happened.
pub(crate) type Operation = fn(&dyn Opcode, &mut Machine) -> Result<(), Fault>;

/// Address of the instruction currently executing.
fn current_pc(m: &Machine) -> u16 {
    m.state.pc.wrapping_sub(2)
}

/// 0NNN: machine-code routine on the original hardware; ignored here as
/// on every modern interpreter.
pub(crate) fn sys(_op: &dyn Opcode, _m: &mut Machine) -> Result<(), Fault> {
    Ok(())
}

/// Undefined pattern within a known family: ignored, PC still advances.
/// Historical ROMs rely on this, so it is not a fault.
pub(crate) fn nop(op: &dyn Opcode, _m: &mut Machine) -> Result<(), Fault> {
    let (a, b, c, d) = op.nibbles();
    log::debug!("ignoring undefined opcode {:X}{:X}{:X}{:X}", a, b, c, d);
    Ok(())
}

/// 00E0: clear the display.
pub(crate) fn cls(_op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.frame.clear(&mut m.events);
    Ok(())
}

/// 00EE: PC = pop().
pub(crate) fn ret(_op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    match m.state.stack.pop() {
        Some(addr) => {
            m.state.pc = addr;
            Ok(())
        }
        None => Err(Fault::StackUnderflow { pc: current_pc(m) }),
    }
}

/// 1NNN: PC = nnn.
pub(crate) fn jp(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.pc = op.nnn();
    Ok(())
}

/// 2NNN: push return address, PC = nnn.
pub(crate) fn call(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    if m.state.stack.len() == STACK_DEPTH {
        return Err(Fault::StackOverflow { pc: current_pc(m) });
    }
    m.state.stack.push(m.state.pc);
    m.state.pc = op.nnn();
    Ok(())
}

/// 3XNN: skip if Vx == nn.
pub(crate) fn se_byte(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    if m.state.v[op.x() as usize] == op.nn() {
        m.state.pc += 2;
    }
    Ok(())
}

/// 4XNN: skip if Vx != nn.
pub(crate) fn sne_byte(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    if m.state.v[op.x() as usize] != op.nn() {
        m.state.pc += 2;
    }
    Ok(())
}

/// 5XY0: skip if Vx == Vy.
pub(crate) fn se_reg(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    if m.state.v[op.x() as usize] == m.state.v[op.y() as usize] {
        m.state.pc += 2;
    }
    Ok(())
}

/// 9XY0: skip if Vx != Vy.
pub(crate) fn sne_reg(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    if m.state.v[op.x() as usize] != m.state.v[op.y() as usize] {
        m.state.pc += 2;
    }
    Ok(())
}

/// 6XNN: Vx = nn.
pub(crate) fn ld_byte(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.v[op.x() as usize] = op.nn();
    Ok(())
}

/// 7XNN: Vx += nn, mod 256. VF untouched.
pub(crate) fn add_byte(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let x = op.x() as usize;
    m.state.v[x] = m.state.v[x].wrapping_add(op.nn());
    Ok(())
}

/// 8XY0: Vx = Vy.
pub(crate) fn ld_reg(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.v[op.x() as usize] = m.state.v[op.y() as usize];
    Ok(())
}

/// 8XY1: Vx |= Vy.
pub(crate) fn or(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.v[op.x() as usize] |= m.state.v[op.y() as usize];
    Ok(())
}

/// 8XY2: Vx &= Vy.
pub(crate) fn and(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.v[op.x() as usize] &= m.state.v[op.y() as usize];
    Ok(())
}

/// 8XY3: Vx ^= Vy.
pub(crate) fn xor(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.v[op.x() as usize] ^= m.state.v[op.y() as usize];
    Ok(())
}

/// 8XY4: Vx += Vy; VF = carry. The flag is written last so it wins when
/// X is F.
pub(crate) fn add_reg(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let (res, carry) = m.state.v[op.x() as usize].overflowing_add(m.state.v[op.y() as usize]);
    m.state.v[op.x() as usize] = res;
    m.state.v[0xF] = carry as u8;
    Ok(())
}

/// 8XY5: Vx -= Vy; VF = 1 unless it borrowed.
pub(crate) fn sub(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let (res, borrow) = m.state.v[op.x() as usize].overflowing_sub(m.state.v[op.y() as usize]);
    m.state.v[op.x() as usize] = res;
    m.state.v[0xF] = !borrow as u8;
    Ok(())
}

/// 8XY6: Vx >>= 1; VF = shifted-out bit. With the shift quirk, Vy is
/// copied into Vx first.
pub(crate) fn shr(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let x = op.x() as usize;
    if m.quirks.shift_copies_vy {
        m.state.v[x] = m.state.v[op.y() as usize];
    }
    let out = m.state.v[x] & 1;
    m.state.v[x] >>= 1;
    m.state.v[0xF] = out;
    Ok(())
}

/// 8XY7: Vx = Vy - Vx; VF = 1 unless it borrowed.
pub(crate) fn subn(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let (res, borrow) = m.state.v[op.y() as usize].overflowing_sub(m.state.v[op.x() as usize]);
    m.state.v[op.x() as usize] = res;
    m.state.v[0xF] = !borrow as u8;
    Ok(())
}

/// 8XYE: Vx <<= 1; VF = shifted-out bit. With the shift quirk, Vy is
/// copied into Vx first.
pub(crate) fn shl(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let x = op.x() as usize;
    if m.quirks.shift_copies_vy {
        m.state.v[x] = m.state.v[op.y() as usize];
    }
    let out = m.state.v[x] >> 7;
    m.state.v[x] <<= 1;
    m.state.v[0xF] = out;
    Ok(())
}

/// ANNN: I = nnn.
pub(crate) fn ld_index(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.i = op.nnn();
    Ok(())
}

/// BNNN: PC = nnn + V0, or nnn + Vx with the jump quirk. A target past
/// the end of memory faults at the next fetch.
pub(crate) fn jp_offset(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let reg = if m.quirks.jump_uses_vx { op.x() } else { 0x0 };
    m.state.pc = op.nnn() + u16::from(m.state.v[reg as usize]);
    Ok(())
}

/// CXNN: Vx = random byte & nn.
pub(crate) fn rnd(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let byte: u8 = m.rng.gen();
    m.state.v[op.x() as usize] = byte & op.nn();
    Ok(())
}

/// DXYN: XOR-blit an 8-by-n sprite from memory at I to (Vx, Vy);
/// VF = collision.
pub(crate) fn drw(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let range = m.index_range(u16::from(op.n()))?;
    let x = m.state.v[op.x() as usize];
    let y = m.state.v[op.y() as usize];
    let collision = m.frame.blit(&m.state.memory[range], x, y, &mut m.events);
    m.state.v[0xF] = collision as u8;
    Ok(())
}

/// EX9E: skip if the key named by Vx is pressed.
pub(crate) fn skp(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    if m.keys[(m.state.v[op.x() as usize] & 0xF) as usize] {
        m.state.pc += 2;
    }
    Ok(())
}

/// EXA1: skip if the key named by Vx is not pressed.
pub(crate) fn sknp(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    if !m.keys[(m.state.v[op.x() as usize] & 0xF) as usize] {
        m.state.pc += 2;
    }
    Ok(())
}

/// FX07: Vx = delay timer.
pub(crate) fn ld_delay(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.v[op.x() as usize] = m.timers.delay;
    Ok(())
}

/// FX0A: park the engine until a key goes down; that key lands in Vx.
pub(crate) fn ld_key(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.mode = Mode::AwaitingKey { x: op.x() };
    Ok(())
}

/// FX15: delay timer = Vx.
pub(crate) fn set_delay(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.timers.delay = m.state.v[op.x() as usize];
    Ok(())
}

/// FX18: sound timer = Vx.
pub(crate) fn set_sound(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.timers.sound = m.state.v[op.x() as usize];
    Ok(())
}

/// FX1E: I += Vx. No overflow flag; an out-of-range I faults at the
/// access that needs it, not here.
pub(crate) fn add_index(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.i = m.state.i.wrapping_add(u16::from(m.state.v[op.x() as usize]));
    Ok(())
}

/// FX29: I = address of the glyph for digit Vx & 0xF.
pub(crate) fn ld_glyph(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    m.state.i = FONT_BASE + GLYPH_SIZE * u16::from(m.state.v[op.x() as usize] & 0xF);
    Ok(())
}

/// FX33: mem[I..I+3] = hundreds, tens, ones of Vx.
pub(crate) fn bcd(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let range = m.index_range(3)?;
    let value = m.state.v[op.x() as usize];
    m.state.memory[range].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
    Ok(())
}

/// FX55: mem[I..=I+x] = V0..=Vx. I is untouched unless the increment
/// quirk is on.
pub(crate) fn store_regs(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let x = op.x() as usize;
    let range = m.index_range(op.x() as u16 + 1)?;
    m.state.memory[range].copy_from_slice(&m.state.v[..=x]);
    if m.quirks.load_store_increments_i {
        m.state.i += op.x() as u16 + 1;
    }
    Ok(())
}

/// FX65: V0..=Vx = mem[I..=I+x]. I is untouched unless the increment
/// quirk is on.
pub(crate) fn load_regs(op: &dyn Opcode, m: &mut Machine) -> Result<(), Fault> {
    let x = op.x() as usize;
    let range = m.index_range(op.x() as u16 + 1)?;
    m.state.v[..=x].copy_from_slice(&m.state.memory[range]);
    if m.quirks.load_store_increments_i {
        m.state.i += op.x() as u16 + 1;
    }
    Ok(())
}
