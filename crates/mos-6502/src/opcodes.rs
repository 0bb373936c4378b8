//! Opcode dictionary for the 151 documented 6502 opcodes.
//!
//! Each entry pairs a mnemonic with an addressing mode and the base cycle
//! count. Whether the operand is read and whether a page crossing costs a
//! cycle both follow from the mnemonic and mode.

use crate::{Fetch, Mnemonic, Mode};

/// A decoded opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: Mode,
    pub fetch: Fetch,
    /// Base cycle count.
    pub cycles: u8,
    /// One extra cycle when indexing crosses a page.
    pub page_penalty: bool,
}

const fn op(mnemonic: Mnemonic, mode: Mode, cycles: u8) -> Option<Opcode> {
    // Stores and jumps never read their operand.
    let fetch = match mnemonic {
        Mnemonic::Sta | Mnemonic::Stx | Mnemonic::Sty | Mnemonic::Jmp | Mnemonic::Jsr => {
            Fetch::AddressOnly
        }
        _ => Fetch::Value,
    };
    let reads = matches!(
        mnemonic,
        Mnemonic::Adc
            | Mnemonic::And
            | Mnemonic::Cmp
            | Mnemonic::Eor
            | Mnemonic::Lda
            | Mnemonic::Ldx
            | Mnemonic::Ldy
            | Mnemonic::Ora
            | Mnemonic::Sbc
    );
    let indexed = matches!(
        mode,
        Mode::AbsoluteX | Mode::AbsoluteY | Mode::IndirectIndexed
    );
    Some(Opcode {
        mnemonic,
        mode,
        fetch,
        cycles,
        page_penalty: reads && indexed,
    })
}

/// Look up an opcode byte. Undocumented opcodes return `None`.
#[must_use]
pub const fn decode(byte: u8) -> Option<Opcode> {
    match byte {
        0x00 => op(Mnemonic::Brk, Mode::Implicit, 7),
        0x01 => op(Mnemonic::Ora, Mode::IndexedIndirect, 6),
        0x05 => op(Mnemonic::Ora, Mode::ZeroPage, 3),
        0x06 => op(Mnemonic::Asl, Mode::ZeroPage, 5),
        0x08 => op(Mnemonic::Php, Mode::Implicit, 3),
        0x09 => op(Mnemonic::Ora, Mode::Immediate, 2),
        0x0A => op(Mnemonic::Asl, Mode::Accumulator, 2),
        0x0D => op(Mnemonic::Ora, Mode::Absolute, 4),
        0x0E => op(Mnemonic::Asl, Mode::Absolute, 6),
        0x10 => op(Mnemonic::Bpl, Mode::Relative, 2),
        0x11 => op(Mnemonic::Ora, Mode::IndirectIndexed, 5),
        0x15 => op(Mnemonic::Ora, Mode::ZeroPageX, 4),
        0x16 => op(Mnemonic::Asl, Mode::ZeroPageX, 6),
        0x18 => op(Mnemonic::Clc, Mode::Implicit, 2),
        0x19 => op(Mnemonic::Ora, Mode::AbsoluteY, 4),
        0x1D => op(Mnemonic::Ora, Mode::AbsoluteX, 4),
        0x1E => op(Mnemonic::Asl, Mode::AbsoluteX, 7),
        0x20 => op(Mnemonic::Jsr, Mode::Absolute, 6),
        0x21 => op(Mnemonic::And, Mode::IndexedIndirect, 6),
        0x24 => op(Mnemonic::Bit, Mode::ZeroPage, 3),
        0x25 => op(Mnemonic::And, Mode::ZeroPage, 3),
        0x26 => op(Mnemonic::Rol, Mode::ZeroPage, 5),
        0x28 => op(Mnemonic::Plp, Mode::Implicit, 4),
        0x29 => op(Mnemonic::And, Mode::Immediate, 2),
        0x2A => op(Mnemonic::Rol, Mode::Accumulator, 2),
        0x2C => op(Mnemonic::Bit, Mode::Absolute, 4),
        0x2D => op(Mnemonic::And, Mode::Absolute, 4),
        0x2E => op(Mnemonic::Rol, Mode::Absolute, 6),
        0x30 => op(Mnemonic::Bmi, Mode::Relative, 2),
        0x31 => op(Mnemonic::And, Mode::IndirectIndexed, 5),
        0x35 => op(Mnemonic::And, Mode::ZeroPageX, 4),
        0x36 => op(Mnemonic::Rol, Mode::ZeroPageX, 6),
        0x38 => op(Mnemonic::Sec, Mode::Implicit, 2),
        0x39 => op(Mnemonic::And, Mode::AbsoluteY, 4),
        0x3D => op(Mnemonic::And, Mode::AbsoluteX, 4),
        0x3E => op(Mnemonic::Rol, Mode::AbsoluteX, 7),
        0x40 => op(Mnemonic::Rti, Mode::Implicit, 6),
        0x41 => op(Mnemonic::Eor, Mode::IndexedIndirect, 6),
        0x45 => op(Mnemonic::Eor, Mode::ZeroPage, 3),
        0x46 => op(Mnemonic::Lsr, Mode::ZeroPage, 5),
        0x48 => op(Mnemonic::Pha, Mode::Implicit, 3),
        0x49 => op(Mnemonic::Eor, Mode::Immediate, 2),
        0x4A => op(Mnemonic::Lsr, Mode::Accumulator, 2),
        0x4C => op(Mnemonic::Jmp, Mode::Absolute, 3),
        0x4D => op(Mnemonic::Eor, Mode::Absolute, 4),
        0x4E => op(Mnemonic::Lsr, Mode::Absolute, 6),
        0x50 => op(Mnemonic::Bvc, Mode::Relative, 2),
        0x51 => op(Mnemonic::Eor, Mode::IndirectIndexed, 5),
        0x55 => op(Mnemonic::Eor, Mode::ZeroPageX, 4),
        0x56 => op(Mnemonic::Lsr, Mode::ZeroPageX, 6),
        0x58 => op(Mnemonic::Cli, Mode::Implicit, 2),
        0x59 => op(Mnemonic::Eor, Mode::AbsoluteY, 4),
        0x5D => op(Mnemonic::Eor, Mode::AbsoluteX, 4),
        0x5E => op(Mnemonic::Lsr, Mode::AbsoluteX, 7),
        0x60 => op(Mnemonic::Rts, Mode::Implicit, 6),
        0x61 => op(Mnemonic::Adc, Mode::IndexedIndirect, 6),
        0x65 => op(Mnemonic::Adc, Mode::ZeroPage, 3),
        0x66 => op(Mnemonic::Ror, Mode::ZeroPage, 5),
        0x68 => op(Mnemonic::Pla, Mode::Implicit, 4),
        0x69 => op(Mnemonic::Adc, Mode::Immediate, 2),
        0x6A => op(Mnemonic::Ror, Mode::Accumulator, 2),
        0x6C => op(Mnemonic::Jmp, Mode::Indirect, 5),
        0x6D => op(Mnemonic::Adc, Mode::Absolute, 4),
        0x6E => op(Mnemonic::Ror, Mode::Absolute, 6),
        0x70 => op(Mnemonic::Bvs, Mode::Relative, 2),
        0x71 => op(Mnemonic::Adc, Mode::IndirectIndexed, 5),
        0x75 => op(Mnemonic::Adc, Mode::ZeroPageX, 4),
        0x76 => op(Mnemonic::Ror, Mode::ZeroPageX, 6),
        0x78 => op(Mnemonic::Sei, Mode::Implicit, 2),
        0x79 => op(Mnemonic::Adc, Mode::AbsoluteY, 4),
        0x7D => op(Mnemonic::Adc, Mode::AbsoluteX, 4),
        0x7E => op(Mnemonic::Ror, Mode::AbsoluteX, 7),
        0x81 => op(Mnemonic::Sta, Mode::IndexedIndirect, 6),
        0x84 => op(Mnemonic::Sty, Mode::ZeroPage, 3),
        0x85 => op(Mnemonic::Sta, Mode::ZeroPage, 3),
        0x86 => op(Mnemonic::Stx, Mode::ZeroPage, 3),
        0x88 => op(Mnemonic::Dey, Mode::Implicit, 2),
        0x8A => op(Mnemonic::Txa, Mode::Implicit, 2),
        0x8C => op(Mnemonic::Sty, Mode::Absolute, 4),
        0x8D => op(Mnemonic::Sta, Mode::Absolute, 4),
        0x8E => op(Mnemonic::Stx, Mode::Absolute, 4),
        0x90 => op(Mnemonic::Bcc, Mode::Relative, 2),
        0x91 => op(Mnemonic::Sta, Mode::IndirectIndexed, 6),
        0x94 => op(Mnemonic::Sty, Mode::ZeroPageX, 4),
        0x95 => op(Mnemonic::Sta, Mode::ZeroPageX, 4),
        0x96 => op(Mnemonic::Stx, Mode::ZeroPageY, 4),
        0x98 => op(Mnemonic::Tya, Mode::Implicit, 2),
        0x99 => op(Mnemonic::Sta, Mode::AbsoluteY, 5),
        0x9A => op(Mnemonic::Txs, Mode::Implicit, 2),
        0x9D => op(Mnemonic::Sta, Mode::AbsoluteX, 5),
        0xA0 => op(Mnemonic::Ldy, Mode::Immediate, 2),
        0xA1 => op(Mnemonic::Lda, Mode::IndexedIndirect, 6),
        0xA2 => op(Mnemonic::Ldx, Mode::Immediate, 2),
        0xA4 => op(Mnemonic::Ldy, Mode::ZeroPage, 3),
        0xA5 => op(Mnemonic::Lda, Mode::ZeroPage, 3),
        0xA6 => op(Mnemonic::Ldx, Mode::ZeroPage, 3),
        0xA8 => op(Mnemonic::Tay, Mode::Implicit, 2),
        0xA9 => op(Mnemonic::Lda, Mode::Immediate, 2),
        0xAA => op(Mnemonic::Tax, Mode::Implicit, 2),
        0xAC => op(Mnemonic::Ldy, Mode::Absolute, 4),
        0xAD => op(Mnemonic::Lda, Mode::Absolute, 4),
        0xAE => op(Mnemonic::Ldx, Mode::Absolute, 4),
        0xB0 => op(Mnemonic::Bcs, Mode::Relative, 2),
        0xB1 => op(Mnemonic::Lda, Mode::IndirectIndexed, 5),
        0xB4 => op(Mnemonic::Ldy, Mode::ZeroPageX, 4),
        0xB5 => op(Mnemonic::Lda, Mode::ZeroPageX, 4),
        0xB6 => op(Mnemonic::Ldx, Mode::ZeroPageY, 4),
        0xB8 => op(Mnemonic::Clv, Mode::Implicit, 2),
        0xB9 => op(Mnemonic::Lda, Mode::AbsoluteY, 4),
        0xBA => op(Mnemonic::Tsx, Mode::Implicit, 2),
        0xBC => op(Mnemonic::Ldy, Mode::AbsoluteX, 4),
        0xBD => op(Mnemonic::Lda, Mode::AbsoluteX, 4),
        0xBE => op(Mnemonic::Ldx, Mode::AbsoluteY, 4),
        0xC0 => op(Mnemonic::Cpy, Mode::Immediate, 2),
        0xC1 => op(Mnemonic::Cmp, Mode::IndexedIndirect, 6),
        0xC4 => op(Mnemonic::Cpy, Mode::ZeroPage, 3),
        0xC5 => op(Mnemonic::Cmp, Mode::ZeroPage, 3),
        0xC6 => op(Mnemonic::Dec, Mode::ZeroPage, 5),
        0xC8 => op(Mnemonic::Iny, Mode::Implicit, 2),
        0xC9 => op(Mnemonic::Cmp, Mode::Immediate, 2),
        0xCA => op(Mnemonic::Dex, Mode::Implicit, 2),
        0xCC => op(Mnemonic::Cpy, Mode::Absolute, 4),
        0xCD => op(Mnemonic::Cmp, Mode::Absolute, 4),
        0xCE => op(Mnemonic::Dec, Mode::Absolute, 6),
        0xD0 => op(Mnemonic::Bne, Mode::Relative, 2),
        0xD1 => op(Mnemonic::Cmp, Mode::IndirectIndexed, 5),
        0xD5 => op(Mnemonic::Cmp, Mode::ZeroPageX, 4),
        0xD6 => op(Mnemonic::Dec, Mode::ZeroPageX, 6),
        0xD8 => op(Mnemonic::Cld, Mode::Implicit, 2),
        0xD9 => op(Mnemonic::Cmp, Mode::AbsoluteY, 4),
        0xDD => op(Mnemonic::Cmp, Mode::AbsoluteX, 4),
        0xDE => op(Mnemonic::Dec, Mode::AbsoluteX, 7),
        0xE0 => op(Mnemonic::Cpx, Mode::Immediate, 2),
        0xE1 => op(Mnemonic::Sbc, Mode::IndexedIndirect, 6),
        0xE4 => op(Mnemonic::Cpx, Mode::ZeroPage, 3),
        0xE5 => op(Mnemonic::Sbc, Mode::ZeroPage, 3),
        0xE6 => op(Mnemonic::Inc, Mode::ZeroPage, 5),
        0xE8 => op(Mnemonic::Inx, Mode::Implicit, 2),
        0xE9 => op(Mnemonic::Sbc, Mode::Immediate, 2),
        0xEA => op(Mnemonic::Nop, Mode::Implicit, 2),
        0xEC => op(Mnemonic::Cpx, Mode::Absolute, 4),
        0xED => op(Mnemonic::Sbc, Mode::Absolute, 4),
        0xEE => op(Mnemonic::Inc, Mode::Absolute, 6),
        0xF0 => op(Mnemonic::Beq, Mode::Relative, 2),
        0xF1 => op(Mnemonic::Sbc, Mode::IndirectIndexed, 5),
        0xF5 => op(Mnemonic::Sbc, Mode::ZeroPageX, 4),
        0xF6 => op(Mnemonic::Inc, Mode::ZeroPageX, 6),
        0xF8 => op(Mnemonic::Sed, Mode::Implicit, 2),
        0xF9 => op(Mnemonic::Sbc, Mode::AbsoluteY, 4),
        0xFD => op(Mnemonic::Sbc, Mode::AbsoluteX, 4),
        0xFE => op(Mnemonic::Inc, Mode::AbsoluteX, 7),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_opcode_count() {
        let count = (0..=255u8).filter(|&b| decode(b).is_some()).count();
        assert_eq!(count, 151);
    }

    #[test]
    fn mnemonic_coverage() {
        let mut names: Vec<&str> = (0..=255u8)
            .filter_map(decode)
            .map(|o| o.mnemonic.name())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 56);
    }

    #[test]
    fn stores_skip_operand_read() {
        for byte in [0x85, 0x9D, 0x91, 0x86, 0x8C, 0x4C, 0x6C, 0x20] {
            let opcode = decode(byte).unwrap();
            assert_eq!(opcode.fetch, Fetch::AddressOnly, "{byte:02X}");
        }
        // Read-modify-write reads first
        assert_eq!(decode(0xFE).unwrap().fetch, Fetch::Value);
    }

    #[test]
    fn page_penalty_only_for_indexed_reads() {
        assert!(decode(0xBD).unwrap().page_penalty); // LDA abs,X
        assert!(decode(0x71).unwrap().page_penalty); // ADC (zp),Y
        assert!(decode(0xBE).unwrap().page_penalty); // LDX abs,Y
        assert!(!decode(0x9D).unwrap().page_penalty); // STA abs,X
        assert!(!decode(0x1E).unwrap().page_penalty); // ASL abs,X
        assert!(!decode(0xB5).unwrap().page_penalty); // LDA zp,X
    }

    #[test]
    fn illegal_opcodes_are_absent() {
        for byte in [0x02, 0xA7, 0xEB, 0xFF, 0x80] {
            assert!(decode(byte).is_none(), "{byte:02X}");
        }
    }
}
