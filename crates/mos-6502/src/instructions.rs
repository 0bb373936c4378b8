//! 6502 instruction semantics.
//!
//! Each [`Mnemonic`] runs against an already-resolved [`Operand`]. Families
//! that differ only in a register or a flag (loads, stores, branches,
//! increments, shifts, flag set/clear) share one routine, and every flag
//! update goes through the rules in [`crate::flags`].

use emu_core::Bus;

use crate::flags::{
    AluResult, C, D, I, N, V, Z, carry, carry_shift_right, carry_subtract, negative, overflow,
    zero,
};
use crate::{CpuError, IRQ_VECTOR, Mos6502, Operand, Status};

/// The 56 documented 6502 instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

#[derive(Debug, Clone, Copy)]
enum Shift {
    Asl,
    Lsr,
    Rol,
    Ror,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Memory,
    X,
    Y,
}

#[derive(Debug, Clone, Copy)]
enum Register {
    A,
    X,
    Y,
}

impl Mnemonic {
    /// Assembler mnemonic.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::And => "AND",
            Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Brk => "BRK",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC",
            Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tya => "TYA",
        }
    }

    /// Run the instruction. Returns cycles spent beyond the opcode's base
    /// count (a taken branch costs one).
    pub fn execute<B: Bus>(
        self,
        cpu: &mut Mos6502,
        bus: &mut B,
        op: &Operand,
    ) -> Result<u32, CpuError> {
        let name = self.name();
        match self {
            // Load/store
            Mnemonic::Lda => cpu.load(Register::A, op.value),
            Mnemonic::Ldx => cpu.load(Register::X, op.value),
            Mnemonic::Ldy => cpu.load(Register::Y, op.value),
            Mnemonic::Sta => cpu.store(bus, op, Register::A, name)?,
            Mnemonic::Stx => cpu.store(bus, op, Register::X, name)?,
            Mnemonic::Sty => cpu.store(bus, op, Register::Y, name)?,

            // Transfers
            Mnemonic::Tax => cpu.load(Register::X, cpu.regs.a),
            Mnemonic::Tay => cpu.load(Register::Y, cpu.regs.a),
            Mnemonic::Txa => cpu.load(Register::A, cpu.regs.x),
            Mnemonic::Tya => cpu.load(Register::A, cpu.regs.y),
            Mnemonic::Tsx => cpu.load(Register::X, cpu.regs.s),
            // TXS does not affect flags
            Mnemonic::Txs => cpu.regs.s = cpu.regs.x,

            // Stack
            Mnemonic::Pha => cpu.push(bus, cpu.regs.a)?,
            Mnemonic::Php => cpu.push(bus, cpu.regs.p.to_byte_brk())?,
            Mnemonic::Pla => {
                let value = cpu.pull(bus)?;
                cpu.load(Register::A, value);
            }
            Mnemonic::Plp => cpu.regs.p = Status::from_stack(cpu.pull(bus)?),

            // Arithmetic
            Mnemonic::Adc => cpu.add_with_carry(op.value),
            Mnemonic::Sbc => cpu.add_with_carry(!op.value),
            Mnemonic::Cmp => cpu.compare(cpu.regs.a, op.value),
            Mnemonic::Cpx => cpu.compare(cpu.regs.x, op.value),
            Mnemonic::Cpy => cpu.compare(cpu.regs.y, op.value),

            // Logical
            Mnemonic::And => cpu.load(Register::A, cpu.regs.a & op.value),
            Mnemonic::Ora => cpu.load(Register::A, cpu.regs.a | op.value),
            Mnemonic::Eor => cpu.load(Register::A, cpu.regs.a ^ op.value),
            Mnemonic::Bit => cpu.bit(op.value),

            // Increments
            Mnemonic::Inc => cpu.step_by(bus, op, Target::Memory, 1, name)?,
            Mnemonic::Dec => cpu.step_by(bus, op, Target::Memory, 0xFF, name)?,
            Mnemonic::Inx => cpu.step_by(bus, op, Target::X, 1, name)?,
            Mnemonic::Dex => cpu.step_by(bus, op, Target::X, 0xFF, name)?,
            Mnemonic::Iny => cpu.step_by(bus, op, Target::Y, 1, name)?,
            Mnemonic::Dey => cpu.step_by(bus, op, Target::Y, 0xFF, name)?,

            // Shifts
            Mnemonic::Asl => cpu.shift(bus, op, Shift::Asl, name)?,
            Mnemonic::Lsr => cpu.shift(bus, op, Shift::Lsr, name)?,
            Mnemonic::Rol => cpu.shift(bus, op, Shift::Rol, name)?,
            Mnemonic::Ror => cpu.shift(bus, op, Shift::Ror, name)?,

            // Branches
            Mnemonic::Bcc => return cpu.branch(op, C, false, name),
            Mnemonic::Bcs => return cpu.branch(op, C, true, name),
            Mnemonic::Bne => return cpu.branch(op, Z, false, name),
            Mnemonic::Beq => return cpu.branch(op, Z, true, name),
            Mnemonic::Bpl => return cpu.branch(op, N, false, name),
            Mnemonic::Bmi => return cpu.branch(op, N, true, name),
            Mnemonic::Bvc => return cpu.branch(op, V, false, name),
            Mnemonic::Bvs => return cpu.branch(op, V, true, name),

            // Jumps and returns
            Mnemonic::Jmp => cpu.regs.pc = op.require_address(name)?,
            Mnemonic::Jsr => {
                let target = op.require_address(name)?;
                cpu.push_word(bus, cpu.regs.pc.wrapping_sub(1))?;
                cpu.regs.pc = target;
            }
            Mnemonic::Rts => cpu.regs.pc = cpu.pull_word(bus)?.wrapping_add(1),
            Mnemonic::Rti => {
                cpu.regs.p = Status::from_stack(cpu.pull(bus)?);
                cpu.regs.pc = cpu.pull_word(bus)?;
            }
            Mnemonic::Brk => {
                // The byte after BRK is padding
                cpu.push_word(bus, cpu.regs.pc.wrapping_add(1))?;
                cpu.push(bus, cpu.regs.p.to_byte_brk())?;
                cpu.regs.p.set(I);
                cpu.regs.pc = Mos6502::read_word(bus, IRQ_VECTOR)?;
            }

            // Flags
            Mnemonic::Clc => cpu.regs.p.clear(C),
            Mnemonic::Sec => cpu.regs.p.set(C),
            Mnemonic::Cli => cpu.regs.p.clear(I),
            Mnemonic::Sei => cpu.regs.p.set(I),
            Mnemonic::Cld => cpu.regs.p.clear(D),
            Mnemonic::Sed => cpu.regs.p.set(D),
            Mnemonic::Clv => cpu.regs.p.clear(V),

            Mnemonic::Nop => {}
        }
        Ok(0)
    }
}

impl Mos6502 {
    // =========================================================================
    // Register helpers
    // =========================================================================

    fn load(&mut self, register: Register, value: u8) {
        match register {
            Register::A => self.regs.a = value,
            Register::X => self.regs.x = value,
            Register::Y => self.regs.y = value,
        }
        self.regs.p.update_nz(value);
    }

    fn store<B: Bus>(
        &mut self,
        bus: &mut B,
        op: &Operand,
        register: Register,
        name: &'static str,
    ) -> Result<(), CpuError> {
        let addr = op.require_address(name)?;
        let value = match register {
            Register::A => self.regs.a,
            Register::X => self.regs.x,
            Register::Y => self.regs.y,
        };
        bus.write(u32::from(addr), value)?;
        Ok(())
    }

    /// Put a read-modify-write result back where the operand came from.
    fn write_back<B: Bus>(
        &mut self,
        bus: &mut B,
        op: &Operand,
        value: u8,
        name: &'static str,
    ) -> Result<(), CpuError> {
        if op.accumulator {
            self.regs.a = value;
        } else {
            bus.write(u32::from(op.require_address(name)?), value)?;
        }
        Ok(())
    }

    // =========================================================================
    // ALU operations
    // =========================================================================

    /// ADC, and SBC with the operand inverted (A - M - !C = A + !M + C).
    fn add_with_carry(&mut self, value: u8) {
        let a = self.regs.a;
        let carry_in = u16::from(self.regs.p.is_set(C));
        let r = AluResult::new(u16::from(a) + u16::from(value) + carry_in, a, value);

        self.regs.p.set_if(C, carry(r));
        self.regs.p.set_if(V, overflow(r));
        self.load(Register::A, r.byte());
    }

    fn compare(&mut self, register: u8, value: u8) {
        let r = AluResult::new(
            u16::from(register).wrapping_sub(u16::from(value)),
            register,
            value,
        );
        self.regs.p.set_if(C, carry_subtract(r));
        self.regs.p.set_if(Z, zero(r));
        self.regs.p.set_if(N, negative(r));
    }

    /// BIT: Z from A & M, N and V copied from bits 7 and 6 of M.
    fn bit(&mut self, value: u8) {
        self.regs.p.set_if(Z, zero(AluResult::of(self.regs.a & value)));
        self.regs.p.set_if(N, negative(AluResult::of(value)));
        self.regs.p.set_if(V, value & 0x40 != 0);
    }

    fn shift<B: Bus>(
        &mut self,
        bus: &mut B,
        op: &Operand,
        kind: Shift,
        name: &'static str,
    ) -> Result<(), CpuError> {
        let value = op.value;
        let carry_in = u16::from(self.regs.p.is_set(C));
        let wide = u16::from(value);
        let (r, carry_out) = match kind {
            Shift::Asl => {
                let r = AluResult::new(wide << 1, value, 0);
                (r, carry(r))
            }
            Shift::Rol => {
                let r = AluResult::new((wide << 1) | carry_in, value, 0);
                (r, carry(r))
            }
            Shift::Lsr => {
                let r = AluResult::new(wide >> 1, value, 0);
                (r, carry_shift_right(r))
            }
            Shift::Ror => {
                let r = AluResult::new((wide >> 1) | (carry_in << 7), value, 0);
                (r, carry_shift_right(r))
            }
        };

        self.regs.p.set_if(C, carry_out);
        self.regs.p.update_nz(r.byte());
        self.write_back(bus, op, r.byte(), name)
    }

    /// INC/DEC/INX/DEX/INY/DEY. `delta` is 1 or $FF (wrapping -1).
    fn step_by<B: Bus>(
        &mut self,
        bus: &mut B,
        op: &Operand,
        target: Target,
        delta: u8,
        name: &'static str,
    ) -> Result<(), CpuError> {
        let value = match target {
            Target::Memory => {
                let value = op.value.wrapping_add(delta);
                bus.write(u32::from(op.require_address(name)?), value)?;
                value
            }
            Target::X => {
                self.regs.x = self.regs.x.wrapping_add(delta);
                self.regs.x
            }
            Target::Y => {
                self.regs.y = self.regs.y.wrapping_add(delta);
                self.regs.y
            }
        };
        self.regs.p.update_nz(value);
        Ok(())
    }

    /// Taken branches cost one extra cycle.
    fn branch(
        &mut self,
        op: &Operand,
        flag: u8,
        expected: bool,
        name: &'static str,
    ) -> Result<u32, CpuError> {
        if self.regs.p.is_set(flag) == expected {
            self.regs.pc = op.require_address(name)?;
            Ok(1)
        } else {
            Ok(0)
        }
    }
}
