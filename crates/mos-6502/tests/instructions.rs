//! Unit tests for 6502 instruction behavior.

use emu_core::{AddressSpace, Bus, Cpu, NoPorts};
use mos_6502::{CpuError, IRQ_VECTOR, Mos6502, flags};

type FlatBus = AddressSpace<NoPorts>;

/// Load a program at $0200 and set PC there.
fn setup_program(program: &[u8]) -> (Mos6502, FlatBus) {
    let mut bus = FlatBus::new();
    bus.load(0x0200, program).unwrap();
    let mut cpu = Mos6502::new();
    cpu.regs.pc = 0x0200;
    (cpu, bus)
}

/// Run `count` instructions, returning the cycles of the last one.
fn run(cpu: &mut Mos6502, bus: &mut FlatBus, count: usize) -> u32 {
    let mut cycles = 0;
    for _ in 0..count {
        cycles = cpu.step(bus).unwrap();
    }
    cycles
}

#[test]
fn test_adc_carry_out_to_zero() {
    // LDA #$FF; CLC; ADC #$01
    let (mut cpu, mut bus) = setup_program(&[0xA9, 0xFF, 0x18, 0x69, 0x01]);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_set(flags::C));
    assert!(cpu.regs.p.is_set(flags::Z));
    assert!(!cpu.regs.p.is_set(flags::N));
    assert!(!cpu.regs.p.is_set(flags::V));
}

#[test]
fn test_adc_zero_operand_keeps_negative() {
    // LDA #$FF; CLC; ADC #$00
    let (mut cpu, mut bus) = setup_program(&[0xA9, 0xFF, 0x18, 0x69, 0x00]);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.a, 0xFF);
    assert!(cpu.regs.p.is_set(flags::N));
    assert!(!cpu.regs.p.is_set(flags::Z));
    assert!(!cpu.regs.p.is_set(flags::C));
}

#[test]
fn test_adc_signed_overflow() {
    // LDA #64; CLC; ADC #64
    let (mut cpu, mut bus) = setup_program(&[0xA9, 0x40, 0x18, 0x69, 0x40]);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.a, 128);
    assert!(cpu.regs.p.is_set(flags::N));
    assert!(cpu.regs.p.is_set(flags::V));
}

#[test]
fn test_decimal_flag_does_not_affect_adc() {
    // SED; LDA #$09; CLC; ADC #$01
    let (mut cpu, mut bus) = setup_program(&[0xF8, 0xA9, 0x09, 0x18, 0x69, 0x01]);
    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.regs.a, 0x0A, "2A03 has no BCD adder");
    assert!(cpu.regs.p.is_set(flags::D));
}

#[test]
fn test_branch_cycles() {
    // LDX #$00 sets Z; BEQ +2 taken; then BNE +2 not taken
    let (mut cpu, mut bus) = setup_program(&[0xA2, 0x00, 0xF0, 0x02, 0xEA, 0xEA, 0xD0, 0x02]);
    run(&mut cpu, &mut bus, 1);

    assert_eq!(run(&mut cpu, &mut bus, 1), 3, "taken branch is base + 1");
    assert_eq!(cpu.regs.pc, 0x0206);

    assert_eq!(run(&mut cpu, &mut bus, 1), 2, "untaken branch is base");
    assert_eq!(cpu.regs.pc, 0x0208);
}

#[test]
fn test_page_cross_penalty_on_indexed_read() {
    // LDX #$01; LDA $02FF,X; STA $02FF,X
    let (mut cpu, mut bus) = setup_program(&[0xA2, 0x01, 0xBD, 0xFF, 0x02, 0x9D, 0xFF, 0x02]);
    run(&mut cpu, &mut bus, 1);

    assert_eq!(run(&mut cpu, &mut bus, 1), 5, "LDA abs,X crossing a page");
    assert_eq!(run(&mut cpu, &mut bus, 1), 5, "STA abs,X is always 5");
}

#[test]
fn test_stack_pha_pla() {
    // LDA #$42; PHA; LDA #$00; PLA
    let (mut cpu, mut bus) = setup_program(&[0xA9, 0x42, 0x48, 0xA9, 0x00, 0x68]);
    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.regs.a, 0x42, "PLA should restore A");
    assert_eq!(cpu.regs.s, 0xFF, "SP should be back to $FF after PLA");
}

#[test]
fn test_stack_php_plp() {
    // SEC; PHP; CLC; PLP
    let (mut cpu, mut bus) = setup_program(&[0x38, 0x08, 0x18, 0x28]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(
        bus.peek(0x01FF).unwrap(),
        flags::C | flags::U | flags::B,
        "PHP pushes with break set"
    );

    run(&mut cpu, &mut bus, 2);
    assert!(cpu.regs.p.is_set(flags::C), "PLP should restore carry flag");
    assert!(!cpu.regs.p.is_set(flags::B), "break is not a real flag");
    assert_eq!(cpu.regs.s, 0xFF, "SP should be back to $FF");
}

#[test]
fn test_pla_on_empty_stack_underflows() {
    let (mut cpu, mut bus) = setup_program(&[0x68]);
    assert_eq!(cpu.step(&mut bus), Err(CpuError::StackUnderflow { sp: 0xFF }));
}

#[test]
fn test_jsr_rts() {
    // $0200: JSR $0210; LDY #$01
    // $0210: LDX #$07; RTS
    let (mut cpu, mut bus) = setup_program(&[0x20, 0x10, 0x02, 0xA0, 0x01]);
    bus.load(0x0210, &[0xA2, 0x07, 0x60]).unwrap();

    assert_eq!(run(&mut cpu, &mut bus, 1), 6);
    assert_eq!(cpu.regs.pc, 0x0210);
    // Return address minus one
    assert_eq!(bus.peek(0x01FF).unwrap(), 0x02);
    assert_eq!(bus.peek(0x01FE).unwrap(), 0x02);

    run(&mut cpu, &mut bus, 3);
    assert_eq!((cpu.regs.x, cpu.regs.y), (0x07, 0x01));
    assert_eq!(cpu.regs.pc, 0x0205);
    assert_eq!(cpu.regs.s, 0xFF);
}

#[test]
fn test_brk_stack_layout() {
    let (mut cpu, mut bus) = setup_program(&[0x00, 0xEA]);
    bus.load(IRQ_VECTOR, &[0x00, 0x03]).unwrap();
    bus.load(0x0300, &[0x40]).unwrap(); // RTI
    cpu.regs.p.set(flags::C);

    assert_eq!(run(&mut cpu, &mut bus, 1), 7);
    assert_eq!(cpu.regs.pc, 0x0300);
    assert!(cpu.regs.p.is_set(flags::I));
    // PC+2 pushed: the byte after BRK is skipped
    assert_eq!(bus.peek(0x01FF).unwrap(), 0x02);
    assert_eq!(bus.peek(0x01FE).unwrap(), 0x02);
    assert_eq!(
        bus.peek(0x01FD).unwrap(),
        flags::C | flags::U | flags::B
    );

    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.regs.pc, 0x0202);
    assert!(!cpu.regs.p.is_set(flags::I), "RTI restores pushed status");
    assert!(cpu.regs.p.is_set(flags::C));
    assert_eq!(cpu.regs.s, 0xFF);
}

#[test]
fn test_rol_memory() {
    // SEC; ROL $10 with $10 = $80
    let (mut cpu, mut bus) = setup_program(&[0x38, 0x26, 0x10]);
    bus.write(0x0010, 0x80).unwrap();
    run(&mut cpu, &mut bus, 2);

    assert_eq!(bus.peek(0x0010).unwrap(), 0x01, "carry rotates into bit 0");
    assert!(cpu.regs.p.is_set(flags::C), "bit 7 rotates into carry");
    assert!(!cpu.regs.p.is_set(flags::N));
}

#[test]
fn test_ror_memory() {
    // SEC; ROR $0300 with $0300 = $01
    let (mut cpu, mut bus) = setup_program(&[0x38, 0x6E, 0x00, 0x03]);
    bus.write(0x0300, 0x01).unwrap();
    assert_eq!(run(&mut cpu, &mut bus, 2), 6);

    assert_eq!(bus.peek(0x0300).unwrap(), 0x80, "carry rotates into bit 7");
    assert!(cpu.regs.p.is_set(flags::C), "bit 0 rotates into carry");
    assert!(cpu.regs.p.is_set(flags::N));
}

#[test]
fn test_ror_memory_indexed_clear_carry() {
    // LDX #$02; CLC; ROR $10,X with $12 = $02
    let (mut cpu, mut bus) = setup_program(&[0xA2, 0x02, 0x18, 0x76, 0x10]);
    bus.write(0x0012, 0x02).unwrap();
    run(&mut cpu, &mut bus, 3);

    assert_eq!(bus.peek(0x0012).unwrap(), 0x01);
    assert!(!cpu.regs.p.is_set(flags::C));
}

#[test]
fn test_inc_dec_memory() {
    // INC $20; DEC $21
    let (mut cpu, mut bus) = setup_program(&[0xE6, 0x20, 0xC6, 0x21]);
    bus.write(0x0020, 0xFF).unwrap();
    bus.write(0x0021, 0x01).unwrap();

    run(&mut cpu, &mut bus, 1);
    assert_eq!(bus.peek(0x0020).unwrap(), 0x00);
    assert!(cpu.regs.p.is_set(flags::Z));

    run(&mut cpu, &mut bus, 1);
    assert_eq!(bus.peek(0x0021).unwrap(), 0x00);
    assert!(cpu.regs.p.is_set(flags::Z));
}

#[test]
fn test_jmp_indirect_page_bug() {
    // JMP ($02FF)
    let (mut cpu, mut bus) = setup_program(&[0x6C, 0xFF, 0x02]);
    bus.write(0x02FF, 0x00).unwrap();
    bus.write(0x0300, 0x80).unwrap();
    // The high byte comes from $0200, which holds the JMP opcode
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.regs.pc, 0x6C00);
}

#[test]
fn test_multiply_loop() {
    let program = [
        0xA9, 0x03, // LDA #3
        0x85, 0x00, // STA $00
        0xA9, 0x0A, // LDA #10
        0x85, 0x01, // STA $01
        0xA9, 0x00, // LDA #0
        0x85, 0x02, // STA $02
        0x85, 0x03, // STA $03
        // loop:
        0xA5, 0x03, // LDA $03
        0x18, // CLC
        0x65, 0x00, // ADC $00
        0x85, 0x03, // STA $03
        0xE6, 0x02, // INC $02
        0xA5, 0x02, // LDA $02
        0xC5, 0x01, // CMP $01
        0xD0, 0xF1, // BNE loop
        0xA5, 0x03, // LDA $03
    ];
    let (mut cpu, mut bus) = setup_program(&program);
    let end = 0x0200 + program.len() as u16;
    let mut guard = 0;
    while cpu.regs.pc != end {
        cpu.step(&mut bus).unwrap();
        guard += 1;
        assert!(guard < 1000, "loop did not terminate");
    }

    assert_eq!(bus.peek(0x0003).unwrap(), 30);
    assert_eq!(cpu.regs.a, 30);
}
