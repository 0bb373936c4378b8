//! Whole-machine tests: build small NROM images in memory, load them and
//! drive them to their idle loop.

use std::time::Duration;

use emu_core::{Observable, Value};
use emu_nes::{Nes, NesConfig, NesError, NesRegion, button};

/// NROM image with 32K PRG and one CHR bank. `code` lands at $8000 and the
/// reset vector points there.
fn build_rom(code: &[u8], flags6: u8) -> Vec<u8> {
    let prg_size = 32768usize;
    let chr_size = 8192usize;
    let mut rom = vec![0u8; 16 + prg_size + chr_size];

    rom[0..4].copy_from_slice(b"NES\x1a");
    rom[4] = 2;
    rom[5] = 1;
    rom[6] = flags6;

    rom[16..16 + code.len()].copy_from_slice(code);

    // Reset vector -> $8000, NMI vector -> RTI at $9000
    let vectors = 16 + prg_size - 6;
    rom[vectors..vectors + 6].copy_from_slice(&[0x00, 0x90, 0x00, 0x80, 0x00, 0x90]);
    rom[16 + 0x1000] = 0x40;
    rom
}

fn boot(code: &[u8]) -> Nes {
    Nes::new(&NesConfig::new(build_rom(code, 0))).expect("valid ROM")
}

#[test]
fn boots_to_idle_loop() {
    let code: &[u8] = &[
        0x78, // SEI
        0xD8, // CLD
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0xAD, 0x02, 0x20, // vblank1: LDA $2002
        0x10, 0xFB, //          BPL vblank1
        0xAD, 0x02, 0x20, // vblank2: LDA $2002
        0x10, 0xFB, //          BPL vblank2
        0x4C, 0x0F, 0x80, // JMP $800F
    ];
    let mut nes = boot(code);
    nes.reset().expect("reset");
    let instructions = nes.run_until_idle().expect("reaches idle loop");

    assert_eq!(nes.cpu().regs.pc, 0x800F);
    assert_eq!(instructions, 8);
    assert_eq!(nes.cpu().regs.s, 0xFF);
    assert!(nes.is_idle());
    assert_eq!(
        nes.last_step().map(ToString::to_string).as_deref(),
        Some("$800D  10  BPL relative")
    );
}

#[test]
fn multiply_program_runs_to_completion() {
    let code: &[u8] = &[
        0xA9, 0x03, // LDA #3
        0x85, 0x00, // STA $00
        0xA9, 0x0A, // LDA #10
        0x85, 0x01, // STA $01
        0xA9, 0x00, // LDA #0
        0x85, 0x02, // STA $02
        0x85, 0x03, // STA $03
        0xA5, 0x03, // loop: LDA $03
        0x18, // CLC
        0x65, 0x00, // ADC $00
        0x85, 0x03, // STA $03
        0xE6, 0x02, // INC $02
        0xA5, 0x02, // LDA $02
        0xC5, 0x01, // CMP $01
        0xD0, 0xF1, // BNE loop
        0xA5, 0x03, // LDA $03
        0x4C, 0x1F, 0x80, // JMP $801F
    ];
    let mut nes = boot(code);
    nes.run_until_idle().expect("reaches idle loop");

    assert_eq!(nes.cpu().regs.pc, 0x801F);
    assert_eq!(nes.query("memory.$03"), Some(Value::U8(30)));
    assert_eq!(nes.query("cpu.a"), Some(Value::U8(30)));
    // Zero page is visible through every RAM mirror
    assert_eq!(nes.query("memory.$1803"), Some(Value::U8(30)));
}

/// LDA #$20 / STA $2006 / LDA #$00 / STA $2006 / LDA #$AB / STA $2007
const WRITE_NAMETABLE: [u8; 15] = [
    0xA9, 0x20, 0x8D, 0x06, 0x20, 0xA9, 0x00, 0x8D, 0x06, 0x20, 0xA9, 0xAB, 0x8D, 0x07, 0x20,
];

fn nametable_program() -> Vec<u8> {
    let mut code = WRITE_NAMETABLE.to_vec();
    code.extend_from_slice(&[0x4C, 0x0F, 0x80]);
    code
}

#[test]
fn horizontal_mirroring_from_header() {
    let mut nes = Nes::new(&NesConfig::new(build_rom(&nametable_program(), 0))).unwrap();
    nes.run_until_idle().unwrap();

    assert_eq!(nes.bus().peek_vram(0x2000), 0xAB);
    assert_eq!(nes.bus().peek_vram(0x2400), 0xAB);
    assert_eq!(nes.bus().peek_vram(0x2800), 0x00);
    assert_eq!(nes.bus().peek_vram(0x3000), 0xAB);
}

#[test]
fn vertical_mirroring_from_header() {
    let mut nes = Nes::new(&NesConfig::new(build_rom(&nametable_program(), 0x01))).unwrap();
    nes.run_until_idle().unwrap();

    assert_eq!(nes.bus().peek_vram(0x2800), 0xAB);
    assert_eq!(nes.bus().peek_vram(0x2400), 0x00);
    assert_eq!(nes.bus().latch.address, 0x2001);
}

#[test]
fn controller_read_through_program() {
    let code: &[u8] = &[
        0xA9, 0x01, // LDA #1
        0x8D, 0x16, 0x40, // STA $4016
        0xA9, 0x00, // LDA #0
        0x8D, 0x16, 0x40, // STA $4016
        0xAD, 0x16, 0x40, // LDA $4016 (A)
        0xAE, 0x16, 0x40, // LDX $4016 (B)
        0x4C, 0x10, 0x80, // JMP $8010
    ];
    let mut nes = boot(code);
    nes.controller_mut(0).unwrap().set_button(button::A, true);
    nes.run_until_idle().unwrap();

    assert_eq!(nes.cpu().regs.a & 1, 1);
    assert_eq!(nes.cpu().regs.x & 1, 0);
}

#[test]
fn rejected_rom_leaves_machine_running() {
    let mut nes = boot(&[0xA9, 0x42, 0x4C, 0x02, 0x80]);
    nes.run_until_idle().unwrap();

    assert!(matches!(
        nes.load_rom(b"not a rom"),
        Err(NesError::Cartridge(_))
    ));
    assert_eq!(nes.cpu().regs.a, 0x42);
    assert_eq!(nes.cpu().regs.pc, 0x8002);
    assert!(nes.is_idle());
}

#[test]
fn load_rom_replaces_program() {
    let mut nes = boot(&[0xA9, 0x42, 0x4C, 0x02, 0x80]);
    nes.run_until_idle().unwrap();

    nes.load_rom(&build_rom(&[0xA2, 0x07, 0x4C, 0x02, 0x80], 0))
        .unwrap();
    assert_eq!(nes.cpu().regs.pc, 0x8000);
    assert!(nes.trace().is_empty());
    nes.run_until_idle().unwrap();
    assert_eq!(nes.cpu().regs.x, 0x07);
}

#[test]
fn busy_program_times_out() {
    let config = NesConfig {
        load_timeout: Duration::ZERO,
        ..NesConfig::new(build_rom(&[0xEA, 0x4C, 0x00, 0x80], 0))
    };
    let mut nes = Nes::new(&config).unwrap();

    match nes.run_until_idle() {
        Err(NesError::LoadTimeout { instructions, .. }) => assert_eq!(instructions, 0),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn pal_region_delays_vblank() {
    let config = NesConfig {
        region: NesRegion::Pal,
        ..NesConfig::new(build_rom(&[0x4C, 0x00, 0x80], 0))
    };
    let mut nes = Nes::new(&config).unwrap();
    let mut cycles = 0u64;
    while !nes.nmi().in_flight() {
        cycles += u64::from(nes.step().unwrap());
    }
    assert!(cycles > NesRegion::Ntsc.cpu_cycles_per_frame());
    assert!(cycles > NesRegion::Pal.cpu_cycles_per_frame());
    assert_eq!(nes.cpu().regs.pc, 0x9000);
}
