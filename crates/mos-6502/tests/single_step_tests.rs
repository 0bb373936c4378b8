//! Single-instruction state tests in the `SingleStepTests` JSON layout.
//!
//! Each case gives the CPU registers and the RAM bytes before and after one
//! instruction, plus the realized cycle count. Cases live in
//! `tests/data/official.json`. The stack never wraps in this core, so no
//! case pushes past S = $00.

use emu_core::{AddressSpace, Cpu, NoPorts};
use mos_6502::{Mos6502, Status};
use serde::Deserialize;

/// JSON test case format.
#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    cycles: u32,
}

/// JSON CPU state format.
#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

/// Set up the CPU and bus from the initial test state.
fn setup(state: &CpuState) -> (Mos6502, AddressSpace<NoPorts>) {
    let mut bus = AddressSpace::new();
    for &(addr, value) in &state.ram {
        bus.poke(u32::from(addr), value).unwrap();
    }
    let mut cpu = Mos6502::new();
    cpu.regs.pc = state.pc;
    cpu.regs.s = state.s;
    cpu.regs.a = state.a;
    cpu.regs.x = state.x;
    cpu.regs.y = state.y;
    cpu.regs.p = Status::from_byte(state.p);
    (cpu, bus)
}

/// Compare the CPU/bus state against expected, returning a list of mismatches.
fn compare(cpu: &Mos6502, bus: &AddressSpace<NoPorts>, expected: &CpuState) -> Vec<String> {
    let mut errors = Vec::new();
    let regs = [
        ("A", cpu.regs.a, expected.a),
        ("X", cpu.regs.x, expected.x),
        ("Y", cpu.regs.y, expected.y),
        ("S", cpu.regs.s, expected.s),
        ("P", cpu.regs.p.0, expected.p | 0x20),
    ];
    for (name, got, want) in regs {
        if got != want {
            errors.push(format!("{name}: got ${got:02X}, want ${want:02X}"));
        }
    }
    if cpu.regs.pc != expected.pc {
        errors.push(format!(
            "PC: got ${:04X}, want ${:04X}",
            cpu.regs.pc, expected.pc
        ));
    }

    for &(addr, want) in &expected.ram {
        let got = bus.peek(u32::from(addr)).unwrap();
        if got != want {
            errors.push(format!("RAM[${addr:04X}]: got ${got:02X}, want ${want:02X}"));
        }
    }

    errors
}

fn load_cases() -> Vec<TestCase> {
    let json = include_str!("data/official.json");
    serde_json::from_str(json).unwrap()
}

#[test]
fn official_opcode_cases() {
    let cases = load_cases();
    assert!(!cases.is_empty());

    let mut failures = Vec::new();
    for case in &cases {
        let (mut cpu, mut bus) = setup(&case.initial);
        match cpu.step(&mut bus) {
            Ok(cycles) => {
                let mut errors = compare(&cpu, &bus, &case.final_state);
                if cycles != case.cycles {
                    errors.push(format!("cycles: got {cycles}, want {}", case.cycles));
                }
                if !errors.is_empty() {
                    failures.push(format!("{}: {}", case.name, errors.join("; ")));
                }
            }
            Err(e) => failures.push(format!("{}: {e}", case.name)),
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} cases failed:\n{}",
        failures.len(),
        cases.len(),
        failures.join("\n")
    );
}
