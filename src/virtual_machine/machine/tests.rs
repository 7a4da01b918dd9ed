use super::*;
use crate::virtual_machine::isa::encode;
use crate::virtual_machine::ternary::EOF_SENTINEL;
use std::collections::HashMap;

/// Memory where only explicitly set cells are decided.
#[derive(Default)]
struct SparseMemory {
    cells: HashMap<Word, Word>,
}

impl SparseMemory {
    fn with(cells: &[(Word, Word)]) -> Self {
        Self {
            cells: cells.iter().copied().collect(),
        }
    }

    fn with_program(program: &[Instruction]) -> Self {
        Self {
            cells: program
                .iter()
                .enumerate()
                .map(|(address, &instruction)| {
                    let address = address as Word;
                    (address, encode(address, instruction))
                })
                .collect(),
        }
    }
}

impl Memory for SparseMemory {
    fn read(&self, address: Word) -> Option<Word> {
        self.cells.get(&address).copied()
    }

    fn write(&mut self, address: Word, value: Word) {
        self.cells.insert(address, value);
    }
}

#[derive(Default)]
struct RecordingPort {
    output: Vec<u8>,
    input: Vec<Word>,
}

impl Port for RecordingPort {
    fn output(&mut self, byte: u8) -> Result<(), VMError> {
        self.output.push(byte);
        Ok(())
    }

    fn input(&mut self) -> Result<Word, VMError> {
        if self.input.is_empty() {
            Ok(EOF_SENTINEL)
        } else {
            Ok(self.input.remove(0))
        }
    }
}

struct ClosedPort;

impl Port for ClosedPort {
    fn output(&mut self, _byte: u8) -> Result<(), VMError> {
        Ok(())
    }

    fn input(&mut self) -> Result<Word, VMError> {
        Err(VMError::InputUnavailable)
    }
}

fn run_step(registers: &mut Registers, memory: &mut SparseMemory, port: &mut RecordingPort) -> Step {
    step(registers, memory, port, true).expect("step failed")
}

#[test]
fn output_emits_low_byte_of_a() {
    let mut memory = SparseMemory::with_program(&[Instruction::Output]);
    let mut port = RecordingPort::default();
    let mut registers = Registers {
        a: 256 + b'H' as Word,
        ..Registers::new()
    };

    assert_eq!(
        run_step(&mut registers, &mut memory, &mut port),
        Step::Completed(Status::Running)
    );
    assert_eq!(port.output, b"H");
    assert_eq!(registers.phase, Phase::Advance);
    assert_eq!(registers.c, 0);
}

#[test]
fn advance_encrypts_and_increments() {
    let raw = encode(0, Instruction::NoOp);
    let mut memory = SparseMemory::with(&[(0, raw)]);
    let mut port = RecordingPort::default();
    let mut registers = Registers::new();

    run_step(&mut registers, &mut memory, &mut port);
    run_step(&mut registers, &mut memory, &mut port);

    assert_eq!(memory.read(0), encrypt(raw));
    assert_eq!(registers.c, 1);
    assert_eq!(registers.d, 1);
    assert_eq!(registers.phase, Phase::Fetch);
}

#[test]
fn advance_wraps_pointers() {
    let last = WORD_SIZE - 1;
    let mut memory = SparseMemory::with(&[(last, b'D' as Word)]);
    let mut registers = Registers {
        c: last,
        d: last,
        phase: Phase::Advance,
        ..Registers::new()
    };

    run_step(&mut registers, &mut memory, &mut RecordingPort::default());
    assert_eq!(registers.c, 0);
    assert_eq!(registers.d, 0);
}

#[test]
fn exit_skips_advance() {
    let mut memory = SparseMemory::with_program(&[Instruction::Exit]);
    let raw = memory.read(0);
    let mut registers = Registers::new();

    assert_eq!(
        run_step(&mut registers, &mut memory, &mut RecordingPort::default()),
        Step::Completed(Status::Exited)
    );
    assert_eq!(registers, Registers::new());
    assert_eq!(memory.read(0), raw);
}

#[test]
fn undecided_code_cell_needs_decision() {
    let mut memory = SparseMemory::default();
    let mut registers = Registers {
        c: 42,
        ..Registers::new()
    };

    assert_eq!(
        run_step(&mut registers, &mut memory, &mut RecordingPort::default()),
        Step::NeedsDecision(42)
    );
    assert_eq!(registers.c, 42);
    assert_eq!(registers.phase, Phase::Fetch);
}

#[test]
fn undecided_data_cell_needs_decision_without_side_effects() {
    for instruction in [
        Instruction::MoveD,
        Instruction::Jump,
        Instruction::RotateRight,
        Instruction::Combine,
    ] {
        let mut memory = SparseMemory::with_program(&[instruction]);
        let mut registers = Registers {
            a: 5,
            d: 300,
            ..Registers::new()
        };
        let before = registers;

        assert_eq!(
            run_step(&mut registers, &mut memory, &mut RecordingPort::default()),
            Step::NeedsDecision(300),
            "{instruction:?}"
        );
        assert_eq!(registers, before, "{instruction:?}");
        assert_eq!(memory.cells.len(), 1, "{instruction:?}");
    }
}

#[test]
fn undecided_cell_after_jump_needs_decision_in_advance() {
    let mut memory = SparseMemory::with_program(&[Instruction::Jump]);
    let mut registers = Registers::new();
    // d = 0, so the jump target is the jump cell's own raw value.
    let target = memory.read(0).expect("decided");

    run_step(&mut registers, &mut memory, &mut RecordingPort::default());
    assert_eq!(registers.c, target);
    assert_eq!(
        run_step(&mut registers, &mut memory, &mut RecordingPort::default()),
        Step::NeedsDecision(target)
    );
    assert_eq!(registers.phase, Phase::Advance);
}

#[test]
fn move_d_loads_data_pointer() {
    let mut memory = SparseMemory::with_program(&[Instruction::MoveD]);
    memory.write(10, 1234);
    let mut registers = Registers {
        d: 10,
        ..Registers::new()
    };

    run_step(&mut registers, &mut memory, &mut RecordingPort::default());
    assert_eq!(registers.d, 1234);
}

#[test]
fn rotate_right_updates_cell_and_accumulator() {
    let mut memory = SparseMemory::with_program(&[Instruction::RotateRight]);
    memory.write(10, 7);
    let mut registers = Registers {
        d: 10,
        ..Registers::new()
    };

    run_step(&mut registers, &mut memory, &mut RecordingPort::default());
    assert_eq!(registers.a, 19685);
    assert_eq!(memory.read(10), Some(19685));
}

#[test]
fn combine_updates_cell_and_accumulator() {
    let mut memory = SparseMemory::with_program(&[Instruction::Combine]);
    memory.write(10, 1000);
    let mut registers = Registers {
        a: 2000,
        d: 10,
        ..Registers::new()
    };

    run_step(&mut registers, &mut memory, &mut RecordingPort::default());
    let expected = combine(2000, 1000);
    assert_eq!(registers.a, expected);
    assert_eq!(memory.read(10), Some(expected));
}

#[test]
fn input_reads_port_and_eof_sentinel() {
    let mut memory = SparseMemory::with_program(&[Instruction::Input]);
    let mut port = RecordingPort {
        input: vec![b'x' as Word],
        ..RecordingPort::default()
    };
    let mut registers = Registers::new();

    run_step(&mut registers, &mut memory, &mut port);
    assert_eq!(registers.a, b'x' as Word);

    let mut memory = SparseMemory::with_program(&[Instruction::Input]);
    let mut registers = Registers::new();
    run_step(&mut registers, &mut memory, &mut port);
    assert_eq!(registers.a, EOF_SENTINEL);
}

#[test]
fn input_on_closed_port_fails() {
    let mut memory = SparseMemory::with_program(&[Instruction::Input]);
    let mut registers = Registers::new();
    let result = step(&mut registers, &mut memory, &mut ClosedPort, true);
    assert!(matches!(result, Err(VMError::InputUnavailable)));
}

#[test]
fn non_printable_code_cell_fails_to_decode() {
    let mut memory = SparseMemory::with(&[(0, 5)]);
    let mut registers = Registers::new();
    let result = step(&mut registers, &mut memory, &mut ClosedPort, true);
    assert!(matches!(
        result,
        Err(VMError::DecodeFailure { address: 0, value: 5 })
    ));
}

#[test]
fn unnamed_printable_cell_respects_fallback() {
    let mut memory = SparseMemory::with(&[(0, b'!' as Word)]);

    let mut registers = Registers::new();
    let result = step(&mut registers, &mut memory, &mut ClosedPort, false);
    assert!(matches!(result, Err(VMError::DecodeFailure { .. })));

    let mut registers = Registers::new();
    let result = step(&mut registers, &mut memory, &mut ClosedPort, true);
    assert!(matches!(result, Ok(Step::Completed(Status::Running))));
    assert_eq!(registers.phase, Phase::Advance);
}

#[test]
fn non_printable_cell_fails_to_encrypt() {
    let mut memory = SparseMemory::with(&[(3, 1000)]);
    let mut registers = Registers {
        c: 3,
        phase: Phase::Advance,
        ..Registers::new()
    };
    let result = step(&mut registers, &mut memory, &mut ClosedPort, true);
    assert!(matches!(
        result,
        Err(VMError::EncryptionFailure { address: 3, value: 1000 })
    ));
}

#[test]
fn straight_line_program_prints_and_exits() {
    let mut memory = SparseMemory::with_program(&[Instruction::Output, Instruction::Output, Instruction::Exit]);
    let mut port = RecordingPort::default();
    let mut registers = Registers {
        a: b'!' as Word,
        ..Registers::new()
    };

    let mut steps = 0;
    while run_step(&mut registers, &mut memory, &mut port) == Step::Completed(Status::Running) {
        steps += 1;
    }
    assert_eq!(port.output, b"!!");
    assert_eq!(steps, 4);
    assert_eq!(registers.c, 2);
}
