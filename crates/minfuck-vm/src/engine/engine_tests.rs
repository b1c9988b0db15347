//! VM execution tests over programs assembled with `ProgramBuilder`.

use std::io;

use minfuck_bytecode::{Control, Extended, Header, Instruction, Module, ProgramBuilder, Variant};

use super::{EofPolicy, FuelLimits, Halted, Port, RuntimeError, StreamPort, Tape, VM, VmState};

fn program(variant: Variant, memsize: u32, build: impl FnOnce(&mut ProgramBuilder)) -> Module {
    let mut b = ProgramBuilder::new(Header::new(variant, memsize));
    build(&mut b);
    Module::from_bytes(b.build().unwrap()).unwrap()
}

fn bf(memsize: u32, build: impl FnOnce(&mut ProgramBuilder)) -> Module {
    program(Variant::Bf, memsize, build)
}

/// Run with default settings, returning the result and everything written.
fn run(module: &Module, input: &[u8]) -> (Result<Halted, RuntimeError>, Vec<u8>) {
    run_with(module, input, EofPolicy::default())
}

fn run_with(
    module: &Module,
    input: &[u8],
    eof: EofPolicy,
) -> (Result<Halted, RuntimeError>, Vec<u8>) {
    let mut port = StreamPort::new(input, Vec::new());
    let result = VM::builder(module, &mut port)
        .eof_policy(eof)
        .build()
        .and_then(|vm| vm.execute());
    let (_, output) = port.into_parts();
    (result, output)
}

#[test]
fn header_only_program_halts_immediately() {
    let module = bf(4, |_| {});

    let (result, output) = run(&module, b"");

    let halted = result.unwrap();
    assert_eq!(halted.steps, 0);
    assert_eq!(halted.pc, 8);
    assert_eq!(halted.tape.cells(), &[0; 4]);
    assert!(output.is_empty());
}

#[test]
fn packed_pair_outputs_current_cell_twice() {
    let module = bf(1, |b| {
        b.pair(Control::Output, Control::Output);
    });
    let mut port = StreamPort::new(io::empty(), Vec::new());
    let mut vm = VM::builder(&module, &mut port)
        .tape(Tape::from_cells(vec![0x41]))
        .build()
        .unwrap();

    assert_eq!(vm.step().unwrap(), VmState::Halted);
    assert_eq!(vm.pc(), 9);
    assert_eq!(vm.tape().cells(), &[0x41]);
    assert_eq!(vm.tape().position(), 0);
    assert_eq!(port.output(), b"AA");
}

#[test]
fn extended_add_increments_by_operand() {
    let module = bf(1, |b| {
        b.raw(&[0x80, 0x00, 0x00, 0x00, 0x05]);
    });
    let mut port = StreamPort::new(io::empty(), io::sink());
    let mut vm = VM::builder(&module, &mut port).build().unwrap();

    vm.step().unwrap();

    assert_eq!(vm.pc(), 13);
    assert_eq!(vm.tape().cells(), &[5]);
}

#[test]
fn add_and_sub_use_the_low_byte() {
    let module = bf(2, |b| {
        b.raw(&[0x80, 0x01, 0x02, 0x03, 0x05]);
        b.pair(Control::Right, Control::Nop(4));
        b.extended(Extended::sub(1));
    });

    let (result, _) = run(&module, b"");

    assert_eq!(result.unwrap().tape.cells(), &[5, 255]);
}

#[test]
fn plain_code_runs_before_its_extended_op() {
    let module = bf(3, |b| {
        b.push(Instruction::PlainThenExtended(
            Control::Right,
            Extended::add(3),
        ));
        b.push(Instruction::PlainThenExtended(
            Control::Inc,
            Extended::forward(1),
        ));
    });

    let (result, _) = run(&module, b"");

    let halted = result.unwrap();
    assert_eq!(halted.tape.cells(), &[0, 4, 0]);
    assert_eq!(halted.tape.position(), 2);
    assert_eq!(halted.steps, 2);
}

#[test]
fn extended_moves_travel_the_operand() {
    let module = bf(300, |b| {
        b.extended(Extended::forward(299));
        b.pair(Control::Inc, Control::Nop(4));
        b.extended(Extended::back(299));
        b.pair(Control::Dec, Control::Nop(4));
    });

    let (result, _) = run(&module, b"");

    let tape = result.unwrap().tape;
    assert_eq!(tape.position(), 0);
    assert_eq!(tape.cells()[0], 255);
    assert_eq!(tape.cells()[299], 1);
}

#[test]
fn loop_repeats_body_until_cell_is_zero() {
    // Move cell 0 into cell 1: add 3, [- > + <]
    let module = bf(2, |b| {
        b.extended(Extended::add(3));
        let open = b.open_loop();
        b.pair(Control::Dec, Control::Right);
        b.pair(Control::Inc, Control::Left);
        b.close_loop(open);
    });

    let (result, _) = run(&module, b"");

    let halted = result.unwrap();
    assert_eq!(halted.tape.cells(), &[0, 3]);
    assert_eq!(halted.pc, module.size());
    // add, jz, then three passes of (pair, pair, jnz)
    assert_eq!(halted.steps, 11);
}

#[test]
fn loop_is_skipped_when_cell_is_zero() {
    let module = bf(1, |b| {
        let open = b.open_loop();
        b.pair(Control::Output, Control::Output);
        b.close_loop(open);
    });

    let (result, output) = run(&module, b"");

    let halted = result.unwrap();
    assert!(output.is_empty());
    assert_eq!(halted.steps, 1);
    assert_eq!(halted.pc, module.size());
}

#[test]
fn writes_text() {
    let module = bf(1, |b| {
        b.extended(Extended::add(b'H'));
        b.pair(Control::Output, Control::Nop(4));
        b.extended(Extended::add(b'i' - b'H'));
        b.pair(Control::Output, Control::Nop(4));
    });

    let (result, output) = run(&module, b"");

    result.unwrap();
    assert_eq!(output, b"Hi");
}

#[test]
fn mf_tape_starts_with_ones_on_even_cells() {
    let module = program(Variant::Mf, 1, |b| {
        b.pair(Control::Output, Control::Right);
        b.pair(Control::Right, Control::Output);
    });

    let (result, output) = run(&module, b"");

    assert_eq!(output, vec![0, 1]);
    assert_eq!(result.unwrap().tape.len(), 10);
}

#[test]
fn input_is_echoed() {
    let module = bf(1, |b| {
        b.pair(Control::Input, Control::Output);
        b.pair(Control::Input, Control::Output);
    });

    let (result, output) = run(&module, b"ok!");

    assert_eq!(result.unwrap().tape.cells(), b"k");
    assert_eq!(output, b"ok");
}

#[test]
fn end_of_input_faults_by_default() {
    let module = bf(1, |b| {
        b.pair(Control::Input, Control::Output);
    });

    let (result, output) = run(&module, b"");

    assert!(matches!(result, Err(RuntimeError::EndOfInput { pc: 8 })));
    assert!(output.is_empty());
}

#[test]
fn end_of_input_policies() {
    let module = bf(1, |b| {
        b.extended(Extended::add(7));
        b.pair(Control::Input, Control::Output);
    });

    let (_, zero) = run_with(&module, b"", EofPolicy::Zero);
    let (_, unchanged) = run_with(&module, b"", EofPolicy::Unchanged);

    assert_eq!(zero, vec![0]);
    assert_eq!(unchanged, vec![7]);
}

#[test]
fn eof_policy_names() {
    for policy in [EofPolicy::Fault, EofPolicy::Zero, EofPolicy::Unchanged] {
        assert_eq!(EofPolicy::from_name(policy.name()), Some(policy));
    }
    assert_eq!(EofPolicy::from_name("ignore"), None);
}

#[test]
fn cell_access_off_tape_faults() {
    let module = bf(1, |b| {
        b.pair(Control::Left, Control::Inc);
    });

    let (result, _) = run(&module, b"");

    assert!(matches!(
        result,
        Err(RuntimeError::PositionOutOfBounds {
            pc: 8,
            position: -1,
            len: 1
        })
    ));
}

#[test]
fn cursor_may_pass_off_tape_without_access() {
    let module = bf(1, |b| {
        b.pair(Control::Left, Control::Left);
        b.extended(Extended::forward(2));
        b.pair(Control::Inc, Control::Nop(4));
    });

    let (result, _) = run(&module, b"");

    assert_eq!(result.unwrap().tape.cells(), &[1]);
}

#[test]
fn input_off_tape_consumes_nothing() {
    let module = bf(1, |b| {
        b.pair(Control::Right, Control::Input);
    });
    let mut port = StreamPort::new(&b"x"[..], Vec::new());

    let result = VM::builder(&module, &mut port).build().unwrap().execute();

    assert!(matches!(
        result,
        Err(RuntimeError::PositionOutOfBounds { pc: 8, .. })
    ));
    assert_eq!(port.read_byte().unwrap(), Some(b'x'));
}

#[test]
fn empty_tape_faults_on_first_access() {
    let module = bf(0, |b| {
        b.pair(Control::Inc, Control::Nop(4));
    });

    let (result, _) = run(&module, b"");

    assert!(matches!(
        result,
        Err(RuntimeError::PositionOutOfBounds {
            position: 0,
            len: 0,
            ..
        })
    ));
}

#[test]
fn cursor_overflow_faults() {
    let module = bf(1, |b| {
        b.pair(Control::Right, Control::Nop(4));
    });
    let mut port = StreamPort::new(io::empty(), io::sink());

    let result = VM::builder(&module, &mut port)
        .tape(Tape::from_cells(vec![0]).with_position(i64::MAX))
        .build()
        .unwrap()
        .execute();

    assert!(matches!(result, Err(RuntimeError::CursorOverflow { pc: 8 })));
}

#[test]
fn jump_before_code_start_faults() {
    let module = bf(1, |b| {
        b.extended(Extended::jump_if_zero(4));
    });

    let (result, _) = run(&module, b"");

    assert!(matches!(
        result,
        Err(RuntimeError::JumpTargetOutOfBounds {
            pc: 8,
            target: 4,
            len: 13
        })
    ));
}

#[test]
fn jump_past_end_faults() {
    let module = bf(1, |b| {
        b.extended(Extended::jump_if_zero(14));
    });

    let (result, _) = run(&module, b"");

    assert!(matches!(
        result,
        Err(RuntimeError::JumpTargetOutOfBounds { target: 14, .. })
    ));
}

#[test]
fn jump_to_end_halts() {
    let module = bf(1, |b| {
        b.extended(Extended::jump_if_zero(19));
        b.pair(Control::Output, Control::Output);
        b.extended(Extended::add(1));
    });

    let (result, output) = run(&module, b"");

    let halted = result.unwrap();
    assert_eq!(halted.pc, 19);
    assert_eq!(halted.steps, 1);
    assert!(output.is_empty());
}

#[test]
fn jump_into_an_operand_faults() {
    let module = bf(1, |b| {
        b.extended(Extended::add(0));
        b.extended(Extended::jump_if_zero(9));
    });

    let (result, _) = run(&module, b"");

    assert!(matches!(
        result,
        Err(RuntimeError::JumpIntoInstruction { pc: 13, target: 9 })
    ));
}

#[test]
fn untaken_jump_is_not_validated() {
    let module = bf(1, |b| {
        b.extended(Extended::add(1));
        b.extended(Extended::jump_if_zero(0));
        b.extended(Extended::jump_if_zero(u32::MAX));
    });

    let (result, _) = run(&module, b"");

    assert_eq!(result.unwrap().steps, 3);
}

#[test]
fn truncated_instruction_is_not_partially_applied() {
    let module = bf(1, |b| {
        // inc, then an add whose operand is cut short
        b.raw(&[0x08, 0x00, 0x00]);
    });
    let mut port = StreamPort::new(io::empty(), io::sink());
    let mut vm = VM::builder(&module, &mut port).build().unwrap();

    let err = vm.step().unwrap_err();

    assert!(matches!(err, RuntimeError::TruncatedInstruction { pc: 8 }));
    assert_eq!(vm.tape().cells(), &[0]);
    assert_eq!(vm.pc(), 8);
    assert_eq!(vm.steps(), 0);
}

#[test]
fn fuel_limits_runaway_loops() {
    let module = bf(1, |b| {
        b.extended(Extended::add(1));
        b.extended(Extended::jump_if_nonzero(8));
    });
    let mut port = StreamPort::new(io::empty(), io::sink());

    let result = VM::builder(&module, &mut port)
        .exec_fuel(10)
        .build()
        .unwrap()
        .execute();

    assert!(matches!(result, Err(RuntimeError::ExecFuelExhausted(10))));
}

#[test]
fn exact_fuel_is_enough() {
    let module = bf(1, |b| {
        b.pair(Control::Inc, Control::Inc);
        b.pair(Control::Inc, Control::Inc);
    });
    let mut port = StreamPort::new(io::empty(), io::sink());

    let result = VM::builder(&module, &mut port)
        .exec_fuel(2)
        .build()
        .unwrap()
        .execute();

    assert_eq!(result.unwrap().tape.cells(), &[4]);
}

#[test]
fn halted_vm_stays_halted() {
    let module = bf(1, |b| {
        b.pair(Control::Inc, Control::Nop(4));
    });
    let mut port = StreamPort::new(io::empty(), io::sink());
    let mut vm = VM::builder(&module, &mut port).build().unwrap();

    assert_eq!(vm.state(), VmState::Running);
    assert_eq!(vm.step().unwrap(), VmState::Halted);
    assert_eq!(vm.step().unwrap(), VmState::Halted);
    assert_eq!(vm.steps(), 1);
    assert_eq!(vm.tape().cells(), &[1]);
}

#[test]
fn runs_are_deterministic() {
    // Echo input with each byte incremented until EOF reads zero.
    let module = bf(1, |b| {
        b.pair(Control::Input, Control::Nop(4));
        let open = b.open_loop();
        b.pair(Control::Inc, Control::Output);
        b.pair(Control::Input, Control::Nop(4));
        b.close_loop(open);
    });

    let first = run_with(&module, b"HAL", EofPolicy::Zero);
    let second = run_with(&module, b"HAL", EofPolicy::Zero);

    assert_eq!(first.1, b"IBM");
    assert_eq!(first.1, second.1);
    assert_eq!(first.0.unwrap(), second.0.unwrap());
}

#[test]
fn write_errors_propagate() {
    struct Closed;

    impl io::Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let module = bf(1, |b| {
        b.pair(Control::Output, Control::Nop(4));
    });
    let mut port = StreamPort::new(io::empty(), Closed);

    let result = VM::builder(&module, &mut port).build().unwrap().execute();

    assert!(matches!(result, Err(RuntimeError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe));
}

#[test]
fn oversized_tape_is_refused_at_build() {
    let module = program(Variant::Mf, u32::MAX, |b| {
        b.pair(Control::Inc, Control::Output);
    });

    let (result, output) = run(&module, b"");

    assert!(matches!(
        result,
        Err(RuntimeError::TapeAllocation { len: 8_589_934_598 })
    ));
    assert!(output.is_empty());
}

#[test]
fn tape_limit_is_configurable() {
    let module = bf(16, |b| {
        b.pair(Control::Inc, Control::Output);
    });
    let mut port = StreamPort::new(io::empty(), Vec::new());

    let refused = VM::builder(&module, &mut port)
        .limits(FuelLimits::new().tape_limit(15))
        .build();
    assert!(matches!(
        refused,
        Err(RuntimeError::TapeAllocation { len: 16 })
    ));

    let halted = VM::builder(&module, &mut port)
        .limits(FuelLimits::new().tape_limit(16))
        .build()
        .unwrap()
        .execute()
        .unwrap();
    assert_eq!(halted.tape.len(), 16);
    assert_eq!(port.output(), &[1u8]);
}
