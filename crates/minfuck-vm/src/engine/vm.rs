//! Fetch-decode-execute loop.

use minfuck_bytecode::{CODE_START, Control, Extended, ExtendedOpcode, Instruction, Module};
use tracing::{debug, warn};

use super::boundaries::Boundaries;
use super::error::RuntimeError;
use super::port::Port;
use super::tape::Tape;
use super::trace::{NoopTracer, Tracer};

/// Default cap on tape cells (1 GiB).
pub const DEFAULT_TAPE_LIMIT: u64 = 1 << 30;

/// Runtime limits for program execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum executed instructions (default: unlimited).
    pub(crate) exec_fuel: Option<u64>,
    /// Maximum tape cells a header may ask for (default: [`DEFAULT_TAPE_LIMIT`]).
    pub(crate) tape_limit: u64,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: None,
            tape_limit: DEFAULT_TAPE_LIMIT,
        }
    }
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.exec_fuel = Some(fuel);
        self
    }

    /// Set the tape size limit.
    pub fn tape_limit(mut self, cells: u64) -> Self {
        self.tape_limit = cells;
        self
    }

    pub fn get_exec_fuel(&self) -> Option<u64> {
        self.exec_fuel
    }
    pub fn get_tape_limit(&self) -> u64 {
        self.tape_limit
    }
}

/// What control code 7 does once the input is exhausted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EofPolicy {
    /// Stop with [`RuntimeError::EndOfInput`].
    #[default]
    Fault,
    /// Store 0 in the current cell.
    Zero,
    /// Leave the current cell untouched.
    Unchanged,
}

impl EofPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fault" => Some(Self::Fault),
            "zero" => Some(Self::Zero),
            "unchanged" => Some(Self::Unchanged),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fault => "fault",
            Self::Zero => "zero",
            Self::Unchanged => "unchanged",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VmState {
    Running,
    /// The program counter reached or passed the end of the program.
    Halted,
}

/// Final machine state of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Halted {
    pub tape: Tape,
    pub pc: usize,
    /// Instructions executed.
    pub steps: u64,
}

/// Virtual machine state for program execution.
pub struct VM<'m, P> {
    module: &'m Module,
    tape: Tape,
    pc: usize,
    port: P,
    boundaries: Boundaries,
    eof: EofPolicy,

    // Fuel tracking
    steps: u64,
    exec_fuel: Option<u64>,
    limits: FuelLimits,
}

/// Builder for VM instances.
pub struct VMBuilder<'m, P> {
    module: &'m Module,
    port: P,
    tape: Option<Tape>,
    limits: FuelLimits,
    eof: EofPolicy,
}

impl<'m, P: Port> VMBuilder<'m, P> {
    /// Create a new VM builder.
    pub fn new(module: &'m Module, port: P) -> Self {
        Self {
            module,
            port,
            tape: None,
            limits: FuelLimits::default(),
            eof: EofPolicy::default(),
        }
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    pub fn eof_policy(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }

    /// Start from `tape` instead of the one the header describes.
    pub fn tape(mut self, tape: Tape) -> Self {
        self.tape = Some(tape);
        self
    }

    /// Build the VM, allocating the tape unless one was supplied.
    pub fn build(self) -> Result<VM<'m, P>, RuntimeError> {
        let header = self.module.header();
        let tape = match self.tape {
            Some(tape) => tape,
            None => Tape::for_header(&header, self.limits.get_tape_limit())
                .map_err(|e| RuntimeError::from_tape(e, CODE_START))?,
        };
        debug!(
            variant = header.variant.name(),
            memsize = header.memsize,
            tape = tape.len(),
            code = self.module.code().len(),
            "program loaded"
        );

        Ok(VM {
            module: self.module,
            tape,
            pc: CODE_START,
            port: self.port,
            boundaries: Boundaries::scan(self.module),
            eof: self.eof,
            steps: 0,
            exec_fuel: self.limits.get_exec_fuel(),
            limits: self.limits,
        })
    }
}

impl<'m, P: Port> VM<'m, P> {
    /// Create a VM builder.
    pub fn builder(module: &'m Module, port: P) -> VMBuilder<'m, P> {
        VMBuilder::new(module, port)
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn state(&self) -> VmState {
        if self.pc < self.module.size() {
            VmState::Running
        } else {
            VmState::Halted
        }
    }

    /// Execute the program until it halts.
    ///
    /// This is a convenience method that uses `NoopTracer`, which gets
    /// completely optimized away at compile time.
    pub fn execute(self) -> Result<Halted, RuntimeError> {
        self.execute_with(&mut NoopTracer)
    }

    /// Execute the program with a tracer for debugging.
    pub fn execute_with<T: Tracer>(mut self, tracer: &mut T) -> Result<Halted, RuntimeError> {
        loop {
            match self.step_with(tracer) {
                Ok(VmState::Running) => continue,
                Ok(VmState::Halted) => break,
                Err(e) => {
                    warn!(pc = self.pc, steps = self.steps, error = %e, "runtime fault");
                    tracer.trace_fault(&e);
                    return Err(e);
                }
            }
        }

        debug!(pc = self.pc, steps = self.steps, "halted");
        tracer.trace_halt(self.pc, self.steps);
        Ok(Halted {
            tape: self.tape,
            pc: self.pc,
            steps: self.steps,
        })
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<VmState, RuntimeError> {
        self.step_with(&mut NoopTracer)
    }

    /// Execute one instruction, reporting to `tracer`.
    ///
    /// A halted VM stays halted and consumes no fuel.
    pub fn step_with<T: Tracer>(&mut self, tracer: &mut T) -> Result<VmState, RuntimeError> {
        if self.state() == VmState::Halted {
            return Ok(VmState::Halted);
        }

        // Fuel check
        if let Some(fuel) = self.exec_fuel.as_mut() {
            if *fuel == 0 {
                let limit = self.limits.get_exec_fuel().unwrap_or(0);
                return Err(RuntimeError::ExecFuelExhausted(limit));
            }
            *fuel -= 1;
        }

        // pc is in range, so decoding can only fail on a short operand. Nothing
        // of a truncated instruction is applied.
        let pc = self.pc;
        let instr = self
            .module
            .decode_at(pc)
            .map_err(|_| RuntimeError::TruncatedInstruction { pc })?;
        tracer.trace_instruction(pc, &instr);

        let next = pc + instr.size();
        self.pc = match instr {
            Instruction::PlainPair(first, second) => {
                self.exec_control(first, tracer)?;
                self.exec_control(second, tracer)?;
                next
            }
            Instruction::PlainThenExtended(control, ext) => {
                self.exec_control(control, tracer)?;
                self.exec_extended(ext, next, tracer)?
            }
            Instruction::Extended(ext) => self.exec_extended(ext, next, tracer)?,
        };
        self.steps += 1;
        tracer.trace_tape(&self.tape);

        Ok(self.state())
    }

    fn exec_control<T: Tracer>(
        &mut self,
        control: Control,
        tracer: &mut T,
    ) -> Result<(), RuntimeError> {
        let pc = self.pc;
        let tape = &mut self.tape;
        let result = match control {
            Control::Inc => tape.increment(1),
            Control::Dec => tape.decrement(1),
            Control::Right => tape.advance(1),
            Control::Left => tape.retreat(1),
            Control::Output => {
                let byte = tape.get().map_err(|e| RuntimeError::from_tape(e, pc))?;
                self.port.write_byte(byte)?;
                tracer.trace_output(byte);
                Ok(())
            }
            Control::Input => return self.exec_input(tracer),
            Control::Nop(_) => Ok(()),
        };
        result.map_err(|e| RuntimeError::from_tape(e, pc))
    }

    fn exec_input<T: Tracer>(&mut self, tracer: &mut T) -> Result<(), RuntimeError> {
        let pc = self.pc;
        // Check the cursor before consuming input.
        self.tape
            .get()
            .map_err(|e| RuntimeError::from_tape(e, pc))?;

        let byte = self.port.read_byte()?;
        tracer.trace_input(byte);
        let result = match (byte, self.eof) {
            (Some(b), _) => self.tape.set(b),
            (None, EofPolicy::Fault) => return Err(RuntimeError::EndOfInput { pc }),
            (None, EofPolicy::Zero) => self.tape.set(0),
            (None, EofPolicy::Unchanged) => Ok(()),
        };
        result.map_err(|e| RuntimeError::from_tape(e, pc))
    }

    /// Apply an extended op, returning the next program counter.
    fn exec_extended<T: Tracer>(
        &mut self,
        ext: Extended,
        next: usize,
        tracer: &mut T,
    ) -> Result<usize, RuntimeError> {
        let pc = self.pc;
        let tape = &mut self.tape;
        let result = match ext.opcode {
            ExtendedOpcode::Add => tape.increment(ext.low_byte()),
            ExtendedOpcode::Sub => tape.decrement(ext.low_byte()),
            ExtendedOpcode::Forward => tape.advance(ext.operand),
            ExtendedOpcode::Back => tape.retreat(ext.operand),
            opcode if opcode.is_jump() => {
                let cell = tape.get().map_err(|e| RuntimeError::from_tape(e, pc))?;
                let taken = (cell == 0) == (opcode == ExtendedOpcode::JumpIfZero);
                tracer.trace_jump(ext.operand, taken);
                if taken {
                    return self.jump_target(ext.operand);
                }
                Ok(())
            }
            _ => Ok(()),
        };
        result.map_err(|e| RuntimeError::from_tape(e, pc))?;
        Ok(next)
    }

    /// Validate a taken jump. Landing exactly on the end of the program halts.
    fn jump_target(&self, target: u32) -> Result<usize, RuntimeError> {
        let pc = self.pc;
        let len = self.module.size();
        let offset = target as usize;

        if offset < CODE_START || offset > len {
            return Err(RuntimeError::JumpTargetOutOfBounds { pc, target, len });
        }
        if offset < len && !self.boundaries.contains(offset) {
            return Err(RuntimeError::JumpIntoInstruction { pc, target });
        }
        Ok(offset)
    }
}
