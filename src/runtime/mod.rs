//! Execution harness for emitted Hack assembly.
//!
//! The translator never needs this module; it exists so that generated
//! programs can be run and inspected (by `hackvm run` and by the test
//! suites) without an external CPU emulator. `Runner` is the contract,
//! `HackRunner` the built-in implementation backed by [`hack::Machine`].

pub mod hack;

pub use hack::{Machine, Program};

// ─── Types ─────────────────────────────────────────────────────────

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// The program counter ran past the last instruction.
    EndOfProgram,
    /// The CPU reached an unconditional self-jump (`(L) @L 0;JMP`).
    HaltLoop,
}

/// Machine state after a run.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    pub exit: Exit,
    /// Instructions executed.
    pub cycle_count: u64,
    /// `SP LCL ARG THIS THAT`, in RAM order.
    pub registers: [i16; 5],
    /// `RAM[stack_base..SP]`, bottom first.
    pub stack: Vec<i16>,
}

impl ExecutionResult {
    pub fn sp(&self) -> i16 {
        self.registers[0]
    }
}

/// Initial RAM contents for a run.
#[derive(Clone, Debug, Default)]
pub struct ProgramInput {
    /// `(address, value)` pairs written before the first instruction.
    pub ram: Vec<(u16, i16)>,
}

impl ProgramInput {
    pub fn with(mut self, address: u16, value: i16) -> Self {
        self.ram.push((address, value));
        self
    }
}

// ─── Runner ────────────────────────────────────────────────────────

/// Execute assembly text and report the final machine state.
pub trait Runner {
    fn run(&self, asm: &str, input: &ProgramInput) -> Result<ExecutionResult, String>;
}

/// Runs programs on the built-in Hack interpreter.
#[derive(Clone, Debug)]
pub struct HackRunner {
    pub max_steps: u64,
    /// First stack cell, used when reporting the stack contents.
    pub stack_base: u16,
}

impl Default for HackRunner {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            stack_base: crate::codegen::hack::STACK_BASE,
        }
    }
}

impl Runner for HackRunner {
    fn run(&self, asm: &str, input: &ProgramInput) -> Result<ExecutionResult, String> {
        let lines: Vec<String> = asm.lines().map(str::to_string).collect();
        let program = Program::assemble(&lines)?;
        let mut machine = Machine::new(program);
        for &(address, value) in &input.ram {
            machine.poke(address, value);
        }
        let exit = machine.run(self.max_steps)?;
        Ok(ExecutionResult {
            exit,
            cycle_count: machine.cycle_count(),
            registers: [
                machine.peek(0),
                machine.peek(1),
                machine.peek(2),
                machine.peek(3),
                machine.peek(4),
            ],
            stack: machine.stack(self.stack_base),
        })
    }
}
