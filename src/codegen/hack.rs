//! Fixed memory map and register names of the target machine.
//!
//! The machine has one data register `D`, one address register `A`
//! and the memory operand `M` (= `RAM[A]`). Everything else the VM
//! needs (stack pointer, segment bases, scratch) lives in the low
//! RAM words named here.

use std::fmt;

/// Address the stack pointer is initialised to by the bootstrap.
pub const STACK_BASE: u16 = 256;
/// First word of the temp segment (`temp 0` = `RAM[5]`).
pub const TEMP_BASE: u16 = 5;
/// Number of temp cells (`RAM[5..=12]`).
pub const TEMP_SIZE: u16 = 8;
/// First RAM word handed out to static/variable symbols.
pub const VARIABLE_BASE: u16 = 16;
/// Saved words in a call frame: return address, LCL, ARG, THIS, THAT.
pub const FRAME_SIZE: u16 = 5;
/// Largest value an A-instruction can load directly.
pub const MAX_LITERAL: u16 = 0x7FFF;

/// Named low-RAM registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg {
    Sp,
    Lcl,
    Arg,
    This,
    That,
    /// Scratch: effective address during indirect pops, `frame` during return.
    R13,
    /// Scratch: return address during return.
    R14,
    R15,
}

impl Reg {
    pub fn symbol(self) -> &'static str {
        match self {
            Reg::Sp => "SP",
            Reg::Lcl => "LCL",
            Reg::Arg => "ARG",
            Reg::This => "THIS",
            Reg::That => "THAT",
            Reg::R13 => "R13",
            Reg::R14 => "R14",
            Reg::R15 => "R15",
        }
    }

    pub fn address(self) -> u16 {
        match self {
            Reg::Sp => 0,
            Reg::Lcl => 1,
            Reg::Arg => 2,
            Reg::This => 3,
            Reg::That => 4,
            Reg::R13 => 13,
            Reg::R14 => 14,
            Reg::R15 => 15,
        }
    }

    /// `@SP`, `@LCL`, ...
    pub fn at(self) -> String {
        format!("@{}", self.symbol())
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Caller registers saved by `call`, in push order.
pub const SAVED_REGS: [Reg; 4] = [Reg::Lcl, Reg::Arg, Reg::This, Reg::That];

/// Jump conditions on `D`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Jump {
    Jeq,
    Jgt,
    Jlt,
    Jne,
    Jmp,
}

impl Jump {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Jump::Jeq => "JEQ",
            Jump::Jgt => "JGT",
            Jump::Jlt => "JLT",
            Jump::Jne => "JNE",
            Jump::Jmp => "JMP",
        }
    }

    /// `D;JEQ`, or `0;JMP` for the unconditional jump.
    pub fn on_d(self) -> String {
        match self {
            Jump::Jmp => "0;JMP".to_string(),
            other => format!("D;{}", other.mnemonic()),
        }
    }
}

/// `@value` for a literal address or constant.
pub fn at_value(value: u16) -> String {
    format!("@{}", value)
}

/// `@symbol` for a label or variable.
pub fn at_symbol(symbol: &str) -> String {
    format!("@{}", symbol)
}

/// `(label)`
pub fn label_def(label: &str) -> String {
    format!("({})", label)
}
