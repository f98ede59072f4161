//! Canonical VM-text rendering of commands.
//!
//! The output of `Display` is exactly what the parser accepts, so an
//! annotated assembly listing can be read back as VM source.

use std::fmt;

use super::{ArithOp, Command, Segment};

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Arithmetic(op) => write!(f, "{}", op),
            Command::Push(seg, index) => write!(f, "push {} {}", seg, index),
            Command::Pop(seg, index) => write!(f, "pop {} {}", seg, index),
            Command::Label(name) => write!(f, "label {}", name),
            Command::Goto(name) => write!(f, "goto {}", name),
            Command::IfGoto(name) => write!(f, "if-goto {}", name),
            Command::Function(name, n_locals) => write!(f, "function {} {}", name, n_locals),
            Command::Call(name, n_args) => write!(f, "call {} {}", name, n_args),
            Command::Return => f.write_str("return"),
        }
    }
}
