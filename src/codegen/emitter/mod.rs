mod arith;
mod call;
mod flow;
mod memory;

use super::hack::{self, Reg};
use super::labels::{LabelKind, LabelManager};
use crate::ast::Command;
use crate::diagnostic::Diagnostic;

/// Mutable state of one translation run.
///
/// The file name scopes `static` symbols and changes per source unit;
/// the label manager is never reset within a run.
#[derive(Clone, Debug, Default)]
pub struct TranslationContext {
    pub file_name: String,
    pub labels: LabelManager,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Lowers VM commands to Hack assembly lines.
///
/// Lines accumulate in an internal buffer; the caller drains them with
/// [`Emitter::take_output`] after each command.
pub struct Emitter {
    output: Vec<String>,
    ctx: TranslationContext,
    /// Prefix each lowering with a `// <command>` comment.
    annotate: bool,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            ctx: TranslationContext::new(),
            annotate: true,
        }
    }

    pub fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Bind the source unit whose commands follow.
    pub fn set_file_name(&mut self, file_name: &str) {
        self.ctx.file_name = file_name.to_string();
    }

    /// Lower one command. On error nothing is appended to the buffer.
    pub fn emit_command(&mut self, cmd: &Command) -> Result<(), Diagnostic> {
        let mark = self.output.len();
        self.comment(&cmd.to_string());
        let result = match cmd {
            Command::Arithmetic(op) => {
                self.emit_arithmetic(*op);
                Ok(())
            }
            Command::Push(seg, index) => self.emit_push(*seg, *index),
            Command::Pop(seg, index) => self.emit_pop(*seg, *index),
            Command::Label(name) => {
                self.emit_label(name);
                Ok(())
            }
            Command::Goto(name) => {
                self.emit_goto(name);
                Ok(())
            }
            Command::IfGoto(name) => {
                self.emit_if_goto(name);
                Ok(())
            }
            Command::Function(name, n_locals) => {
                self.emit_function(name, *n_locals);
                Ok(())
            }
            Command::Call(name, n_args) => self.emit_call(name, *n_args),
            Command::Return => {
                self.emit_return();
                Ok(())
            }
        };
        if result.is_err() {
            self.output.truncate(mark);
        }
        result
    }

    /// Initialise SP and call the program entry function.
    pub fn emit_bootstrap(&mut self, entry: &str) -> Result<(), Diagnostic> {
        self.comment("bootstrap");
        self.inst(&hack::at_value(hack::STACK_BASE));
        self.inst("D=A");
        self.inst(&Reg::Sp.at());
        self.inst("M=D");
        self.comment(&format!("call {} 0", entry));
        self.emit_call(entry, 0)
    }

    /// Park the CPU in a self-jump.
    pub fn emit_halt(&mut self) {
        let label = self.ctx.labels.fresh(LabelKind::Halt);
        self.comment("halt");
        self.raw(&hack::label_def(&label));
        self.inst(&hack::at_symbol(&label));
        self.inst(&hack::Jump::Jmp.on_d());
    }

    /// Drain the lines emitted since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    // ── Low-level output helpers ──────────────────────────────────

    fn inst(&mut self, instruction: &str) {
        self.output.push(instruction.to_string());
    }

    fn raw(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn comment(&mut self, text: &str) {
        if self.annotate {
            self.output.push(format!("// {}", text));
        }
    }

    /// Push D onto the stack.
    fn push_d(&mut self) {
        self.inst(&Reg::Sp.at());
        self.inst("A=M");
        self.inst("M=D");
        self.inst(&Reg::Sp.at());
        self.inst("M=M+1");
    }

    /// Pop the stack into D.
    fn pop_d(&mut self) {
        self.inst(&Reg::Sp.at());
        self.inst("AM=M-1");
        self.inst("D=M");
    }

    /// Point A at the current top of stack (`SP - 1`) without popping.
    fn top(&mut self) {
        self.inst(&Reg::Sp.at());
        self.inst("A=M-1");
    }
}
