use super::Emitter;
use crate::codegen::hack::{self, Jump, Reg, FRAME_SIZE, SAVED_REGS};
use crate::codegen::labels::LabelKind;
use crate::codegen::segment::AddressingPlan;
use crate::diagnostic::Diagnostic;

impl Emitter {
    /// Entry label, then `n_locals` zero-initialised locals. Frame
    /// bookkeeping is done by the caller.
    pub(super) fn emit_function(&mut self, name: &str, n_locals: u16) {
        let entry = self.ctx.labels.function_label(name);
        self.raw(&hack::label_def(&entry));
        for _ in 0..n_locals {
            self.push_plan(&AddressingPlan::Immediate(0));
        }
    }

    /// Save the caller frame, reposition ARG and LCL, jump to the callee
    /// and define this call site's return point.
    pub(super) fn emit_call(&mut self, name: &str, n_args: u16) -> Result<(), Diagnostic> {
        let arg_offset = u32::from(FRAME_SIZE) + u32::from(n_args);
        if arg_offset > u32::from(hack::MAX_LITERAL) {
            return Err(Diagnostic::malformed(format!(
                "call {} passes {} arguments",
                name, n_args
            ))
            .with_note(format!(
                "the frame offset {} does not fit in an address literal",
                arg_offset
            )));
        }

        let entry = self.ctx.labels.function_label(name);
        let return_label = self.ctx.labels.fresh(LabelKind::Return);

        // push return-address
        self.inst(&hack::at_symbol(&return_label));
        self.inst("D=A");
        self.push_d();

        // push LCL, ARG, THIS, THAT
        for reg in SAVED_REGS {
            self.inst(&reg.at());
            self.inst("D=M");
            self.push_d();
        }

        // ARG = SP - 5 - nArgs
        self.inst(&Reg::Sp.at());
        self.inst("D=M");
        self.inst(&hack::at_value(arg_offset as u16));
        self.inst("D=D-A");
        self.inst(&Reg::Arg.at());
        self.inst("M=D");

        // LCL = SP
        self.inst(&Reg::Sp.at());
        self.inst("D=M");
        self.inst(&Reg::Lcl.at());
        self.inst("M=D");

        self.inst(&hack::at_symbol(&entry));
        self.inst(&Jump::Jmp.on_d());
        self.raw(&hack::label_def(&return_label));
        Ok(())
    }

    /// Move the return value to the caller's `argument 0`, drop the
    /// callee frame and restore the caller's registers.
    pub(super) fn emit_return(&mut self) {
        // R13 = frame = LCL
        self.inst(&Reg::Lcl.at());
        self.inst("D=M");
        self.inst(&Reg::R13.at());
        self.inst("M=D");

        // R14 = *(frame - 5); read before *ARG is written, which
        // aliases this slot when the callee has no arguments.
        self.inst(&hack::at_value(FRAME_SIZE));
        self.inst("A=D-A");
        self.inst("D=M");
        self.inst(&Reg::R14.at());
        self.inst("M=D");

        // *ARG = pop()
        self.pop_d();
        self.inst(&Reg::Arg.at());
        self.inst("A=M");
        self.inst("M=D");

        // SP = ARG + 1
        self.inst(&Reg::Arg.at());
        self.inst("D=M+1");
        self.inst(&Reg::Sp.at());
        self.inst("M=D");

        // THAT, THIS, ARG, LCL = *(frame - 1), ..., *(frame - 4)
        for reg in SAVED_REGS.iter().rev() {
            self.inst(&Reg::R13.at());
            self.inst("AM=M-1");
            self.inst("D=M");
            self.inst(&reg.at());
            self.inst("M=D");
        }

        // goto return-address
        self.inst(&Reg::R14.at());
        self.inst("A=M");
        self.inst(&Jump::Jmp.on_d());
    }
}
