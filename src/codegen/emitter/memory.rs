use super::Emitter;
use crate::ast::Segment;
use crate::codegen::hack::{self, Reg};
use crate::codegen::segment::{resolve, AddressingPlan};
use crate::diagnostic::Diagnostic;

impl Emitter {
    pub(super) fn emit_push(&mut self, segment: Segment, index: u16) -> Result<(), Diagnostic> {
        let plan = resolve(segment, index, &self.ctx.file_name)?;
        self.push_plan(&plan);
        Ok(())
    }

    pub(super) fn emit_pop(&mut self, segment: Segment, index: u16) -> Result<(), Diagnostic> {
        let plan = resolve(segment, index, &self.ctx.file_name)?;
        match plan {
            AddressingPlan::Immediate(_) => Err(Diagnostic::unsupported(format!(
                "cannot pop into constant {}",
                index
            ))
            .with_help("the constant segment is push-only".to_string())),
            AddressingPlan::Indirect { base, offset } => {
                // Effective address goes to R13 before SP moves.
                self.inst(&hack::at_value(offset));
                self.inst("D=A");
                self.inst(&base.at());
                self.inst("D=D+M");
                self.inst(&Reg::R13.at());
                self.inst("M=D");
                self.pop_d();
                self.inst(&Reg::R13.at());
                self.inst("A=M");
                self.inst("M=D");
                Ok(())
            }
            AddressingPlan::Fixed(addr) => {
                self.pop_d();
                self.inst(&hack::at_value(addr));
                self.inst("M=D");
                Ok(())
            }
            AddressingPlan::Register(reg) => {
                self.pop_d();
                self.inst(&reg.at());
                self.inst("M=D");
                Ok(())
            }
            AddressingPlan::Symbol(symbol) => {
                self.pop_d();
                self.inst(&hack::at_symbol(&symbol));
                self.inst("M=D");
                Ok(())
            }
        }
    }

    /// Load the operand described by `plan` into D and push it.
    pub(super) fn push_plan(&mut self, plan: &AddressingPlan) {
        match plan {
            AddressingPlan::Immediate(value) => self.load_constant(*value),
            AddressingPlan::Indirect { base, offset } => {
                self.inst(&hack::at_value(*offset));
                self.inst("D=A");
                self.inst(&base.at());
                self.inst("A=D+M");
                self.inst("D=M");
            }
            AddressingPlan::Fixed(addr) => {
                self.inst(&hack::at_value(*addr));
                self.inst("D=M");
            }
            AddressingPlan::Register(reg) => {
                self.inst(&reg.at());
                self.inst("D=M");
            }
            AddressingPlan::Symbol(symbol) => {
                self.inst(&hack::at_symbol(symbol));
                self.inst("D=M");
            }
        }
        self.push_d();
    }

    /// D = value, for any 16-bit pattern. A-instructions carry 15 bits,
    /// so values with the top bit set are loaded as their complement.
    fn load_constant(&mut self, value: u16) {
        if value <= hack::MAX_LITERAL {
            self.inst(&hack::at_value(value));
            self.inst("D=A");
        } else {
            self.inst(&hack::at_value(!value));
            self.inst("D=!A");
        }
    }
}
