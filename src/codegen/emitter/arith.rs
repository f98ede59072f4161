use super::Emitter;
use crate::ast::ArithOp;
use crate::codegen::hack::{self, Jump, Reg};
use crate::codegen::labels::LabelKind;

/// All-ones: `true` on the VM stack.
const TRUE_WORD: &str = "-1";
/// All-zero: `false` on the VM stack.
const FALSE_WORD: &str = "0";

impl Emitter {
    pub(super) fn emit_arithmetic(&mut self, op: ArithOp) {
        match op {
            ArithOp::Add => self.binary("M=D+M"),
            ArithOp::Sub => self.binary("M=M-D"),
            ArithOp::And => self.binary("M=D&M"),
            ArithOp::Or => self.binary("M=D|M"),
            ArithOp::Neg => self.unary("M=-M"),
            ArithOp::Not => self.unary("M=!M"),
            ArithOp::Eq => self.emit_eq(),
            ArithOp::Gt => self.emit_ordered(LabelKind::GtTrue, LabelKind::GtEnd, Reg::R14, Reg::R13),
            ArithOp::Lt => self.emit_ordered(LabelKind::LtTrue, LabelKind::LtEnd, Reg::R13, Reg::R14),
        }
    }

    /// `x op y`: pop y into D, combine into x's cell in place.
    fn binary(&mut self, combine: &str) {
        self.pop_d();
        self.inst("A=A-1");
        self.inst(combine);
    }

    fn unary(&mut self, transform: &str) {
        self.top();
        self.inst(transform);
    }

    /// `x == y` iff `x - y` is zero; wrapping subtraction cannot change that.
    fn emit_eq(&mut self) {
        let on_true = self.ctx.labels.fresh(LabelKind::EqTrue);
        let end = self.ctx.labels.fresh(LabelKind::EqEnd);
        self.pop_d();
        self.inst("A=A-1");
        self.inst("D=M-D");
        self.select(&on_true, &end, Jump::Jeq);
    }

    /// Signed `lhs < rhs`, with x in R13 and y in R14 (`lt` is R13 < R14,
    /// `gt` is R14 < R13).
    ///
    /// `lhs - rhs` overflows when the operands have different signs, so
    /// the branch tests `(lhs & !rhs) | (same_sign & (lhs - rhs))`, whose
    /// sign bit is the true ordering for every pair of 16-bit words.
    fn emit_ordered(&mut self, true_kind: LabelKind, end_kind: LabelKind, lhs: Reg, rhs: Reg) {
        let on_true = self.ctx.labels.fresh(true_kind);
        let end = self.ctx.labels.fresh(end_kind);

        // R14 = y, R13 = x
        self.pop_d();
        self.inst(&Reg::R14.at());
        self.inst("M=D");
        self.top();
        self.inst("D=M");
        self.inst(&Reg::R13.at());
        self.inst("M=D");

        // R15 = lhs - rhs
        self.inst(&lhs.at());
        self.inst("D=M");
        self.inst(&rhs.at());
        self.inst("D=D-M");
        self.inst(&Reg::R15.at());
        self.inst("M=D");

        // x's cell = same_sign mask = (x & y) | !(x | y)
        self.inst(&Reg::R13.at());
        self.inst("D=M");
        self.inst(&Reg::R14.at());
        self.inst("D=D&M");
        self.top();
        self.inst("M=D");
        self.inst(&Reg::R13.at());
        self.inst("D=M");
        self.inst(&Reg::R14.at());
        self.inst("D=D|M");
        self.inst("D=!D");
        self.top();
        self.inst("M=D|M");

        // x's cell &= lhs - rhs
        self.inst(&Reg::R15.at());
        self.inst("D=M");
        self.top();
        self.inst("M=D&M");

        // D = (lhs & !rhs) | x's cell
        self.inst(&rhs.at());
        self.inst("D=!M");
        self.inst(&lhs.at());
        self.inst("D=D&M");
        self.top();
        self.inst("D=D|M");

        // Negative exactly when the relation holds.
        self.select(&on_true, &end, Jump::Jlt);
    }

    /// Overwrite the top cell with the true word if `jump` holds on D,
    /// the false word otherwise.
    fn select(&mut self, on_true: &str, end: &str, jump: Jump) {
        self.inst(&hack::at_symbol(on_true));
        self.inst(&jump.on_d());
        self.top();
        self.inst(&format!("M={}", FALSE_WORD));
        self.inst(&hack::at_symbol(end));
        self.inst(&Jump::Jmp.on_d());
        self.raw(&hack::label_def(on_true));
        self.top();
        self.inst(&format!("M={}", TRUE_WORD));
        self.raw(&hack::label_def(end));
    }
}
