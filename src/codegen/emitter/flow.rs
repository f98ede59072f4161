use super::Emitter;
use crate::codegen::hack::{self, Jump};

impl Emitter {
    /// User labels are emitted verbatim; their uniqueness is the
    /// producer's responsibility.
    pub(super) fn emit_label(&mut self, name: &str) {
        self.raw(&hack::label_def(name));
    }

    pub(super) fn emit_goto(&mut self, name: &str) {
        self.inst(&hack::at_symbol(name));
        self.inst(&Jump::Jmp.on_d());
    }

    /// Pop; jump when the popped value is non-zero.
    pub(super) fn emit_if_goto(&mut self, name: &str) {
        self.pop_d();
        self.inst(&hack::at_symbol(name));
        self.inst(&Jump::Jne.on_d());
    }
}
