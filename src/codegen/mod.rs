//! Lowering of VM commands to Hack assembly.
//!
//! `segment` decides where an operand lives, `labels` hands out unique
//! symbols, `emitter` produces the instruction text and `sink` carries
//! finished lines to memory or a writer.

pub mod emitter;
pub mod hack;
pub mod labels;
pub mod segment;
pub mod sink;

pub use emitter::{Emitter, TranslationContext};
pub use labels::{LabelKind, LabelManager};
pub use segment::AddressingPlan;
pub use sink::{AsmSink, AsmWriter};
