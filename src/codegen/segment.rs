//! Segment resolution: how a `(segment, index)` operand reaches memory.

use super::hack::{Reg, MAX_LITERAL, TEMP_BASE, TEMP_SIZE};
use crate::ast::Segment;
use crate::diagnostic::Diagnostic;

/// Addressing recipe for one segment cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressingPlan {
    /// `constant`: the index is the value; there is no cell.
    Immediate(u16),
    /// `local/argument/this/that`: `RAM[base] + offset` is the cell address.
    Indirect { base: Reg, offset: u16 },
    /// `temp`: an absolute address, no base register involved.
    Fixed(u16),
    /// `pointer`: the base register itself is the cell.
    Register(Reg),
    /// `static`: a per-file assembler symbol.
    Symbol(String),
}

/// Resolve an operand. The returned diagnostic carries no span; the
/// caller attaches the command's location.
pub fn resolve(segment: Segment, index: u16, file_name: &str) -> Result<AddressingPlan, Diagnostic> {
    let plan = match segment {
        Segment::Constant => AddressingPlan::Immediate(index),
        Segment::Local => indirect(Reg::Lcl, index)?,
        Segment::Argument => indirect(Reg::Arg, index)?,
        Segment::This => indirect(Reg::This, index)?,
        Segment::That => indirect(Reg::That, index)?,
        Segment::Temp => {
            if index >= TEMP_SIZE {
                return Err(Diagnostic::malformed(format!(
                    "temp index {} out of range",
                    index
                ))
                .with_note(format!(
                    "temp has {} cells, RAM[{}..={}]",
                    TEMP_SIZE,
                    TEMP_BASE,
                    TEMP_BASE + TEMP_SIZE - 1
                )));
            }
            AddressingPlan::Fixed(TEMP_BASE + index)
        }
        Segment::Pointer => match index {
            0 => AddressingPlan::Register(Reg::This),
            1 => AddressingPlan::Register(Reg::That),
            _ => {
                return Err(
                    Diagnostic::malformed(format!("pointer index {} out of range", index))
                        .with_help("pointer 0 is THIS, pointer 1 is THAT".to_string()),
                )
            }
        },
        Segment::Static => AddressingPlan::Symbol(static_symbol(file_name, index)),
    };
    Ok(plan)
}

fn indirect(base: Reg, offset: u16) -> Result<AddressingPlan, Diagnostic> {
    if offset > MAX_LITERAL {
        return Err(
            Diagnostic::malformed(format!("segment offset {} out of range", offset)).with_note(
                format!("offsets above {} do not fit in an address literal", MAX_LITERAL),
            ),
        );
    }
    Ok(AddressingPlan::Indirect { base, offset })
}

/// Symbol naming static cell `index` of `file_name`.
pub fn static_symbol(file_name: &str, index: u16) -> String {
    format!("{}.{}", file_name, index)
}
