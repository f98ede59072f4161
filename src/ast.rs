pub mod display;

/// One VM command, as produced by the parser and consumed by the translator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Arithmetic(ArithOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    /// `function name nLocals`
    Function(String, u16),
    /// `call name nArgs`
    Call(String, u16),
    Return,
}

/// Stack arithmetic and logic commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithOp {
    pub const ALL: [ArithOp; 9] = [
        ArithOp::Add,
        ArithOp::Sub,
        ArithOp::Neg,
        ArithOp::Eq,
        ArithOp::Gt,
        ArithOp::Lt,
        ArithOp::And,
        ArithOp::Or,
        ArithOp::Not,
    ];

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.keyword() == word)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Neg => "neg",
            ArithOp::Eq => "eq",
            ArithOp::Gt => "gt",
            ArithOp::Lt => "lt",
            ArithOp::And => "and",
            ArithOp::Or => "or",
            ArithOp::Not => "not",
        }
    }
}

/// The eight logical operand spaces of the VM.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Argument,
    Local,
    Static,
    Constant,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    pub const ALL: [Segment; 8] = [
        Segment::Argument,
        Segment::Local,
        Segment::Static,
        Segment::Constant,
        Segment::This,
        Segment::That,
        Segment::Pointer,
        Segment::Temp,
    ];

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|seg| seg.keyword() == word)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::Constant => "constant",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        }
    }
}
