use crate::ast::{ArithOp, Command, Segment};
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::span::{Span, Spanned};

/// A whitespace-delimited word and where it sits in the source.
#[derive(Clone, Copy, Debug)]
struct Word<'src> {
    text: &'src str,
    span: Span,
}

/// Line-oriented parser for `.vm` source text.
///
/// Every non-blank, non-comment line yields exactly one command. Errors
/// are collected for the whole file so a single run reports all of them.
pub(crate) struct Parser<'src> {
    source: &'src str,
    file_id: u16,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str, file_id: u16) -> Self {
        Self {
            source,
            file_id,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn parse(mut self) -> Result<Vec<Spanned<Command>>, Vec<Diagnostic>> {
        let mut commands = Vec::new();
        let mut offset = 0usize;
        for line in self.source.split_inclusive('\n') {
            let words = self.split_words(line, offset);
            offset += line.len();
            if words.is_empty() {
                continue;
            }
            let span = self.join_spans(words[0].span, words[words.len() - 1].span);
            if let Some(cmd) = self.parse_command(&words, span) {
                commands.push(Spanned::new(cmd, span));
            }
        }

        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        Ok(commands)
    }

    /// Split one line into words, dropping any `//` comment.
    fn split_words(&self, line: &'src str, base: usize) -> Vec<Word<'src>> {
        let code = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let mut words = Vec::new();
        let mut start: Option<usize> = None;
        for (i, ch) in code.char_indices() {
            if ch.is_whitespace() {
                if let Some(s) = start.take() {
                    words.push(self.word(code, s, i, base));
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        if let Some(s) = start {
            words.push(self.word(code, s, code.len(), base));
        }
        words
    }

    fn word(&self, code: &'src str, start: usize, end: usize, base: usize) -> Word<'src> {
        Word {
            text: &code[start..end],
            span: Span::new(self.file_id, (base + start) as u32, (base + end) as u32),
        }
    }

    fn join_spans(&self, first: Span, last: Span) -> Span {
        Span::new(self.file_id, first.start, last.end)
    }

    fn parse_command(&mut self, words: &[Word<'src>], span: Span) -> Option<Command> {
        let head = words[0];
        let operands = &words[1..];

        if let Some(op) = ArithOp::from_keyword(head.text) {
            self.expect_operands(head, operands, 0, op.keyword())?;
            return Some(Command::Arithmetic(op));
        }

        match head.text {
            "push" | "pop" => {
                self.expect_operands(head, operands, 2, "<segment> <index>")?;
                let segment = self.parse_segment(operands[0])?;
                let index = self.parse_number(operands[1], "index")?;
                if head.text == "push" {
                    Some(Command::Push(segment, index))
                } else {
                    Some(Command::Pop(segment, index))
                }
            }
            "label" | "goto" | "if-goto" => {
                self.expect_operands(head, operands, 1, "<label>")?;
                let name = self.parse_symbol(operands[0], "label")?;
                match head.text {
                    "label" => Some(Command::Label(name)),
                    "goto" => Some(Command::Goto(name)),
                    _ => Some(Command::IfGoto(name)),
                }
            }
            "function" => {
                self.expect_operands(head, operands, 2, "<name> <nLocals>")?;
                let name = self.parse_symbol(operands[0], "function")?;
                let n_locals = self.parse_number(operands[1], "local count")?;
                Some(Command::Function(name, n_locals))
            }
            "call" => {
                self.expect_operands(head, operands, 2, "<name> <nArgs>")?;
                let name = self.parse_symbol(operands[0], "function")?;
                let n_args = self.parse_number(operands[1], "argument count")?;
                Some(Command::Call(name, n_args))
            }
            "return" => {
                self.expect_operands(head, operands, 0, "return")?;
                Some(Command::Return)
            }
            other => {
                let note = format!("in line '{}'", self.line_text(span));
                self.diagnostics.push(
                    Diagnostic::syntax(format!("unknown command '{}'", other), head.span)
                        .with_note(note),
                );
                None
            }
        }
    }

    fn line_text(&self, span: Span) -> &'src str {
        &self.source[span.range()]
    }

    fn expect_operands(
        &mut self,
        head: Word<'src>,
        operands: &[Word<'src>],
        count: usize,
        usage: &str,
    ) -> Option<()> {
        if operands.len() == count {
            return Some(());
        }
        let span = match operands.last() {
            Some(last) if operands.len() > count => self.join_spans(operands[count].span, last.span),
            _ => head.span,
        };
        let help = if count == 0 {
            format!("'{}' takes no operands", head.text)
        } else {
            format!("usage: {} {}", head.text, usage)
        };
        self.diagnostics.push(
            Diagnostic::syntax(
                format!(
                    "'{}' expects {} operand{}, found {}",
                    head.text,
                    count,
                    if count == 1 { "" } else { "s" },
                    operands.len()
                ),
                span,
            )
            .with_help(help),
        );
        None
    }

    fn parse_segment(&mut self, word: Word<'src>) -> Option<Segment> {
        match Segment::from_keyword(word.text) {
            Some(seg) => Some(seg),
            None => {
                self.diagnostics.push(
                    Diagnostic::syntax(format!("unknown segment '{}'", word.text), word.span)
                        .with_help(
                            "segments are argument, local, static, constant, this, that, pointer, temp"
                                .to_string(),
                        ),
                );
                None
            }
        }
    }

    fn parse_number(&mut self, word: Word<'src>, what: &str) -> Option<u16> {
        let text = word.text;
        if let Some(digits) = text.strip_prefix('-') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                self.diagnostics.push(Diagnostic::new(
                    ErrorKind::MalformedCommand,
                    format!("negative {} '{}'", what, text),
                    word.span,
                ));
                return None;
            }
        }
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            self.diagnostics.push(Diagnostic::syntax(
                format!("expected a decimal {}, found '{}'", what, text),
                word.span,
            ));
            return None;
        }
        match text.parse::<u16>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.diagnostics.push(
                    Diagnostic::new(
                        ErrorKind::MalformedCommand,
                        format!("{} '{}' does not fit in 16 bits", what, text),
                        word.span,
                    )
                    .with_help(format!("the largest {} is {}", what, u16::MAX)),
                );
                None
            }
        }
    }

    /// Labels and function names become assembly symbols, so they must
    /// be valid there: letters, digits, `_ . $ :`, not starting with a digit.
    fn parse_symbol(&mut self, word: Word<'src>, what: &str) -> Option<String> {
        if is_symbol(word.text) {
            return Some(word.text.to_string());
        }
        self.diagnostics.push(
            Diagnostic::syntax(format!("invalid {} name '{}'", what, word.text), word.span)
                .with_help(
                    "names use letters, digits, '_', '.', '$', ':' and must not start with a digit"
                        .to_string(),
                ),
        );
        None
    }
}

pub(crate) fn is_symbol(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => false,
        Some(_) => text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')),
        None => false,
    }
}
