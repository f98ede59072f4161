use std::fmt;

use crate::span::Span;

/// A translation failure with the source location that caused it.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The line is not a well-formed VM command.
    Syntax,
    /// A valid command/segment combination with no lowering (e.g. `pop constant`).
    UnsupportedOperation,
    /// An operand outside the range its segment can address.
    MalformedCommand,
    /// Reading a source or writing the output sink failed.
    IoFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::UnsupportedOperation => "unsupported operation",
            ErrorKind::MalformedCommand => "malformed command",
            ErrorKind::IoFailure => "i/o failure",
        }
    }
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, message: String, span: Span) -> Self {
        Self {
            kind,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self::new(ErrorKind::Syntax, message, span)
    }

    pub fn unsupported(message: String) -> Self {
        Self::new(ErrorKind::UnsupportedOperation, message, Span::dummy())
    }

    pub fn malformed(message: String) -> Self {
        Self::new(ErrorKind::MalformedCommand, message, Span::dummy())
    }

    pub fn io(message: String) -> Self {
        Self::new(ErrorKind::IoFailure, message, Span::dummy())
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Attach a location, keeping one that was already set.
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_dummy() {
            self.span = span;
        }
        self
    }

    /// Render the diagnostic to stderr using ariadne.
    pub fn render(&self, filename: &str, source: &str) {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        // Failures with no source position (I/O) have nothing to underline.
        if self.span.is_dummy() || source.is_empty() {
            eprintln!("error: {}: {}", self.kind.as_str(), self.message);
            for note in &self.notes {
                eprintln!("  note: {}", note);
            }
            if let Some(help) = &self.help {
                eprintln!("  help: {}", help);
            }
            return;
        }

        let end = self.span.range().end.min(source.len());
        let start = (self.span.start as usize).min(end);

        let mut report = Report::build(ReportKind::Error, filename, start)
            .with_message(format!("{}: {}", self.kind.as_str(), self.message))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(Color::Red),
            );

        for note in &self.notes {
            report = report.with_note(note);
        }

        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        if report
            .finish()
            .eprint((filename, Source::from(source)))
            .is_err()
        {
            eprintln!("error: {}", self);
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// Render a list of diagnostics against one source file.
pub fn render_diagnostics(diagnostics: &[Diagnostic], filename: &str, source: &str) {
    for diag in diagnostics {
        diag.render(filename, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_construction() {
        let span = Span::new(0, 10, 15);
        let d = Diagnostic::syntax("unknown command 'psh'".to_string(), span);
        assert_eq!(d.kind, ErrorKind::Syntax);
        assert_eq!(d.message, "unknown command 'psh'");
        assert_eq!(d.span.start, 10);
        assert_eq!(d.span.end, 15);
        assert!(d.notes.is_empty());
        assert!(d.help.is_none());
    }

    #[test]
    fn test_at_keeps_existing_span() {
        let d = Diagnostic::syntax("x".to_string(), Span::new(0, 3, 4)).at(Span::new(0, 8, 9));
        assert_eq!(d.span.start, 3);
        let d = Diagnostic::unsupported("pop constant".to_string()).at(Span::new(1, 8, 9));
        assert_eq!(d.span, Span::new(1, 8, 9));
    }

    #[test]
    fn test_chained_builders() {
        let d = Diagnostic::malformed("pointer index 2".to_string())
            .with_note("pointer has two cells".to_string())
            .with_help("use pointer 0 or pointer 1".to_string())
            .with_note("second".to_string());
        assert_eq!(d.kind, ErrorKind::MalformedCommand);
        assert_eq!(d.notes.len(), 2);
        assert_eq!(d.help.as_deref(), Some("use pointer 0 or pointer 1"));
    }

    #[test]
    fn test_display_includes_kind() {
        let d = Diagnostic::io("cannot write 'out.asm'".to_string());
        assert_eq!(d.to_string(), "i/o failure: cannot write 'out.asm'");
    }

    #[test]
    fn test_render_does_not_panic() {
        let source = "push constant 1\npop constant 2\n";
        let d = Diagnostic::unsupported("cannot pop into constant".to_string())
            .at(Span::new(0, 16, 30))
            .with_help("constants are push-only".to_string());
        d.render("Main.vm", source);
    }

    #[test]
    fn test_render_span_past_end_does_not_panic() {
        let d = Diagnostic::syntax("trailing".to_string(), Span::new(0, 4, 400));
        render_diagnostics(&[d], "Main.vm", "add\n");
    }

    #[test]
    fn test_render_without_span() {
        Diagnostic::io("disk full".to_string()).render("out.asm", "");
    }
}
