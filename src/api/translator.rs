//! Drives one translation run: units in order, commands in order, a
//! single bootstrap up front and the halt loop at the end.

use log::{debug, trace};

use super::{Bootstrap, SourceUnit, TranslateOptions};
use crate::ast::Command;
use crate::codegen::{AsmSink, Emitter};
use crate::diagnostic::Diagnostic;
use crate::span::Spanned;

pub struct Translator<S: AsmSink> {
    emitter: Emitter,
    sink: S,
    entry: String,
    halt_loop: bool,
    bootstrapped: bool,
    commands: usize,
}

impl<S: AsmSink> Translator<S> {
    pub fn new(sink: S, options: &TranslateOptions) -> Self {
        Self {
            emitter: Emitter::new().with_annotations(options.annotate),
            sink,
            entry: options.entry.clone(),
            halt_loop: options.halt_loop,
            bootstrapped: false,
            commands: 0,
        }
    }

    /// Bind the source unit whose commands follow; scopes `static`.
    pub fn set_file_name(&mut self, name: &str) {
        debug!("translating unit '{}'", name);
        self.emitter.set_file_name(name);
    }

    /// Emit the bootstrap prologue. Must precede every command; only the
    /// first call has any effect.
    pub fn bootstrap(&mut self) -> Result<(), Diagnostic> {
        if self.bootstrapped {
            return Ok(());
        }
        if self.commands > 0 {
            return Err(Diagnostic::unsupported(
                "bootstrap requested after translation started".to_string(),
            ));
        }
        self.bootstrapped = true;
        debug!("bootstrap: call {}", self.entry);
        let entry = self.entry.clone();
        self.emitter.emit_bootstrap(&entry)?;
        self.drain()
    }

    pub fn translate_command(&mut self, cmd: &Spanned<Command>) -> Result<(), Diagnostic> {
        trace!("{}", cmd.node);
        self.emitter
            .emit_command(&cmd.node)
            .map_err(|err| err.at(cmd.span))?;
        self.commands += 1;
        self.drain()
    }

    /// Translate a unit's commands under the unit's name. Stops at the
    /// first failing command.
    pub fn translate_unit(
        &mut self,
        unit: &SourceUnit,
        commands: &[Spanned<Command>],
    ) -> Result<(), Diagnostic> {
        self.set_file_name(&unit.name);
        for cmd in commands {
            self.translate_command(cmd)?;
        }
        debug!("unit '{}': {} commands", unit.name, commands.len());
        Ok(())
    }

    /// Append the halt loop (if enabled), flush and hand back the sink.
    pub fn finish(mut self) -> Result<S, Diagnostic> {
        if self.halt_loop {
            self.emitter.emit_halt();
            self.drain()?;
        }
        self.sink
            .flush()
            .map_err(|e| Diagnostic::io(format!("cannot flush output: {}", e)))?;
        debug!("translated {} commands", self.commands);
        Ok(self.sink)
    }

    fn drain(&mut self) -> Result<(), Diagnostic> {
        for line in self.emitter.take_output() {
            self.sink
                .write_line(&line)
                .map_err(|e| Diagnostic::io(format!("cannot write output: {}", e)))?;
        }
        Ok(())
    }
}

/// Whether the bootstrap should be emitted for this set of units.
pub(crate) fn wants_bootstrap(
    options: &TranslateOptions,
    parsed: &[Vec<Spanned<Command>>],
) -> bool {
    match options.bootstrap {
        Bootstrap::Always => true,
        Bootstrap::Never => false,
        Bootstrap::Auto => parsed
            .iter()
            .flatten()
            .any(|cmd| matches!(&cmd.node, Command::Function(name, _) if *name == options.entry)),
    }
}
