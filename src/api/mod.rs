use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::ast::Command;
use crate::codegen::{AsmSink, AsmWriter};
use crate::diagnostic::{render_diagnostics, Diagnostic};
use crate::span::Spanned;
use crate::syntax::parser::{is_symbol, Parser};

pub mod translator;

pub use translator::Translator;


/// When to emit the bootstrap prologue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Bootstrap {
    /// Only if some unit declares the entry function.
    #[default]
    Auto,
    Always,
    Never,
}

impl Bootstrap {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "auto" => Some(Bootstrap::Auto),
            "always" => Some(Bootstrap::Always),
            "never" => Some(Bootstrap::Never),
            _ => None,
        }
    }
}

/// Options controlling one translation run.
#[derive(Clone, Debug)]
pub struct TranslateOptions {
    pub bootstrap: Bootstrap,
    /// Function called by the bootstrap.
    pub entry: String,
    /// Emit a `// <command>` comment before each lowering.
    pub annotate: bool,
    /// Append a trailing self-jump so execution parks after the last command.
    pub halt_loop: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            bootstrap: Bootstrap::Auto,
            entry: "Sys.init".to_string(),
            annotate: true,
            halt_loop: true,
        }
    }
}

/// One `.vm` source: its static-scoping name and text.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    /// File stem, e.g. `Main` for `Main.vm`.
    pub name: String,
    pub source: String,
    pub path: Option<PathBuf>,
}

impl SourceUnit {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            path: None,
        }
    }

    /// Name shown in diagnostics.
    pub fn display_name(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => format!("{}.vm", self.name),
        }
    }
}

/// Parse VM source into spanned commands without rendering errors.
pub fn parse_source(source: &str, file_id: u16) -> Result<Vec<Spanned<Command>>, Vec<Diagnostic>> {
    Parser::new(source, file_id).parse()
}

/// Translate a single VM source string to Hack assembly.
pub fn translate(source: &str, filename: &str) -> Result<String, Vec<Diagnostic>> {
    translate_with_options(source, filename, &TranslateOptions::default())
}

/// Translate a single VM source string with options. `filename` may carry
/// a directory and extension; only the stem names `static` cells.
pub fn translate_with_options(
    source: &str,
    filename: &str,
    options: &TranslateOptions,
) -> Result<String, Vec<Diagnostic>> {
    let name = unit_name(Path::new(filename));
    check_unit_name(&name).map_err(|err| {
        err.render(filename, "");
        vec![err]
    })?;
    let unit = SourceUnit {
        name,
        source: source.to_string(),
        path: Some(PathBuf::from(filename)),
    };
    translate_units(std::slice::from_ref(&unit), options)
}

/// Translate a whole program, units in the given order, to one
/// newline-terminated assembly text.
pub fn translate_units(
    units: &[SourceUnit],
    options: &TranslateOptions,
) -> Result<String, Vec<Diagnostic>> {
    let mut lines: Vec<String> = Vec::new();
    translate_to_sink(units, options, &mut lines)?;
    let mut asm = lines.join("\n");
    asm.push('\n');
    Ok(asm)
}

/// Stream a program's assembly into `writer`. On failure the writer may
/// hold partial output, which must not be used.
pub fn translate_to_writer<W: Write>(
    units: &[SourceUnit],
    options: &TranslateOptions,
    writer: W,
) -> Result<(), Vec<Diagnostic>> {
    let sink = translate_to_sink(units, options, AsmWriter::new(writer))?;
    debug!("wrote {} lines", sink.lines_written());
    sink.into_inner()
        .map_err(|e| vec![Diagnostic::io(format!("cannot write output: {}", e))])?;
    Ok(())
}

/// Load and translate a `.vm` file or a directory of them.
pub fn translate_path(path: &Path, options: &TranslateOptions) -> Result<String, Vec<Diagnostic>> {
    let units = load_program(path).map_err(|err| {
        err.render(&path.display().to_string(), "");
        vec![err]
    })?;
    translate_units(&units, options)
}

/// Read a program from disk. A directory contributes every `.vm` file
/// directly inside it, in file-name order.
pub fn load_program(path: &Path) -> Result<Vec<SourceUnit>, Diagnostic> {
    if path.is_dir() {
        let entries = fs::read_dir(path).map_err(|e| {
            Diagnostic::io(format!("cannot read directory '{}': {}", path.display(), e))
        })?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Diagnostic::io(format!("cannot read directory '{}': {}", path.display(), e))
            })?;
            let file = entry.path();
            if file.is_file() && is_vm_file(&file) {
                files.push(file);
            }
        }
        if files.is_empty() {
            return Err(Diagnostic::io(format!(
                "no .vm files in '{}'",
                path.display()
            )));
        }
        files.sort();
        debug!("loading {} files from '{}'", files.len(), path.display());
        files.iter().map(|file| load_unit(file)).collect()
    } else if is_vm_file(path) {
        Ok(vec![load_unit(path)?])
    } else if path.exists() {
        Err(Diagnostic::io(format!("'{}' is not a .vm file", path.display()))
            .with_help("pass a .vm file or a directory containing .vm files".to_string()))
    } else {
        Err(Diagnostic::io(format!("'{}' does not exist", path.display())))
    }
}

/// Where `build` writes by default: `Foo.vm` → `Foo.asm`,
/// `dir/` → `dir/dir.asm`.
pub fn default_output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        let name = input
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "out".to_string());
        input.join(format!("{}.asm", name))
    } else {
        input.with_extension("asm")
    }
}

// ─── Internals ─────────────────────────────────────────────────────

fn translate_to_sink<S: AsmSink>(
    units: &[SourceUnit],
    options: &TranslateOptions,
    sink: S,
) -> Result<S, Vec<Diagnostic>> {
    let mut parsed = Vec::with_capacity(units.len());
    let mut errors = Vec::new();
    for (index, unit) in units.iter().enumerate() {
        let checked = file_id(index).and_then(|id| {
            check_unit_name(&unit.name)?;
            Ok(id)
        });
        let result = match checked {
            Ok(id) => parse_source(&unit.source, id),
            Err(err) => Err(vec![err]),
        };
        match result {
            Ok(commands) => parsed.push(commands),
            Err(diags) => {
                render_diagnostics(&diags, &unit.display_name(), &unit.source);
                errors.extend(diags);
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    drive(Translator::new(sink, options), units, &parsed, options).map_err(|err| {
        report(units, &err);
        vec![err]
    })
}

fn drive<S: AsmSink>(
    mut translator: Translator<S>,
    units: &[SourceUnit],
    parsed: &[Vec<Spanned<Command>>],
    options: &TranslateOptions,
) -> Result<S, Diagnostic> {
    if translator::wants_bootstrap(options, parsed) {
        translator.bootstrap()?;
    }
    for (unit, commands) in units.iter().zip(parsed) {
        translator.translate_unit(unit, commands)?;
    }
    translator.finish()
}

/// Render a diagnostic against the unit its span points into.
fn report(units: &[SourceUnit], diag: &Diagnostic) {
    match units.get(diag.span.file_id as usize) {
        Some(unit) if !diag.span.is_dummy() => diag.render(&unit.display_name(), &unit.source),
        _ => diag.render("<program>", ""),
    }
}

/// Spans carry the unit index as a `u16`.
fn file_id(index: usize) -> Result<u16, Diagnostic> {
    u16::try_from(index).map_err(|_| {
        Diagnostic::io(format!("program has more than {} source files", u16::MAX))
    })
}

/// The unit name prefixes every `static` symbol, so it must be a valid
/// Hack symbol itself.
fn check_unit_name(name: &str) -> Result<(), Diagnostic> {
    if is_symbol(name) {
        return Ok(());
    }
    Err(Diagnostic::malformed(format!(
        "file name '{}' cannot name static variables",
        name
    ))
    .with_help(
        "rename the file to start with a letter and use only letters, digits, '_', '.', '$' or ':'"
            .to_string(),
    ))
}

fn load_unit(path: &Path) -> Result<SourceUnit, Diagnostic> {
    let source = fs::read_to_string(path)
        .map_err(|e| Diagnostic::io(format!("cannot read '{}': {}", path.display(), e)))?;
    debug!("loaded '{}' ({} bytes)", path.display(), source.len());
    let name = unit_name(path);
    check_unit_name(&name)?;
    Ok(SourceUnit {
        name,
        source,
        path: Some(path.to_path_buf()),
    })
}

fn unit_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_vm_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "vm")
}
