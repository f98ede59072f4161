//! A small Hack assembler and CPU.
//!
//! Accepts exactly the instruction forms the translator emits plus the
//! rest of the standard `dest=comp;jump` table, so hand-written test
//! programs can be mixed in.

use std::collections::HashMap;

use super::Exit;
use crate::codegen::hack::{MAX_LITERAL, VARIABLE_BASE};

const RAM_SIZE: usize = 0x8000;
const SCREEN: u16 = 0x4000;
const KBD: u16 = 0x6000;

// ─── Instructions ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comp {
    Zero,
    One,
    NegOne,
    D,
    A,
    M,
    NotD,
    NotA,
    NotM,
    NegD,
    NegA,
    NegM,
    DPlusOne,
    APlusOne,
    MPlusOne,
    DMinusOne,
    AMinusOne,
    MMinusOne,
    DPlusA,
    DPlusM,
    DMinusA,
    DMinusM,
    AMinusD,
    MMinusD,
    DAndA,
    DAndM,
    DOrA,
    DOrM,
}

impl Comp {
    fn parse(text: &str) -> Option<Comp> {
        let comp = match text {
            "0" => Comp::Zero,
            "1" => Comp::One,
            "-1" => Comp::NegOne,
            "D" => Comp::D,
            "A" => Comp::A,
            "M" => Comp::M,
            "!D" => Comp::NotD,
            "!A" => Comp::NotA,
            "!M" => Comp::NotM,
            "-D" => Comp::NegD,
            "-A" => Comp::NegA,
            "-M" => Comp::NegM,
            "D+1" | "1+D" => Comp::DPlusOne,
            "A+1" | "1+A" => Comp::APlusOne,
            "M+1" | "1+M" => Comp::MPlusOne,
            "D-1" => Comp::DMinusOne,
            "A-1" => Comp::AMinusOne,
            "M-1" => Comp::MMinusOne,
            "D+A" | "A+D" => Comp::DPlusA,
            "D+M" | "M+D" => Comp::DPlusM,
            "D-A" => Comp::DMinusA,
            "D-M" => Comp::DMinusM,
            "A-D" => Comp::AMinusD,
            "M-D" => Comp::MMinusD,
            "D&A" | "A&D" => Comp::DAndA,
            "D&M" | "M&D" => Comp::DAndM,
            "D|A" | "A|D" => Comp::DOrA,
            "D|M" | "M|D" => Comp::DOrM,
            _ => return None,
        };
        Some(comp)
    }

    fn reads_memory(self) -> bool {
        matches!(
            self,
            Comp::M
                | Comp::NotM
                | Comp::NegM
                | Comp::MPlusOne
                | Comp::MMinusOne
                | Comp::DPlusM
                | Comp::DMinusM
                | Comp::MMinusD
                | Comp::DAndM
                | Comp::DOrM
        )
    }

    fn eval(self, d: u16, a: u16, m: u16) -> u16 {
        match self {
            Comp::Zero => 0,
            Comp::One => 1,
            Comp::NegOne => u16::MAX,
            Comp::D => d,
            Comp::A => a,
            Comp::M => m,
            Comp::NotD => !d,
            Comp::NotA => !a,
            Comp::NotM => !m,
            Comp::NegD => d.wrapping_neg(),
            Comp::NegA => a.wrapping_neg(),
            Comp::NegM => m.wrapping_neg(),
            Comp::DPlusOne => d.wrapping_add(1),
            Comp::APlusOne => a.wrapping_add(1),
            Comp::MPlusOne => m.wrapping_add(1),
            Comp::DMinusOne => d.wrapping_sub(1),
            Comp::AMinusOne => a.wrapping_sub(1),
            Comp::MMinusOne => m.wrapping_sub(1),
            Comp::DPlusA => d.wrapping_add(a),
            Comp::DPlusM => d.wrapping_add(m),
            Comp::DMinusA => d.wrapping_sub(a),
            Comp::DMinusM => d.wrapping_sub(m),
            Comp::AMinusD => a.wrapping_sub(d),
            Comp::MMinusD => m.wrapping_sub(d),
            Comp::DAndA => d & a,
            Comp::DAndM => d & m,
            Comp::DOrA => d | a,
            Comp::DOrM => d | m,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dest {
    pub a: bool,
    pub d: bool,
    pub m: bool,
}

impl Dest {
    fn parse(text: &str) -> Option<Dest> {
        let mut dest = Dest::default();
        for ch in text.chars() {
            let slot = match ch {
                'A' => &mut dest.a,
                'D' => &mut dest.d,
                'M' => &mut dest.m,
                _ => return None,
            };
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(dest)
    }

    fn is_empty(self) -> bool {
        !(self.a || self.d || self.m)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    Jgt,
    Jeq,
    Jge,
    Jlt,
    Jne,
    Jle,
    Jmp,
}

impl Cond {
    fn parse(text: &str) -> Option<Cond> {
        let cond = match text {
            "JGT" => Cond::Jgt,
            "JEQ" => Cond::Jeq,
            "JGE" => Cond::Jge,
            "JLT" => Cond::Jlt,
            "JNE" => Cond::Jne,
            "JLE" => Cond::Jle,
            "JMP" => Cond::Jmp,
            _ => return None,
        };
        Some(cond)
    }

    fn holds(self, value: u16) -> bool {
        let v = value as i16;
        match self {
            Cond::Jgt => v > 0,
            Cond::Jeq => v == 0,
            Cond::Jge => v >= 0,
            Cond::Jlt => v < 0,
            Cond::Jne => v != 0,
            Cond::Jle => v <= 0,
            Cond::Jmp => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// `@value`, symbols already resolved.
    Address(u16),
    Compute {
        dest: Dest,
        comp: Comp,
        jump: Option<Cond>,
    },
}

// ─── Assembler ─────────────────────────────────────────────────────

/// An assembled ROM image plus its symbol table.
#[derive(Clone, Debug)]
pub struct Program {
    rom: Vec<Instruction>,
    symbols: HashMap<String, u16>,
}

impl Program {
    /// Two passes: bind `(LABEL)`s to ROM addresses, then translate every
    /// instruction, allocating unknown `@symbol`s from RAM[16] upward.
    pub fn assemble(lines: &[String]) -> Result<Program, String> {
        let mut symbols = predefined_symbols();

        let mut address: usize = 0;
        for (lineno, line) in lines.iter().enumerate() {
            let code = strip(line);
            if code.is_empty() {
                continue;
            }
            if let Some(label) = code.strip_prefix('(') {
                let name = label
                    .strip_suffix(')')
                    .ok_or_else(|| format!("line {}: unterminated label '{}'", lineno + 1, code))?;
                if symbols.insert(name.to_string(), address as u16).is_some() {
                    return Err(format!("line {}: duplicate symbol '{}'", lineno + 1, name));
                }
            } else {
                address += 1;
            }
        }
        if address > RAM_SIZE {
            return Err(format!("program has {} instructions, ROM holds {}", address, RAM_SIZE));
        }

        let mut next_variable = VARIABLE_BASE;
        let mut rom = Vec::with_capacity(address);
        for (lineno, line) in lines.iter().enumerate() {
            let code = strip(line);
            if code.is_empty() || code.starts_with('(') {
                continue;
            }
            let inst = if let Some(operand) = code.strip_prefix('@') {
                Instruction::Address(resolve_operand(operand, &mut symbols, &mut next_variable)
                    .map_err(|e| format!("line {}: {}", lineno + 1, e))?)
            } else {
                parse_compute(code).ok_or_else(|| {
                    format!("line {}: invalid instruction '{}'", lineno + 1, code)
                })?
            };
            rom.push(inst);
        }

        Ok(Program { rom, symbols })
    }

    pub fn len(&self) -> usize {
        self.rom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rom.is_empty()
    }

    /// Address bound to a label or variable.
    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }
}

fn strip(line: &str) -> &str {
    let code = match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    };
    code.trim()
}

fn predefined_symbols() -> HashMap<String, u16> {
    let mut symbols = HashMap::new();
    for (name, addr) in [("SP", 0), ("LCL", 1), ("ARG", 2), ("THIS", 3), ("THAT", 4)] {
        symbols.insert(name.to_string(), addr);
    }
    for r in 0..16u16 {
        symbols.insert(format!("R{}", r), r);
    }
    symbols.insert("SCREEN".to_string(), SCREEN);
    symbols.insert("KBD".to_string(), KBD);
    symbols
}

fn resolve_operand(
    operand: &str,
    symbols: &mut HashMap<String, u16>,
    next_variable: &mut u16,
) -> Result<u16, String> {
    if operand.starts_with(|c: char| c.is_ascii_digit()) {
        let value: u32 = operand
            .parse()
            .map_err(|_| format!("invalid address literal '{}'", operand))?;
        if value > u32::from(MAX_LITERAL) {
            return Err(format!("address literal {} exceeds {}", value, MAX_LITERAL));
        }
        return Ok(value as u16);
    }
    if let Some(&addr) = symbols.get(operand) {
        return Ok(addr);
    }
    let addr = *next_variable;
    if addr >= SCREEN {
        return Err(format!(
            "no RAM left for variable '{}': variables would overlap SCREEN",
            operand
        ));
    }
    *next_variable = addr + 1;
    symbols.insert(operand.to_string(), addr);
    Ok(addr)
}

fn parse_compute(code: &str) -> Option<Instruction> {
    let (dest_text, rest) = match code.split_once('=') {
        Some((dest, rest)) => (dest.trim(), rest),
        None => ("", code),
    };
    let (comp_text, jump_text) = match rest.split_once(';') {
        Some((comp, jump)) => (comp, Some(jump.trim())),
        None => (rest, None),
    };
    let comp_text: String = comp_text.chars().filter(|c| !c.is_whitespace()).collect();

    let dest = Dest::parse(dest_text)?;
    let comp = Comp::parse(&comp_text)?;
    let jump = match jump_text {
        Some(text) => Some(Cond::parse(text)?),
        None => None,
    };
    Some(Instruction::Compute { dest, comp, jump })
}

// ─── CPU ───────────────────────────────────────────────────────────

pub struct Machine {
    program: Program,
    ram: Vec<u16>,
    a: u16,
    d: u16,
    pc: usize,
    cycles: u64,
}

impl Machine {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
            cycles: 0,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn poke(&mut self, address: u16, value: i16) {
        self.ram[address as usize % RAM_SIZE] = value as u16;
    }

    pub fn peek(&self, address: u16) -> i16 {
        self.ram[address as usize % RAM_SIZE] as i16
    }

    /// Cell bound to `symbol` (e.g. a static variable), if it was referenced.
    pub fn peek_symbol(&self, symbol: &str) -> Option<i16> {
        self.program.symbol(symbol).map(|addr| self.peek(addr))
    }

    pub fn sp(&self) -> i16 {
        self.peek(0)
    }

    /// `RAM[base..SP]`; empty when SP is below `base`.
    pub fn stack(&self, base: u16) -> Vec<i16> {
        let top = self.sp() as u16;
        (base..top.max(base)).map(|addr| self.peek(addr)).collect()
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }

    /// Execute until the PC leaves ROM or the CPU parks in a self-jump.
    pub fn run(&mut self, max_steps: u64) -> Result<Exit, String> {
        loop {
            if self.pc >= self.program.rom.len() {
                return Ok(Exit::EndOfProgram);
            }
            if self.cycles >= max_steps {
                return Err(format!(
                    "step limit of {} reached at pc {}",
                    max_steps, self.pc
                ));
            }
            if self.step() {
                return Ok(Exit::HaltLoop);
            }
        }
    }

    /// One instruction. Returns true when it is the jump of a halt loop.
    fn step(&mut self) -> bool {
        let inst = self.program.rom[self.pc];
        self.cycles += 1;
        match inst {
            Instruction::Address(value) => {
                self.a = value;
                self.pc += 1;
                false
            }
            Instruction::Compute { dest, comp, jump } => {
                // Both the memory operand and the jump target use A as it
                // was before this instruction writes it.
                let addr = self.a as usize % RAM_SIZE;
                let target = self.a as usize;
                let m = if comp.reads_memory() { self.ram[addr] } else { 0 };
                let value = comp.eval(self.d, self.a, m);
                if dest.m {
                    self.ram[addr] = value;
                }
                if dest.d {
                    self.d = value;
                }
                if dest.a {
                    self.a = value;
                }
                let taken = jump.is_some_and(|cond| cond.holds(value));
                if !taken {
                    self.pc += 1;
                    return false;
                }
                let halted = dest.is_empty()
                    && jump == Some(Cond::Jmp)
                    && target + 1 == self.pc
                    && self.program.rom[target] == Instruction::Address(target as u16);
                self.pc = target;
                halted
            }
        }
    }
}

#[cfg(test)]
mod tests;
