use arch::inst::Inst;
use bimap::BiMap;
use color_print::cformat;
use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::{
    error::Error,
    parser::{strip_comment, Directive, Stmt},
};

/// First address of the data segment
pub const DATA_BASE: u32 = 0x1000_0000;

/// One slot of the instruction list. Labels occupy a slot of their own so
/// that branch targets are indices into this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Label(String),
    Inst(Inst, String), // decoded, source text without comment
}

#[derive(Debug, Default)]
pub struct Program {
    /// data label -> address
    pub symbols: IndexMap<String, u32>,
    /// first label placed at each address, for naming addresses in dumps
    names: BiMap<String, u32>,
    /// initial non-zero bytes of the data segment
    pub data: BTreeMap<u32, u8>,
    pub entries: Vec<Entry>,
    labels: IndexMap<String, usize>,
    data_end: u32,
}

impl Program {
    pub fn load(text: &str) -> Result<Program, Error> {
        let mut program = Program {
            data_end: DATA_BASE,
            ..Default::default()
        };
        let mut section = None;

        for (idx, line) in text.lines().enumerate() {
            let stmt = Stmt::parse(line, section).map_err(|e| e.at(idx, line.trim()))?;
            match stmt {
                Some(Stmt::Section(s)) => section = Some(s),
                Some(Stmt::Data(label, directive)) => program.alloc(label, directive),
                Some(Stmt::Label(label)) => {
                    program
                        .labels
                        .entry(label.clone())
                        .or_insert(program.entries.len());
                    program.entries.push(Entry::Label(label));
                }
                Some(Stmt::Code(inst)) => {
                    let code = strip_comment(line).to_string();
                    program.entries.push(Entry::Inst(inst, code));
                }
                None => {}
            }
        }

        log::debug!(
            "loaded {} entries, {} data symbols, {} bytes of data",
            program.entries.len(),
            program.symbols.len(),
            program.data_end - DATA_BASE
        );
        Ok(program)
    }

    fn alloc(&mut self, label: String, directive: Directive) {
        let addr = self.data_end;
        match &directive {
            Directive::Word(value) => {
                for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
                    self.init_byte(addr + i as u32, byte);
                }
            }
            Directive::Byte(value) => self.init_byte(addr, *value as u8),
            Directive::Space(_) => {}
            Directive::Asciiz(s) => {
                for (i, byte) in s.bytes().enumerate() {
                    self.init_byte(addr + i as u32, byte);
                }
            }
        }
        self.names.remove_by_left(&label);
        self.names.insert_no_overwrite(label.clone(), addr).ok();
        self.symbols.insert(label, addr);
        self.data_end = addr.wrapping_add(directive.size() as u32);
    }

    fn init_byte(&mut self, addr: u32, byte: u8) {
        if byte != 0 {
            self.data.insert(addr, byte);
        }
    }

    /// Index of the first entry labeled `label`
    pub fn find_label(&self, label: &str) -> Option<usize> {
        self.labels.get(label).copied()
    }

    /// Address of a data label
    pub fn symbol(&self, label: &str) -> Option<u32> {
        self.symbols.get(label).copied()
    }

    /// Data label placed exactly at `addr`; the earliest one when several share it
    pub fn symbol_at(&self, addr: u32) -> Option<&str> {
        self.names.get_by_right(&addr).map(String::as_str)
    }

    pub fn instruction_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Inst(..)))
            .count()
    }

    /// Colored listing of the text section, one entry per line
    pub fn cformat(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| match entry {
                Entry::Label(label) => cformat!("<dim>{:>5}</> <yellow>{}:</>", idx, label),
                Entry::Inst(inst, _) => cformat!("<dim>{:>5}</>     {}", idx, inst.cformat()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::{inst::Addr, reg::Reg};

    const SOURCE: &str = r#"
# header
.data
x: .word 0    # int
c: .byte 0    # char
arr: .space 20    # int[5]
_newline: .asciiz "\n"
_space: .asciiz " "

.text
.globl main

main:
    li    $t0, 9
    sw    $t0, x
loop:
    j     loop
loop:
"#;

    #[test]
    fn layout() {
        let p = Program::load(SOURCE).unwrap();
        assert_eq!(p.symbol("x"), Some(DATA_BASE));
        assert_eq!(p.symbol("c"), Some(DATA_BASE + 4));
        assert_eq!(p.symbol("arr"), Some(DATA_BASE + 5));
        assert_eq!(p.symbol("_newline"), Some(DATA_BASE + 25));
        assert_eq!(p.symbol("_space"), Some(DATA_BASE + 27));
        assert_eq!(p.symbol_at(DATA_BASE + 5), Some("arr"));
        assert_eq!(p.data.get(&(DATA_BASE + 25)), Some(&b'\n'));
        assert_eq!(p.data.get(&(DATA_BASE + 27)), Some(&b' '));
        assert_eq!(p.data.len(), 2);
    }

    #[test]
    fn entries() {
        let p = Program::load(SOURCE).unwrap();
        assert_eq!(p.entries.len(), 6);
        assert_eq!(p.entries[0], Entry::Label("main".into()));
        assert_eq!(
            p.entries[2],
            Entry::Inst(
                Inst::SW(Reg::T0, Addr::Label("x".into())),
                "sw    $t0, x".into()
            )
        );
        assert_eq!(p.instruction_count(), 3);
        // First definition wins
        assert_eq!(p.find_label("loop"), Some(3));
        assert_eq!(p.find_label("nowhere"), None);
    }

    #[test]
    fn error_names_line() {
        let err = Program::load(".text\nmain:\n  bogus $t0\n").unwrap_err();
        assert_eq!(
            err,
            Error::UnknownOperation("bogus".into()).at(2, "bogus $t0")
        );
        assert_eq!(err.to_string(), "Unknown operation: `bogus` at line 3: `bogus $t0`");
    }

    #[test]
    fn empty_reservation_keeps_label() {
        let p = Program::load(".data\nz: .space 0\nb: .word 0\nc: .byte 0\n").unwrap();
        assert_eq!(p.symbol("z"), Some(DATA_BASE));
        assert_eq!(p.symbol("b"), Some(DATA_BASE));
        assert_eq!(p.symbol("c"), Some(DATA_BASE + 4));
        assert_eq!(p.symbol_at(DATA_BASE), Some("z"));
        assert_eq!(p.symbols.len(), 3);
    }

    #[test]
    fn redefined_data_label_moves() {
        let p = Program::load(".data\nx: .word 0\nx: .word 0\n").unwrap();
        assert_eq!(p.symbol("x"), Some(DATA_BASE + 4));
        assert_eq!(p.symbol_at(DATA_BASE + 4), Some("x"));
        assert_eq!(p.symbol_at(DATA_BASE), None);
    }

    #[test]
    fn word_value() {
        let p = Program::load(".data\nn: .word 258\n").unwrap();
        assert_eq!(p.data.get(&DATA_BASE), Some(&2));
        assert_eq!(p.data.get(&(DATA_BASE + 1)), Some(&1));
    }
}
