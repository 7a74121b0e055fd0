use std::collections::BTreeMap;

use arch::alu::{alu, div, ALU};
use arch::inst::{Addr, Inst};
use arch::reg::Reg;
use arch::syscall::Syscall;
use indexmap::IndexMap;
use mcasm::{Entry, Program};
use strum::IntoEnumIterator;

use crate::error::Error;

pub struct State {
    program: Program,
    reg: [i32; 32],
    lo: i32,
    hi: i32,
    pc: usize,
    memory: BTreeMap<u32, u8>,
    output: String,
    executed: u64,
    running: bool,
    max_string: usize,
}

// Register access
impl State {
    pub fn get(&self, reg: Reg) -> i32 {
        self.reg[reg.index()]
    }

    pub fn set(&mut self, reg: Reg, val: i32) {
        if reg != Reg::ZERO {
            self.reg[reg.index()] = val;
        }
    }

    pub fn get_by_name(&self, name: &str) -> Result<i32, Error> {
        let reg = Reg::parse(name).map_err(|_| Error::UnknownRegister(name.to_string()))?;
        Ok(self.get(reg))
    }
}

// Memory access, little endian
impl State {
    pub fn load_byte(&self, addr: u32) -> u8 {
        self.memory.get(&addr).copied().unwrap_or(0)
    }

    pub fn store_byte(&mut self, addr: u32, val: u8) {
        if val == 0 {
            self.memory.remove(&addr);
        } else {
            self.memory.insert(addr, val);
        }
    }

    pub fn load_word(&self, addr: u32) -> i32 {
        let bytes = [0, 1, 2, 3].map(|i| self.load_byte(addr.wrapping_add(i)));
        i32::from_le_bytes(bytes)
    }

    pub fn store_word(&mut self, addr: u32, val: i32) {
        for (i, byte) in val.to_le_bytes().into_iter().enumerate() {
            self.store_byte(addr.wrapping_add(i as u32), byte);
        }
    }

    /// Zero terminated string starting at `addr`, at most `max_string` bytes
    pub fn load_string(&self, addr: u32) -> String {
        (0..self.max_string as u32)
            .map(|i| self.load_byte(addr.wrapping_add(i)))
            .take_while(|&b| b != 0)
            .map(char::from)
            .collect()
    }
}

impl State {
    pub const SP_INIT: i32 = 0x7FFF_FFFC;

    pub fn new(program: Program, max_string: usize) -> Self {
        let mut reg = [0; 32];
        reg[Reg::SP.index()] = Self::SP_INIT;
        State {
            memory: program.data.clone(),
            program,
            reg,
            lo: 0,
            hi: 0,
            pc: 0,
            output: String::new(),
            executed: 0,
            running: true,
            max_string,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn executed(&self) -> u64 {
        self.executed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Text of the instruction at the program counter
    pub fn current(&self) -> Option<&str> {
        match self.program.entries.get(self.pc) {
            Some(Entry::Inst(_, code)) => Some(code),
            _ => None,
        }
    }

    /// All registers by name, in numbering order
    pub fn registers(&self) -> IndexMap<String, i32> {
        Reg::iter().map(|r| (r.name(), self.get(r))).collect()
    }

    /// Non-zero bytes keyed by hex address
    pub fn memory(&self) -> IndexMap<String, u8> {
        self.memory
            .iter()
            .filter(|(_, v)| **v != 0)
            .map(|(addr, v)| (format!("0x{:x}", addr), *v))
            .collect()
    }

    /// Execute the next instruction, skipping label markers.
    /// Returns its index and text, or `None` once the program has run off its end.
    pub fn exec(&mut self) -> Result<Option<(usize, String)>, Error> {
        let (inst, code) = loop {
            match self.program.entries.get(self.pc) {
                None => {
                    self.running = false;
                    return Ok(None);
                }
                Some(Entry::Label(_)) => self.pc += 1,
                Some(Entry::Inst(inst, code)) => break (inst.clone(), code.clone()),
            }
        };

        let addr = self.pc;
        log::trace!("[{:0>5}] {:>4}: {}", self.executed, addr, inst);

        let next = self.dispatch(&inst).map_err(|e| Error::Exec {
            code: code.clone(),
            source: Box::new(e),
        })?;
        self.pc = next;
        self.executed += 1;
        Ok(Some((addr, code)))
    }

    /// Returns the index of the next entry
    fn dispatch(&mut self, inst: &Inst) -> Result<usize, Error> {
        let next = self.pc + 1;
        match inst {
            Inst::ADD(rd, rs, rt)
            | Inst::SUB(rd, rs, rt)
            | Inst::MUL(rd, rs, rt)
            | Inst::AND(rd, rs, rt)
            | Inst::OR(rd, rs, rt)
            | Inst::XOR(rd, rs, rt)
            | Inst::SLT(rd, rs, rt)
            | Inst::SLTU(rd, rs, rt)
            | Inst::SLLV(rd, rs, rt)
            | Inst::SRLV(rd, rs, rt) => self.calc(inst.to_alu(), *rd, *rs, self.get(*rt)),
            Inst::ADDI(rd, rs, imm)
            | Inst::XORI(rd, rs, imm)
            | Inst::SLTIU(rd, rs, imm)
            | Inst::SLL(rd, rs, imm)
            | Inst::SRL(rd, rs, imm) => self.calc(inst.to_alu(), *rd, *rs, *imm),
            Inst::DIV(rs, rt) => {
                if let Some((quo, rem)) = div(self.get(*rs), self.get(*rt)) {
                    self.lo = quo;
                    self.hi = rem;
                }
            }
            Inst::MFLO(rd) => self.set(*rd, self.lo),
            Inst::MFHI(rd) => self.set(*rd, self.hi),
            Inst::LW(rt, addr) => self.set(*rt, self.load_word(self.resolve(addr))),
            Inst::LB(rt, addr) => self.set(*rt, self.load_byte(self.resolve(addr)) as i32),
            Inst::SW(rt, addr) => self.store_word(self.resolve(addr), self.get(*rt)),
            Inst::SB(rt, addr) => self.store_byte(self.resolve(addr), self.get(*rt) as u8),
            Inst::LA(rd, label) => {
                let addr = self.program.symbol(label).unwrap_or(0);
                self.set(*rd, addr as i32);
            }
            Inst::LI(rd, imm) => self.set(*rd, *imm),
            Inst::MOVE(rd, rs) => self.set(*rd, self.get(*rs)),
            Inst::BEQ(rs, rt, label) | Inst::BNE(rs, rt, label) => {
                let eq = self.get(*rs) == self.get(*rt);
                let taken = matches!(inst, Inst::BEQ(..)) == eq;
                if taken {
                    return self.target(label);
                }
            }
            Inst::J(label) => return self.target(label),
            Inst::JAL(label) => {
                let target = self.target(label)?;
                self.set(Reg::RA, next as i32);
                return Ok(target);
            }
            Inst::JR(rs) => return Ok(usize::try_from(self.get(*rs)).unwrap_or(usize::MAX)),
            Inst::SYSCALL => self.syscall(),
        }
        Ok(next)
    }

    fn calc(&mut self, op: Option<ALU>, rd: Reg, rs: Reg, val: i32) {
        if let Some(op) = op {
            self.set(rd, alu(op, self.get(rs), val));
        }
    }

    fn resolve(&self, addr: &Addr) -> u32 {
        match addr {
            Addr::Offset(offset, base) => self.get(*base).wrapping_add(*offset) as u32,
            Addr::Label(label) => self.program.symbol(label).unwrap_or(0),
        }
    }

    fn target(&self, label: &str) -> Result<usize, Error> {
        self.program
            .find_label(label)
            .ok_or_else(|| Error::LabelNotFound(label.to_string()))
    }

    fn syscall(&mut self) {
        let code = self.get(Reg::V0);
        let a0 = self.get(Reg::A0);
        match Syscall::try_from(code) {
            Ok(Syscall::PrintInt) => self.output.push_str(&a0.to_string()),
            Ok(Syscall::PrintString) => {
                let s = self.load_string(a0 as u32);
                self.output.push_str(&s);
            }
            Ok(Syscall::PrintChar) => self.output.push(char::from(a0 as u8)),
            Ok(Syscall::ReadInt) | Ok(Syscall::ReadChar) => self.set(Reg::V0, 0),
            Ok(Syscall::Exit) => self.running = false,
            Err(_) => log::warn!("Unknown syscall code: {}", code),
        }
    }
}
