use crate::grammer::ast::{
    char_value, literal_value, AssignOp, BinaryOp, DataType, Declaration, Expr, Function, Program,
    Stmt, UnaryOp,
};
use crate::regalloc::{RegAlloc, RegStats};
use crate::symbols::{SymbolTable, Variable};
use arch::inst::{Addr, Inst};
use arch::reg::Reg;
use arch::syscall::Syscall;
use itertools::{chain, Itertools};
use serde::Serialize;

const HEADER: [&str; 5] = [
    "# ============================================",
    "# Generated MIPS Assembly Code",
    "# C-to-MIPS Compiler",
    "# ============================================",
    "",
];

const RULE: &str = "# ----------------------------------------";

/// Registers pushed around a call made from inside a function
const CALLER_SAVED: [Reg; 5] = [Reg::T0, Reg::T1, Reg::T2, Reg::T3, Reg::T4];

#[derive(Debug, Clone, Serialize)]
pub struct GenStats {
    pub data_lines: usize,
    pub text_lines: usize,
    pub total_lines: usize,
    pub labels_generated: usize,
    pub registers: RegStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    pub asm: String,
    pub warnings: Vec<String>,
    pub stats: GenStats,
}

pub struct CodeGen<'a> {
    table: &'a SymbolTable,
    data: Vec<String>,
    text: Vec<String>,
    label_counter: usize,
    regs: RegAlloc,
    current: Option<String>,
    warnings: Vec<String>,
}

impl<'a> CodeGen<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        CodeGen {
            table,
            data: Vec::new(),
            text: Vec::new(),
            label_counter: 0,
            regs: RegAlloc::new(),
            current: None,
            warnings: Vec::new(),
        }
    }

    pub fn generate(program: &Program, table: &'a SymbolTable) -> Generated {
        let mut codegen = CodeGen::new(table);
        codegen.gen_data();
        codegen.gen_text(program);
        codegen.finish()
    }

    fn finish(self) -> Generated {
        let asm = chain!(
            HEADER.iter().map(|line| line.to_string()),
            self.data.iter().cloned(),
            [String::new()],
            self.text.iter().cloned()
        )
        .join("\n");
        let stats = GenStats {
            data_lines: self.data.len(),
            text_lines: self.text.len(),
            total_lines: self.data.len() + self.text.len(),
            labels_generated: self.label_counter,
            registers: self.regs.stats(),
        };
        Generated {
            asm,
            warnings: self.warnings,
            stats,
        }
    }
}

// ----------------------------------------------------------------------------
// Emitters
// ----------------------------------------------------------------------------

impl<'a> CodeGen<'a> {
    fn emit(&mut self, line: String) {
        self.text.push(line);
    }

    fn inst(&mut self, inst: Inst) {
        self.emit(format!("    {}", inst));
    }

    fn inst_note(&mut self, inst: Inst, note: &str) {
        self.emit(format!("    {}    # {}", inst, note));
    }

    fn comment(&mut self, text: &str) {
        self.emit(format!("    # {}", text));
    }

    fn label(&mut self, label: &str) {
        self.emit(format!("{}:", label));
    }

    fn blank(&mut self) {
        self.emit(String::new());
    }

    fn warn(&mut self, message: String) {
        log::warn!("codegen: {}", message);
        self.comment(&format!("Warning: {}", message));
        self.warnings.push(message);
    }

    fn fresh_label(&mut self, prefix: &str) -> String {
        let label = format!("{}_{}", prefix, self.label_counter);
        self.label_counter += 1;
        label
    }

    fn syscall(&mut self, call: Syscall, note: Option<&str>) {
        let li = Inst::LI(Reg::V0, i32::from(call));
        match note {
            Some(note) => self.inst_note(li, note),
            None => self.inst(li),
        }
        self.inst(Inst::SYSCALL);
    }

    /// Unknown names fall back to an int scalar
    fn var(&self, name: &str) -> Variable {
        match self.table.lookup(name) {
            Ok(var) => var.clone(),
            Err(_) => Variable {
                name: name.to_string(),
                ty: DataType::Int,
                array: None,
            },
        }
    }
}

// ----------------------------------------------------------------------------
// Sections
// ----------------------------------------------------------------------------

impl<'a> CodeGen<'a> {
    fn gen_data(&mut self) {
        self.data.push(".data".to_string());
        for var in self.table.variables.values() {
            let line = match (var.array, var.ty) {
                (Some(len), ty) => format!(
                    "{}: .space {}    # {}[{}]",
                    var.name,
                    len * var.elem_size() as usize,
                    ty,
                    len
                ),
                (None, DataType::Char) => format!("{}: .byte 0    # char", var.name),
                (None, _) => format!("{}: .word 0    # int", var.name),
            };
            self.data.push(line);
        }
        self.data.push("_newline: .asciiz \"\\n\"".to_string());
        self.data.push("_space: .asciiz \" \"".to_string());
        self.data.push(String::new());
    }

    fn gen_text(&mut self, program: &Program) {
        self.emit(".text".to_string());
        self.emit(".globl main".to_string());
        self.blank();

        // Globals start zeroed in the data section
        for decl in program.declarations.iter().filter(|d| d.init.is_some()) {
            self.warn(format!("Initializer of global '{}' is ignored", decl.name));
        }

        if program.functions.is_empty() {
            self.label("main");
            self.stmts(&program.statements);
            self.blank();
            self.comment("Exit program");
            self.syscall(Syscall::Exit, None);
            return;
        }

        let main = program.functions.iter().find(|f| f.name == "main");
        let others = program.functions.iter().filter(|f| f.name != "main");
        for func in main.into_iter().chain(others) {
            self.gen_function(func);
        }

        if main.is_none() {
            self.label("main");
            self.comment("Error: No main function found");
            self.syscall(Syscall::Exit, None);
        }
    }

    fn gen_function(&mut self, func: &Function) {
        let is_main = func.name == "main";
        self.current = Some(func.name.clone());
        self.regs.reset();

        self.emit(RULE.to_string());
        self.emit(format!("# Function: {}", func.name));
        self.emit(RULE.to_string());
        self.label(&func.name);

        if !is_main {
            self.comment("Function prologue");
            self.push(Reg::RA);
            self.blank();
        }

        if !func.params.is_empty() {
            self.comment("Store function parameters");
            for (param, arg) in func.params.iter().zip(Reg::ARGS) {
                let addr = Addr::Label(param.name.clone());
                let store = match param.ty {
                    DataType::Char => Inst::SB(arg, addr),
                    _ => Inst::SW(arg, addr),
                };
                self.inst_note(store, &format!("param: {}", param.name));
            }
            self.blank();
        }

        self.comment("Function body");
        self.stmts(&func.body);

        self.blank();
        if is_main {
            self.comment("Main function exit");
            self.syscall(Syscall::Exit, None);
        } else {
            self.comment("Function epilogue");
            self.ret();
        }
        self.blank();
        self.current = None;
    }

    fn push(&mut self, reg: Reg) {
        self.inst(Inst::ADDI(Reg::SP, Reg::SP, -4));
        self.inst(Inst::SW(reg, Addr::Offset(0, Reg::SP)));
    }

    fn pop(&mut self, reg: Reg) {
        self.inst(Inst::LW(reg, Addr::Offset(0, Reg::SP)));
        self.inst(Inst::ADDI(Reg::SP, Reg::SP, 4));
    }

    /// Restore `$ra` and jump back to the caller
    fn ret(&mut self) {
        self.pop(Reg::RA);
        self.inst(Inst::JR(Reg::RA));
    }
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl<'a> CodeGen<'a> {
    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration(decl) => self.gen_declaration(decl),
            Stmt::Assignment(name, index, op, expr) => {
                self.gen_assignment(name, index.as_ref(), *op, expr)
            }
            Stmt::If(cond, then, other) => self.gen_if(cond, then, other.as_deref()),
            Stmt::For(init, cond, update, body) => {
                self.gen_for(init.as_deref(), cond.as_ref(), update.as_deref(), body)
            }
            Stmt::While(cond, body) => self.gen_while(cond, body),
            Stmt::DoWhile(body, cond) => self.gen_do_while(body, cond),
            Stmt::Printf(format, args) => self.gen_printf(format, args),
            Stmt::Scanf(format, names) => self.gen_scanf(format, names),
            Stmt::Return(expr) => self.gen_return(expr.as_ref()),
            Stmt::Expr(expr) => {
                self.expr(expr);
            }
            Stmt::Block(stmts) => self.stmts(stmts),
        }
    }

    /// Storage is laid out in the data section; only the initializer runs here
    fn gen_declaration(&mut self, decl: &Declaration) {
        if let Some(init) = &decl.init {
            let reg = self.expr(init);
            self.store(&decl.name, None, reg);
        }
    }

    fn gen_assignment(&mut self, name: &str, index: Option<&Expr>, op: AssignOp, expr: &Expr) {
        self.comment(&format!("Assignment: {} {}", name, op));
        let rhs = self.expr(expr);
        match op {
            AssignOp::Assign => self.store(name, index, rhs),
            AssignOp::AddAssign | AssignOp::SubAssign => {
                let current = self.load(name, index);
                let res = self.regs.alloc();
                match op {
                    AssignOp::AddAssign => self.inst(Inst::ADD(res, current, rhs)),
                    _ => self.inst(Inst::SUB(res, current, rhs)),
                }
                self.store(name, index, res);
            }
        }
    }

    fn gen_if(&mut self, cond: &Expr, then: &[Stmt], other: Option<&[Stmt]>) {
        let else_label = self.fresh_label("else");
        let end_label = self.fresh_label("endif");

        self.comment("If statement");
        let cond = self.expr(cond);
        let other = other.filter(|stmts| !stmts.is_empty());
        let target = match other {
            Some(_) => else_label.clone(),
            None => end_label.clone(),
        };
        self.inst(Inst::BEQ(cond, Reg::ZERO, target));

        self.stmts(then);
        if let Some(other) = other {
            self.inst(Inst::J(end_label.clone()));
            self.label(&else_label);
            self.stmts(other);
        }
        self.label(&end_label);
    }

    fn gen_for(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        update: Option<&Stmt>,
        body: &[Stmt],
    ) {
        let start_label = self.fresh_label("for_start");
        let end_label = self.fresh_label("for_end");

        self.comment("For loop");
        if let Some(init) = init {
            self.stmt(init);
        }
        self.label(&start_label);
        if let Some(cond) = cond {
            let cond = self.expr(cond);
            self.inst(Inst::BEQ(cond, Reg::ZERO, end_label.clone()));
        }
        self.stmts(body);
        if let Some(update) = update {
            self.stmt(update);
        }
        self.inst(Inst::J(start_label));
        self.label(&end_label);
    }

    fn gen_while(&mut self, cond: &Expr, body: &[Stmt]) {
        let start_label = self.fresh_label("while_start");
        let end_label = self.fresh_label("while_end");

        self.comment("While loop");
        self.label(&start_label);
        let cond = self.expr(cond);
        self.inst(Inst::BEQ(cond, Reg::ZERO, end_label.clone()));
        self.stmts(body);
        self.inst(Inst::J(start_label));
        self.label(&end_label);
    }

    fn gen_do_while(&mut self, body: &[Stmt], cond: &Expr) {
        let start_label = self.fresh_label("do_start");
        let end_label = self.fresh_label("do_end");

        self.comment("Do-while loop");
        self.label(&start_label);
        self.stmts(body);
        let cond = self.expr(cond);
        self.inst(Inst::BNE(cond, Reg::ZERO, start_label));
        self.label(&end_label);
    }

    /// Only the conversions are printed, then one trailing newline or space
    fn gen_printf(&mut self, format: &str, args: &[Expr]) {
        self.comment("Printf");
        for (spec, arg) in conversions(format, "dcsf").into_iter().zip(args) {
            let reg = self.expr(arg);
            let (call, note) = match spec {
                'd' => (Syscall::PrintInt, "print int"),
                'c' => (Syscall::PrintChar, "print char"),
                's' => (Syscall::PrintString, "print string"),
                _ => {
                    self.warn(format!("Unsupported printf conversion '%{}'", spec));
                    continue;
                }
            };
            self.inst(Inst::MOVE(Reg::A0, reg));
            self.syscall(call, Some(note));
        }

        let newline = format.contains("\\n");
        if newline || format.contains(' ') {
            let text = if newline { "_newline" } else { "_space" };
            self.inst(Inst::LA(Reg::A0, text.to_string()));
            self.syscall(Syscall::PrintString, Some("print string"));
        }
    }

    fn gen_scanf(&mut self, format: &str, names: &[String]) {
        self.comment("Scanf");
        for (spec, name) in conversions(format, "dcs").into_iter().zip(names) {
            let (call, note) = match spec {
                'd' => (Syscall::ReadInt, "read int"),
                'c' => (Syscall::ReadChar, "read char"),
                _ => {
                    self.warn(format!("Unsupported scanf conversion '%{}'", spec));
                    continue;
                }
            };
            if self.var(name).array.is_some() {
                self.warn(format!("scanf into array '{}' stores its first element", name));
            }
            self.syscall(call, Some(note));
            self.store(name, None, Reg::V0);
        }
    }

    fn gen_return(&mut self, expr: Option<&Expr>) {
        self.comment("Return statement");
        if let Some(expr) = expr {
            let reg = self.expr(expr);
            self.inst(Inst::MOVE(Reg::V0, reg));
        }
        // Top-level statements have no caller to return to
        match self.current.as_deref() {
            Some("main") | None => self.syscall(Syscall::Exit, None),
            _ => self.ret(),
        }
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl<'a> CodeGen<'a> {
    /// Evaluate into a fresh scratch register
    fn expr(&mut self, expr: &Expr) -> Reg {
        match expr {
            Expr::Number(lit) => {
                let reg = self.regs.alloc();
                self.inst(Inst::LI(reg, literal_value(lit) as i32));
                reg
            }
            Expr::Char(lit) => {
                let reg = self.regs.alloc();
                self.inst(Inst::LI(reg, char_value(lit)));
                reg
            }
            Expr::String(_) => {
                let reg = self.regs.alloc();
                self.inst(Inst::LI(reg, 0));
                self.warn("String literal used as a value".to_string());
                reg
            }
            Expr::Ident(name, index) => self.load(name, index.as_deref()),
            Expr::Binary(op, lhs, rhs) => self.gen_binary(*op, lhs, rhs),
            Expr::Unary(op, operand) => self.gen_unary(*op, operand),
            Expr::Call(name, args) => self.gen_call(name, args),
        }
    }

    fn gen_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Reg {
        let l = self.expr(lhs);
        let r = self.expr(rhs);
        let res = self.regs.alloc();
        match op {
            BinaryOp::Add => self.inst(Inst::ADD(res, l, r)),
            BinaryOp::Sub => self.inst(Inst::SUB(res, l, r)),
            BinaryOp::Mul => self.inst(Inst::MUL(res, l, r)),
            BinaryOp::Div => {
                self.inst(Inst::DIV(l, r));
                self.inst(Inst::MFLO(res));
            }
            BinaryOp::Mod => {
                self.inst(Inst::DIV(l, r));
                self.inst(Inst::MFHI(res));
            }
            BinaryOp::Lt => self.inst(Inst::SLT(res, l, r)),
            BinaryOp::Gt => self.inst(Inst::SLT(res, r, l)),
            BinaryOp::Le => {
                self.inst(Inst::SLT(res, r, l));
                self.inst(Inst::XORI(res, res, 1));
            }
            BinaryOp::Ge => {
                self.inst(Inst::SLT(res, l, r));
                self.inst(Inst::XORI(res, res, 1));
            }
            BinaryOp::Eq => {
                self.inst(Inst::SUB(res, l, r));
                self.inst(Inst::SLTIU(res, res, 1));
            }
            BinaryOp::Ne => {
                self.inst(Inst::SUB(res, l, r));
                self.inst(Inst::SLTU(res, Reg::ZERO, res));
            }
            // Both sides become 0/1 first
            BinaryOp::LogicAnd => {
                self.inst(Inst::SLTU(l, Reg::ZERO, l));
                self.inst(Inst::SLTU(r, Reg::ZERO, r));
                self.inst(Inst::AND(res, l, r));
            }
            BinaryOp::LogicOr => {
                self.inst(Inst::OR(res, l, r));
                self.inst(Inst::SLTU(res, Reg::ZERO, res));
            }
            BinaryOp::And => self.inst(Inst::AND(res, l, r)),
            BinaryOp::Or => self.inst(Inst::OR(res, l, r)),
            BinaryOp::Xor => self.inst(Inst::XOR(res, l, r)),
            BinaryOp::Shl => self.inst(Inst::SLLV(res, l, r)),
            BinaryOp::Shr => self.inst(Inst::SRLV(res, l, r)),
        }
        res
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: &Expr) -> Reg {
        let value = self.expr(operand);
        let res = self.regs.alloc();
        match op {
            UnaryOp::Neg => self.inst(Inst::SUB(res, Reg::ZERO, value)),
            UnaryOp::Not => self.inst(Inst::SLTIU(res, value, 1)),
            UnaryOp::Inc | UnaryOp::Dec => {
                let step = if op == UnaryOp::Inc { 1 } else { -1 };
                self.inst(Inst::ADDI(res, value, step));
                match operand {
                    Expr::Ident(name, index) => self.store(name, index.as_deref(), res),
                    _ => self.warn(format!("'{}' applied to a non-variable is not stored", op)),
                }
            }
        }
        res
    }

    fn gen_call(&mut self, name: &str, args: &[Expr]) -> Reg {
        self.comment(&format!("Call function: {}", name));
        let in_function = self.current.is_some();
        if in_function {
            self.comment("Save caller-saved registers");
            for reg in CALLER_SAVED {
                self.push(reg);
            }
        }

        if args.len() > Reg::ARGS.len() {
            self.warn(format!(
                "Call to '{}' passes {} arguments, only the first {} are used",
                name,
                args.len(),
                Reg::ARGS.len()
            ));
        }
        let regs = args
            .iter()
            .take(Reg::ARGS.len())
            .map(|arg| self.expr(arg))
            .collect_vec();
        for (i, (arg, reg)) in Reg::ARGS.into_iter().zip(regs).enumerate() {
            self.inst_note(Inst::MOVE(arg, reg), &format!("argument {}", i));
        }
        self.inst(Inst::JAL(name.to_string()));

        if in_function {
            self.comment("Restore caller-saved registers");
            for reg in CALLER_SAVED.into_iter().rev() {
                self.pop(reg);
            }
        }

        let res = self.regs.alloc();
        self.inst_note(Inst::MOVE(res, Reg::V0), "store return value");
        res
    }
}

// ----------------------------------------------------------------------------
// Memory
// ----------------------------------------------------------------------------

impl<'a> CodeGen<'a> {
    /// Array names without an index evaluate to their base address
    fn load(&mut self, name: &str, index: Option<&Expr>) -> Reg {
        let var = self.var(name);
        let reg = self.regs.alloc();
        let label = Addr::Label(name.to_string());

        if var.array.is_none() {
            self.inst(load_inst(var.ty, reg, label));
            return reg;
        }

        self.inst(Inst::LA(reg, name.to_string()));
        if let Some(index) = index {
            let idx = self.expr(index);
            let offset = self.regs.alloc();
            self.scale(&var, offset, idx);
            self.inst(Inst::ADD(reg, reg, offset));
            self.inst(load_inst(var.ty, reg, Addr::Offset(0, reg)));
        }
        reg
    }

    fn store(&mut self, name: &str, index: Option<&Expr>, src: Reg) {
        let var = self.var(name);
        match (var.array, index) {
            (Some(_), Some(index)) => {
                let base = self.regs.alloc();
                let idx = self.expr(index);
                let offset = self.regs.alloc();
                self.inst(Inst::LA(base, name.to_string()));
                self.scale(&var, offset, idx);
                self.inst(Inst::ADD(base, base, offset));
                self.inst(store_inst(var.ty, src, Addr::Offset(0, base)));
            }
            _ => self.inst(store_inst(var.ty, src, Addr::Label(name.to_string()))),
        }
    }

    /// Byte offset of element `idx`
    fn scale(&mut self, var: &Variable, offset: Reg, idx: Reg) {
        match var.elem_size() {
            4 => self.inst(Inst::SLL(offset, idx, 2)),
            _ => self.inst(Inst::MOVE(offset, idx)),
        }
    }
}

fn load_inst(ty: DataType, reg: Reg, addr: Addr) -> Inst {
    match ty {
        DataType::Char => Inst::LB(reg, addr),
        _ => Inst::LW(reg, addr),
    }
}

fn store_inst(ty: DataType, reg: Reg, addr: Addr) -> Inst {
    match ty {
        DataType::Char => Inst::SB(reg, addr),
        _ => Inst::SW(reg, addr),
    }
}

/// Conversion letters of `format` in order, e.g. `"%d %c"` -> `['d', 'c']`
fn conversions(format: &str, accepted: &str) -> Vec<char> {
    let chars = format.chars().collect_vec();
    let mut specs = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars.get(i + 1) {
            Some(&c) if chars[i] == '%' && accepted.contains(c) => {
                specs.push(c);
                i += 2;
            }
            _ => i += 1,
        }
    }
    specs
}
