use crate::error::Error;
use crate::grammer::ast::{Declaration, Expr, Function, Program, Stmt};
use crate::symbols::SymbolTable;

/// Resolves every name used by a program against one flat symbol table
#[derive(Debug, Default)]
pub struct Analyzer {
    table: SymbolTable,
    warnings: Vec<String>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Globals first, then every function signature, then the bodies in order,
    /// then top-level statements.
    pub fn analyze(&mut self, program: &Program) -> Result<(), Error> {
        for decl in &program.declarations {
            self.declaration(decl)?;
        }
        for func in &program.functions {
            self.table
                .define_function(&func.name, func.return_type, &func.params);
        }
        for func in &program.functions {
            self.function(func)?;
        }
        for stmt in &program.statements {
            self.stmt(stmt)?;
        }
        log::debug!(
            "{} variables, {} functions, {} warnings",
            self.table.variables.len(),
            self.table.functions.len(),
            self.warnings.len()
        );
        Ok(())
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn finish(self) -> (SymbolTable, Vec<String>) {
        (self.table, self.warnings)
    }

    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(message);
    }
}

impl Analyzer {
    fn declaration(&mut self, decl: &Declaration) -> Result<(), Error> {
        self.table.define_variable(&decl.name, decl.ty, decl.array);
        if let Some(init) = &decl.init {
            self.expr(init)?;
        }
        Ok(())
    }

    fn function(&mut self, func: &Function) -> Result<(), Error> {
        for param in &func.params {
            self.table.define_variable(&param.name, param.ty, None);
        }
        self.stmts(&func.body)
    }

    fn stmts(&mut self, stmts: &[Stmt]) -> Result<(), Error> {
        stmts.iter().try_for_each(|stmt| self.stmt(stmt))
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Declaration(decl) => self.declaration(decl),
            Stmt::Assignment(name, index, _, expr) => {
                self.table.lookup(name)?;
                if let Some(index) = index {
                    self.expr(index)?;
                }
                self.expr(expr)
            }
            Stmt::If(cond, then, other) => {
                self.expr(cond)?;
                self.stmts(then)?;
                match other {
                    Some(other) => self.stmts(other),
                    None => Ok(()),
                }
            }
            Stmt::For(init, cond, update, body) => {
                if let Some(init) = init {
                    self.stmt(init)?;
                }
                if let Some(cond) = cond {
                    self.expr(cond)?;
                }
                if let Some(update) = update {
                    self.stmt(update)?;
                }
                self.stmts(body)
            }
            Stmt::While(cond, body) | Stmt::DoWhile(body, cond) => {
                self.expr(cond)?;
                self.stmts(body)
            }
            Stmt::Printf(_, args) => args.iter().try_for_each(|arg| self.expr(arg)),
            Stmt::Scanf(_, names) => names
                .iter()
                .try_for_each(|name| self.table.lookup(name).map(|_| ())),
            Stmt::Return(expr) => match expr {
                Some(expr) => self.expr(expr),
                None => Ok(()),
            },
            Stmt::Expr(expr) => self.expr(expr),
            Stmt::Block(stmts) => self.stmts(stmts),
        }
    }

    fn expr(&mut self, expr: &Expr) -> Result<(), Error> {
        match expr {
            Expr::Binary(_, lhs, rhs) => {
                self.expr(lhs)?;
                self.expr(rhs)
            }
            Expr::Unary(_, operand) => self.expr(operand),
            Expr::Ident(name, index) => {
                self.table.lookup(name)?;
                match index {
                    Some(index) => self.expr(index),
                    None => Ok(()),
                }
            }
            Expr::Call(name, args) => {
                if self.table.lookup_function(name).is_none() {
                    self.warn(format!("Undefined function '{}'", name));
                }
                args.iter().try_for_each(|arg| self.expr(arg))
            }
            Expr::Number(_) | Expr::Char(_) | Expr::String(_) => Ok(()),
        }
    }
}
